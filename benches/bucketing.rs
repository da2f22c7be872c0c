// Bucketing benchmark - measure timestamp → partition value conversion
//
// This is the per-row hot path when writing partitioned data.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ts2partition_core::{Granularity, TimestampTransform, ZoneOffset};

const ROWS: i64 = 10_000;
// 2021-06-15T10:30:00Z
const START: i64 = 1_623_753_000_000_000;
const STEP: i64 = 7 * 60 * 1_000_000 + 13;

fn timestamps() -> Vec<i64> {
    (0..ROWS).map(|i| START + (i - ROWS / 2) * STEP).collect()
}

/// Benchmark `apply_value` for each granularity at UTC and at an offset
fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_value");
    let input = timestamps();
    group.throughput(Throughput::Elements(input.len() as u64));

    for offset in ["Z", "+05:30"] {
        let offset = ZoneOffset::parse(offset).unwrap();
        for granularity in Granularity::ALL {
            let transform = TimestampTransform::new(granularity, offset);
            group.bench_with_input(
                BenchmarkId::new(granularity.name(), offset.id()),
                &input,
                |b, input| {
                    b.iter(|| {
                        for ts in input {
                            black_box(transform.apply_value(*ts).unwrap());
                        }
                    });
                },
            );
        }
    }

    group.finish();
}

/// Benchmark human rendering of already-bucketed values
fn bench_human(c: &mut Criterion) {
    let mut group = c.benchmark_group("to_human_string");

    for granularity in Granularity::ALL {
        let transform = TimestampTransform::utc(granularity);
        let values: Vec<i32> = timestamps()
            .into_iter()
            .map(|ts| transform.apply_value(ts).unwrap())
            .collect();
        group.throughput(Throughput::Elements(values.len() as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(granularity.name()),
            &values,
            |b, values| {
                b.iter(|| {
                    for v in values {
                        black_box(transform.to_human_string(Some(*v)).unwrap());
                    }
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_apply, bench_human);
criterion_main!(benches);
