//! ts2partition-core - timestamp partition transforms
//!
//! Buckets microsecond timestamps into year, month, day or hour partition
//! values and projects predicates on the raw column onto those values so a
//! planner can prune partitions.
//!
//! Everything here is pure: no I/O, no async, no shared mutable state.

pub mod error;
pub mod expr;
pub mod human;
pub mod projection;
pub mod transform;
pub mod types;

pub use error::{ErrorCode, Result, TransformError};
pub use expr::{BoundPredicate, BoundReference, BoundTerm, PredicateOperator, UnboundPredicate};
pub use human::{CalendarFormatter, HumanFormatter};
pub use projection::{ComposedProjection, Projector, SameTransformProjection};
pub use transform::{Granularity, TimestampTransform, ZoneOffset};
pub use types::{Datum, PrimitiveType};
