use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use ts2partition::commands::{self, DEFAULT_SOURCE_COLUMN};
use ts2partition::CliOverrides;
use ts2partition_config::RuntimeConfig;

/// Bucket timestamps into partition values and project predicates onto them
#[derive(Parser)]
#[command(name = "ts2partition")]
#[command(version)]
#[command(about = "Timestamp partition transforms: bucketing and predicate projection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Partition granularity: year, month, day, hour (overrides config file)
    #[arg(short, long, value_name = "G", global = true)]
    granularity: Option<String>,

    /// Fixed zone offset such as +05:00 or Z (overrides config file)
    #[arg(short, long, value_name = "ID", global = true, allow_hyphen_values = true)]
    offset: Option<String>,

    /// Partition field name used in projected predicates
    #[arg(short, long, value_name = "NAME", global = true)]
    field: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short = 'v', long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Bucket timestamps (microseconds since epoch, or null)
    Apply {
        #[arg(value_name = "MICROS", required = true, allow_negative_numbers = true)]
        values: Vec<String>,
    },
    /// Project a predicate on the timestamp column onto the partition field
    Project {
        /// lt, lte, gt, gte, eq, neq, in, notin, isnull, notnull
        #[arg(long, value_name = "OP")]
        op: String,

        /// Literal timestamp in microseconds; repeat for in/notin
        #[arg(long = "value", value_name = "MICROS", allow_negative_numbers = true)]
        values: Vec<i64>,

        /// Strict projection (all rows of a kept partition match)
        #[arg(long)]
        strict: bool,

        /// Timestamp column the predicate is written against
        #[arg(long, value_name = "NAME", default_value = DEFAULT_SOURCE_COLUMN)]
        column: String,
    },
    /// Show the transform identity and result type
    Describe,
    /// Render partition values as human-readable strings
    Human {
        #[arg(value_name = "VALUE", required = true, allow_negative_numbers = true)]
        values: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Step 1: Load base configuration; validated once CLI overrides are in
    let mut config = if let Some(config_path) = &cli.config {
        RuntimeConfig::read_from_path(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        RuntimeConfig::read_or_default().context("Failed to load configuration")?
    };

    // Step 2: Apply CLI overrides (highest priority)
    CliOverrides {
        granularity: cli.granularity.clone(),
        offset: cli.offset.clone(),
        partition_field: cli.field.clone(),
        log_level: cli.log_level.clone(),
    }
    .apply_to(&mut config);

    // Step 3: Initialize tracing before validation so warnings show up
    ts2partition::init_tracing(&config.logging);

    // Step 4: Validate the merged configuration and build the transform
    config.validate()?;
    let transform = config.transform.build()?;
    let field = config.transform.partition_field_name();

    let lines = match cli.command {
        Commands::Apply { values } => commands::apply(&transform, &values)?,
        Commands::Project {
            op,
            values,
            strict,
            column,
        } => vec![commands::project(
            &transform, &field, &column, &op, &values, strict,
        )?],
        Commands::Describe => commands::describe(&transform, &field),
        Commands::Human { values } => commands::human(&transform, &values)?,
    };

    for line in lines {
        println!("{}", line);
    }
    Ok(())
}
