//! perf_summary - sender/receiver benchmark summaries
//!
//! Groups the sender and receiver measurement CSVs by key and writes the
//! per-key mean and sample standard deviation of every measured column.
//!
//! Exit codes:
//!   0 - All summaries written
//!   1 - Any read, schema, or write failure

mod cli;
mod data;
mod pipeline;
mod stats;

use clap::Parser;
use cli::Args;
use pipeline::Aggregator;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() {
    let args = Args::parse();

    init_logging(&args);

    info!("perf_summary v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    let aggregator = Aggregator::new(args.to_config());
    match aggregator.run() {
        Ok(report) => {
            for file in &report.files {
                debug!("  {} ({} rows)", file.path.display(), file.rows);
            }
            let rows: usize = report.files.iter().map(|f| f.rows).sum();
            info!("Done: {} files, {} rows", report.files.len(), rows);
        }
        Err(e) => {
            error!("Aggregation failed: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Initialize logging. `RUST_LOG` takes precedence over the CLI level.
fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level().as_str()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {e}");
    }
}
