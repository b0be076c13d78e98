//! CLI entry point for the topicline tool.

use anyhow::Result;
use clap::Parser;
use topicline_core::{RunConfig, pipeline};
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");
    info!("Topicline starting");

    let config = RunConfig {
        topics_file: args.topics,
        source_dir: args.source_dir,
        index_dir: args.index_dir,
        dry_run: args.dry_run,
    };

    let report = pipeline::run(&config).await?;

    info!(
        records = report.records_read,
        topics_matched = report.topics.len(),
        topics_updated = report.topics_updated(),
        added = report.total_added(),
        skipped_units = report.skipped_units.len(),
        parse_warnings = report.warnings.len(),
        "Routing complete"
    );

    Ok(())
}
