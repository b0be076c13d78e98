//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Re-index crawled trend records into per-topic markdown timelines.
///
/// Topicline reads the crawler's per-day databases, routes every record to
/// the topics whose keywords it matches, and merges the new matches into
/// each topic's `timeline.md` without duplicating previously seen records.
#[derive(Parser, Debug)]
#[command(name = "topicline")]
#[command(author, version, about)]
pub struct Args {
    /// Path to the topic definitions file
    #[arg(short = 't', long, default_value = "topics.yaml")]
    pub topics: PathBuf,

    /// Directory containing the crawler's per-day trend databases
    #[arg(short = 's', long, default_value = "output/news")]
    pub source_dir: PathBuf,

    /// Directory where per-topic timelines are written
    #[arg(short = 'i', long, default_value = "index")]
    pub index_dir: PathBuf,

    /// Compute and report changes without writing any timeline
    #[arg(long)]
    pub dry_run: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}
