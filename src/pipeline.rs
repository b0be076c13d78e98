//! End-to-end routing run: registry → source → matcher → merger.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, instrument, warn};

use crate::matcher::route_records;
use crate::registry::TopicRegistry;
use crate::report::{RunReport, TopicOutcome, TopicWarning};
use crate::source::TrendSource;
use crate::timeline::{TimelineStore, merge_timeline};

/// Filesystem layout and behavior switches for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Path to the topic definitions (`topics.yaml`).
    pub topics_file: PathBuf,
    /// Directory holding the crawler's per-day databases.
    pub source_dir: PathBuf,
    /// Directory receiving `<topic_id>/timeline.md` files.
    pub index_dir: PathBuf,
    /// Compute and report deltas without writing anything.
    pub dry_run: bool,
}

/// Runs the full routing pipeline.
///
/// Fatal errors (bad configuration, unavailable source) abort before any
/// timeline is touched. Per-unit problems - an unreadable day file, an
/// existing entry whose url cannot be recovered - are collected into the
/// report and never stop the remaining topics. Zero matched topics is a
/// successful run that writes nothing.
///
/// # Errors
///
/// Returns an error when the topic configuration is invalid, the source is
/// unavailable, or a timeline cannot be read or replaced.
#[instrument(skip(config), fields(source_dir = %config.source_dir.display()))]
pub async fn run(config: &RunConfig) -> Result<RunReport> {
    let registry =
        TopicRegistry::load(&config.topics_file).context("loading topic configuration")?;
    info!(topics = registry.len(), "topic registry loaded");

    let source = TrendSource::new(&config.source_dir);
    let batch = source.read_all().await.context("reading trend records")?;
    info!(
        records = batch.records.len(),
        skipped = batch.skipped.len(),
        "trend records read"
    );

    let routed = route_records(&batch.records, &registry);
    let store = TimelineStore::new(&config.index_dir);

    let mut report = RunReport {
        records_read: batch.records.len(),
        skipped_units: batch.skipped,
        ..RunReport::default()
    };

    for topic in registry.topics() {
        let Some(matches) = routed.get(&topic.id) else {
            continue;
        };

        let existing = store
            .read(&topic.id)
            .with_context(|| format!("reading timeline for topic '{}'", topic.id))?;
        let outcome = merge_timeline(topic, matches, existing.as_deref());

        for warning in &outcome.warnings {
            warn!(
                topic = %topic.id,
                snippet = %warning.snippet,
                "existing entry has no recoverable url, excluded from dedup"
            );
            report.warnings.push(TopicWarning {
                topic_id: topic.id.clone(),
                warning: warning.clone(),
            });
        }

        let path = if outcome.count_added == 0 {
            info!(topic = %topic.id, matched = matches.len(), "no new records to add");
            None
        } else if config.dry_run {
            info!(
                topic = %topic.id,
                matched = matches.len(),
                added = outcome.count_added,
                "dry run, timeline not written"
            );
            None
        } else {
            let path = store
                .write(&topic.id, &outcome.document)
                .with_context(|| format!("writing timeline for topic '{}'", topic.id))?;
            info!(
                topic = %topic.id,
                matched = matches.len(),
                added = outcome.count_added,
                path = %path.display(),
                "timeline updated"
            );
            Some(path)
        };

        report.topics.push(TopicOutcome {
            topic_id: topic.id.clone(),
            matched: matches.len(),
            added: outcome.count_added,
            path,
        });
    }

    Ok(report)
}
