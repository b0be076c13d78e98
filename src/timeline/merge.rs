//! Idempotent merge of newly matched records into a timeline document.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, instrument};

use crate::registry::Topic;
use crate::source::TrendRecord;

use super::document::{ParseWarning, ParsedDocument};

/// Result of merging one topic's matches into its timeline.
#[derive(Debug)]
pub struct MergeOutcome {
    /// The full updated document. Equal to the input when nothing was
    /// added, so callers can skip the write.
    pub document: String,
    /// Number of genuinely new entries (the delta size).
    pub count_added: usize,
    /// Per-entry warnings from parsing the existing document.
    pub warnings: Vec<ParseWarning>,
}

/// Merges `new_matches` into `existing`, deduplicating by url and keeping
/// date sections in descending order.
///
/// The existing document is the source of truth for dedup: its link lines
/// are re-parsed into a url set and any record whose url is already there
/// is dropped. Same-url duplicates within the batch collapse to the first
/// seen. Records without a url have no identity and always count as new.
///
/// Applying the same merge twice yields `count_added == 0` the second time
/// and leaves the document untouched.
#[instrument(skip_all, fields(topic = %topic.id, matches = new_matches.len()))]
#[must_use]
pub fn merge_timeline(
    topic: &Topic,
    new_matches: &[TrendRecord],
    existing: Option<&str>,
) -> MergeOutcome {
    let mut doc = match existing {
        Some(content) => ParsedDocument::parse(content),
        None => ParsedDocument::new_empty(&topic.label),
    };
    let warnings = doc.warnings().to_vec();

    let mut seen = doc.urls().clone();
    let mut delta: Vec<&TrendRecord> = Vec::new();
    for record in new_matches {
        match &record.url {
            Some(url) => {
                if seen.insert(url.clone()) {
                    delta.push(record);
                }
            }
            None => delta.push(record),
        }
    }

    let count_added = delta.len();
    debug!(count_added, "delta computed");
    if count_added == 0 {
        return MergeOutcome {
            document: existing.unwrap_or_default().to_string(),
            count_added: 0,
            warnings,
        };
    }

    let mut by_date: BTreeMap<NaiveDate, Vec<&TrendRecord>> = BTreeMap::new();
    for record in delta {
        by_date.entry(record.date).or_default().push(record);
    }
    for (date, records) in by_date {
        doc.insert_entries(date, &records);
    }

    MergeOutcome {
        document: doc.render(),
        count_added,
        warnings,
    }
}
