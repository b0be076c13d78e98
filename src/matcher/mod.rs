//! Keyword matching and record-to-topic routing.
//!
//! A record belongs to a topic when any of the topic's keywords occurs in
//! the record's searchable text (title, plus summary when present) as a
//! case-insensitive literal. Keywords carry no pattern syntax: a keyword
//! like `C++` matches the characters `C++` and nothing else.
//!
//! The whole-word rule: an occurrence is rejected when it sits directly
//! against another alphanumeric character *and* the keyword edge on that
//! side is a Latin letter or digit. So `AI` matches "AI technology" and
//! "ai 眼镜" but not "training" or "AIxyz", while a CJK keyword such as
//! `人工智能` matches anywhere as a plain substring. Multi-word keywords
//! match as literal phrases with the boundary rule applied at the phrase
//! edges only.

use std::collections::BTreeMap;

use tracing::instrument;

use crate::registry::{Topic, TopicRegistry};
use crate::source::TrendRecord;

/// Returns `true` if `keyword` occurs in `text` as a case-insensitive
/// whole-word (or whole-phrase) literal.
///
/// Empty and whitespace-only keywords never match.
#[must_use]
pub fn keyword_matches(text: &str, keyword: &str) -> bool {
    if keyword.trim().is_empty() {
        return false;
    }

    let text = text.to_lowercase();
    let keyword = keyword.to_lowercase();

    // The boundary rule is only armed on edges where alphanumeric adjacency
    // is meaningful, i.e. Latin-letter/digit keyword edges.
    let guard_start = keyword
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric());
    let guard_end = keyword
        .chars()
        .next_back()
        .is_some_and(|c| c.is_ascii_alphanumeric());

    for (start, matched) in text.match_indices(&keyword) {
        let before_ok = !guard_start
            || text[..start]
                .chars()
                .next_back()
                .is_none_or(|c| !c.is_alphanumeric());
        let after_ok = !guard_end
            || text[start + matched.len()..]
                .chars()
                .next()
                .is_none_or(|c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
    }

    false
}

/// Returns `true` if `record` belongs to `topic` (any keyword matches).
///
/// Evaluation short-circuits on the first matching keyword; keyword order
/// never affects the result.
#[must_use]
pub fn record_matches(record: &TrendRecord, topic: &Topic) -> bool {
    let text = record.searchable_text();
    topic.keywords.iter().any(|kw| keyword_matches(&text, kw))
}

/// Routes a batch of records across every topic in the registry.
///
/// Each topic's match set is computed independently; a record may appear
/// under zero, one, or several topics. Topics with no matches are absent
/// from the result, so a topic with an empty keyword list never shows up.
#[instrument(skip_all, fields(records = records.len(), topics = registry.len()))]
#[must_use]
pub fn route_records(
    records: &[TrendRecord],
    registry: &TopicRegistry,
) -> BTreeMap<String, Vec<TrendRecord>> {
    let mut routed: BTreeMap<String, Vec<TrendRecord>> = BTreeMap::new();

    for record in records {
        let text = record.searchable_text();
        for topic in registry.topics() {
            if topic.keywords.iter().any(|kw| keyword_matches(&text, kw)) {
                routed
                    .entry(topic.id.clone())
                    .or_default()
                    .push(record.clone());
            }
        }
    }

    routed
}
