//! Timeline documents: parsing, merging, rendering and storage.
//!
//! A timeline is a markdown file (`<index_dir>/<topic_id>/timeline.md`)
//! holding every record ever matched to a topic: a `# <label>` heading
//! followed by `## YYYY-MM-DD` sections in strictly descending date order,
//! each section holding fixed-format entries.
//!
//! The document doubles as the dedup index: before merging, the existing
//! file is re-parsed and the urls on its link lines become the set of
//! already-seen records. Content the parser does not recognize - user
//! notes, hand-edited entries, non-date headings - is preserved verbatim.

mod document;
mod merge;
mod render;
mod store;

pub use document::{ParseWarning, ParsedDocument};
pub use merge::{MergeOutcome, merge_timeline};
pub use store::{TimelineError, TimelineStore};
