//! Parsing of existing timeline documents.
//!
//! Parsing is deliberately conservative: the only structure recovered is
//! the `## YYYY-MM-DD` section skeleton and the set of urls on link lines.
//! Everything else stays as verbatim lines, so hand edits survive a merge
//! byte for byte.

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::source::TrendRecord;

use super::render::{LINK_LABEL, NO_LINK_PLACEHOLDER, TITLE_LABEL, entry_lines, section_heading};

/// Matches the url on an entry's link line, up to the next whitespace.
#[allow(clippy::expect_used)]
static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*链接\*\*：(https?://\S+)").expect("link regex is valid") // Static pattern, safe to panic
});

/// Warning about one existing entry that yielded no url.
///
/// The entry itself is preserved verbatim; it is only excluded from the
/// dedup set, so it can never block a future add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// Date of the section holding the entry, when known.
    pub date: Option<NaiveDate>,
    /// First title line of the offending entry, for operator context.
    pub snippet: String,
}

/// One `## YYYY-MM-DD` section; body kept as verbatim lines.
#[derive(Debug, Clone)]
pub(crate) struct Section {
    pub(crate) date: NaiveDate,
    pub(crate) heading: String,
    pub(crate) body: Vec<String>,
}

/// A timeline document split into a verbatim preamble (heading plus any
/// user notes) and date sections.
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    preamble: Vec<String>,
    sections: Vec<Section>,
    urls: HashSet<String>,
    warnings: Vec<ParseWarning>,
}

impl ParsedDocument {
    /// Parses a rendered document.
    ///
    /// Never fails: lines that fit no known structure are carried along
    /// verbatim, and entries without a recoverable url only produce a
    /// [`ParseWarning`].
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut preamble = Vec::new();
        let mut sections: Vec<Section> = Vec::new();

        for line in content.split('\n') {
            if let Some(date) = heading_date(line) {
                sections.push(Section {
                    date,
                    heading: line.to_string(),
                    body: Vec::new(),
                });
            } else if let Some(section) = sections.last_mut() {
                section.body.push(line.to_string());
            } else {
                preamble.push(line.to_string());
            }
        }

        let urls = extract_urls(content);
        let warnings = collect_warnings(&sections);
        Self {
            preamble,
            sections,
            urls,
            warnings,
        }
    }

    /// A fresh document holding only the topic heading.
    pub(crate) fn new_empty(label: &str) -> Self {
        Self {
            preamble: vec![format!("# {label}"), String::new()],
            ..Self::default()
        }
    }

    /// Urls of every entry already present (the dedup set).
    #[must_use]
    pub fn urls(&self) -> &HashSet<String> {
        &self.urls
    }

    /// Warnings collected while scanning existing entries.
    #[must_use]
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    /// Dates of the sections, in document order.
    #[must_use]
    pub fn section_dates(&self) -> Vec<NaiveDate> {
        self.sections.iter().map(|s| s.date).collect()
    }

    /// Prepends rendered entries for `date`, creating and placing the
    /// section when it does not exist yet.
    pub(crate) fn insert_entries(&mut self, date: NaiveDate, records: &[&TrendRecord]) {
        let mut lines: Vec<String> = Vec::new();
        for record in records {
            lines.extend(entry_lines(record));
        }

        if let Some(section) = self.sections.iter_mut().find(|s| s.date == date) {
            // Entries added by this run go above whatever the section
            // already holds.
            section.body.splice(0..0, lines);
            return;
        }

        lines.push(String::new());
        let section = Section {
            date,
            heading: section_heading(date),
            body: lines,
        };
        // First position that keeps dates descending; existing sections are
        // never re-ordered, even when hand edits broke the order.
        let index = self
            .sections
            .iter()
            .position(|s| s.date < date)
            .unwrap_or(self.sections.len());
        self.sections.insert(index, section);
    }

    /// Re-serializes the document.
    pub(crate) fn render(&self) -> String {
        let mut lines: Vec<&str> = Vec::new();
        lines.extend(self.preamble.iter().map(String::as_str));
        for section in &self.sections {
            lines.push(&section.heading);
            lines.extend(section.body.iter().map(String::as_str));
        }

        let mut content = lines.join("\n");
        if !content.ends_with('\n') {
            content.push('\n');
        }
        content
    }
}

/// Parses a `## YYYY-MM-DD` heading line into its date.
fn heading_date(line: &str) -> Option<NaiveDate> {
    let rest = line.strip_prefix("## ")?;
    NaiveDate::parse_from_str(rest.trim(), "%Y-%m-%d").ok()
}

/// Collects every url appearing on a link line anywhere in the document.
pub(crate) fn extract_urls(content: &str) -> HashSet<String> {
    LINK_PATTERN
        .captures_iter(content)
        .map(|captures| captures[1].to_string())
        .collect()
}

/// Flags entries (blocks delimited by `---` holding a title line) whose
/// link line yields no url and is not the explicit no-link placeholder.
fn collect_warnings(sections: &[Section]) -> Vec<ParseWarning> {
    let mut warnings = Vec::new();
    for section in sections {
        for block in section.body.split(|line: &String| line.trim() == "---") {
            let Some(title_line) = block
                .iter()
                .find(|line| line.trim_start().starts_with(TITLE_LABEL))
            else {
                continue;
            };
            let has_url = block.iter().any(|line| LINK_PATTERN.is_match(line));
            let unlinked = block
                .iter()
                .any(|line| line.contains(LINK_LABEL) && line.contains(NO_LINK_PLACEHOLDER));
            if !has_url && !unlinked {
                warnings.push(ParseWarning {
                    date: Some(section.date),
                    snippet: title_line.trim().to_string(),
                });
            }
        }
    }
    warnings
}
