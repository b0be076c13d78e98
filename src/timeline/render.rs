//! Rendering of timeline entries in the fixed document format.

use chrono::NaiveDate;

use crate::source::TrendRecord;

/// Label opening an entry.
pub(crate) const TITLE_LABEL: &str = "**标题**：";
/// Label of the line carrying the dedup url.
pub(crate) const LINK_LABEL: &str = "**链接**：";
/// Rendered in place of a missing url.
pub(crate) const NO_LINK_PLACEHOLDER: &str = "（无链接）";
/// Rendered in place of a missing summary.
pub(crate) const NO_SUMMARY_PLACEHOLDER: &str = "（无摘要）";
/// The judgment field is left for manual annotation and never touched again.
pub(crate) const JUDGMENT_PLACEHOLDER: &str = "（留空，供人工补充）";

/// Renders one record as document lines: a blank separator, the
/// title/source/link block, the summary and judgment blocks, and the `---`
/// terminator. Trailing double spaces are markdown hard line breaks.
pub(crate) fn entry_lines(record: &TrendRecord) -> Vec<String> {
    let url = record.url.as_deref().unwrap_or(NO_LINK_PLACEHOLDER);
    let summary = record.summary.as_deref().unwrap_or(NO_SUMMARY_PLACEHOLDER);

    let mut lines = vec![
        String::new(),
        format!("{TITLE_LABEL}{}  ", record.title),
        format!("**来源**：{}  ", record.source),
        format!("{LINK_LABEL}{url}"),
        String::new(),
        "**摘要**：  ".to_string(),
    ];
    lines.extend(summary.split('\n').map(ToString::to_string));
    lines.push(String::new());
    lines.push("**我的判断**：  ".to_string());
    lines.push(JUDGMENT_PLACEHOLDER.to_string());
    lines.push(String::new());
    lines.push("---".to_string());
    lines
}

/// Renders a date section heading line.
pub(crate) fn section_heading(date: NaiveDate) -> String {
    format!("## {date}")
}
