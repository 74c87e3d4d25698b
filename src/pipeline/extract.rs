//! Issue extraction: split one review document into issue sections.
//!
//! A review document looks like this:
//!
//! ```text
//! # Monitoring review
//!
//! ### 1. Leak
//! Heap grows without bound.
//!
//! ---
//!
//! ### 2. Timeout
//! **Priority:** High
//! Requests stall after 30s.
//! ```
//!
//! Two independent matchers do the work. [`RE_ISSUE_HEADING`] partitions the
//! text into sections; [`RE_PRIORITY_FIELD`] is then run inside each trimmed
//! section. Text before the first heading (document title, preamble) belongs
//! to no issue.

use crate::document::{Category, Issue, SourceDocument, DEFAULT_STATUS};
use crate::pipeline::record::FrontMatter;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;
use tracing::{debug, warn};

/// `### <digits>. <title>` at the start of a line. Any decimal digits count,
/// so every line shaped like a heading starts a section even when its label
/// is not a readable `u64`.
static RE_ISSUE_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^###[ \t]+(\d+)\.[ \t]*(.*?)[ \t]*$").unwrap());

/// `**Priority:** value`, `**Severity**: value` and friends. The value runs
/// to the end of the line.
static RE_PRIORITY_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)\*\*(?:Priority|Severity)(?::\*\*|\*\*[ \t]*:)[ \t]*(.*)$").unwrap()
});

/// A heading match plus the untrimmed text that belongs to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSection {
    /// Numeric label as written in the heading, or the 1-based position of
    /// the heading when the label is not ASCII digits fitting a `u64`.
    pub index: u64,
    /// Heading text after the label, surrounding blanks removed.
    pub title: String,
    /// Byte range of the heading line (without its newline).
    pub heading: Range<usize>,
    /// Byte range from the end of the heading to the next heading (or EOF).
    pub span: Range<usize>,
}

/// Locate every issue heading and the span that follows it.
///
/// Spans are contiguous: each one ends exactly where the next heading
/// starts, so `heading + span` pairs tile the document from the first
/// heading to the end.
pub fn find_sections(text: &str) -> Vec<RawSection> {
    let headings: Vec<(Range<usize>, u64, String)> = RE_ISSUE_HEADING
        .captures_iter(text)
        .enumerate()
        .filter_map(|(i, caps)| {
            let whole = caps.get(0)?;
            let index = parse_label(caps.get(1)?.as_str(), i + 1);
            let title = caps.get(2).map(|m| m.as_str()).unwrap_or("").trim();
            Some((whole.range(), index, title.to_string()))
        })
        .collect();

    headings
        .iter()
        .enumerate()
        .map(|(i, (heading, index, title))| {
            let end = headings
                .get(i + 1)
                .map(|(next, _, _)| next.start)
                .unwrap_or(text.len());
            RawSection {
                index: *index,
                title: title.clone(),
                heading: heading.clone(),
                span: heading.end..end,
            }
        })
        .collect()
}

fn parse_label(label: &str, position: usize) -> u64 {
    label.parse::<u64>().unwrap_or_else(|_| {
        warn!(
            "Issue label '{}' is not a number that fits in u64; using heading position {}",
            label, position
        );
        position as u64
    })
}

/// Extract the ordered issues of one classified document.
///
/// A document without any issue heading is valid: a warning is logged and
/// the result is empty. Returned issues are unsequenced (`sequence == 0`).
pub fn extract_issues(doc: &SourceDocument) -> Vec<Issue> {
    let sections = find_sections(&doc.text);
    if sections.is_empty() {
        warn!("No issue headings found in '{}'", doc.path.display());
        return Vec::new();
    }

    let issues: Vec<Issue> = sections
        .into_iter()
        .map(|section| {
            let span = trim_section(&doc.text[section.span.clone()]);
            build_issue(section, span, &doc.group, doc.category)
        })
        .collect();

    debug!("Extracted {} issues from '{}'", issues.len(), doc.path.display());
    issues
}

fn build_issue(section: RawSection, span: &str, group: &str, category: Category) -> Issue {
    let priority = find_priority(span);
    let body = format!("## {}\n\n{}", section.title, span);
    Issue {
        title: section.title,
        source_issue_index: section.index,
        group: group.to_string(),
        category,
        sequence: 0,
        priority,
        status: DEFAULT_STATUS.to_string(),
        body,
        extra_frontmatter: FrontMatter::new(),
    }
}

/// First `Priority` / `Severity` field value, trimmed. An empty value counts
/// as absent.
pub fn find_priority(span: &str) -> Option<String> {
    let caps = RE_PRIORITY_FIELD.captures(span)?;
    let value = caps.get(1)?.as_str().trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Drop one trailing horizontal rule (and the blank lines around it), then
/// trim surrounding whitespace.
pub fn trim_section(span: &str) -> &str {
    let trimmed = span.trim_end();
    let last_line_start = trimmed.rfind('\n').map(|i| i + 1).unwrap_or(0);
    if is_horizontal_rule(&trimmed[last_line_start..]) {
        trimmed[..last_line_start].trim()
    } else {
        trimmed.trim()
    }
}

fn is_horizontal_rule(line: &str) -> bool {
    let line = line.trim();
    line.len() >= 3 && line.chars().all(|c| c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> SourceDocument {
        SourceDocument::from_text("reviews/INFRA_MONITORING.md", text).unwrap()
    }

    #[test]
    fn test_basic_extraction() {
        let text = "# Review\n\n### 1. Leak\nHeap grows.\n\n---\n\n### 2. Timeout\n**Priority:** High\nStalls.\n";
        let issues = extract_issues(&doc(text));
        assert_eq!(issues.len(), 2);

        assert_eq!(issues[0].title, "Leak");
        assert_eq!(issues[0].source_issue_index, 1);
        assert_eq!(issues[0].priority, None);
        assert_eq!(issues[0].body, "## Leak\n\nHeap grows.");
        assert_eq!(issues[0].group, "INFRA");
        assert_eq!(issues[0].category, Category::Monitoring);
        assert_eq!(issues[0].status, "pending");
        assert_eq!(issues[0].sequence, 0);
        assert!(issues[0].extra_frontmatter.is_empty());

        assert_eq!(issues[1].title, "Timeout");
        assert_eq!(issues[1].priority.as_deref(), Some("High"));
        assert_eq!(issues[1].body, "## Timeout\n\n**Priority:** High\nStalls.");
    }

    #[test]
    fn test_no_headings_is_empty() {
        let issues = extract_issues(&doc("# Review\n\nNothing to report.\n"));
        assert!(issues.is_empty());
    }

    #[test]
    fn test_other_heading_levels_ignored() {
        let text = "## 1. Not an issue\n#### 2. Nor this\n### 3. Real\nx\n";
        let issues = extract_issues(&doc(text));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].source_issue_index, 3);
        assert_eq!(issues[0].body, "## Real\n\nx");
    }

    #[test]
    fn test_heading_must_start_line() {
        let text = "text ### 1. Inline\n### 2. Real\n";
        let sections = find_sections(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].index, 2);
    }

    #[test]
    fn test_labels_kept_verbatim() {
        let text = "### 7. A\n### 7. B\n### 3. C\n";
        let indices: Vec<u64> = extract_issues(&doc(text))
            .iter()
            .map(|i| i.source_issue_index)
            .collect();
        assert_eq!(indices, vec![7, 7, 3]);
    }

    #[test]
    fn test_empty_title_still_an_issue() {
        let text = "### 4.\nbody text\n";
        let issues = extract_issues(&doc(text));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].title, "");
        assert_eq!(issues[0].body, "## \n\nbody text");
    }

    #[test]
    fn test_heading_at_end_of_document() {
        let issues = extract_issues(&doc("### 1. Last"));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].body, "## Last\n\n");
    }

    #[test]
    fn test_non_ascii_digit_label_still_starts_issue() {
        let text = "### 1. A\na\n### \u{663}. Three\nx\n";
        let issues = extract_issues(&doc(text));
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].body, "## A\n\na");
        assert_eq!(issues[1].title, "Three");
        assert_eq!(issues[1].source_issue_index, 2);
        assert_eq!(issues[1].body, "## Three\n\nx");
    }

    #[test]
    fn test_long_labels() {
        let text = "### 1234567890123456789. Big\nb\n### 99999999999999999999999. Huge\nh\n";
        let issues = extract_issues(&doc(text));
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].source_issue_index, 1234567890123456789);
        assert_eq!(issues[0].body, "## Big\n\nb");
        assert_eq!(issues[1].title, "Huge");
        assert_eq!(issues[1].source_issue_index, 2);
        assert_eq!(issues[1].body, "## Huge\n\nh");
    }

    #[test]
    fn test_title_whitespace_trimmed() {
        let sections = find_sections("###   12.   Spaced out title   \n");
        assert_eq!(sections[0].index, 12);
        assert_eq!(sections[0].title, "Spaced out title");
    }

    #[test]
    fn test_spans_tile_document() {
        let text = "preamble\n### 1. A\naaa\n---\n### 2. B\n\nbbb\n\n### 3. C\n";
        let sections = find_sections(text);
        assert_eq!(sections.len(), 3);

        let first = sections[0].heading.start;
        let mut rebuilt = String::new();
        for (i, s) in sections.iter().enumerate() {
            assert_eq!(s.span.start, s.heading.end);
            if let Some(next) = sections.get(i + 1) {
                assert_eq!(s.span.end, next.heading.start);
            }
            rebuilt.push_str(&text[s.heading.clone()]);
            rebuilt.push_str(&text[s.span.clone()]);
        }
        assert_eq!(rebuilt, &text[first..]);
    }

    #[test]
    fn test_trim_trailing_rule() {
        assert_eq!(trim_section("\nbody\n\n---\n\n"), "body");
        assert_eq!(trim_section("\nbody\n-----"), "body");
        assert_eq!(trim_section("\nbody\n\n\n---   \n"), "body");
        assert_eq!(trim_section("---"), "");
    }

    #[test]
    fn test_only_one_trailing_rule_removed() {
        assert_eq!(trim_section("a\n---\n---\n"), "a\n---");
    }

    #[test]
    fn test_inner_rule_kept() {
        assert_eq!(trim_section("a\n---\nb\n"), "a\n---\nb");
    }

    #[test]
    fn test_short_dashes_not_a_rule() {
        assert_eq!(trim_section("a\n--\n"), "a\n--");
    }

    #[test]
    fn test_priority_forms() {
        assert_eq!(find_priority("**Priority:** High").as_deref(), Some("High"));
        assert_eq!(find_priority("**Priority**: Low ").as_deref(), Some("Low"));
        assert_eq!(
            find_priority("- **Severity:** Critical (pager)\nmore").as_deref(),
            Some("Critical (pager)")
        );
        assert_eq!(find_priority("Priority: High"), None);
        assert_eq!(find_priority("**Priority:**   \n"), None);
    }

    #[test]
    fn test_first_priority_field_wins() {
        let span = "**Severity:** Medium\n**Priority:** High\n";
        assert_eq!(find_priority(span).as_deref(), Some("Medium"));
    }

    #[test]
    fn test_priority_scoped_to_own_section() {
        let text = "### 1. A\nno field here\n### 2. B\n**Priority:** P1\n";
        let issues = extract_issues(&doc(text));
        assert_eq!(issues[0].priority, None);
        assert_eq!(issues[1].priority.as_deref(), Some("P1"));
    }

    #[test]
    fn test_crlf_document() {
        let text = "### 1. Leak\r\n**Priority:** High\r\n\r\n---\r\n";
        let issues = extract_issues(&doc(text));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].title, "Leak");
        assert_eq!(issues[0].priority.as_deref(), Some("High"));
        assert_eq!(issues[0].body, "## Leak\n\n**Priority:** High");
    }
}
