//! Record serialisation: metadata block + issue body.
//!
//! A persisted issue looks like:
//!
//! ```text
//! ---
//! title: "Timeout"
//! group: "INFRA"
//! category: "monitoring"
//! priority: "High"
//! status: "pending"
//! source: "reviews/INFRA_MONITORING.md"
//! issue_index: "2"
//! sequence: "2"
//! ---
//!
//! ## Timeout
//!
//! **Priority:** High
//! ```
//!
//! Field order is fixed: downstream tooling reads the block both by key and
//! by position, so the writer is hand-rolled: every value is a double-quoted
//! string, which keeps the block valid YAML. Reading goes through
//! `serde_yaml`, so hand-edited records read back correctly.

use crate::document::Issue;
use crate::pipeline::normalize::ensure_final_newline;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use tracing::debug;

const DELIMITER: &str = "---";

/// Keys written without quotes. Anything else is quoted like a value.
static RE_PLAIN_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.-]*$").unwrap());

/// Insertion-ordered string → string mapping used for record metadata.
///
/// Inserting an existing key replaces its value in place, so a key never
/// appears twice and keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrontMatter {
    entries: Vec<(String, String)>,
}

impl FrontMatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or replace `key`. Returns the previous value, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Render as a `---` delimited block of `key: "value"` lines, ending in
    /// a newline. Keys outside `[A-Za-z0-9_.-]` are quoted too.
    pub fn render(&self) -> String {
        let mut block = String::from(DELIMITER);
        block.push('\n');
        for (key, value) in &self.entries {
            block.push_str(&format!("{}: \"{}\"\n", render_key(key), escape_value(value)));
        }
        block.push_str(DELIMITER);
        block.push('\n');
        block
    }

    /// Split a persisted record into its metadata block and body.
    ///
    /// Returns `None` when `text` does not start with a closed `---` block or
    /// the block is not a YAML mapping. Hand-edited blocks (single quotes,
    /// plain scalars, trailing comments) read back the way any YAML reader
    /// would see them. Non-string values are rendered as text; `null`
    /// becomes the empty string.
    pub fn split_record(text: &str) -> Option<(FrontMatter, &str)> {
        let rest = text.strip_prefix(DELIMITER)?.strip_prefix('\n')?;
        let mut offset = 0;
        for line in rest.split_inclusive('\n') {
            let start = offset;
            offset += line.len();
            if line.trim_end() == DELIMITER {
                let front_matter = parse_block(&rest[..start])?;
                let body = &rest[offset..];
                let body = body.strip_prefix('\n').unwrap_or(body);
                return Some((front_matter, body));
            }
        }
        None
    }

    /// Parse only the metadata block of a persisted record.
    pub fn parse(text: &str) -> Option<FrontMatter> {
        Self::split_record(text).map(|(front_matter, _)| front_matter)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FrontMatter {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut front_matter = FrontMatter::new();
        for (k, v) in iter {
            front_matter.insert(k, v);
        }
        front_matter
    }
}

/// Build the ordered metadata of one issue.
///
/// Core fields come first in their fixed order; caller-supplied extra fields
/// follow. An extra field reusing a core key overrides that value in place.
pub fn record_front_matter(issue: &Issue, source: &str) -> FrontMatter {
    let mut fm = FrontMatter::new();
    fm.insert("title", issue.title.as_str());
    fm.insert("group", issue.group.as_str());
    fm.insert("category", issue.category.as_str());
    fm.insert("priority", issue.priority.clone().unwrap_or_default());
    fm.insert("status", issue.status.as_str());
    fm.insert("source", source);
    fm.insert("issue_index", issue.source_issue_index.to_string());
    fm.insert("sequence", issue.sequence.to_string());
    for (key, value) in issue.extra_frontmatter.iter() {
        fm.insert(key, value);
    }
    fm
}

/// Render the full persisted document for one issue.
///
/// `source` is the source document path relative to the run's source root.
pub fn render_record(issue: &Issue, source: &str) -> String {
    let front_matter = record_front_matter(issue, source);
    format!("{}\n{}", front_matter.render(), ensure_final_newline(&issue.body))
}

fn render_key(key: &str) -> String {
    if RE_PLAIN_KEY.is_match(key) {
        key.to_string()
    } else {
        format!("\"{}\"", escape_value(key))
    }
}

fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            other => out.push(other),
        }
    }
    out
}

/// Read a metadata block (without its delimiters) through `serde_yaml`.
fn parse_block(yaml: &str) -> Option<FrontMatter> {
    if yaml.trim().is_empty() {
        return Some(FrontMatter::new());
    }
    let mapping: Mapping = match serde_yaml::from_str(yaml) {
        Ok(mapping) => mapping,
        Err(e) => {
            debug!("Unreadable metadata block: {}", e);
            return None;
        }
    };
    Some(
        mapping
            .iter()
            .map(|(key, value)| (scalar_text(key), scalar_text(value)))
            .collect(),
    )
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
