//! Category index: a `_summary.md` table of every record in a directory.
//!
//! The index is rebuilt from the records on disk (via their metadata
//! blocks), so it also covers records left by earlier runs.

use crate::config::SUMMARY_FILE_NAME;
use crate::document::Category;
use crate::error::SplitError;
use crate::pipeline::record::FrontMatter;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One row of the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub file_name: String,
    pub sequence: String,
    pub title: String,
    pub priority: String,
    pub status: String,
}

/// Read every record in `dir` (sorted by filename, summary excluded).
pub fn collect_rows(dir: &Path) -> Result<Vec<SummaryRow>, SplitError> {
    let read_failed = |e: std::io::Error| SplitError::ReadFailed {
        path: dir.to_path_buf(),
        source: e,
    };

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_failed)? {
        let path = entry.map_err(read_failed)?.path();
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        if path.is_file() && name.ends_with(".md") && name != SUMMARY_FILE_NAME {
            names.push(name);
        }
    }
    names.sort();

    let mut rows = Vec::with_capacity(names.len());
    for name in names {
        let path = dir.join(&name);
        let text = std::fs::read_to_string(&path).map_err(|e| SplitError::ReadFailed {
            path: path.clone(),
            source: e,
        })?;
        let fm = FrontMatter::parse(&text).unwrap_or_default();
        let field = |key: &str| fm.get(key).unwrap_or_default().to_string();
        rows.push(SummaryRow {
            sequence: field("sequence"),
            title: field("title"),
            priority: field("priority"),
            status: field("status"),
            file_name: name,
        });
    }
    Ok(rows)
}

/// Render the index as a GFM table.
pub fn render_summary(category: Category, rows: &[SummaryRow]) -> String {
    let mut out = format!("# {} issues\n\n", capitalise(category.as_str()));
    if rows.is_empty() {
        out.push_str("_No issues._\n");
        return out;
    }
    out.push_str("| # | File | Title | Priority | Status |\n");
    out.push_str("| --- | --- | --- | --- | --- |\n");
    for row in rows {
        out.push_str(&format!(
            "| {} | [{}]({}) | {} | {} | {} |\n",
            or_dash(&row.sequence),
            escape_cell(&row.file_name),
            row.file_name,
            or_dash(&escape_cell(&row.title)),
            or_dash(&escape_cell(&row.priority)),
            or_dash(&escape_cell(&row.status)),
        ));
    }
    out
}

/// Rebuild `<dir>/_summary.md`. The file is regenerated on every call.
pub fn write_summary(dir: &Path, category: Category) -> Result<PathBuf, SplitError> {
    let rows = collect_rows(dir)?;
    let path = dir.join(SUMMARY_FILE_NAME);
    std::fs::write(&path, render_summary(category, &rows)).map_err(|e| {
        SplitError::OutputWriteFailed {
            path: path.clone(),
            source: e,
        }
    })?;
    debug!("Wrote summary with {} rows: {}", rows.len(), path.display());
    Ok(path)
}

fn capitalise(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|")
}

fn or_dash(s: &str) -> String {
    if s.is_empty() {
        "-".to_string()
    } else {
        s.to_string()
    }
}
