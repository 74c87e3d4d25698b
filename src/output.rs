//! Result types returned by a split run.

use crate::document::{Category, Issue};
use crate::error::DocumentError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One issue with its destination and rendered contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueRecord {
    pub issue: Issue,
    /// Source document path relative to the configured source root.
    pub source: String,
    /// Final filename, including any `_n` collision suffix.
    pub file_name: String,
    /// Full destination path.
    pub path: PathBuf,
    /// `Some(n)` when the natural filename was taken.
    pub collision_suffix: Option<u32>,
    /// Complete file contents (metadata block + body).
    #[serde(skip)]
    pub contents: String,
}

/// Outcome for one source document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentResult {
    pub path: PathBuf,
    /// `None` when classification failed.
    pub group: Option<String>,
    pub category: Option<Category>,
    pub issue_count: usize,
    pub error: Option<DocumentError>,
}

/// Aggregate numbers for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitStats {
    pub documents_found: usize,
    pub documents_processed: usize,
    pub documents_failed: usize,
    /// Documents that were valid but had no issue headings.
    pub documents_without_issues: usize,
    pub monitoring_issues: usize,
    pub performance_issues: usize,
    pub collisions_resolved: usize,
    /// Records actually written (0 in dry-run mode).
    pub records_written: usize,
    pub total_duration_ms: u64,
}

impl SplitStats {
    pub fn total_issues(&self) -> usize {
        self.monitoring_issues + self.performance_issues
    }

    pub fn issues_in(&self, category: Category) -> usize {
        match category {
            Category::Monitoring => self.monitoring_issues,
            Category::Performance => self.performance_issues,
        }
    }
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitOutput {
    /// Records in sequencing order.
    pub records: Vec<IssueRecord>,
    /// Per-document outcomes in processing order.
    pub documents: Vec<DocumentResult>,
    /// Summary files written (empty unless enabled).
    pub summaries: Vec<PathBuf>,
    pub dry_run: bool,
    pub stats: SplitStats,
}

impl SplitOutput {
    /// Records of one category, in sequence order.
    pub fn records_in(&self, category: Category) -> impl Iterator<Item = &IssueRecord> {
        self.records
            .iter()
            .filter(move |r| r.issue.category == category)
    }

    /// Documents that were rejected under the skip policy.
    pub fn failed_documents(&self) -> impl Iterator<Item = &DocumentResult> {
        self.documents.iter().filter(|d| d.error.is_some())
    }
}
