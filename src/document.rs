//! Core data types: source documents, categories and extracted issues.

use crate::error::SplitError;
use crate::pipeline::{classify, normalize};
use crate::pipeline::record::FrontMatter;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Status given to every freshly extracted issue.
pub const DEFAULT_STATUS: &str = "pending";

/// Which destination bucket a review document (and its issues) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Monitoring,
    Performance,
}

impl Category {
    /// All categories in classification order.
    pub const ALL: [Category; 2] = [Category::Monitoring, Category::Performance];

    /// Lowercase name, also used as the destination directory name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Monitoring => "monitoring",
            Category::Performance => "performance",
        }
    }

    /// Filename suffix (without extension) marking a document of this category.
    pub fn suffix(&self) -> &'static str {
        match self {
            Category::Monitoring => "_MONITORING",
            Category::Performance => "_PERFORMANCE",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A review document, classified from its base name.
///
/// Immutable once constructed. `text` has already been through
/// [`normalize::normalise_source`] (LF line endings, no BOM).
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub text: String,
    pub group: String,
    pub category: Category,
}

impl SourceDocument {
    /// Classify `path` and wrap already-loaded text.
    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Result<Self, SplitError> {
        let path = path.into();
        let (group, category) = classify::classify(&base_name(&path))?;
        Ok(Self {
            text: normalize::normalise_source(text),
            path,
            group,
            category,
        })
    }

    /// Classify `path`, then read it fully.
    ///
    /// Classification runs first so a misnamed document fails with
    /// [`SplitError::UnrecognizedCategory`] without touching the disk.
    pub fn read(path: impl Into<PathBuf>) -> Result<Self, SplitError> {
        let path = path.into();
        classify::classify(&base_name(&path))?;
        let text = std::fs::read_to_string(&path).map_err(|e| SplitError::ReadFailed {
            path: path.clone(),
            source: e,
        })?;
        Self::from_text(path, &text)
    }

    pub fn base_name(&self) -> String {
        base_name(&self.path)
    }
}

/// Filename without its extension (`reviews/INFRA_MONITORING.md` → `INFRA_MONITORING`).
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// One issue extracted from a review document.
///
/// `sequence` is `0` until the sequencer assigns it; assigned values start
/// at 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub title: String,
    /// Numeric heading label as written in the source. A label that is not
    /// ASCII digits fitting a `u64` is replaced by the heading's position.
    pub source_issue_index: u64,
    pub group: String,
    pub category: Category,
    pub sequence: u32,
    pub priority: Option<String>,
    pub status: String,
    /// `## <title>`, a blank line, then the trimmed section text.
    pub body: String,
    pub extra_frontmatter: FrontMatter,
}

impl Issue {
    pub fn is_sequenced(&self) -> bool {
        self.sequence > 0
    }
}
