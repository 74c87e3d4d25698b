//! Error types for the review2issues library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`SplitError`] — **Fatal**: the run cannot proceed (missing source
//!   directory, a document that breaks the naming convention under the
//!   default abort policy, an unwritable output file). Returned as
//!   `Err(SplitError)` from the top-level `split*` / `plan*` functions.
//!
//! * [`DocumentError`] — **Non-fatal**: a single source document was
//!   rejected but the others are fine. Only produced under
//!   [`crate::config::ErrorPolicy::Skip`] and stored inside
//!   [`crate::output::DocumentResult`] so callers can report partial
//!   success.
//!
//! A document with no recognizable issue headings is neither: it is valid
//! and simply contributes zero issues.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the review2issues library.
#[derive(Debug, Error)]
pub enum SplitError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The configured source directory does not exist (or is not a directory).
    #[error("Source directory not found: '{path}'\nCheck the path exists and is a directory.")]
    MissingSourceDirectory { path: PathBuf },

    /// A document base name does not end in `_MONITORING` or `_PERFORMANCE`.
    #[error(
        "Unrecognized category for '{name}': expected a name ending in _MONITORING or _PERFORMANCE"
    )]
    UnrecognizedCategory { name: String },

    /// A source document or directory listing could not be read.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Naming errors ─────────────────────────────────────────────────────
    /// Every collision suffix up to the configured limit is already taken.
    #[error("No free filename for '{base}' in '{dir}' after {attempts} collision suffixes\nClean the destination directory or raise --max-collision-suffix.")]
    SuffixSpaceExhausted {
        dir: PathBuf,
        base: String,
        attempts: u32,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create an output directory or write an issue file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A non-fatal error for a single source document.
///
/// Stored in [`crate::output::DocumentResult`] when the run continues past
/// a bad document.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum DocumentError {
    /// The document name does not follow the `<GROUP>_<SUFFIX>` convention.
    #[error("{path}: unrecognized category for '{name}'")]
    UnrecognizedCategory { path: PathBuf, name: String },

    /// The document could not be read.
    #[error("{path}: read failed: {detail}")]
    ReadFailed { path: PathBuf, detail: String },
}

impl DocumentError {
    /// Build the per-document error matching a fatal error raised while
    /// processing `path`. Returns `None` for errors that are never
    /// document-scoped.
    pub fn from_split_error(path: &std::path::Path, err: &SplitError) -> Option<Self> {
        match err {
            SplitError::UnrecognizedCategory { name } => Some(DocumentError::UnrecognizedCategory {
                path: path.to_path_buf(),
                name: name.clone(),
            }),
            SplitError::ReadFailed { source, .. } => Some(DocumentError::ReadFailed {
                path: path.to_path_buf(),
                detail: source.to_string(),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn unrecognized_category_display() {
        let e = SplitError::UnrecognizedCategory {
            name: "INFRA_UNKNOWN".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("INFRA_UNKNOWN"), "got: {msg}");
        assert!(msg.contains("_MONITORING"));
    }

    #[test]
    fn missing_source_directory_display() {
        let e = SplitError::MissingSourceDirectory {
            path: PathBuf::from("/nope/reviews"),
        };
        assert!(e.to_string().contains("/nope/reviews"));
    }

    #[test]
    fn suffix_exhausted_display() {
        let e = SplitError::SuffixSpaceExhausted {
            dir: PathBuf::from("out/monitoring"),
            base: "001_INFRA_LEAK".into(),
            attempts: 3,
        };
        let msg = e.to_string();
        assert!(msg.contains("001_INFRA_LEAK"));
        assert!(msg.contains("3 collision suffixes"));
    }

    #[test]
    fn document_error_from_category_error() {
        let e = SplitError::UnrecognizedCategory {
            name: "X_UNKNOWN".into(),
        };
        let doc = DocumentError::from_split_error(Path::new("in/X_UNKNOWN.md"), &e);
        match doc {
            Some(DocumentError::UnrecognizedCategory { path, name }) => {
                assert_eq!(path, PathBuf::from("in/X_UNKNOWN.md"));
                assert_eq!(name, "X_UNKNOWN");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn document_error_skips_run_level_errors() {
        let e = SplitError::InvalidConfig("bad".into());
        assert!(DocumentError::from_split_error(Path::new("a.md"), &e).is_none());
    }
}
