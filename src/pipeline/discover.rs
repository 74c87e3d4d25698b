//! Input discovery: validate the source directory and list review documents.
//!
//! Only regular `*.md` files directly inside the source directory are
//! considered. The list is sorted by path so sequence numbers are the same
//! on every run and every platform.

use crate::error::SplitError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// List the review documents in `source_dir`, sorted lexicographically.
///
/// # Errors
/// [`SplitError::MissingSourceDirectory`] when `source_dir` does not exist
/// or is not a directory; [`SplitError::ReadFailed`] when it cannot be
/// listed.
pub fn discover_documents(source_dir: &Path) -> Result<Vec<PathBuf>, SplitError> {
    if !source_dir.is_dir() {
        return Err(SplitError::MissingSourceDirectory {
            path: source_dir.to_path_buf(),
        });
    }

    let read_failed = |e: std::io::Error| SplitError::ReadFailed {
        path: source_dir.to_path_buf(),
        source: e,
    };

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(source_dir).map_err(read_failed)? {
        let entry = entry.map_err(read_failed)?;
        let path = entry.path();
        if path.is_file() && is_markdown(&path) {
            paths.push(path);
        } else {
            debug!("Skipping non-document entry: {}", path.display());
        }
    }
    paths.sort();

    info!(
        "Found {} review documents in {}",
        paths.len(),
        source_dir.display()
    );
    Ok(paths)
}

fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "md")
}

/// Render `path` relative to `root` with `/` separators.
///
/// Falls back to canonical forms when the plain prefix check fails (e.g.
/// `./reviews` vs `reviews`), and to the path as given when `path` lies
/// outside `root`.
pub fn relative_source(path: &Path, root: &Path) -> String {
    let relative = path
        .strip_prefix(root)
        .map(Path::to_path_buf)
        .ok()
        .or_else(|| {
            let path = path.canonicalize().ok()?;
            let root = root.canonicalize().ok()?;
            path.strip_prefix(&root).map(Path::to_path_buf).ok()
        })
        .unwrap_or_else(|| path.to_path_buf());

    relative
        .to_string_lossy()
        .replace(std::path::MAIN_SEPARATOR, "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_directory() {
        let err = discover_documents(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, SplitError::MissingSourceDirectory { .. }));
    }

    #[test]
    fn test_file_instead_of_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("A_MONITORING.md");
        std::fs::write(&file, "").unwrap();
        let err = discover_documents(&file).unwrap_err();
        assert!(matches!(err, SplitError::MissingSourceDirectory { .. }));
    }

    #[test]
    fn test_sorted_markdown_only() {
        let dir = TempDir::new().unwrap();
        for name in ["B_PERFORMANCE.md", "A_MONITORING.md", "notes.txt", "C_MONITORING.md"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.md")).unwrap();

        let names: Vec<String> = discover_documents(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["A_MONITORING.md", "B_PERFORMANCE.md", "C_MONITORING.md"]);
    }

    #[test]
    fn test_empty_directory() {
        let dir = TempDir::new().unwrap();
        assert!(discover_documents(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_relative_source() {
        assert_eq!(
            relative_source(Path::new("repo/ai-docs/INFRA_MONITORING.md"), Path::new("repo")),
            "ai-docs/INFRA_MONITORING.md"
        );
        assert_eq!(
            relative_source(Path::new("/elsewhere/X.md"), Path::new("/repo")),
            "/elsewhere/X.md"
        );
    }

    #[test]
    fn test_relative_source_ignores_cur_dir_components() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("reviews");
        std::fs::create_dir(&sub).unwrap();
        let file = sub.join("A_MONITORING.md");
        std::fs::write(&file, "").unwrap();

        let dotted = dir.path().join(".").join("reviews").join("A_MONITORING.md");
        assert_eq!(relative_source(&dotted, dir.path()), "reviews/A_MONITORING.md");
    }
}
