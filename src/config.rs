//! Configuration types for a split run.
//!
//! All run behaviour is controlled through [`SplitConfig`], built via its
//! [`SplitConfigBuilder`]. The library itself reads no environment variables
//! or flags; the binary maps its CLI onto the builder.

use crate::document::DEFAULT_STATUS;
use crate::error::SplitError;
use crate::pipeline::record::FrontMatter;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Reserved name of the optional per-category index file.
pub const SUMMARY_FILE_NAME: &str = "_summary.md";

/// Configuration for one split run.
///
/// Built via [`SplitConfig::builder()`] or using [`SplitConfig::default()`].
///
/// # Example
/// ```rust
/// use review2issues::{ErrorPolicy, SplitConfig};
///
/// let config = SplitConfig::builder()
///     .source_dir("ai-docs/reviews")
///     .output_dir("ai-docs/issues")
///     .error_policy(ErrorPolicy::Skip)
///     .extra_field("pr", "1234")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct SplitConfig {
    /// Directory holding the `<GROUP>_<SUFFIX>.md` review documents. Default: `.`.
    pub source_dir: PathBuf,

    /// Destination root; records land in `<output_dir>/<category>/`. Default: `.`.
    pub output_dir: PathBuf,

    /// Root against which the `source` metadata field is made relative.
    /// Default: `.`.
    pub source_root: PathBuf,

    /// Status written into every record. Default: `"pending"`.
    pub status: String,

    /// Extra metadata appended to every record, in insertion order.
    pub extra_frontmatter: FrontMatter,

    /// What to do with a document that fails classification or reading.
    /// Default: [`ErrorPolicy::Abort`].
    pub error_policy: ErrorPolicy,

    /// Plan the run (sequence numbers, filenames) without writing. Default: false.
    pub dry_run: bool,

    /// Write a `_summary.md` index into each category directory that
    /// received records. Default: false.
    pub write_summary: bool,

    /// Highest `_n` suffix tried before giving up on a filename. Default: 9999.
    ///
    /// Reaching the limit means the destination is full of leftovers from
    /// earlier runs; the run fails with
    /// [`SplitError::SuffixSpaceExhausted`] instead of searching forever.
    pub max_collision_suffix: u32,

    /// Optional per-document progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            source_root: PathBuf::from("."),
            status: DEFAULT_STATUS.to_string(),
            extra_frontmatter: FrontMatter::new(),
            error_policy: ErrorPolicy::default(),
            dry_run: false,
            write_summary: false,
            max_collision_suffix: 9999,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for SplitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplitConfig")
            .field("source_dir", &self.source_dir)
            .field("output_dir", &self.output_dir)
            .field("source_root", &self.source_root)
            .field("status", &self.status)
            .field("extra_frontmatter", &self.extra_frontmatter)
            .field("error_policy", &self.error_policy)
            .field("dry_run", &self.dry_run)
            .field("write_summary", &self.write_summary)
            .field("max_collision_suffix", &self.max_collision_suffix)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn SplitProgressCallback>"),
            )
            .finish()
    }
}

impl SplitConfig {
    /// Create a new builder for `SplitConfig`.
    pub fn builder() -> SplitConfigBuilder {
        SplitConfigBuilder {
            config: Self::default(),
        }
    }

    /// Destination directory for one category.
    pub fn category_dir(&self, category: crate::document::Category) -> PathBuf {
        self.output_dir.join(category.as_str())
    }
}

/// Builder for [`SplitConfig`].
#[derive(Debug)]
pub struct SplitConfigBuilder {
    config: SplitConfig,
}

impl SplitConfigBuilder {
    pub fn source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.source_dir = dir.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn source_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.source_root = dir.into();
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.config.status = status.into();
        self
    }

    /// Append (or replace) one extra metadata field.
    pub fn extra_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.extra_frontmatter.insert(key, value);
        self
    }

    pub fn extra_frontmatter(mut self, fields: FrontMatter) -> Self {
        self.config.extra_frontmatter = fields;
        self
    }

    pub fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.config.error_policy = policy;
        self
    }

    pub fn dry_run(mut self, v: bool) -> Self {
        self.config.dry_run = v;
        self
    }

    pub fn write_summary(mut self, v: bool) -> Self {
        self.config.write_summary = v;
        self
    }

    pub fn max_collision_suffix(mut self, n: u32) -> Self {
        self.config.max_collision_suffix = n;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SplitConfig, SplitError> {
        let c = &self.config;
        if c.status.trim().is_empty() {
            return Err(SplitError::InvalidConfig("Status must not be empty".into()));
        }
        if c.max_collision_suffix == 0 {
            return Err(SplitError::InvalidConfig(
                "max_collision_suffix must be ≥ 1".into(),
            ));
        }
        if let Some(key) = c
            .extra_frontmatter
            .keys()
            .find(|k| k.trim().is_empty() || k.contains(':') || k.contains('\n'))
        {
            return Err(SplitError::InvalidConfig(format!(
                "Invalid metadata key {:?}: keys must be non-empty and contain no ':' or newline",
                key
            )));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How the driver reacts to a document it cannot classify or read.
///
/// | Policy | Behaviour |
/// |--------|-----------|
/// | `Abort` | The run fails before anything is written (default) |
/// | `Skip`  | The document is reported and contributes no issues |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    #[default]
    Abort,
    Skip,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Category;

    #[test]
    fn test_defaults() {
        let c = SplitConfig::default();
        assert_eq!(c.status, "pending");
        assert_eq!(c.error_policy, ErrorPolicy::Abort);
        assert_eq!(c.max_collision_suffix, 9999);
        assert!(!c.dry_run);
        assert!(!c.write_summary);
        assert!(c.extra_frontmatter.is_empty());
    }

    #[test]
    fn test_builder_sets_fields() {
        let c = SplitConfig::builder()
            .source_dir("in")
            .output_dir("out")
            .source_root("root")
            .status("triaged")
            .extra_field("pr", "42")
            .extra_field("team", "sre")
            .error_policy(ErrorPolicy::Skip)
            .dry_run(true)
            .write_summary(true)
            .max_collision_suffix(5)
            .build()
            .unwrap();
        assert_eq!(c.source_dir, PathBuf::from("in"));
        assert_eq!(c.category_dir(Category::Monitoring), PathBuf::from("out/monitoring"));
        assert_eq!(c.source_root, PathBuf::from("root"));
        assert_eq!(c.status, "triaged");
        assert_eq!(c.extra_frontmatter.keys().collect::<Vec<_>>(), vec!["pr", "team"]);
        assert_eq!(c.error_policy, ErrorPolicy::Skip);
        assert!(c.dry_run && c.write_summary);
        assert_eq!(c.max_collision_suffix, 5);
    }

    #[test]
    fn test_rejects_empty_status() {
        let err = SplitConfig::builder().status("  ").build().unwrap_err();
        assert!(matches!(err, SplitError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_zero_suffix_limit() {
        assert!(SplitConfig::builder().max_collision_suffix(0).build().is_err());
    }

    #[test]
    fn test_rejects_bad_metadata_key() {
        assert!(SplitConfig::builder().extra_field("a:b", "x").build().is_err());
        assert!(SplitConfig::builder().extra_field("", "x").build().is_err());
    }

    #[test]
    fn test_debug_hides_callback() {
        let out = format!("{:?}", SplitConfig::default());
        assert!(out.contains("SplitConfig"));
        assert!(out.contains("progress_callback: None"));
    }
}
