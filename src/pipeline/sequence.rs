//! Sequencing and naming: per-category counters and collision-free filenames.
//!
//! Both pieces hold state for exactly one run. The driver creates fresh
//! instances per invocation and feeds every issue through them in a single
//! ordered pass before anything is written, so filenames depend only on the
//! total order of issues within a category.

use crate::document::{Category, Issue};
use crate::error::SplitError;
use crate::pipeline::sanitize::sanitize_title;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extension appended to every issue filename.
pub const RECORD_EXTENSION: &str = "md";

/// Running per-category counters. Every category starts at 0.
#[derive(Debug, Default)]
pub struct Sequencer {
    counters: BTreeMap<Category, u32>,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the counter of `category` and return the new value.
    pub fn next(&mut self, category: Category) -> u32 {
        let counter = self.counters.entry(category).or_insert(0);
        *counter += 1;
        *counter
    }

    /// Give `issue` the next sequence number of its category.
    pub fn assign(&mut self, issue: &mut Issue) -> u32 {
        issue.sequence = self.next(issue.category);
        issue.sequence
    }

    /// Number of sequence values handed out for `category` so far.
    pub fn count(&self, category: Category) -> u32 {
        self.counters.get(&category).copied().unwrap_or(0)
    }
}

/// `<seq:03>_<group>_<SANITIZED_TITLE>`, without extension.
pub fn base_filename(sequence: u32, group: &str, title: &str) -> String {
    format!("{:03}_{}_{}", sequence, group, sanitize_title(title))
}

/// A destination filename reserved by [`Namer::claim`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimedName {
    pub file_name: String,
    pub path: PathBuf,
    /// `Some(n)` when the name needed the `_n` suffix.
    pub collision_suffix: Option<u32>,
}

/// Picks filenames that are free both on disk and among names already
/// claimed during this run.
#[derive(Debug)]
pub struct Namer {
    max_suffix: u32,
    claimed: HashSet<PathBuf>,
}

impl Namer {
    pub fn new(max_suffix: u32) -> Self {
        Self {
            max_suffix,
            claimed: HashSet::new(),
        }
    }

    /// Claim `<base>.md` in `dir`, or the first free `<base>_<n>.md`.
    ///
    /// # Errors
    /// [`SplitError::SuffixSpaceExhausted`] once `_1` … `_<max_suffix>` are
    /// all taken.
    pub fn claim(&mut self, dir: &Path, base: &str) -> Result<ClaimedName, SplitError> {
        let candidate = format!("{}.{}", base, RECORD_EXTENSION);
        if let Some(claimed) = self.try_claim(dir, candidate, None) {
            return Ok(claimed);
        }

        for n in 1..=self.max_suffix {
            let candidate = format!("{}_{}.{}", base, n, RECORD_EXTENSION);
            if let Some(claimed) = self.try_claim(dir, candidate, Some(n)) {
                debug!("Filename collision for '{}': using suffix _{}", base, n);
                return Ok(claimed);
            }
        }

        Err(SplitError::SuffixSpaceExhausted {
            dir: dir.to_path_buf(),
            base: base.to_string(),
            attempts: self.max_suffix,
        })
    }

    fn try_claim(&mut self, dir: &Path, file_name: String, suffix: Option<u32>) -> Option<ClaimedName> {
        let path = dir.join(&file_name);
        if self.claimed.contains(&path) || path.exists() {
            return None;
        }
        self.claimed.insert(path.clone());
        Some(ClaimedName {
            file_name,
            path,
            collision_suffix: suffix,
        })
    }
}
