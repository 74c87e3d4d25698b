//! Progress-callback trait for per-document run events.
//!
//! Inject an [`Arc<dyn SplitProgressCallback>`] via
//! [`crate::config::SplitConfigBuilder::progress_callback`] to receive
//! events as the driver plans and writes a run.
//!
//! # Example
//!
//! ```rust
//! use review2issues::{SplitProgressCallback, SplitConfig};
//! use std::path::Path;
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     issues: AtomicUsize,
//! }
//!
//! impl SplitProgressCallback for CountingCallback {
//!     fn on_document_complete(&self, path: &Path, issue_count: usize) {
//!         self.issues.fetch_add(issue_count, Ordering::SeqCst);
//!         eprintln!("{}: {} issues", path.display(), issue_count);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { issues: AtomicUsize::new(0) });
//!
//! let config = SplitConfig::builder()
//!     .progress_callback(counter as Arc<dyn SplitProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by the driver as it processes each document.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Events arrive in order from a single thread; the
/// `Send + Sync` bound lets the same callback be shared with other threads
/// of the host application.
pub trait SplitProgressCallback: Send + Sync {
    /// Called once after discovery, before any document is read.
    fn on_run_start(&self, total_documents: usize) {
        let _ = total_documents;
    }

    /// Called before a document is classified and read.
    ///
    /// * `position` — 1-indexed position in processing order
    fn on_document_start(&self, path: &Path, position: usize, total_documents: usize) {
        let _ = (path, position, total_documents);
    }

    /// Called when a document has been extracted (possibly with zero issues).
    fn on_document_complete(&self, path: &Path, issue_count: usize) {
        let _ = (path, issue_count);
    }

    /// Called when a document is rejected under the skip policy.
    fn on_document_error(&self, path: &Path, error: &str) {
        let _ = (path, error);
    }

    /// Called after each record file is written (never in dry-run mode).
    fn on_record_written(&self, path: &Path) {
        let _ = path;
    }

    /// Called once at the end of a successful run.
    ///
    /// * `succeeded` — documents processed without error
    /// * `records`   — records planned (dry run) or written
    fn on_run_complete(&self, total_documents: usize, succeeded: usize, records: usize) {
        let _ = (total_documents, succeeded, records);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl SplitProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::SplitConfig`].
pub type ProgressCallback = Arc<dyn SplitProgressCallback>;
