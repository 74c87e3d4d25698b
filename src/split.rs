//! Run driver: discovery → classification → extraction → sequencing → write-out.
//!
//! A run happens in two phases. The planning phase reads every document,
//! assigns every sequence number and claims every filename. Only when it has
//! finished without a fatal error does the write phase create any file, so
//! an aborted run leaves the destination untouched.

use crate::config::{ErrorPolicy, SplitConfig};
use crate::document::{Category, SourceDocument};
use crate::error::{DocumentError, SplitError};
use crate::output::{DocumentResult, IssueRecord, SplitOutput, SplitStats};
use crate::pipeline::sequence::{base_filename, Namer, Sequencer};
use crate::pipeline::{discover, extract, record, summary};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Split every review document under `config.source_dir` into issue files.
///
/// This is the primary entry point for the library.
///
/// # Returns
/// `Ok(SplitOutput)` on success, including when some documents were skipped
/// under [`ErrorPolicy::Skip`] (check `output.stats.documents_failed`).
///
/// # Errors
/// Returns `Err(SplitError)` for fatal errors:
/// - Source directory missing
/// - A misnamed or unreadable document under [`ErrorPolicy::Abort`]
/// - Filename suffix space exhausted
/// - An output directory or file could not be written
pub fn split(config: &SplitConfig) -> Result<SplitOutput, SplitError> {
    let total_start = Instant::now();
    info!(
        "Starting split: {} → {}",
        config.source_dir.display(),
        config.output_dir.display()
    );

    // ── Phase 1: plan ────────────────────────────────────────────────────
    let mut output = plan_run(config)?;

    // ── Phase 2: write ───────────────────────────────────────────────────
    if config.dry_run {
        info!("Dry run: {} records planned, nothing written", output.records.len());
    } else {
        output.stats.records_written = write_records(&output.records, config)?;
        if config.write_summary {
            output.summaries = write_summaries(&output.records, config)?;
        }
    }

    output.stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
    info!(
        "Split complete: {} issues ({} monitoring, {} performance) from {}/{} documents, {}ms",
        output.stats.total_issues(),
        output.stats.monitoring_issues,
        output.stats.performance_issues,
        output.stats.documents_processed,
        output.stats.documents_found,
        output.stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_complete(
            output.stats.documents_found,
            output.stats.documents_processed,
            output.records.len(),
        );
    }

    Ok(output)
}

/// Plan a run without writing anything.
///
/// Equivalent to [`split`] with `dry_run = true`. Filenames still account
/// for files already present in the destination.
pub fn plan(config: &SplitConfig) -> Result<SplitOutput, SplitError> {
    let mut dry = config.clone();
    dry.dry_run = true;
    split(&dry)
}

/// Sequencing state for one run.
///
/// Counters and claimed filenames live here, never in globals, so two runs
/// in the same process are independent. Documents must be added in their
/// final processing order.
pub struct SplitRun<'a> {
    config: &'a SplitConfig,
    sequencer: Sequencer,
    namer: Namer,
    records: Vec<IssueRecord>,
    documents: Vec<DocumentResult>,
    collisions: usize,
}

impl<'a> SplitRun<'a> {
    pub fn new(config: &'a SplitConfig) -> Self {
        Self {
            config,
            sequencer: Sequencer::new(),
            namer: Namer::new(config.max_collision_suffix),
            records: Vec::new(),
            documents: Vec::new(),
            collisions: 0,
        }
    }

    /// Extract, sequence and name the issues of one document.
    ///
    /// Returns the number of issues added.
    pub fn add_document(&mut self, doc: &SourceDocument) -> Result<usize, SplitError> {
        let source = discover::relative_source(&doc.path, &self.config.source_root);
        let dir = self.config.category_dir(doc.category);
        let issues = extract::extract_issues(doc);
        let count = issues.len();

        for mut issue in issues {
            issue.status = self.config.status.clone();
            for (key, value) in self.config.extra_frontmatter.iter() {
                issue.extra_frontmatter.insert(key, value);
            }
            self.sequencer.assign(&mut issue);

            let base = base_filename(issue.sequence, &issue.group, &issue.title);
            let claimed = self.namer.claim(&dir, &base)?;
            if let Some(n) = claimed.collision_suffix {
                self.collisions += 1;
                warn!(
                    "'{}' already exists in {}: writing as {} (suffix _{})",
                    base,
                    dir.display(),
                    claimed.file_name,
                    n
                );
            }

            let contents = record::render_record(&issue, &source);
            self.records.push(IssueRecord {
                issue,
                source: source.clone(),
                file_name: claimed.file_name,
                path: claimed.path,
                collision_suffix: claimed.collision_suffix,
                contents,
            });
        }

        debug!(
            "{}: {} issues → {}",
            doc.path.display(),
            count,
            dir.display()
        );
        self.documents.push(DocumentResult {
            path: doc.path.clone(),
            group: Some(doc.group.clone()),
            category: Some(doc.category),
            issue_count: count,
            error: None,
        });
        Ok(count)
    }

    /// Record a document rejected under the skip policy.
    pub fn add_failure(&mut self, path: &Path, error: DocumentError) {
        self.documents.push(DocumentResult {
            path: path.to_path_buf(),
            group: None,
            category: None,
            issue_count: 0,
            error: Some(error),
        });
    }

    /// Finish planning. Nothing has been written at this point.
    pub fn finish(self) -> SplitOutput {
        let failed = self.documents.iter().filter(|d| d.error.is_some()).count();
        let stats = SplitStats {
            documents_found: self.documents.len(),
            documents_processed: self.documents.len() - failed,
            documents_failed: failed,
            documents_without_issues: self
                .documents
                .iter()
                .filter(|d| d.error.is_none() && d.issue_count == 0)
                .count(),
            monitoring_issues: self.sequencer.count(Category::Monitoring) as usize,
            performance_issues: self.sequencer.count(Category::Performance) as usize,
            collisions_resolved: self.collisions,
            records_written: 0,
            total_duration_ms: 0,
        };
        SplitOutput {
            records: self.records,
            documents: self.documents,
            summaries: Vec::new(),
            dry_run: self.config.dry_run,
            stats,
        }
    }
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn plan_run(config: &SplitConfig) -> Result<SplitOutput, SplitError> {
    let paths = discover::discover_documents(&config.source_dir)?;
    let total = paths.len();
    if let Some(ref cb) = config.progress_callback {
        cb.on_run_start(total);
    }

    let mut run = SplitRun::new(config);
    for (i, path) in paths.iter().enumerate() {
        if let Some(ref cb) = config.progress_callback {
            cb.on_document_start(path, i + 1, total);
        }

        match SourceDocument::read(path) {
            Ok(doc) => {
                let count = run.add_document(&doc)?;
                if let Some(ref cb) = config.progress_callback {
                    cb.on_document_complete(path, count);
                }
            }
            Err(e) => {
                let skippable = DocumentError::from_split_error(path, &e)
                    .filter(|_| config.error_policy == ErrorPolicy::Skip);
                let Some(doc_err) = skippable else {
                    return Err(e);
                };
                warn!("Skipping document: {}", doc_err);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_document_error(path, &doc_err.to_string());
                }
                run.add_failure(path, doc_err);
            }
        }
    }

    Ok(run.finish())
}

/// Create the category directories and write every record.
///
/// Files are opened with create-new semantics: a file that appeared after
/// planning is reported as an error, never overwritten.
fn write_records(records: &[IssueRecord], config: &SplitConfig) -> Result<usize, SplitError> {
    for category in Category::ALL {
        if records.iter().any(|r| r.issue.category == category) {
            let dir = config.category_dir(category);
            std::fs::create_dir_all(&dir)
                .map_err(|e| SplitError::OutputWriteFailed { path: dir, source: e })?;
        }
    }

    for record in records {
        write_new_file(&record.path, &record.contents)?;
        debug!("Wrote {}", record.path.display());
        if let Some(ref cb) = config.progress_callback {
            cb.on_record_written(&record.path);
        }
    }

    info!("Wrote {} records", records.len());
    Ok(records.len())
}

fn write_new_file(path: &Path, contents: &str) -> Result<(), SplitError> {
    let write_failed = |e: std::io::Error| SplitError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(write_failed)?;
    file.write_all(contents.as_bytes()).map_err(write_failed)
}

fn write_summaries(
    records: &[IssueRecord],
    config: &SplitConfig,
) -> Result<Vec<PathBuf>, SplitError> {
    let mut written = Vec::new();
    for category in Category::ALL {
        if records.iter().any(|r| r.issue.category == category) {
            written.push(summary::write_summary(&config.category_dir(category), category)?);
        }
    }
    Ok(written)
}
