//! # review2issues
//!
//! Split batched review documents into one Markdown file per issue.
//!
//! A review run usually produces a handful of long documents such as
//! `INFRA_MONITORING.md` or `API_PERFORMANCE.md`, each listing numbered
//! findings under `### N. Title` headings. Downstream tooling wants one file
//! per finding, with metadata it can parse. This crate does that split:
//!
//! - the document name gives the **group** (`INFRA`) and **category**
//!   (`monitoring` / `performance`)
//! - each `### N. Title` heading starts an **issue**; an optional
//!   `**Priority:**` / `**Severity:**` field gives its priority
//! - issues get a **sequence** number per category, contiguous across all
//!   documents of the run
//! - each issue is written to `<output>/<category>/<seq>_<GROUP>_<TITLE>.md`
//!   with a `---` metadata block; existing files are never overwritten
//!
//! ## Pipeline Overview
//!
//! ```text
//! source dir
//!  │
//!  ├─ 1. Discover  list *.md in path order
//!  ├─ 2. Classify  <GROUP>_<SUFFIX> → (group, category)
//!  ├─ 3. Extract   ### N. Title sections, priority, body
//!  ├─ 4. Sequence  per-category counters + collision-free filenames
//!  ├─ 5. Render    ordered metadata block + body
//!  └─ 6. Write     create-new files (+ optional _summary.md)
//! ```
//!
//! Steps 1–5 form the planning phase; nothing is written unless the whole
//! plan succeeds.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use review2issues::{split, SplitConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SplitConfig::builder()
//!         .source_dir("ai-docs/reviews")
//!         .output_dir("ai-docs/issues")
//!         .build()?;
//!     let output = split(&config)?;
//!     for record in &output.records {
//!         println!("{}", record.path.display());
//!     }
//!     eprintln!("{} issues", output.stats.total_issues());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `review2issues` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod document;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod split;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ErrorPolicy, SplitConfig, SplitConfigBuilder};
pub use document::{Category, Issue, SourceDocument};
pub use error::{DocumentError, SplitError};
pub use output::{DocumentResult, IssueRecord, SplitOutput, SplitStats};
pub use pipeline::record::{render_record, FrontMatter};
pub use pipeline::sanitize::sanitize_title;
pub use progress::{NoopProgressCallback, ProgressCallback, SplitProgressCallback};
pub use split::{plan, split, SplitRun};
