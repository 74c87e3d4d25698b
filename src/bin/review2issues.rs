//! CLI binary for review2issues.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `SplitConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use review2issues::{
    split, ErrorPolicy, ProgressCallback, SplitConfig, SplitOutput, SplitProgressCallback,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar over the source documents plus a log
/// line per document.
struct CliProgressCallback {
    bar: ProgressBar,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} documents  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Splitting");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            errors: AtomicUsize::new(0),
        })
    }

    /// Remove the bar after a fatal error so it does not linger above it.
    fn abandon(&self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl SplitProgressCallback for CliProgressCallback {
    fn on_run_start(&self, total_documents: usize) {
        self.bar.set_length(total_documents as u64);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Splitting {total_documents} review documents…"))
        ));
    }

    fn on_document_start(&self, path: &Path, _position: usize, _total: usize) {
        self.bar.set_message(file_name(path));
    }

    fn on_document_complete(&self, path: &Path, issue_count: usize) {
        self.bar.println(format!(
            "  {} {:<40}  {}",
            green("✓"),
            file_name(path),
            dim(&format!("{issue_count:>3} issues")),
        ));
        self.bar.inc(1);
    }

    fn on_document_error(&self, path: &Path, error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);
        self.bar.println(format!(
            "  {} {:<40}  {}",
            red("✗"),
            file_name(path),
            red(error),
        ));
        self.bar.inc(1);
    }

    fn on_run_complete(&self, total_documents: usize, succeeded: usize, records: usize) {
        self.bar.finish_and_clear();
        let failed = total_documents.saturating_sub(succeeded);
        if failed == 0 {
            eprintln!(
                "{} {} issues from {} documents",
                green("✔"),
                bold(&records.to_string()),
                total_documents
            );
        } else {
            eprintln!(
                "{} {} issues from {}/{} documents  ({} skipped)",
                cyan("⚠"),
                bold(&records.to_string()),
                succeeded,
                total_documents,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r####"EXAMPLES:
  # Split every review document in ai-docs/reviews into ai-docs/issues/{monitoring,performance}
  review2issues ai-docs/reviews -o ai-docs/issues

  # Show what would be written, without writing
  review2issues ai-docs/reviews -o ai-docs/issues --dry-run

  # Skip misnamed documents instead of aborting
  review2issues ai-docs/reviews -o ai-docs/issues --keep-going

  # Tag every record with extra metadata and build per-category indexes
  review2issues ai-docs/reviews -o ai-docs/issues --field pr=1234 --field reviewer=sre --summary

  # JSON run report
  review2issues ai-docs/reviews -o ai-docs/issues --json > report.json

INPUT NAMING:
  <GROUP>_MONITORING.md    issues go to <output>/monitoring/
  <GROUP>_PERFORMANCE.md   issues go to <output>/performance/

  Each "### N. Title" heading starts an issue. An optional
  "**Priority:** value" (or "**Severity:** value") line sets its priority.

OUTPUT NAMING:
  <seq>_<GROUP>_<TITLE>.md, e.g. 001_INFRA_MEMORY_LEAK.md
  Existing files are never overwritten; a _1, _2, … suffix is added instead.
"####;

/// Split batched review documents into one Markdown file per issue.
#[derive(Parser, Debug)]
#[command(
    name = "review2issues",
    version,
    about = "Split batched review documents into one Markdown file per issue",
    long_about = "Split <GROUP>_MONITORING.md / <GROUP>_PERFORMANCE.md review documents into \
one Markdown file per '### N. Title' issue, numbered per category and tagged with a metadata \
block.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory containing the review documents.
    #[arg(env = "REVIEW2ISSUES_SOURCE_DIR", default_value = ".")]
    source_dir: PathBuf,

    /// Destination root; records go to <OUTPUT_DIR>/<category>/.
    #[arg(short, long, env = "REVIEW2ISSUES_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Root the `source` metadata field is made relative to.
    #[arg(long, env = "REVIEW2ISSUES_SOURCE_ROOT", default_value = ".")]
    source_root: PathBuf,

    /// Status written into every record.
    #[arg(long, env = "REVIEW2ISSUES_STATUS", default_value = "pending")]
    status: String,

    /// Extra metadata field KEY=VALUE (repeatable, kept in order).
    #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
    fields: Vec<(String, String)>,

    /// Skip documents that break the naming convention instead of aborting.
    #[arg(short, long, env = "REVIEW2ISSUES_KEEP_GOING")]
    keep_going: bool,

    /// Plan the run and print the destinations, but write nothing.
    #[arg(short = 'n', long, env = "REVIEW2ISSUES_DRY_RUN")]
    dry_run: bool,

    /// Write a _summary.md index into each category directory.
    #[arg(long, env = "REVIEW2ISSUES_SUMMARY")]
    summary: bool,

    /// Highest collision suffix tried before giving up.
    #[arg(long, env = "REVIEW2ISSUES_MAX_COLLISION_SUFFIX", default_value_t = 9999,
          value_parser = clap::value_parser!(u32).range(1..))]
    max_collision_suffix: u32,

    /// Output a structured JSON report (SplitOutput) on stdout.
    #[arg(long, env = "REVIEW2ISSUES_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "REVIEW2ISSUES_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "REVIEW2ISSUES_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "REVIEW2ISSUES_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level library logs.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.verbose;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let cli_progress = show_progress.then(CliProgressCallback::new);
    let progress_cb: Option<ProgressCallback> = cli_progress
        .clone()
        .map(|cb| cb as Arc<dyn SplitProgressCallback>);
    let config = build_config(&cli, progress_cb)?;

    // ── Run ──────────────────────────────────────────────────────────────
    let result = split(&config);
    if result.is_err() {
        if let Some(ref cb) = cli_progress {
            cb.abandon();
        }
    }
    let output = result.context("Split failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise report")?;
        println!("{json}");
    } else if !cli.quiet {
        print_report(&output, show_progress);
    }

    Ok(())
}

/// Map CLI args to `SplitConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<SplitConfig> {
    let mut builder = SplitConfig::builder()
        .source_dir(&cli.source_dir)
        .output_dir(&cli.output_dir)
        .source_root(&cli.source_root)
        .status(&cli.status)
        .error_policy(if cli.keep_going {
            ErrorPolicy::Skip
        } else {
            ErrorPolicy::Abort
        })
        .dry_run(cli.dry_run)
        .write_summary(cli.summary)
        .max_collision_suffix(cli.max_collision_suffix);

    for (key, value) in &cli.fields {
        builder = builder.extra_field(key, value);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Parse `--field KEY=VALUE`.
fn parse_field(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Human-readable listing of the planned / written records.
fn print_report(output: &SplitOutput, progress_shown: bool) {
    let verb = if output.dry_run { "would write" } else { "wrote" };
    for record in &output.records {
        let suffix = record
            .collision_suffix
            .map(|n| format!("  {}", dim(&format!("(collision → _{n})"))))
            .unwrap_or_default();
        println!("{}{}", record.path.display(), suffix);
    }
    for failed in output.failed_documents() {
        if let Some(ref e) = failed.error {
            eprintln!("{} {}", red("skipped:"), e);
        }
    }
    for path in &output.summaries {
        eprintln!("{} {}", dim("summary:"), path.display());
    }

    // The progress callback already printed its own closing line.
    if !progress_shown || output.dry_run {
        eprintln!(
            "{} {} {} issues ({} monitoring, {} performance) from {}/{} documents in {}ms",
            if output.stats.documents_failed == 0 {
                green("✔")
            } else {
                cyan("⚠")
            },
            verb,
            output.stats.total_issues(),
            output.stats.monitoring_issues,
            output.stats.performance_issues,
            output.stats.documents_processed,
            output.stats.documents_found,
            output.stats.total_duration_ms,
        );
    }
    if output.stats.documents_without_issues > 0 {
        eprintln!(
            "   {} documents had no '### N. Title' headings",
            dim(&output.stats.documents_without_issues.to_string())
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field() {
        assert_eq!(
            parse_field("pr=1234").unwrap(),
            ("pr".to_string(), "1234".to_string())
        );
        assert_eq!(
            parse_field("note=a=b").unwrap(),
            ("note".to_string(), "a=b".to_string())
        );
        assert!(parse_field("novalue").is_err());
        assert!(parse_field("=x").is_err());
    }

    #[test]
    fn test_abandon_clears_bar() {
        let cb = CliProgressCallback::new();
        cb.on_run_start(3);
        cb.abandon();
        assert!(cb.bar.is_finished());
        // A second call is harmless.
        cb.abandon();
    }

    #[test]
    fn test_after_help_mentions_heading_syntax() {
        assert!(AFTER_HELP.contains("\"### N. Title\""));
        assert!(AFTER_HELP.trim_end().ends_with("instead."));
    }

    #[test]
    fn test_cli_maps_to_config() {
        let cli = Cli::parse_from([
            "review2issues",
            "reviews",
            "-o",
            "issues",
            "--field",
            "pr=1",
            "--keep-going",
            "--dry-run",
        ]);
        let config = build_config(&cli, None).unwrap();
        assert_eq!(config.source_dir, PathBuf::from("reviews"));
        assert_eq!(config.output_dir, PathBuf::from("issues"));
        assert_eq!(config.error_policy, ErrorPolicy::Skip);
        assert!(config.dry_run);
        assert_eq!(config.extra_frontmatter.get("pr"), Some("1"));
    }
}
