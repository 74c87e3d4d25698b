//! Deterministic text cleanup applied on the way in and on the way out.
//!
//! Review documents are hand-written in many editors. Windows line endings
//! or a leading BOM silently break line-anchored heading detection, so every
//! source document passes through [`normalise_source`] before extraction.
//! Nothing else in the text is touched: issue bodies keep every character
//! the author wrote.
//! On the way out, [`ensure_final_newline`] gives every persisted record the
//! same ending.

/// Apply all input rules to a raw source document.
///
/// 1. Strip a leading byte-order mark
/// 2. Normalise line endings (CRLF / CR → LF)
pub fn normalise_source(input: &str) -> String {
    normalise_line_endings(strip_bom(input))
}

// ── Rule 1: Leading BOM ──────────────────────────────────────────────────────

fn strip_bom(input: &str) -> &str {
    input.strip_prefix('\u{FEFF}').unwrap_or(input)
}

// ── Rule 2: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Output: exactly one trailing newline ─────────────────────────────────────

/// Trim trailing whitespace and end with exactly one `\n`.
pub fn ensure_final_newline(input: &str) -> String {
    let trimmed = input.trim_end();
    if trimmed.is_empty() {
        String::from("\n")
    } else {
        format!("{}\n", trimmed)
    }
}
