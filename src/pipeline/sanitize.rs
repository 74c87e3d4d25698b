//! Title → filename identifier.
//!
//! `"Memory leak in worker (v2)"` becomes `"MEMORY_LEAK_IN_WORKER_V2"`.
//! The same function is used for any free text that ends up in a filename.

use once_cell::sync::Lazy;
use regex::Regex;

/// Returned when a title has no ASCII letters or digits at all.
pub const UNTITLED: &str = "UNTITLED";

static RE_NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9]+").unwrap());
static RE_UNDERSCORES: Lazy<Regex> = Lazy::new(|| Regex::new(r"_{2,}").unwrap());

/// Normalise arbitrary text into an uppercase `[A-Z0-9_]` identifier.
///
/// Runs of non-alphanumeric characters become a single `_`, leading and
/// trailing underscores are dropped, and an empty result falls back to
/// [`UNTITLED`]. Never fails.
pub fn sanitize_title(input: &str) -> String {
    let s = RE_NON_ALNUM.replace_all(input, "_");
    let s = RE_UNDERSCORES.replace_all(&s, "_");
    let s = s.trim_matches('_').to_ascii_uppercase();
    if s.is_empty() {
        UNTITLED.to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_well_formed(s: &str) -> bool {
        !s.is_empty()
            && !s.starts_with('_')
            && !s.ends_with('_')
            && !s.contains("__")
            && s.chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
    }

    #[test]
    fn test_simple_title() {
        assert_eq!(sanitize_title("Leak"), "LEAK");
        assert_eq!(sanitize_title("Connection Timeout"), "CONNECTION_TIMEOUT");
    }

    #[test]
    fn test_punctuation_runs_collapse() {
        assert_eq!(
            sanitize_title("Memory leak -- in worker (v2)!"),
            "MEMORY_LEAK_IN_WORKER_V2"
        );
    }

    #[test]
    fn test_existing_underscores_collapse() {
        assert_eq!(sanitize_title("__a___b__"), "A_B");
    }

    #[test]
    fn test_non_ascii_treated_as_separator() {
        assert_eq!(sanitize_title("Latência alta"), "LAT_NCIA_ALTA");
    }

    #[test]
    fn test_empty_falls_back() {
        assert_eq!(sanitize_title(""), UNTITLED);
        assert_eq!(sanitize_title("   "), UNTITLED);
        assert_eq!(sanitize_title("— ✓ —"), UNTITLED);
    }

    #[test]
    fn test_output_alphabet() {
        let inputs = [
            "",
            "x",
            "`code` in title",
            "p99 > 250ms @ /api/v1",
            "日本語",
            "___",
            "Mixed_Case-and.dots",
            "trailing!!!",
        ];
        for input in inputs {
            let out = sanitize_title(input);
            assert!(is_well_formed(&out), "{input:?} → {out:?}");
        }
    }
}
