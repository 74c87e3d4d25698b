//! Document classification from the `<GROUP>_<SUFFIX>` naming convention.

use crate::document::Category;
use crate::error::SplitError;
use tracing::debug;

/// Derive `(group, category)` from a document base name (no extension).
///
/// Matching is an exact, case-sensitive suffix check; `_MONITORING` is
/// tried before `_PERFORMANCE`. The group is everything before the suffix,
/// kept verbatim (it may be empty for a name like `_MONITORING`).
pub fn classify(base_name: &str) -> Result<(String, Category), SplitError> {
    for category in Category::ALL {
        if let Some(group) = base_name.strip_suffix(category.suffix()) {
            debug!("Classified '{}' as {} (group '{}')", base_name, category, group);
            return Ok((group.to_string(), category));
        }
    }
    Err(SplitError::UnrecognizedCategory {
        name: base_name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitoring() {
        let (group, category) = classify("INFRA_MONITORING").unwrap();
        assert_eq!(group, "INFRA");
        assert_eq!(category, Category::Monitoring);
    }

    #[test]
    fn test_performance() {
        let (group, category) = classify("API_GATEWAY_PERFORMANCE").unwrap();
        assert_eq!(group, "API_GATEWAY");
        assert_eq!(category, Category::Performance);
    }

    #[test]
    fn test_group_is_verbatim_prefix() {
        let (group, _) = classify("web-Frontend v2_MONITORING").unwrap();
        assert_eq!(group, "web-Frontend v2");
    }

    #[test]
    fn test_unknown_suffix() {
        let err = classify("INFRA_UNKNOWN").unwrap_err();
        match err {
            SplitError::UnrecognizedCategory { name } => assert_eq!(name, "INFRA_UNKNOWN"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_case_sensitive() {
        assert!(classify("INFRA_monitoring").is_err());
        assert!(classify("INFRA_Performance").is_err());
    }

    #[test]
    fn test_suffix_must_be_at_end() {
        assert!(classify("INFRA_MONITORING_NOTES").is_err());
        assert!(classify("MONITORING").is_err());
    }

    #[test]
    fn test_bare_suffix_gives_empty_group() {
        let (group, category) = classify("_PERFORMANCE").unwrap();
        assert_eq!(group, "");
        assert_eq!(category, Category::Performance);
    }

    #[test]
    fn test_group_plus_suffix_reconstructs_name() {
        for name in ["A_MONITORING", "B_C_PERFORMANCE", "x_MONITORING"] {
            let (group, category) = classify(name).unwrap();
            assert_eq!(format!("{group}{}", category.suffix()), name);
        }
    }
}
