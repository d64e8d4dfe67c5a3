//! Explicit missing-value convention for trial source files.
//!
//! The trial file marks absent values with an empty field or the literal
//! `NA`. Both are turned into `None` at the ingestion boundary so that no
//! sentinel string reaches the record types.

/// Cell contents treated as missing (compared after trimming).
pub const MISSING_TOKENS: &[&str] = &["", "NA"];

/// Returns true if a trimmed cell is one of [`MISSING_TOKENS`].
pub fn is_missing_token(value: &str) -> bool {
    let trimmed = value.trim();
    MISSING_TOKENS.contains(&trimmed)
}

/// Trim a cell and map missing tokens to `None`.
pub fn clean_cell(value: &str) -> Option<String> {
    let trimmed = value.trim().trim_matches('\u{feff}');
    if is_missing_token(trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tokens() {
        assert!(is_missing_token(""));
        assert!(is_missing_token("  "));
        assert!(is_missing_token("NA"));
        assert!(is_missing_token(" NA "));
        assert!(!is_missing_token("N"));
        assert!(!is_missing_token("na"));
    }

    #[test]
    fn test_clean_cell() {
        assert_eq!(clean_cell(" Y "), Some("Y".to_string()));
        assert_eq!(clean_cell("NA"), None);
        assert_eq!(clean_cell(""), None);
        assert_eq!(clean_cell("\u{feff}RDELAY"), Some("RDELAY".to_string()));
    }
}
