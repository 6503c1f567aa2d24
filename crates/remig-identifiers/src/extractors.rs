//! Identifier candidates from free-text field values
//!
//! Legacy exports sometimes pack several identifiers into one value
//! (`"978-82-...; 978-82-..."`, `"ISSN 0378-5955 (print)"`). These helpers
//! find the candidates without judging them; checksums are the caller's
//! concern so invalid candidates can still be reported.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // ISBN-10 and ISBN-13 shapes, separators allowed
    static ref ISBN_REGEX: Regex = Regex::new(
        r"(?i)(?:97[89][- ]?)?(?:\d[- ]?){9}[\dX]"
    ).unwrap();

    // ISSN shape: NNNN-NNNC
    static ref ISSN_REGEX: Regex = Regex::new(r"(?i)\b\d{4}-?\d{3}[\dX]\b").unwrap();
}

/// ISBN candidates in a value, separators kept as written
pub fn extract_isbn_candidates(text: &str) -> Vec<String> {
    let found: Vec<String> = ISBN_REGEX
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .collect();

    if found.is_empty() && !text.trim().is_empty() {
        // Keep unrecognizable values so they surface as invalid
        return vec![text.trim().to_string()];
    }
    found
}

/// ISSN candidates in a value
pub fn extract_issn_candidates(text: &str) -> Vec<String> {
    let found: Vec<String> = ISSN_REGEX
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();

    if found.is_empty() && !text.trim().is_empty() {
        return vec![text.trim().to_string()];
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_multiple_isbns() {
        let isbns = extract_isbn_candidates("978-0-321-12521-7; 0-306-40615-2");
        assert_eq!(isbns, vec!["978-0-321-12521-7", "0-306-40615-2"]);
    }

    #[test]
    fn test_extract_isbn_with_label() {
        let isbns = extract_isbn_candidates("ISBN 9780321125217 (trykt)");
        assert_eq!(isbns, vec!["9780321125217"]);
    }

    #[test]
    fn test_unrecognizable_isbn_is_kept() {
        assert_eq!(extract_isbn_candidates("n/a"), vec!["n/a"]);
    }

    #[test]
    fn test_extract_issn_with_label() {
        assert_eq!(extract_issn_candidates("ISSN 0378-5955 (print)"), vec!["0378-5955"]);
        assert_eq!(extract_issn_candidates("0378-5955, 1050-124X"), vec!["0378-5955", "1050-124X"]);
    }

    #[test]
    fn test_empty_value_yields_nothing() {
        assert!(extract_issn_candidates("  ").is_empty());
    }
}
