//! Identifier validation and normalization functions

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // DOI validation regex: 10.<registrant>/<suffix>
    static ref DOI_PATTERN: Regex = Regex::new(r"^10\.\d{4,9}(\.\d+)*/\S+$").unwrap();

    // ISSN: NNNN-NNNC with optional hyphen
    static ref ISSN_PATTERN: Regex = Regex::new(r"^(\d{4})-?(\d{3}[\dX])$").unwrap();

    // ORCID: four groups of four, last character may be X
    static ref ORCID_PATTERN: Regex = Regex::new(r"^(\d{4})-?(\d{4})-?(\d{4})-?(\d{3}[\dX])$").unwrap();
}

const ORCID_PREFIXES: [&str; 3] = ["https://orcid.org/", "http://orcid.org/", "orcid.org/"];

const DOI_PREFIXES: [&str; 6] = [
    "https://doi.org/",
    "http://doi.org/",
    "https://dx.doi.org/",
    "http://dx.doi.org/",
    "doi.org/",
    "doi:",
];

/// Strip resolver prefixes, whitespace and trailing punctuation from a DOI
pub fn normalize_doi(doi: &str) -> String {
    let mut result = doi.trim().to_string();

    let lower = result.to_lowercase();
    for prefix in DOI_PREFIXES {
        if lower.starts_with(prefix) {
            result = result[prefix.len()..].trim_start().to_string();
            break;
        }
    }

    // Remove trailing punctuation
    while let Some(c) = result.chars().last() {
        if c == '.' || c == ',' || c == ';' {
            result.pop();
        } else {
            break;
        }
    }

    result
}

/// Offline DOI syntax check, applied after normalization
pub fn is_valid_doi(doi: &str) -> bool {
    DOI_PATTERN.is_match(&normalize_doi(doi))
}

/// Canonical `NNNN-NNNC` form of an ISSN if it is well-formed and its checksum holds
pub fn normalize_issn(issn: &str) -> Option<String> {
    let cleaned: String = issn
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    let caps = ISSN_PATTERN.captures(&cleaned)?;
    let normalized = format!("{}-{}", &caps[1], &caps[2]);

    if validate_issn_checksum(&normalized) {
        Some(normalized)
    } else {
        None
    }
}

pub fn is_valid_issn(issn: &str) -> bool {
    normalize_issn(issn).is_some()
}

/// Strip separators from an ISBN, keeping digits and `X`
pub fn normalize_isbn(isbn: &str) -> String {
    isbn.chars()
        .filter(|c| c.is_ascii_digit() || *c == 'X' || *c == 'x')
        .collect::<String>()
        .to_uppercase()
}

/// ISBN-10 or ISBN-13 checksum validation, separators ignored
pub fn is_valid_isbn(isbn: &str) -> bool {
    let normalized = normalize_isbn(isbn);

    match normalized.len() {
        10 => validate_isbn10(&normalized),
        13 => validate_isbn13(&normalized),
        _ => false,
    }
}

/// Canonical `https://orcid.org/NNNN-NNNN-NNNN-NNNC` form if the checksum holds
pub fn normalize_orcid(orcid: &str) -> Option<String> {
    let lower = orcid.trim().trim_end_matches('/').to_lowercase();
    let bare = ORCID_PREFIXES
        .iter()
        .find_map(|prefix| lower.strip_prefix(prefix))
        .unwrap_or(&lower)
        .to_uppercase();
    let caps = ORCID_PATTERN.captures(&bare)?;
    let digits = format!("{}{}{}{}", &caps[1], &caps[2], &caps[3], &caps[4]);

    if !validate_orcid_checksum(&digits) {
        return None;
    }

    Some(format!(
        "https://orcid.org/{}-{}-{}-{}",
        &caps[1], &caps[2], &caps[3], &caps[4]
    ))
}

/// Validate ISSN checksum (weights 8..2, modulo 11)
fn validate_issn_checksum(issn: &str) -> bool {
    let chars: Vec<char> = issn.chars().filter(|c| *c != '-').collect();
    if chars.len() != 8 {
        return false;
    }

    let sum: u32 = chars[..7]
        .iter()
        .enumerate()
        .map(|(i, c)| c.to_digit(10).unwrap_or(0) * (8 - i as u32))
        .sum();

    let expected = (11 - sum % 11) % 11;
    let actual = match chars[7] {
        'X' => 10,
        c => match c.to_digit(10) {
            Some(d) => d,
            None => return false,
        },
    };

    expected == actual
}

/// Validate ORCID checksum (ISO 7064 MOD 11-2)
fn validate_orcid_checksum(digits: &str) -> bool {
    let chars: Vec<char> = digits.chars().collect();
    if chars.len() != 16 {
        return false;
    }

    let mut total: u32 = 0;
    for c in &chars[..15] {
        match c.to_digit(10) {
            Some(d) => total = (total + d) * 2,
            None => return false,
        }
    }

    let expected = (12 - total % 11) % 11;
    let actual = match chars[15] {
        'X' => 10,
        c => match c.to_digit(10) {
            Some(d) => d,
            None => return false,
        },
    };

    expected == actual
}

/// Validate ISBN-10 checksum
fn validate_isbn10(isbn: &str) -> bool {
    let chars: Vec<char> = isbn.chars().collect();
    if chars.len() != 10 {
        return false;
    }

    // First 9 are digits, last is digit or X
    for (i, &c) in chars.iter().enumerate() {
        if i < 9 {
            if !c.is_ascii_digit() {
                return false;
            }
        } else if !c.is_ascii_digit() && c != 'X' {
            return false;
        }
    }

    let sum: u32 = chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let value = if c == 'X' {
                10
            } else {
                c.to_digit(10).unwrap_or(0)
            };
            value * (10 - i as u32)
        })
        .sum();

    sum.is_multiple_of(11)
}

/// Validate ISBN-13 checksum
fn validate_isbn13(isbn: &str) -> bool {
    if isbn.len() != 13 || !isbn.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    let sum: u32 = isbn
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let value = c.to_digit(10).unwrap_or(0);
            if i.is_multiple_of(2) {
                value
            } else {
                value * 3
            }
        })
        .sum();

    sum.is_multiple_of(10)
}
