//! Identifier URLs and handle resolution
//!
//! Maps identifiers to their resolvable URL form and parses handles out of
//! the shapes legacy exports store them in.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// Identifier types a migrated record can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentifierType {
    Doi,
    Handle,
    Orcid,
    Issn,
    Isbn,
}

lazy_static! {
    // Handle path: <prefix>/<suffix>, prefix numeric with optional dotted parts
    static ref HANDLE_PATH: Regex = Regex::new(r"^(\d+(?:\.\d+)*)/([^\s/]+)$").unwrap();
}

const HANDLE_HOSTS: [&str; 2] = ["hdl.handle.net", "handle.net"];

/// Reasons a handle could not be resolved
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandleError {
    #[error("no handle found")]
    NotFound,

    #[error("not a handle: {0}")]
    Malformed(String),
}

/// Get the URL prefix for an identifier type
pub fn identifier_url_prefix(id_type: IdentifierType) -> Option<&'static str> {
    match id_type {
        IdentifierType::Doi => Some("https://doi.org/"),
        IdentifierType::Handle => Some("https://hdl.handle.net/"),
        IdentifierType::Orcid => Some("https://orcid.org/"),
        IdentifierType::Issn => Some("https://portal.issn.org/resource/ISSN/"),
        IdentifierType::Isbn => None,
    }
}

/// Get the full URL for an identifier
pub fn identifier_url(id_type: IdentifierType, value: &str) -> Option<String> {
    identifier_url_prefix(id_type).map(|prefix| format!("{}{}", prefix, value))
}

/// Parse a handle from a bare `prefix/suffix`, a `hdl:` string or a handle URL.
///
/// Returns the canonical `https://hdl.handle.net/prefix/suffix` URI.
pub fn parse_handle(input: &str) -> Result<String, HandleError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(HandleError::NotFound);
    }

    let path = if let Some(rest) = trimmed.strip_prefix("hdl:") {
        rest.to_string()
    } else if trimmed.contains("://") {
        let url = Url::parse(trimmed).map_err(|_| HandleError::Malformed(trimmed.to_string()))?;
        let host = url.host_str().unwrap_or_default();
        if !HANDLE_HOSTS.contains(&host) {
            return Err(HandleError::Malformed(trimmed.to_string()));
        }
        url.path().trim_matches('/').to_string()
    } else {
        trimmed.to_string()
    };

    let path = path.trim_matches('/');
    if HANDLE_PATH.is_match(path) {
        Ok(format!("https://hdl.handle.net/{}", path))
    } else {
        Err(HandleError::Malformed(trimmed.to_string()))
    }
}

/// `prefix/suffix` part of a canonical handle URI or bare handle
pub fn handle_path(handle: &str) -> Option<String> {
    parse_handle(handle)
        .ok()
        .and_then(|uri| uri.strip_prefix("https://hdl.handle.net/").map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_identifier_url() {
        assert_eq!(
            identifier_url(IdentifierType::Doi, "10.1038/nature12373"),
            Some("https://doi.org/10.1038/nature12373".to_string())
        );
        assert_eq!(identifier_url(IdentifierType::Isbn, "9780321125217"), None);
    }

    #[rstest]
    #[case("11250/2455")]
    #[case("hdl:11250/2455")]
    #[case("http://hdl.handle.net/11250/2455")]
    #[case("https://hdl.handle.net/11250/2455/")]
    #[case("  11250/2455\n")]
    fn test_parse_handle_variants(#[case] input: &str) {
        assert_eq!(
            parse_handle(input),
            Ok("https://hdl.handle.net/11250/2455".to_string())
        );
    }

    #[test]
    fn test_parse_handle_rejects_other_hosts() {
        assert!(matches!(
            parse_handle("https://example.org/11250/2455"),
            Err(HandleError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_handle_empty() {
        assert_eq!(parse_handle(""), Err(HandleError::NotFound));
    }

    #[test]
    fn test_handle_path() {
        assert_eq!(
            handle_path("https://hdl.handle.net/11250/2455"),
            Some("11250/2455".to_string())
        );
        assert_eq!(handle_path("not a handle"), None);
    }
}
