//! Descriptive metadata of a record

use super::Contributor;
use serde::{Deserialize, Serialize};

/// Normalized calendar date of unknown granularity.
///
/// Month and day never appear without a year; the constructors are the only
/// way to build one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedDate {
    year: Option<String>,
    month: Option<String>,
    day: Option<String>,
}

impl NormalizedDate {
    /// No usable date information
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn year_only(year: impl Into<String>) -> Self {
        Self {
            year: Some(year.into()),
            month: None,
            day: None,
        }
    }

    pub fn full(year: impl Into<String>, month: impl Into<String>, day: impl Into<String>) -> Self {
        Self {
            year: Some(year.into()),
            month: Some(month.into()),
            day: Some(day.into()),
        }
    }

    pub fn year(&self) -> Option<&str> {
        self.year.as_deref()
    }

    pub fn month(&self) -> Option<&str> {
        self.month.as_deref()
    }

    pub fn day(&self) -> Option<&str> {
        self.day.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.year.is_none()
    }
}

/// A publication date with its untouched source string
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationDate {
    pub raw_value: Option<String>,
    pub normalized: NormalizedDate,
}

impl PublicationDate {
    pub fn new(raw_value: Option<String>, normalized: NormalizedDate) -> Self {
        Self {
            raw_value,
            normalized,
        }
    }

    /// Raw value kept, normalization failed
    pub fn unparsed(raw_value: impl Into<String>) -> Self {
        Self {
            raw_value: Some(raw_value.into()),
            normalized: NormalizedDate::empty(),
        }
    }

    pub fn is_normalized(&self) -> bool {
        !self.normalized.is_empty()
    }
}

/// Page information of a publication instance
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Pages {
    /// A page range inside a larger work
    Range { begin: String, end: Option<String> },
    /// Total number of pages of a monograph
    Count { pages: String },
}

/// Where inside its publication context a record appears
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationInstance {
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub pages: Option<Pages>,
    pub article_number: Option<String>,
}

/// Descriptive metadata of a record
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDescription {
    pub main_title: Option<String>,
    pub alternative_titles: Vec<String>,
    /// Distinct abstracts, in source order
    pub abstracts: Vec<String>,
    /// Distinct free-text descriptions, in source order
    pub descriptions: Vec<String>,
    pub tags: Vec<String>,
    pub contributors: Vec<Contributor>,
    pub publication_date: Option<PublicationDate>,
    pub publication_instance: PublicationInstance,
    /// ISO 639-3 code, `und` when unknown
    pub language: String,
}

/// Push a value unless an equal one is already present
pub fn push_unique(values: &mut Vec<String>, value: impl Into<String>) {
    let value = value.into();
    if !values.contains(&value) {
        values.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_date_has_no_components() {
        let date = NormalizedDate::empty();
        assert!(date.is_empty());
        assert_eq!(date.month(), None);
        assert_eq!(date.day(), None);
    }

    #[test]
    fn test_unparsed_date_keeps_raw_value() {
        let date = PublicationDate::unparsed("spring 1999");
        assert_eq!(date.raw_value.as_deref(), Some("spring 1999"));
        assert!(!date.is_normalized());
    }

    #[test]
    fn test_push_unique_collapses_duplicates() {
        let mut values = Vec::new();
        push_unique(&mut values, "b");
        push_unique(&mut values, "a");
        push_unique(&mut values, "b");
        assert_eq!(values, vec!["b", "a"]);
    }

    #[test]
    fn test_pages_serialization() {
        let pages = Pages::Range {
            begin: "12".to_string(),
            end: Some("34".to_string()),
        };
        let json = serde_json::to_value(&pages).unwrap();
        assert_eq!(json["type"], "range");
        assert_eq!(json["begin"], "12");
    }
}
