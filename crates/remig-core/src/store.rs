//! Triple store: read-only view over one bundle's metadata triples
//!
//! Queries never change the triples. The one side effect is the `consumed`
//! flag set by [`TripleStore::scrape_value`], which later drives the
//! unmapped-field diagnostics.
//!
//! The store is deliberately `!Sync`: one bundle-processing worker owns it
//! for the whole lifetime of the bundle.

use remig_domain::Triple;

/// A field address: element plus optional qualifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Field {
    pub element: &'static str,
    pub qualifier: Option<&'static str>,
}

impl Field {
    pub const fn new(element: &'static str, qualifier: Option<&'static str>) -> Self {
        Self { element, qualifier }
    }

    pub fn matches(&self, triple: &Triple) -> bool {
        triple.is(self.element, self.qualifier)
    }

    /// Dotted name, as used in diagnostics
    pub fn name(&self) -> String {
        match self.qualifier {
            Some(qualifier) => format!("{}.{}", self.element, qualifier),
            None => self.element.to_string(),
        }
    }
}

/// Fields the pipeline reads
pub mod fields {
    use super::Field;

    pub const TITLE: Field = Field::new("title", None);
    pub const TITLE_ALTERNATIVE: Field = Field::new("title", Some("alternative"));
    pub const ABSTRACT: Field = Field::new("description", Some("abstract"));
    pub const DESCRIPTION: Field = Field::new("description", None);
    pub const VERSION: Field = Field::new("description", Some("version"));
    pub const TYPE: Field = Field::new("type", None);
    pub const DATE_ISSUED: Field = Field::new("date", Some("issued"));
    pub const LANGUAGE: Field = Field::new("language", Some("iso"));
    pub const DOI: Field = Field::new("identifier", Some("doi"));
    pub const ISSN: Field = Field::new("identifier", Some("issn"));
    pub const ISBN: Field = Field::new("identifier", Some("isbn"));
    pub const URI: Field = Field::new("identifier", Some("uri"));
    pub const JOURNAL: Field = Field::new("source", Some("journal"));
    pub const PUBLISHER: Field = Field::new("publisher", None);
    pub const SERIES: Field = Field::new("relation", Some("ispartofseries"));
    pub const VOLUME: Field = Field::new("citation", Some("volume"));
    pub const ISSUE: Field = Field::new("citation", Some("issue"));
    pub const START_PAGE: Field = Field::new("citation", Some("spage"));
    pub const END_PAGE: Field = Field::new("citation", Some("epage"));
    pub const ARTICLE_NUMBER: Field = Field::new("citation", Some("articlenumber"));
    pub const PAGE_NUMBER: Field = Field::new("source", Some("pagenumber"));
    pub const EXTENT: Field = Field::new("format", Some("extent"));
    pub const RIGHTS_HOLDER: Field = Field::new("rights", Some("holder"));
    pub const RIGHTS_URI: Field = Field::new("rights", Some("uri"));
}

/// Read-only view over a bundle's triples
#[derive(Debug, Default)]
pub struct TripleStore {
    triples: Vec<Triple>,
}

impl TripleStore {
    pub fn new(triples: Vec<Triple>) -> Self {
        Self { triples }
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// All triples matching the predicate, in source order
    pub fn filter<P>(&self, predicate: P) -> Vec<&Triple>
    where
        P: Fn(&Triple) -> bool,
    {
        self.triples.iter().filter(|t| predicate(t)).collect()
    }

    /// First triple matching the predicate
    pub fn find_first<P>(&self, predicate: P) -> Option<&Triple>
    where
        P: Fn(&Triple) -> bool,
    {
        self.triples.iter().find(|t| predicate(t))
    }

    /// Return the triple's value and mark it consumed
    pub fn scrape_value(&self, triple: &Triple) -> String {
        triple.mark_consumed();
        triple.value.clone()
    }

    /// Triples no extractor used, minus those the ignore predicate accepts
    pub fn unconsumed<P>(&self, ignore: P) -> Vec<&Triple>
    where
        P: Fn(&Triple) -> bool,
    {
        self.triples
            .iter()
            .filter(|t| !t.is_consumed() && !ignore(t))
            .collect()
    }

    // ===== Field helpers =====

    /// Values of a field without consuming them
    pub fn values(&self, field: Field) -> Vec<&str> {
        self.triples
            .iter()
            .filter(|t| field.matches(t))
            .map(|t| t.value.as_str())
            .collect()
    }

    /// Distinct values of a field, in first-seen order, without consuming them
    pub fn distinct_values(&self, field: Field) -> Vec<&str> {
        let mut distinct: Vec<&str> = Vec::new();
        for value in self.values(field) {
            if !distinct.contains(&value) {
                distinct.push(value);
            }
        }
        distinct
    }

    /// Consume and return every value of a field
    pub fn scrape_all(&self, field: Field) -> Vec<String> {
        self.filter(|t| field.matches(t))
            .into_iter()
            .map(|t| self.scrape_value(t))
            .collect()
    }

    /// Consume and return the first value of a field
    pub fn scrape_first(&self, field: Field) -> Option<String> {
        self.find_first(|t| field.matches(t))
            .map(|t| self.scrape_value(t))
    }
}

/// Build an ignore predicate from `element` or `element.qualifier` entries.
///
/// `element.*` ignores every qualifier of the element, including none.
pub fn ignore_list(entries: &[String]) -> impl Fn(&Triple) -> bool + '_ {
    move |triple: &Triple| {
        let name = triple.field_name();
        entries.iter().any(|entry| {
            if let Some(element) = entry.strip_suffix(".*") {
                triple.element == element
            } else {
                *entry == name
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> TripleStore {
        TripleStore::new(vec![
            Triple::new("title", None, "Main title"),
            Triple::new("title", Some("alternative"), "Other title"),
            Triple::new("date", Some("issued"), "2020"),
            Triple::new("date", Some("issued"), "2020"),
            Triple::new("date", Some("accessioned"), "2021-01-01T10:00:00Z"),
        ])
    }

    #[test]
    fn test_filter_and_find_first() {
        let store = sample_store();
        assert_eq!(store.filter(|t| t.element == "title").len(), 2);
        assert_eq!(
            store.find_first(|t| fields::TITLE.matches(t)).map(|t| t.value.as_str()),
            Some("Main title")
        );
    }

    #[test]
    fn test_scrape_marks_consumed() {
        let store = sample_store();
        assert_eq!(store.scrape_first(fields::TITLE), Some("Main title".to_string()));
        let unconsumed = store.unconsumed(|_| false);
        assert_eq!(unconsumed.len(), 4);
        assert!(unconsumed.iter().all(|t| !fields::TITLE.matches(t)));
    }

    #[test]
    fn test_values_do_not_consume() {
        let store = sample_store();
        assert_eq!(store.values(fields::DATE_ISSUED), vec!["2020", "2020"]);
        assert_eq!(store.distinct_values(fields::DATE_ISSUED), vec!["2020"]);
        assert_eq!(store.unconsumed(|_| false).len(), 5);
    }

    #[test]
    fn test_ignore_list() {
        let store = sample_store();
        let entries = vec!["date.accessioned".to_string(), "title.*".to_string()];
        let unconsumed = store.unconsumed(ignore_list(&entries));
        assert_eq!(unconsumed.len(), 2);
        assert!(unconsumed.iter().all(|t| t.is("date", Some("issued"))));
    }

    #[test]
    fn test_field_name() {
        assert_eq!(fields::DATE_ISSUED.name(), "date.issued");
        assert_eq!(fields::PUBLISHER.name(), "publisher");
    }
}
