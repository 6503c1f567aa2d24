//! Simple field extractors
//!
//! Everything the assembler reads straight off the triple store: titles,
//! abstracts, tags, identifiers, publication context and instance, rights,
//! version and license. Each extractor consumes the triples it uses. Values
//! that do not parse are kept so the validator can report them.

use lazy_static::lazy_static;
use regex::Regex;

use remig_domain::{push_unique, Pages, PublicationInstance, PublisherVersion};
use remig_identifiers::{
    extract_isbn_candidates, extract_issn_candidates, identifier_url, is_valid_isbn,
    normalize_doi, normalize_isbn, normalize_issn, IdentifierType,
};

use crate::store::{fields, Field, TripleStore};

lazy_static! {
    // "12-34", "12–34", "s. 12-34", "pp. 12 - 34"
    static ref PAGE_RANGE: Regex =
        Regex::new(r"(?i)^(?:(?:s|p|pp|side|sider|pages?)\.?\s*)?(\d+)\s*[-–]\s*(\d+)$").unwrap();

    // "s. 12", "p. 7"
    static ref SINGLE_PAGE: Regex =
        Regex::new(r"(?i)^(?:s|p|pp|side)\.?\s*(\d+)$").unwrap();

    // "123 s.", "123 p.", "123 pages", "xii, 123 s."
    static ref PAGE_COUNT: Regex =
        Regex::new(r"(?i)^(?:[ivxlcdm]+\s*,\s*)?(\d+)\s*(?:s|p|pp|pages?|sider)\.?$").unwrap();

    // Creative Commons and rightsstatements.org license URIs
    static ref LICENSE: Regex = Regex::new(
        r"^https?://((?:creativecommons\.org/(?:licenses/[a-z-]+/\d\.\d(?:/[a-z]{2})?|publicdomain/(?:zero|mark)/1\.0))|(?:rightsstatements\.org/(?:vocab|page)/[A-Za-z-]+/1\.0))(?:/(?:deed\.[A-Za-z_-]+|legalcode(?:\.[a-z]+)?))?/?$"
    ).unwrap();
}

/// Subject qualifiers that become tags
const TAG_QUALIFIERS: [Option<&str>; 3] = [None, Some("keyword"), Some("nsi")];

/// A single-valued field that may fail to parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<T> {
    Absent,
    Parsed(T),
    /// Present but not understood; carries the raw value
    Unrecognized(String),
}

impl<T> Default for FieldValue<T> {
    fn default() -> Self {
        FieldValue::Absent
    }
}

impl<T> FieldValue<T> {
    pub fn parsed(&self) -> Option<&T> {
        match self {
            FieldValue::Parsed(value) => Some(value),
            _ => None,
        }
    }
}

/// Values taken from one bundle's triple store
#[derive(Debug, Clone, Default)]
pub struct ExtractedFields {
    pub raw_types: Vec<String>,
    pub main_title: Option<String>,
    pub alternative_titles: Vec<String>,
    pub abstracts: Vec<String>,
    pub descriptions: Vec<String>,
    pub tags: Vec<String>,
    /// `subject.*` fields with a qualifier that is not a tag
    pub unrecognized_subjects: Vec<String>,
    pub date_values: Vec<String>,
    pub languages: Vec<String>,

    pub doi_values: Vec<String>,
    /// Resolvable DOI URL of the first DOI
    pub doi: Option<String>,
    pub issn_candidates: Vec<String>,
    /// Valid, normalized ISSNs
    pub issns: Vec<String>,
    pub isbn_candidates: Vec<String>,
    /// Valid ISBNs, separators stripped
    pub isbns: Vec<String>,
    /// Values of the target system's own identifier field
    pub external_identifiers: Vec<String>,

    pub journal_title: Option<String>,
    pub publisher_name: Option<String>,
    pub series_title: Option<String>,
    pub series_number: Option<String>,

    pub instance: PublicationInstance,
    /// A page number value that matched no known format
    pub unrecognized_pages: Option<String>,

    pub rights_holder: Option<String>,
    pub version: FieldValue<PublisherVersion>,
    pub license: FieldValue<String>,
}

impl ExtractedFields {
    /// Run every simple extractor against the store
    pub fn extract(store: &TripleStore, external_qualifier: &str) -> Self {
        let mut extracted = ExtractedFields {
            raw_types: store.scrape_all(fields::TYPE),
            date_values: store.scrape_all(fields::DATE_ISSUED),
            languages: store.scrape_all(fields::LANGUAGE),
            rights_holder: store.scrape_first(fields::RIGHTS_HOLDER),
            ..Default::default()
        };

        extracted.extract_descriptive(store);
        extracted.extract_identifiers(store, external_qualifier);
        extracted.extract_context(store);
        extracted.extract_instance(store);

        extracted.version = match store.scrape_first(fields::VERSION) {
            Some(value) => parse_version(&value)
                .map(FieldValue::Parsed)
                .unwrap_or(FieldValue::Unrecognized(value)),
            None => FieldValue::Absent,
        };
        extracted.license = match store.scrape_first(fields::RIGHTS_URI) {
            Some(value) => normalize_license(&value)
                .map(FieldValue::Parsed)
                .unwrap_or(FieldValue::Unrecognized(value)),
            None => FieldValue::Absent,
        };

        extracted
    }

    fn extract_descriptive(&mut self, store: &TripleStore) {
        let mut titles = store.scrape_all(fields::TITLE).into_iter();
        self.main_title = titles.next();
        for title in store.scrape_all(fields::TITLE_ALTERNATIVE) {
            push_unique(&mut self.alternative_titles, title);
        }
        for value in store.scrape_all(fields::ABSTRACT) {
            push_unique(&mut self.abstracts, value);
        }
        for value in store.scrape_all(fields::DESCRIPTION) {
            push_unique(&mut self.descriptions, value);
        }

        for triple in store.filter(|t| t.element == "subject") {
            let qualifier = triple.qualifier.as_deref();
            if TAG_QUALIFIERS.iter().any(|q| *q == qualifier) {
                push_unique(&mut self.tags, store.scrape_value(triple));
            } else {
                push_unique(&mut self.unrecognized_subjects, triple.field_name());
            }
        }
    }

    fn extract_identifiers(&mut self, store: &TripleStore, external_qualifier: &str) {
        self.doi_values = store.scrape_all(fields::DOI);
        self.doi = self
            .doi_values
            .first()
            .and_then(|doi| identifier_url(IdentifierType::Doi, &normalize_doi(doi)));

        for value in store.scrape_all(fields::ISSN) {
            for candidate in extract_issn_candidates(&value) {
                if let Some(issn) = normalize_issn(&candidate) {
                    push_unique(&mut self.issns, issn);
                }
                push_unique(&mut self.issn_candidates, candidate);
            }
        }
        for value in store.scrape_all(fields::ISBN) {
            for candidate in extract_isbn_candidates(&value) {
                if is_valid_isbn(&candidate) {
                    push_unique(&mut self.isbns, normalize_isbn(&candidate));
                }
                push_unique(&mut self.isbn_candidates, candidate);
            }
        }

        self.external_identifiers = store
            .filter(|t| t.is("identifier", Some(external_qualifier)))
            .into_iter()
            .map(|t| store.scrape_value(t))
            .collect();
    }

    fn extract_context(&mut self, store: &TripleStore) {
        self.journal_title = first_of_all(store, fields::JOURNAL);
        self.publisher_name = first_of_all(store, fields::PUBLISHER);

        if let Some(series) = first_of_all(store, fields::SERIES) {
            let (title, number) = split_series(&series);
            self.series_title = title;
            self.series_number = number;
        }
    }

    fn extract_instance(&mut self, store: &TripleStore) {
        self.instance.volume = first_of_all(store, fields::VOLUME);
        self.instance.issue = first_of_all(store, fields::ISSUE);
        self.instance.article_number = first_of_all(store, fields::ARTICLE_NUMBER);

        let start = first_of_all(store, fields::START_PAGE);
        let end = first_of_all(store, fields::END_PAGE);
        if let Some(begin) = start {
            self.instance.pages = Some(Pages::Range { begin, end });
            return;
        }

        if let Some(value) = first_of_all(store, fields::PAGE_NUMBER) {
            match parse_page_range(&value) {
                Some(pages) => self.instance.pages = Some(pages),
                None => self.unrecognized_pages = Some(value),
            }
            return;
        }

        // format.extent also carries file sizes; only page counts are used
        let extent = store.find_first(|t| fields::EXTENT.matches(t) && parse_page_count(&t.value).is_some());
        if let Some(triple) = extent {
            self.instance.pages = parse_page_count(&store.scrape_value(triple));
        }
    }
}

/// Consume every value of a field, keep the first
fn first_of_all(store: &TripleStore, field: Field) -> Option<String> {
    store.scrape_all(field).into_iter().next()
}

/// Split `Series title;number`
pub fn split_series(value: &str) -> (Option<String>, Option<String>) {
    let mut parts = value.splitn(2, ';');
    let non_empty = |s: Option<&str>| s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
    let title = non_empty(parts.next());
    let number = non_empty(parts.next());
    (title, number)
}

/// Parse a page range such as `12-34` or `s. 12-34`
pub fn parse_page_range(value: &str) -> Option<Pages> {
    let value = value.trim();
    if let Some(caps) = PAGE_RANGE.captures(value) {
        return Some(Pages::Range {
            begin: caps[1].to_string(),
            end: Some(caps[2].to_string()),
        });
    }
    SINGLE_PAGE.captures(value).map(|caps| Pages::Range {
        begin: caps[1].to_string(),
        end: None,
    })
}

/// Parse a page count such as `123 s.` or `xii, 123 pages`
pub fn parse_page_count(value: &str) -> Option<Pages> {
    PAGE_COUNT.captures(value.trim()).map(|caps| Pages::Count {
        pages: caps[1].to_string(),
    })
}

/// Parse `description.version`
pub fn parse_version(value: &str) -> Option<PublisherVersion> {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    match compact.as_str() {
        "publishedversion" | "publisertversjon" => Some(PublisherVersion::PublishedVersion),
        "acceptedversion" | "akseptertversjon" => Some(PublisherVersion::AcceptedVersion),
        "submittedversion" | "innsendtversjon" => Some(PublisherVersion::SubmittedVersion),
        _ => None,
    }
}

/// Canonical `https` form of a recognized license URI, no trailing slash
pub fn normalize_license(value: &str) -> Option<String> {
    LICENSE
        .captures(value.trim())
        .map(|caps| format!("https://{}", &caps[1]))
}

/// Whether a volume or issue value is purely numeric
pub fn is_number(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}
