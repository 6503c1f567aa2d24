//! Validator
//!
//! Runs a fixed battery of independent checks and collects classified
//! diagnostics. Errors block the record, warnings travel with it. Checks never
//! depend on each other; their order only fixes the order of the report.

use tracing::warn;

use remig_domain::{
    Contributor, ErrorCode, ErrorDetails, PublicationDate, PublicationType, WarningCode,
    WarningDetails,
};
use remig_identifiers::{is_valid_doi, is_valid_isbn, is_valid_issn, normalize_doi};

use crate::extract::{is_number, ExtractedFields, FieldValue};
use crate::language::LanguageResolution;
use crate::registry::ChannelMatch;
use crate::store::{fields, TripleStore};

/// Online DOI registration lookup
pub trait DoiChecker: Send + Sync {
    /// `Ok(false)` when the resolver does not know the DOI; `Err` when the
    /// resolver could not be asked
    fn is_registered(&self, doi: &str) -> Result<bool, String>;
}

#[cfg(feature = "online")]
impl DoiChecker for remig_identifiers::DoiResolverClient {
    fn is_registered(&self, doi: &str) -> Result<bool, String> {
        remig_identifiers::DoiResolverClient::is_registered(self, doi).map_err(|e| e.to_string())
    }
}

/// Everything a validation run looks at
pub struct ValidationInput<'a> {
    pub store: &'a TripleStore,
    pub fields: &'a ExtractedFields,
    pub external_qualifier: &'a str,
    /// Normalized, distinct type labels
    pub type_labels: &'a [String],
    pub publication_type: Option<PublicationType>,
    pub has_peer_review_marker: bool,
    pub publication_date: Option<&'a PublicationDate>,
    pub contributors: &'a [Contributor],
    pub language: &'a LanguageResolution,
    /// Journal lookup result, present only for journal-shaped types
    pub journal: Option<&'a ChannelMatch>,
    /// Whether the bundle has document files
    pub has_documents: bool,
}

/// Ordered diagnostics of one bundle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<ErrorDetails>,
    pub warnings: Vec<WarningDetails>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error<I, S>(&mut self, code: ErrorCode, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.errors.push(ErrorDetails::new(code, values));
    }

    fn warning<I, S>(&mut self, code: WarningCode, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.warnings.push(WarningDetails::new(code, values));
    }
}

#[derive(Default)]
pub struct Validator<'a> {
    doi_checker: Option<&'a dyn DoiChecker>,
}

impl<'a> Validator<'a> {
    /// Offline checks only
    pub fn offline() -> Self {
        Self { doi_checker: None }
    }

    /// Also ask a resolver whether DOIs are registered
    pub fn with_doi_checker(doi_checker: &'a dyn DoiChecker) -> Self {
        Self {
            doi_checker: Some(doi_checker),
        }
    }

    pub fn validate(&self, input: &ValidationInput<'_>) -> ValidationReport {
        let mut report = ValidationReport::default();

        check_external_identifier(input, &mut report);
        check_issn(input, &mut report);
        check_isbn(input, &mut report);
        check_type(input, &mut report);
        check_date(input, &mut report);
        check_single_valued(input, &mut report);
        check_contributors(input, &mut report);
        check_language(input, &mut report);
        self.check_doi(input, &mut report);
        check_channel(input, &mut report);

        warn_subjects(input, &mut report);
        warn_descriptions(input, &mut report);
        warn_volume_and_issue(input, &mut report);
        warn_pages(input, &mut report);
        warn_language(input, &mut report);
        warn_version(input, &mut report);
        warn_license(input, &mut report);

        report
    }

    fn check_doi(&self, input: &ValidationInput<'_>, report: &mut ValidationReport) {
        let (valid, invalid): (Vec<&String>, Vec<&String>) = input
            .fields
            .doi_values
            .iter()
            .partition(|doi| is_valid_doi(doi));
        if !invalid.is_empty() {
            report.error(ErrorCode::InvalidDoiOfflineCheck, invalid.into_iter().cloned());
        }

        let Some(checker) = self.doi_checker else {
            return;
        };
        let mut unregistered = Vec::new();
        for doi in valid {
            match checker.is_registered(&normalize_doi(doi)) {
                Ok(true) => {}
                Ok(false) => unregistered.push(doi.clone()),
                Err(reason) => warn!("online DOI check for {} failed: {}", doi, reason),
            }
        }
        if !unregistered.is_empty() {
            report.error(ErrorCode::InvalidDoiOnlineCheck, unregistered);
        }
    }
}

// ===== Error checks =====

fn check_external_identifier(input: &ValidationInput<'_>, report: &mut ValidationReport) {
    if !input.fields.external_identifiers.is_empty() {
        report.error(
            ErrorCode::ExternalIdentifierPresent,
            input.fields.external_identifiers.iter().cloned(),
        );
    }
}

fn check_issn(input: &ValidationInput<'_>, report: &mut ValidationReport) {
    let invalid: Vec<&String> = input
        .fields
        .issn_candidates
        .iter()
        .filter(|issn| !is_valid_issn(issn))
        .collect();
    if !invalid.is_empty() {
        report.error(ErrorCode::InvalidIssn, invalid.into_iter().cloned());
    }
}

fn check_isbn(input: &ValidationInput<'_>, report: &mut ValidationReport) {
    let invalid: Vec<&String> = input
        .fields
        .isbn_candidates
        .iter()
        .filter(|isbn| !is_valid_isbn(isbn))
        .collect();
    if !invalid.is_empty() {
        report.error(ErrorCode::InvalidIsbn, invalid.into_iter().cloned());
    }
}

fn check_type(input: &ValidationInput<'_>, report: &mut ValidationReport) {
    if input.publication_type.is_some() {
        return;
    }
    let code = if input.type_labels.len() >= 2 && !input.has_peer_review_marker {
        ErrorCode::MultipleUnmappableTypes
    } else {
        ErrorCode::InvalidType
    };
    report.error(code, input.type_labels.iter().cloned());
}

fn check_date(input: &ValidationInput<'_>, report: &mut ValidationReport) {
    match input.publication_date {
        None => report.error(ErrorCode::DateNotPresent, Vec::<String>::new()),
        Some(date) if !date.is_normalized() => {
            report.error(ErrorCode::InvalidDate, date.raw_value.iter().cloned())
        }
        Some(_) => {}
    }
}

fn check_single_valued(input: &ValidationInput<'_>, report: &mut ValidationReport) {
    let mut external: Vec<&str> = Vec::new();
    for value in &input.fields.external_identifiers {
        if !external.contains(&value.as_str()) {
            external.push(value.as_str());
        }
    }

    let single_valued = [
        (fields::TITLE.name(), input.store.distinct_values(fields::TITLE)),
        (
            fields::DATE_ISSUED.name(),
            input.store.distinct_values(fields::DATE_ISSUED),
        ),
        (fields::ISSUE.name(), input.store.distinct_values(fields::ISSUE)),
        (format!("identifier.{}", input.external_qualifier), external),
    ];

    for (name, values) in single_valued {
        if values.len() > 1 {
            report.error(
                ErrorCode::MultipleValues,
                std::iter::once(name).chain(values.into_iter().map(str::to_string)),
            );
        }
    }
}

fn check_contributors(input: &ValidationInput<'_>, report: &mut ValidationReport) {
    if input.contributors.is_empty() {
        report.error(ErrorCode::NoContributors, Vec::<String>::new());
    }
}

fn check_language(input: &ValidationInput<'_>, report: &mut ValidationReport) {
    if let LanguageResolution::Invalid(values) = input.language {
        report.error(ErrorCode::InvalidLanguage, values.iter().cloned());
    }
}

fn check_channel(input: &ValidationInput<'_>, report: &mut ValidationReport) {
    let Some(journal) = input.journal else {
        return;
    };
    if matches!(journal, ChannelMatch::Found(_)) {
        return;
    }

    let mut values: Vec<String> = input.fields.journal_title.iter().cloned().collect();
    values.extend(input.fields.issns.iter().cloned());
    if journal.is_ambiguous() {
        values.push("ambiguous".to_string());
    }
    report.error(ErrorCode::JournalNotInChannelRegister, values);
}

// ===== Warning checks =====

fn warn_subjects(input: &ValidationInput<'_>, report: &mut ValidationReport) {
    if !input.fields.unrecognized_subjects.is_empty() {
        report.warning(
            WarningCode::SubjectWarning,
            input.fields.unrecognized_subjects.iter().cloned(),
        );
    }
}

fn warn_descriptions(input: &ValidationInput<'_>, report: &mut ValidationReport) {
    if input.fields.descriptions.len() > 1 {
        report.warning(
            WarningCode::MultipleDescriptionPresent,
            input.fields.descriptions.iter().cloned(),
        );
    }
}

fn warn_volume_and_issue(input: &ValidationInput<'_>, report: &mut ValidationReport) {
    let instance = &input.fields.instance;
    if let Some(volume) = instance.volume.as_deref().filter(|v| !is_number(v)) {
        report.warning(WarningCode::VolumeNotNumber, [volume]);
    }
    if let Some(issue) = instance.issue.as_deref().filter(|v| !is_number(v)) {
        report.warning(WarningCode::IssueNotNumber, [issue]);
    }
}

fn warn_pages(input: &ValidationInput<'_>, report: &mut ValidationReport) {
    if let Some(pages) = &input.fields.unrecognized_pages {
        report.warning(WarningCode::PageNumberFormatNotRecognized, [pages.as_str()]);
    }
}

fn warn_language(input: &ValidationInput<'_>, report: &mut ValidationReport) {
    match input.language {
        LanguageResolution::Undefined(values) | LanguageResolution::Multiple(values) => {
            report.warning(WarningCode::LanguageMappedToUndefined, values.iter().cloned())
        }
        _ => {}
    }
}

fn warn_version(input: &ValidationInput<'_>, report: &mut ValidationReport) {
    match &input.fields.version {
        FieldValue::Unrecognized(value) => {
            report.warning(WarningCode::VersionWarning, [value.as_str()])
        }
        FieldValue::Absent if input.has_documents => {
            report.warning(WarningCode::VersionWarning, Vec::<String>::new())
        }
        _ => {}
    }
}

fn warn_license(input: &ValidationInput<'_>, report: &mut ValidationReport) {
    if let FieldValue::Unrecognized(value) = &input.fields.license {
        report.warning(WarningCode::LicenseNotRecognized, [value.as_str()]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::infer_date;
    use remig_domain::{ContributorRole, Identity, Triple};

    struct Fixture {
        store: TripleStore,
        fields: ExtractedFields,
        type_labels: Vec<String>,
        publication_type: Option<PublicationType>,
        date: Option<PublicationDate>,
        contributors: Vec<Contributor>,
        language: LanguageResolution,
        journal: Option<ChannelMatch>,
    }

    impl Fixture {
        fn new(triples: Vec<Triple>) -> Self {
            let store = TripleStore::new(triples);
            let fields = ExtractedFields::extract(&store, "cristin");
            let date = fields.date_values.first().map(|d| infer_date(d));
            Self {
                store,
                fields,
                type_labels: vec!["Journal article".to_string()],
                publication_type: Some(PublicationType::JournalArticle),
                date,
                contributors: vec![Contributor::new(
                    Identity::new("Ola Nordmann"),
                    ContributorRole::Creator,
                    Some("author".to_string()),
                )],
                language: LanguageResolution::Mapped("nob".to_string()),
                journal: None,
            }
        }

        fn validate(&self) -> ValidationReport {
            self.validate_with(&Validator::offline())
        }

        fn validate_with(&self, validator: &Validator<'_>) -> ValidationReport {
            validator.validate(&ValidationInput {
                store: &self.store,
                fields: &self.fields,
                external_qualifier: "cristin",
                type_labels: &self.type_labels,
                publication_type: self.publication_type,
                has_peer_review_marker: false,
                publication_date: self.date.as_ref(),
                contributors: &self.contributors,
                language: &self.language,
                journal: self.journal.as_ref(),
                has_documents: false,
            })
        }
    }

    fn error_codes(report: &ValidationReport) -> Vec<ErrorCode> {
        report.errors.iter().map(|e| e.code).collect()
    }

    fn warning_codes(report: &ValidationReport) -> Vec<WarningCode> {
        report.warnings.iter().map(|w| w.code).collect()
    }

    fn base() -> Vec<Triple> {
        vec![
            Triple::new("title", None, "A title"),
            Triple::new("date", Some("issued"), "2020"),
        ]
    }

    #[test]
    fn test_clean_bundle_is_valid() {
        let report = Fixture::new(base()).validate();
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_missing_and_invalid_date() {
        let mut fixture = Fixture::new(vec![Triple::new("title", None, "A title")]);
        assert_eq!(error_codes(&fixture.validate()), vec![ErrorCode::DateNotPresent]);

        fixture.date = Some(infer_date("sometime"));
        let report = fixture.validate();
        assert_eq!(error_codes(&report), vec![ErrorCode::InvalidDate]);
        assert_eq!(report.errors[0].values, vec!["sometime"]);
    }

    #[test]
    fn test_unmappable_type_codes() {
        let mut fixture = Fixture::new(base());
        fixture.publication_type = None;
        fixture.type_labels = vec!["Poem".to_string()];
        assert_eq!(error_codes(&fixture.validate()), vec![ErrorCode::InvalidType]);

        fixture.type_labels = vec!["Poem".to_string(), "Song".to_string()];
        assert_eq!(
            error_codes(&fixture.validate()),
            vec![ErrorCode::MultipleUnmappableTypes]
        );
    }

    #[test]
    fn test_no_contributors() {
        let mut fixture = Fixture::new(base());
        fixture.contributors.clear();
        assert_eq!(error_codes(&fixture.validate()), vec![ErrorCode::NoContributors]);
    }

    #[test]
    fn test_multiple_values_names_the_field() {
        let mut triples = base();
        triples.push(Triple::new("title", None, "Another title"));
        triples.push(Triple::new("citation", Some("issue"), "1"));
        triples.push(Triple::new("citation", Some("issue"), "2"));
        let report = Fixture::new(triples).validate();

        assert_eq!(
            error_codes(&report),
            vec![ErrorCode::MultipleValues, ErrorCode::MultipleValues]
        );
        assert_eq!(report.errors[0].values, vec!["title", "A title", "Another title"]);
        assert_eq!(report.errors[1].values, vec!["citation.issue", "1", "2"]);
    }

    #[test]
    fn test_identifier_errors_in_order() {
        let mut triples = base();
        triples.push(Triple::new("identifier", Some("cristin"), "1"));
        triples.push(Triple::new("identifier", Some("cristin"), "2"));
        triples.push(Triple::new("identifier", Some("issn"), "1234-5678"));
        triples.push(Triple::new("identifier", Some("isbn"), "978-3-16-148410-9"));
        triples.push(Triple::new("identifier", Some("doi"), "not a doi"));
        let report = Fixture::new(triples).validate();

        assert_eq!(
            error_codes(&report),
            vec![
                ErrorCode::ExternalIdentifierPresent,
                ErrorCode::InvalidIssn,
                ErrorCode::InvalidIsbn,
                ErrorCode::MultipleValues,
                ErrorCode::InvalidDoiOfflineCheck,
            ]
        );
        assert_eq!(report.errors[3].values, vec!["identifier.cristin", "1", "2"]);
    }

    #[test]
    fn test_channel_register() {
        let mut triples = base();
        triples.push(Triple::new("source", Some("journal"), "Journal of Things"));
        let mut fixture = Fixture::new(triples);

        fixture.journal = Some(ChannelMatch::Found("1".to_string()));
        assert!(fixture.validate().is_valid());

        fixture.journal = Some(ChannelMatch::Ambiguous(vec!["1".into(), "2".into()]));
        let report = fixture.validate();
        assert_eq!(error_codes(&report), vec![ErrorCode::JournalNotInChannelRegister]);
        assert_eq!(report.errors[0].values, vec!["Journal of Things", "ambiguous"]);
    }

    #[test]
    fn test_language_diagnostics() {
        let mut fixture = Fixture::new(base());
        fixture.language = LanguageResolution::Invalid(vec!["xx".to_string()]);
        assert_eq!(error_codes(&fixture.validate()), vec![ErrorCode::InvalidLanguage]);

        fixture.language = LanguageResolution::Undefined(vec!["zxx".to_string()]);
        let report = fixture.validate();
        assert!(report.is_valid());
        assert_eq!(
            warning_codes(&report),
            vec![WarningCode::LanguageMappedToUndefined]
        );
    }

    #[test]
    fn test_warnings_in_order() {
        let mut triples = base();
        triples.push(Triple::new("subject", Some("ddc"), "597"));
        triples.push(Triple::new("description", None, "One"));
        triples.push(Triple::new("description", None, "Two"));
        triples.push(Triple::new("citation", Some("volume"), "12a"));
        triples.push(Triple::new("citation", Some("issue"), "Spring"));
        triples.push(Triple::new("source", Some("pagenumber"), "passim"));
        triples.push(Triple::new("description", Some("version"), "draft"));
        triples.push(Triple::new("rights", Some("uri"), "All rights reserved"));
        let report = Fixture::new(triples).validate();

        assert!(report.is_valid());
        assert_eq!(
            warning_codes(&report),
            vec![
                WarningCode::SubjectWarning,
                WarningCode::MultipleDescriptionPresent,
                WarningCode::VolumeNotNumber,
                WarningCode::IssueNotNumber,
                WarningCode::PageNumberFormatNotRecognized,
                WarningCode::VersionWarning,
                WarningCode::LicenseNotRecognized,
            ]
        );
    }

    struct FixedChecker(bool);

    impl DoiChecker for FixedChecker {
        fn is_registered(&self, _doi: &str) -> Result<bool, String> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_online_doi_check() {
        let mut triples = base();
        triples.push(Triple::new("identifier", Some("doi"), "10.1000/xyz123"));
        let fixture = Fixture::new(triples);

        assert!(fixture.validate_with(&Validator::with_doi_checker(&FixedChecker(true))).is_valid());
        let report = fixture.validate_with(&Validator::with_doi_checker(&FixedChecker(false)));
        assert_eq!(error_codes(&report), vec![ErrorCode::InvalidDoiOnlineCheck]);
    }
}
