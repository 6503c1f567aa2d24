//! Classified diagnostics for a migrated record

use serde::{Deserialize, Serialize};
use std::fmt;

/// Blocking problems
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The bundle already carries the target system's identifier
    ExternalIdentifierPresent,
    InvalidIssn,
    InvalidIsbn,
    InvalidType,
    MultipleUnmappableTypes,
    DateNotPresent,
    InvalidDate,
    /// A single-valued field has several distinct values
    MultipleValues,
    NoContributors,
    InvalidLanguage,
    InvalidDoiOfflineCheck,
    InvalidDoiOnlineCheck,
    JournalNotInChannelRegister,
}

/// Advisory problems
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningCode {
    SubjectWarning,
    MultipleDescriptionPresent,
    VolumeNotNumber,
    IssueNotNumber,
    PageNumberFormatNotRecognized,
    LanguageMappedToUndefined,
    VersionWarning,
    LicenseNotRecognized,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ExternalIdentifierPresent => "EXTERNAL_IDENTIFIER_PRESENT",
            ErrorCode::InvalidIssn => "INVALID_ISSN",
            ErrorCode::InvalidIsbn => "INVALID_ISBN",
            ErrorCode::InvalidType => "INVALID_TYPE",
            ErrorCode::MultipleUnmappableTypes => "MULTIPLE_UNMAPPABLE_TYPES",
            ErrorCode::DateNotPresent => "DATE_NOT_PRESENT",
            ErrorCode::InvalidDate => "INVALID_DATE",
            ErrorCode::MultipleValues => "MULTIPLE_VALUES",
            ErrorCode::NoContributors => "NO_CONTRIBUTORS",
            ErrorCode::InvalidLanguage => "INVALID_LANGUAGE",
            ErrorCode::InvalidDoiOfflineCheck => "INVALID_DOI_OFFLINE_CHECK",
            ErrorCode::InvalidDoiOnlineCheck => "INVALID_DOI_ONLINE_CHECK",
            ErrorCode::JournalNotInChannelRegister => "JOURNAL_NOT_IN_CHANNEL_REGISTER",
        }
    }
}

impl WarningCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningCode::SubjectWarning => "SUBJECT_WARNING",
            WarningCode::MultipleDescriptionPresent => "MULTIPLE_DESCRIPTION_PRESENT",
            WarningCode::VolumeNotNumber => "VOLUME_NOT_NUMBER",
            WarningCode::IssueNotNumber => "ISSUE_NOT_NUMBER",
            WarningCode::PageNumberFormatNotRecognized => "PAGE_NUMBER_FORMAT_NOT_RECOGNIZED",
            WarningCode::LanguageMappedToUndefined => "LANGUAGE_MAPPED_TO_UNDEFINED",
            WarningCode::VersionWarning => "VERSION_WARNING",
            WarningCode::LicenseNotRecognized => "LICENSE_NOT_RECOGNIZED",
        }
    }
}

/// A blocking problem and the values that caused it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    pub values: Vec<String>,
}

/// An advisory problem and the values that caused it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningDetails {
    pub code: WarningCode,
    pub values: Vec<String>,
}

impl ErrorDetails {
    pub fn new<I, S>(code: ErrorCode, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            code,
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

impl WarningDetails {
    pub fn new<I, S>(code: WarningCode, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            code,
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.code.as_str(), self.values.join(", "))
    }
}

impl fmt::Display for WarningDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.code.as_str(), self.values.join(", "))
    }
}
