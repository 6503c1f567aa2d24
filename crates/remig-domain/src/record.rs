//! Normalized publication record

use super::{EntityDescription, ErrorDetails, PublicationType, WarningDetails};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Institution that owns the migrated record
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceOwner {
    /// Customer short name
    pub owner: String,
    /// Organization identifier for the customer in the target environment; empty if unknown
    pub owner_affiliation: String,
}

/// An identifier from another system kept alongside the handle
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalIdentifier {
    pub source_name: String,
    pub value: String,
}

impl AdditionalIdentifier {
    pub fn new(source_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            value: value.into(),
        }
    }
}

/// A journal, publisher or series, resolved against the channel registry when possible
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    /// Canonical registry identifier
    pub id: Option<String>,
    /// Name as found in the bundle
    pub name: Option<String>,
}

/// Where a record was published
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationContext {
    pub journal: Option<Channel>,
    pub publisher: Option<Channel>,
    pub series: Option<Channel>,
    pub series_number: Option<String>,
    pub issns: Vec<String>,
    pub isbns: Vec<String>,
}

/// Publication-level metadata
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationMetadata {
    pub publication_type: PublicationType,
    pub context: PublicationContext,
    pub doi: Option<String>,
    pub rights_holder: Option<String>,
}

/// Which part of the source bundle a content file belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BundleType {
    Original,
    License,
    Text,
    Thumbnail,
    Other,
}

impl BundleType {
    /// Parse the bundle name of a `contents` line (`ORIGINAL`, `LICENSE`, ...)
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_uppercase().as_str() {
            "ORIGINAL" => BundleType::Original,
            "LICENSE" | "CC-LICENSE" => BundleType::License,
            "TEXT" => BundleType::Text,
            "THUMBNAIL" => BundleType::Thumbnail,
            _ => BundleType::Other,
        }
    }
}

/// Version of a document relative to its publisher
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PublisherVersion {
    PublishedVersion,
    AcceptedVersion,
    SubmittedVersion,
}

/// One file of the bundle
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFile {
    pub filename: String,
    pub bundle: BundleType,
    pub description: Option<String>,
    pub embargo_date: Option<DateTime<Utc>>,
    pub version: Option<PublisherVersion>,
    pub license: Option<String>,
}

impl ContentFile {
    pub fn new(filename: impl Into<String>, bundle: BundleType) -> Self {
        Self {
            filename: filename.into(),
            bundle,
            description: None,
            embargo_date: None,
            version: None,
            license: None,
        }
    }

    /// Whether the file is a document (not license text or a derivative)
    pub fn is_document(&self) -> bool {
        self.bundle == BundleType::Original
    }
}

/// Files carried over with a record
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBundle {
    pub files: Vec<ContentFile>,
}

impl ContentBundle {
    pub fn is_embargoed(&self) -> bool {
        self.files.iter().any(|file| file.embargo_date.is_some())
    }
}

/// A migrated publication record.
///
/// Field order is the serialized order. A record is only ever produced for a
/// bundle without errors, so `errors` is present but empty on every record
/// handed downstream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    pub owner: ResourceOwner,
    pub location: String,
    pub handle: String,
    pub additional_identifiers: Vec<AdditionalIdentifier>,
    pub publication: PublicationMetadata,
    pub entity_description: EntityDescription,
    pub content_bundle: ContentBundle,
    pub errors: Vec<ErrorDetails>,
    pub warnings: Vec<WarningDetails>,
    pub prioritized_fields: BTreeSet<String>,
}

impl Record {
    /// Create a record with a fresh identity
    pub fn new(
        handle: impl Into<String>,
        location: impl Into<String>,
        publication: PublicationMetadata,
        entity_description: EntityDescription,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner: ResourceOwner::default(),
            location: location.into(),
            handle: handle.into(),
            additional_identifiers: Vec::new(),
            publication,
            entity_description,
            content_bundle: ContentBundle::default(),
            errors: Vec::new(),
            warnings: Vec::new(),
            prioritized_fields: BTreeSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> Record {
        Record::new(
            "https://hdl.handle.net/11250/1",
            "export/item_1",
            PublicationMetadata {
                publication_type: PublicationType::AcademicArticle,
                context: PublicationContext::default(),
                doi: None,
                rights_holder: None,
            },
            EntityDescription::default(),
        )
    }

    #[test]
    fn test_serialized_field_order() {
        let json = serde_json::to_string(&sample_record()).unwrap();
        let keys = [
            "\"id\"",
            "\"owner\"",
            "\"location\"",
            "\"handle\"",
            "\"additionalIdentifiers\"",
            "\"publication\"",
            "\"entityDescription\"",
            "\"contentBundle\"",
            "\"errors\"",
            "\"warnings\"",
            "\"prioritizedFields\"",
        ];
        let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_errors_and_warnings_always_serialized() {
        let json = serde_json::to_value(sample_record()).unwrap();
        assert_eq!(json["errors"], serde_json::json!([]));
        assert_eq!(json["warnings"], serde_json::json!([]));
    }

    #[test]
    fn test_bundle_type_from_name() {
        assert_eq!(BundleType::from_name("ORIGINAL"), BundleType::Original);
        assert_eq!(BundleType::from_name("thumbnail"), BundleType::Thumbnail);
        assert_eq!(BundleType::from_name("SWORD"), BundleType::Other);
    }
}
