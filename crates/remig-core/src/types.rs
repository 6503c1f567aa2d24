//! Type Mapper
//!
//! Maps the set of raw `type` values of a bundle to one target publication
//! type. The rules are data (`data/type_mapping.toml`):
//!
//! 1. the whole set matches an exact-set rule (a one-member set also matches
//!    the single-type table);
//! 2. for sets of two or more, the first member, in source order, that is
//!    valid on its own in the single-type table;
//! 3. a member that already is a canonical target type name.
//!
//! Labels are compared case-insensitively after whitespace normalization
//! and synonym translation.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use remig_domain::{collapse_whitespace, PublicationType};

use crate::error::RegistryError;
use crate::registry::read_table;

const EMBEDDED: &str = include_str!("../data/type_mapping.toml");
const TABLE: &str = "type_mapping";

/// TOML representation of an exact-set rule
#[derive(Debug, Deserialize)]
struct TomlExactRule {
    sources: Vec<String>,
    target: String,
}

/// Full TOML type mapping document
#[derive(Debug, Deserialize, Default)]
struct TomlTypeMapping {
    #[serde(default)]
    peer_review_markers: Vec<String>,
    #[serde(default)]
    journal_types: Vec<String>,
    #[serde(default)]
    synonyms: HashMap<String, String>,
    #[serde(default)]
    single: HashMap<String, String>,
    #[serde(default)]
    exact: Vec<TomlExactRule>,
    #[serde(default)]
    prioritized: HashMap<String, Vec<String>>,
}

/// Read-only type mapping tables
#[derive(Debug, Clone, Default)]
pub struct TypeMapper {
    synonyms: HashMap<String, String>,
    single: HashMap<String, PublicationType>,
    exact: HashMap<BTreeSet<String>, PublicationType>,
    peer_review_markers: HashSet<String>,
    journal_types: HashSet<PublicationType>,
    prioritized: HashMap<PublicationType, Vec<String>>,
}

fn key(label: &str) -> String {
    label.to_lowercase()
}

fn target(name: &str) -> Result<PublicationType, RegistryError> {
    PublicationType::from_canonical(name.trim()).ok_or_else(|| RegistryError::InvalidEntry {
        table: TABLE.to_string(),
        reason: format!("unknown publication type '{}'", name),
    })
}

impl TypeMapper {
    /// The tables shipped with the crate
    pub fn embedded() -> Result<Self, RegistryError> {
        Self::from_toml(EMBEDDED)
    }

    /// Load a replacement table from disk
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        Self::from_toml(&read_table(path)?)
    }

    pub fn from_toml(content: &str) -> Result<Self, RegistryError> {
        let toml: TomlTypeMapping =
            toml::from_str(content).map_err(|source| RegistryError::Toml {
                table: TABLE.to_string(),
                source,
            })?;

        let mut mapper = TypeMapper::default();

        for (from, to) in &toml.synonyms {
            mapper.synonyms.insert(key(&clean(from)), clean(to));
        }
        for (source, name) in &toml.single {
            mapper.single.insert(key(&clean(source)), target(name)?);
        }
        for rule in &toml.exact {
            let sources: BTreeSet<String> = rule.sources.iter().map(|s| key(&clean(s))).collect();
            if sources.is_empty() {
                return Err(RegistryError::InvalidEntry {
                    table: TABLE.to_string(),
                    reason: format!("exact rule for '{}' has no sources", rule.target),
                });
            }
            mapper.exact.insert(sources, target(&rule.target)?);
        }
        mapper.peer_review_markers = toml
            .peer_review_markers
            .iter()
            .map(|m| key(&clean(m)))
            .collect();
        for name in &toml.journal_types {
            mapper.journal_types.insert(target(name)?);
        }
        for (name, fields) in toml.prioritized {
            mapper.prioritized.insert(target(&name)?, fields);
        }

        Ok(mapper)
    }

    /// Normalize one raw label: whitespace, control characters and synonyms
    pub fn normalize_label(&self, raw: &str) -> String {
        let cleaned = clean(raw);
        match self.synonyms.get(&key(&cleaned)) {
            Some(canonical) => canonical.clone(),
            None => cleaned,
        }
    }

    /// Distinct normalized labels, in first-seen order
    pub fn normalize<S: AsRef<str>>(&self, raw: &[S]) -> Vec<String> {
        let mut seen = HashSet::new();
        raw.iter()
            .map(|value| self.normalize_label(value.as_ref()))
            .filter(|label| !label.is_empty())
            .filter(|label| seen.insert(key(label)))
            .collect()
    }

    /// Map raw type values to a target type
    pub fn map<S: AsRef<str>>(&self, raw: &[S]) -> Option<PublicationType> {
        self.map_normalized(&self.normalize(raw))
    }

    /// Map already normalized, distinct labels
    pub fn map_normalized(&self, labels: &[String]) -> Option<PublicationType> {
        if labels.is_empty() {
            return None;
        }

        let set: BTreeSet<String> = labels.iter().map(|l| key(l)).collect();
        if let Some(mapped) = self.exact.get(&set) {
            debug!("type set {:?} matched exact rule -> {}", labels, mapped);
            return Some(*mapped);
        }

        if labels.len() == 1 {
            if let Some(mapped) = self.single.get(&key(&labels[0])) {
                return Some(*mapped);
            }
        } else if let Some(mapped) = labels.iter().find_map(|l| self.single.get(&key(l))) {
            debug!("type set {:?} fell back to single member -> {}", labels, mapped);
            return Some(*mapped);
        }

        labels
            .iter()
            .find_map(|label| PublicationType::from_canonical(label))
    }

    pub fn is_peer_review_marker(&self, label: &str) -> bool {
        self.peer_review_markers.contains(&key(&self.normalize_label(label)))
    }

    /// Whether any of the labels marks peer review
    pub fn has_peer_review_marker<S: AsRef<str>>(&self, labels: &[S]) -> bool {
        labels.iter().any(|l| self.is_peer_review_marker(l.as_ref()))
    }

    /// Whether records of this type are published in a journal
    pub fn is_journal_type(&self, publication_type: PublicationType) -> bool {
        self.journal_types.contains(&publication_type)
    }

    /// Fields this type is the authoritative source for
    pub fn prioritized_fields(&self, publication_type: PublicationType) -> &[String] {
        self.prioritized
            .get(&publication_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

fn clean(raw: &str) -> String {
    collapse_whitespace(raw).trim().to_string()
}
