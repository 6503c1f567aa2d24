//! Contributor representation and name normalization

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Role of a contributor in the target system
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContributorRole {
    Creator,
    Supervisor,
    Editor,
    Illustrator,
    RoleOther,
}

impl fmt::Display for ContributorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContributorRole::Creator => "Creator",
            ContributorRole::Supervisor => "Supervisor",
            ContributorRole::Editor => "Editor",
            ContributorRole::Illustrator => "Illustrator",
            ContributorRole::RoleOther => "RoleOther",
        };
        f.write_str(name)
    }
}

/// Organizational affiliation, identified by an organization id or URI
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Affiliation {
    pub identifier: String,
}

impl Affiliation {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }
}

/// Who a contributor is.
///
/// The name is rewritten at most twice after construction: once by name-order
/// normalization and once by a contributor-override registry merge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub name: String,
    pub external_identifier: Option<String>,
    pub orcid: Option<String>,
}

impl Identity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            external_identifier: None,
            orcid: None,
        }
    }
}

/// A person attached to a record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contributor {
    pub identity: Identity,
    pub role: ContributorRole,
    pub source_role: Option<String>,
    pub affiliations: BTreeSet<Affiliation>,
    /// 1-based position in the record's contributor list
    pub sequence: u32,
}

impl Contributor {
    /// Create a contributor with no affiliations. Sequence is assigned later.
    pub fn new(identity: Identity, role: ContributorRole, source_role: Option<String>) -> Self {
        Self {
            identity,
            role,
            source_role,
            affiliations: BTreeSet::new(),
            sequence: 0,
        }
    }
}

/// Renumber contributors 1..N by list position
pub fn assign_sequence(contributors: &mut [Contributor]) {
    for (index, contributor) in contributors.iter_mut().enumerate() {
        contributor.sequence = index as u32 + 1;
    }
}

// ===== Name normalization =====

lazy_static! {
    /// Conjunctions that mark a comma-separated string as a list of several people
    static ref CONJUNCTIONS: HashSet<&'static str> = {
        let mut set = HashSet::new();
        for word in ["and", "og", "&"] {
            set.insert(word);
        }
        set
    };
}

/// Rewrite a "Last, First" name as "First Last".
///
/// - Names without a comma are returned with whitespace collapsed.
/// - Names containing a conjunction ("and", "og", "&") are left as they are.
/// - A comma-containing name that does not split into exactly two non-empty
///   parts has its commas stripped instead.
pub fn reorder_name(name: &str) -> String {
    let name: String = name.nfc().collect();
    let trimmed = collapse_whitespace(name.trim());

    if !trimmed.contains(',') {
        return trimmed;
    }

    if trimmed
        .split(|c: char| c.is_whitespace() || c == ',')
        .any(|word| CONJUNCTIONS.contains(word.to_lowercase().as_str()))
    {
        return trimmed;
    }

    let parts: Vec<&str> = trimmed
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    if parts.len() == 2 {
        format!("{} {}", parts[1], parts[0])
    } else {
        collapse_whitespace(&trimmed.replace(',', " ")).trim().to_string()
    }
}

/// Collapse runs of whitespace (including control characters) into a single space.
pub fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_was_space = false;

    for c in s.chars() {
        if c.is_whitespace() || c.is_control() {
            if !prev_was_space {
                result.push(' ');
                prev_was_space = true;
            }
        } else {
            result.push(c);
            prev_was_space = false;
        }
    }

    result
}
