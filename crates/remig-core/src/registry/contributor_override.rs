//! Contributor override registry
//!
//! Semicolon CSV `name;identifier;affiliation`, header row optional. Keyed by
//! the exact resolved contributor name; the first row for a name wins.

use std::collections::HashMap;
use std::path::Path;

use tracing::warn;

use super::{column, csv_rows, read_table};
use crate::error::RegistryError;

const TABLE: &str = "contributors";

/// Canonical identity for a contributor name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributorOverride {
    pub name: String,
    pub identifier: Option<String>,
    /// Handle of the affiliated organization unit
    pub affiliation: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ContributorOverrides {
    entries: HashMap<String, ContributorOverride>,
}

impl ContributorOverrides {
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        Self::from_csv(&read_table(path)?)
    }

    pub fn from_csv(content: &str) -> Result<Self, RegistryError> {
        let entries = csv_rows(content, TABLE, "name")?
            .iter()
            .filter_map(|record| {
                let name = column(record, 0)?;
                Some(ContributorOverride {
                    name,
                    identifier: column(record, 1),
                    affiliation: column(record, 2),
                })
            })
            .collect();
        Ok(Self::from_entries(entries))
    }

    pub fn from_entries(entries: Vec<ContributorOverride>) -> Self {
        let mut map = HashMap::new();
        for entry in entries {
            if map.contains_key(&entry.name) {
                warn!("{}: duplicate entry for '{}', keeping the first", TABLE, entry.name);
                continue;
            }
            map.insert(entry.name.clone(), entry);
        }
        Self { entries: map }
    }

    pub fn get(&self, name: &str) -> Option<&ContributorOverride> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
