//! Affiliation registry: affiliation handle -> organization id
//!
//! Semicolon CSV `affiliation;organization`, header row optional.

use std::collections::HashMap;
use std::path::Path;

use remig_identifiers::handle_path;

use super::{column, csv_rows, read_table};
use crate::error::RegistryError;

const TABLE: &str = "affiliations";

#[derive(Debug, Clone, Default)]
pub struct AffiliationRegistry {
    organizations: HashMap<String, String>,
}

fn key(handle: &str) -> String {
    handle_path(handle).unwrap_or_else(|| handle.trim().to_string())
}

impl AffiliationRegistry {
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        Self::from_csv(&read_table(path)?)
    }

    pub fn from_csv(content: &str) -> Result<Self, RegistryError> {
        let entries = csv_rows(content, TABLE, "affiliation")?
            .iter()
            .filter_map(|record| Some((column(record, 0)?, column(record, 1)?)))
            .collect();
        Ok(Self::from_entries(entries))
    }

    pub fn from_entries(entries: Vec<(String, String)>) -> Self {
        let mut organizations = HashMap::new();
        for (handle, organization) in entries {
            organizations.entry(key(&handle)).or_insert(organization);
        }
        Self { organizations }
    }

    /// Organization for an affiliation handle, or the handle itself
    pub fn resolve(&self, handle: &str) -> String {
        self.organizations
            .get(&key(handle))
            .cloned()
            .unwrap_or_else(|| handle.trim().to_string())
    }

    pub fn len(&self) -> usize {
        self.organizations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.organizations.is_empty()
    }
}
