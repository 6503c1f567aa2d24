//! Channel registry: journals, publishers and series
//!
//! Loaded from a semicolon CSV with the header
//! `identifier;print_issn;online_issn;original_title;international_title`.
//! Lookups by ISSN return the first matching entry; lookups by title fail as
//! `Ambiguous` when several entries match.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use remig_identifiers::normalize_issn;

use super::{csv_reader, read_table};
use crate::error::RegistryError;

/// One registered journal, publisher or series
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChannelEntry {
    pub identifier: String,
    #[serde(default)]
    pub print_issn: Option<String>,
    #[serde(default)]
    pub online_issn: Option<String>,
    pub original_title: String,
    #[serde(default)]
    pub international_title: Option<String>,
}

/// Result of a channel lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelMatch {
    /// Exactly one entry; carries its identifier
    Found(String),
    NotFound,
    /// The title matched several entries; carries their identifiers
    Ambiguous(Vec<String>),
}

impl ChannelMatch {
    pub fn identifier(&self) -> Option<&str> {
        match self {
            ChannelMatch::Found(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, ChannelMatch::Ambiguous(_))
    }
}

/// Immutable channel lookup table
#[derive(Debug, Clone, Default)]
pub struct ChannelRegistry {
    entries: Vec<ChannelEntry>,
    /// Lowercased titles per entry, same index as `entries`
    titles: Vec<Vec<String>>,
    /// Normalized ISSN -> index of the first entry carrying it
    by_issn: HashMap<String, usize>,
}

impl ChannelRegistry {
    pub fn load(path: &Path, table: &str) -> Result<Self, RegistryError> {
        Self::from_csv(&read_table(path)?, table)
    }

    pub fn from_csv(content: &str, table: &str) -> Result<Self, RegistryError> {
        let mut reader = csv_reader(content, true);
        let mut entries = Vec::new();
        for result in reader.deserialize::<ChannelEntry>() {
            match result {
                Ok(entry) if !entry.identifier.is_empty() => entries.push(entry),
                Ok(_) => warn!("{}: skipping row without identifier", table),
                Err(source) => {
                    return Err(RegistryError::Csv {
                        table: table.to_string(),
                        source,
                    })
                }
            }
        }
        Ok(Self::from_entries(entries))
    }

    pub fn from_entries(entries: Vec<ChannelEntry>) -> Self {
        let mut by_issn = HashMap::new();
        let mut titles = Vec::with_capacity(entries.len());

        for (index, entry) in entries.iter().enumerate() {
            for issn in [&entry.print_issn, &entry.online_issn].into_iter().flatten() {
                if let Some(normalized) = normalize_issn(issn) {
                    by_issn.entry(normalized).or_insert(index);
                }
            }
            titles.push(
                std::iter::once(&entry.original_title)
                    .chain(entry.international_title.iter())
                    .map(|t| t.trim().to_lowercase())
                    .filter(|t| !t.is_empty())
                    .collect(),
            );
        }

        Self {
            entries,
            titles,
            by_issn,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry by registry identifier
    pub fn get(&self, identifier: &str) -> Option<&ChannelEntry> {
        self.entries.iter().find(|e| e.identifier == identifier)
    }

    /// Look up by print or online ISSN
    pub fn lookup_issn(&self, issn: &str) -> ChannelMatch {
        normalize_issn(issn)
            .and_then(|normalized| self.by_issn.get(&normalized))
            .map(|&index| ChannelMatch::Found(self.entries[index].identifier.clone()))
            .unwrap_or(ChannelMatch::NotFound)
    }

    /// Look up by title, case-insensitive.
    ///
    /// A unique exact match wins; otherwise entries whose title contains the
    /// query are considered.
    pub fn lookup_title(&self, title: &str) -> ChannelMatch {
        let query = title.trim().to_lowercase();
        if query.is_empty() {
            return ChannelMatch::NotFound;
        }

        let exact = self.matching(|t| t == query);
        if exact.len() == 1 {
            return ChannelMatch::Found(exact[0].clone());
        }

        let matches = self.matching(|t| t.contains(&query));
        match matches.len() {
            0 => ChannelMatch::NotFound,
            1 => ChannelMatch::Found(matches[0].clone()),
            _ => ChannelMatch::Ambiguous(matches),
        }
    }

    /// Journals: ISSNs first, then the title
    pub fn lookup_journal(&self, issns: &[String], title: Option<&str>) -> ChannelMatch {
        if let Some(found) = issns
            .iter()
            .map(|issn| self.lookup_issn(issn))
            .find(|m| matches!(m, ChannelMatch::Found(_)))
        {
            return found;
        }
        title
            .map(|t| self.lookup_title(t))
            .unwrap_or(ChannelMatch::NotFound)
    }

    fn matching<P>(&self, predicate: P) -> Vec<String>
    where
        P: Fn(&str) -> bool,
    {
        self.entries
            .iter()
            .zip(&self.titles)
            .filter(|(_, titles)| titles.iter().any(|t| predicate(t)))
            .map(|(entry, _)| entry.identifier.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JOURNALS: &str = "identifier;print_issn;online_issn;original_title;international_title
339741;0028-0836;1476-4687;Nature;
440021;0378-5955;;Hearing Research;
440022;;;Nature Ecology;
440023;;;Nature Ecology & Evolution;
500001;1234-5679;;Tidsskrift for Samfunnsforskning;Journal of Social Research
";

    fn registry() -> ChannelRegistry {
        ChannelRegistry::from_csv(JOURNALS, "journals").unwrap()
    }

    #[test]
    fn test_lookup_issn() {
        let registry = registry();
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.lookup_issn("1476-4687"), ChannelMatch::Found("339741".into()));
        assert_eq!(registry.lookup_issn("03785955"), ChannelMatch::Found("440021".into()));
        assert_eq!(registry.lookup_issn("0000-0000"), ChannelMatch::NotFound);
    }

    #[test]
    fn test_lookup_title_exact_beats_substring() {
        let registry = registry();
        assert_eq!(registry.lookup_title("nature"), ChannelMatch::Found("339741".into()));
        assert_eq!(
            registry.lookup_title("Nature Ecology"),
            ChannelMatch::Found("440022".into())
        );
    }

    #[test]
    fn test_lookup_title_substring() {
        let registry = registry();
        assert_eq!(
            registry.lookup_title("social research"),
            ChannelMatch::Found("500001".into())
        );
        assert!(registry.lookup_title("Ecology").is_ambiguous());
        assert_eq!(registry.lookup_title("Physics Letters"), ChannelMatch::NotFound);
        assert_eq!(registry.lookup_title("   "), ChannelMatch::NotFound);
    }

    #[test]
    fn test_lookup_journal_prefers_issn() {
        let registry = registry();
        let issns = vec!["0378-5955".to_string()];
        assert_eq!(
            registry.lookup_journal(&issns, Some("Nature")),
            ChannelMatch::Found("440021".into())
        );
        assert_eq!(
            registry.lookup_journal(&[], Some("Nature")),
            ChannelMatch::Found("339741".into())
        );
        assert_eq!(registry.lookup_journal(&[], None), ChannelMatch::NotFound);
    }
}
