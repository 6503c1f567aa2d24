//! Language mapping for `language.iso`

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::error::RegistryError;
use crate::registry::read_table;

const EMBEDDED: &str = include_str!("../data/languages.toml");
const TABLE: &str = "languages";

#[derive(Debug, Deserialize)]
struct TomlLanguages {
    #[serde(default = "default_undefined")]
    undefined: String,
    #[serde(default = "default_multiple")]
    multiple: String,
    #[serde(default)]
    undefined_sources: Vec<String>,
    #[serde(default)]
    codes: HashMap<String, String>,
}

fn default_undefined() -> String {
    "und".to_string()
}
fn default_multiple() -> String {
    "mul".to_string()
}

/// How the language values of a bundle resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageResolution {
    /// No language given
    Absent,
    /// One recognized language
    Mapped(String),
    /// Only values that explicitly mean "undefined"; carries them
    Undefined(Vec<String>),
    /// Several recognized languages; carries their codes
    Multiple(Vec<String>),
    /// Values that are not languages at all
    Invalid(Vec<String>),
}

/// Read-only language table
#[derive(Debug, Clone)]
pub struct LanguageTable {
    undefined: String,
    multiple: String,
    undefined_sources: HashSet<String>,
    codes: HashMap<String, String>,
}

impl LanguageTable {
    pub fn embedded() -> Result<Self, RegistryError> {
        Self::from_toml(EMBEDDED)
    }

    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        Self::from_toml(&read_table(path)?)
    }

    pub fn from_toml(content: &str) -> Result<Self, RegistryError> {
        let toml: TomlLanguages = toml::from_str(content).map_err(|source| RegistryError::Toml {
            table: TABLE.to_string(),
            source,
        })?;
        Ok(Self {
            undefined: toml.undefined,
            multiple: toml.multiple,
            undefined_sources: toml
                .undefined_sources
                .iter()
                .map(|s| s.trim().to_lowercase())
                .collect(),
            codes: toml
                .codes
                .into_iter()
                .map(|(k, v)| (k.trim().to_lowercase(), v))
                .collect(),
        })
    }

    /// Code for a single value, if recognized
    pub fn lookup(&self, value: &str) -> Option<&str> {
        self.codes.get(&value.trim().to_lowercase()).map(String::as_str)
    }

    pub fn resolve<S: AsRef<str>>(&self, values: &[S]) -> LanguageResolution {
        let values: Vec<&str> = values
            .iter()
            .map(|v| v.as_ref().trim())
            .filter(|v| !v.is_empty())
            .collect();
        if values.is_empty() {
            return LanguageResolution::Absent;
        }

        let mut mapped: Vec<String> = Vec::new();
        let mut undefined = Vec::new();
        let mut invalid = Vec::new();

        for value in values {
            if self.undefined_sources.contains(&value.to_lowercase()) {
                undefined.push(value.to_string());
            } else if let Some(code) = self.lookup(value) {
                if !mapped.iter().any(|m| m == code) {
                    mapped.push(code.to_string());
                }
            } else {
                invalid.push(value.to_string());
            }
        }

        if !invalid.is_empty() {
            return LanguageResolution::Invalid(invalid);
        }
        match mapped.len() {
            0 => LanguageResolution::Undefined(undefined),
            1 => LanguageResolution::Mapped(mapped.remove(0)),
            _ => LanguageResolution::Multiple(mapped),
        }
    }

    /// The code a resolution stores on the record
    pub fn code_for<'a>(&'a self, resolution: &'a LanguageResolution) -> &'a str {
        match resolution {
            LanguageResolution::Mapped(code) => code,
            LanguageResolution::Multiple(_) => &self.multiple,
            LanguageResolution::Absent
            | LanguageResolution::Undefined(_)
            | LanguageResolution::Invalid(_) => &self.undefined,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn table() -> LanguageTable {
        LanguageTable::embedded().unwrap()
    }

    #[rstest]
    #[case(&["nob"], "nob")]
    #[case(&["NB"], "nob")]
    #[case(&["en", "eng"], "eng")]
    #[case(&[" nn "], "nno")]
    fn test_mapped(#[case] values: &[&str], #[case] code: &str) {
        let table = table();
        let resolution = table.resolve(values);
        assert_eq!(resolution, LanguageResolution::Mapped(code.to_string()));
        assert_eq!(table.code_for(&resolution), code);
    }

    #[rstest]
    #[case("und")]
    #[case("mul")]
    #[case("zxx")]
    #[case("other")]
    fn test_undefined_sources(#[case] value: &str) {
        let table = table();
        let resolution = table.resolve(&[value]);
        assert_eq!(resolution, LanguageResolution::Undefined(vec![value.to_string()]));
        assert_eq!(table.code_for(&resolution), "und");
    }

    #[test]
    fn test_multiple_languages() {
        let table = table();
        let resolution = table.resolve(&["nob", "eng"]);
        assert_eq!(
            resolution,
            LanguageResolution::Multiple(vec!["nob".to_string(), "eng".to_string()])
        );
        assert_eq!(table.code_for(&resolution), "mul");
    }

    #[test]
    fn test_invalid_and_absent() {
        let table = table();
        assert_eq!(
            table.resolve(&["klingon", "eng"]),
            LanguageResolution::Invalid(vec!["klingon".to_string()])
        );
        let none: [&str; 0] = [];
        assert_eq!(table.resolve(&none), LanguageResolution::Absent);
        assert_eq!(table.resolve(&["  "]), LanguageResolution::Absent);
        assert_eq!(table.code_for(&LanguageResolution::Absent), "und");
    }
}
