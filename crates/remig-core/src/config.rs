//! Configuration for a migration run
//!
//! Loaded from a TOML file with the following structure:
//!
//! ```toml
//! customer = "ntnu"
//! environment = "test"
//! doi_check = "offline"
//! external_identifier_qualifier = "cristin"
//!
//! [tables]
//! journals = "tables/journals.csv"
//! publishers = "tables/publishers.csv"
//! contributors = "tables/contributors.csv"
//! affiliations = "tables/affiliations.csv"
//! embargoes = "tables/embargo.txt"
//! # customers, type_mapping and languages fall back to the embedded tables
//!
//! [diagnostics]
//! ignored_fields = ["date.accessioned", "description.provenance", "rights.*"]
//! ```
//!
//! Relative table paths are resolved against the directory of the
//! configuration file.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const DEFAULT_EXTERNAL_QUALIFIER: &str = "cristin";

/// Deployment environment of the target system
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Sandbox,
    Develop,
    #[default]
    Test,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Sandbox => "sandbox",
            Environment::Develop => "develop",
            Environment::Test => "test",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How DOIs are checked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoiCheck {
    /// Syntax only
    #[default]
    Offline,
    /// Syntax, then ask the DOI resolver
    Online,
}

/// Paths of the external lookup tables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    pub journals: Option<PathBuf>,
    pub publishers: Option<PathBuf>,
    pub contributors: Option<PathBuf>,
    pub affiliations: Option<PathBuf>,
    pub embargoes: Option<PathBuf>,
    /// Overrides for the embedded tables
    pub customers: Option<PathBuf>,
    pub type_mapping: Option<PathBuf>,
    pub languages: Option<PathBuf>,
}

impl TableConfig {
    fn resolve_against(&mut self, base: &Path) {
        for path in [
            &mut self.journals,
            &mut self.publishers,
            &mut self.contributors,
            &mut self.affiliations,
            &mut self.embargoes,
            &mut self.customers,
            &mut self.type_mapping,
            &mut self.languages,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    /// `element`, `element.qualifier` or `element.*` entries never reported
    /// as unmapped
    #[serde(default)]
    pub ignored_fields: Vec<String>,
}

/// Settings of one migration run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationConfig {
    /// Customer short name, e.g. `ntnu`
    pub customer: String,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub doi_check: DoiCheck,
    /// Qualifier of `identifier.*` that holds the target system's id
    #[serde(default = "default_external_qualifier")]
    pub external_identifier_qualifier: String,
    #[serde(default)]
    pub tables: TableConfig,
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

fn default_external_qualifier() -> String {
    DEFAULT_EXTERNAL_QUALIFIER.to_string()
}

impl MigrationConfig {
    /// Configuration with embedded tables only
    pub fn new(customer: impl Into<String>, environment: Environment) -> Self {
        Self {
            customer: customer.into(),
            environment,
            doi_check: DoiCheck::default(),
            external_identifier_qualifier: default_external_qualifier(),
            tables: TableConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
        }
    }

    /// Load from a file, resolving relative table paths against its directory
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::from_toml(&content)?;
        if let Some(base) = path.parent() {
            config.tables.resolve_against(base);
        }
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config: MigrationConfig = toml::from_str(content)?;
        config.customer = config.customer.trim().to_lowercase();
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config() {
        let config = MigrationConfig::from_toml("customer = \"NTNU\"").unwrap();
        assert_eq!(config.customer, "ntnu");
        assert_eq!(config.environment, Environment::Test);
        assert_eq!(config.doi_check, DoiCheck::Offline);
        assert_eq!(config.external_identifier_qualifier, "cristin");
        assert!(config.tables.journals.is_none());
        assert!(config.diagnostics.ignored_fields.is_empty());
    }

    #[test]
    fn test_full_config() {
        let toml = r#"
customer = "uib"
environment = "production"
doi_check = "online"
external_identifier_qualifier = "fs"

[tables]
journals = "journals.csv"
embargoes = "/data/embargo.txt"

[diagnostics]
ignored_fields = ["date.accessioned", "rights.*"]
"#;
        let mut config = MigrationConfig::from_toml(toml).unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.doi_check, DoiCheck::Online);
        assert_eq!(config.external_identifier_qualifier, "fs");
        assert_eq!(config.diagnostics.ignored_fields.len(), 2);

        config.tables.resolve_against(Path::new("/etc/remig"));
        assert_eq!(
            config.tables.journals,
            Some(PathBuf::from("/etc/remig/journals.csv"))
        );
        assert_eq!(config.tables.embargoes, Some(PathBuf::from("/data/embargo.txt")));
    }

    #[test]
    fn test_rejects_unknown_environment() {
        let result = MigrationConfig::from_toml("customer = \"uib\"\nenvironment = \"staging\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_customer_is_an_error() {
        assert!(MigrationConfig::from_toml("environment = \"test\"").is_err());
    }
}
