//! Error types for remig-core
//!
//! Expected domain conditions (bad dates, unknown types, unmatched embargoes)
//! are data and never show up here. These errors are the fatal setup
//! failures and the I/O around a bundle.

use thiserror::Error;

/// Result type alias for setup operations
pub type Result<T> = std::result::Result<T, MigrationError>;

/// Fatal errors that abort a whole run
#[derive(Error, Debug)]
pub enum MigrationError {
    /// Configuration could not be read or understood
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A lookup table could not be loaded
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Bundle input could not be read
    #[error("Bundle error: {0}")]
    Bundle(#[from] BundleError),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("missing environment variable {0}")]
    MissingVariable(String),

    #[error("online DOI check requested but this build lacks the `online` feature")]
    OnlineCheckUnavailable,
}

/// Lookup table loading errors
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {table}: {source}")]
    Csv {
        table: String,
        #[source]
        source: csv::Error,
    },

    #[error("TOML error in {table}: {source}")]
    Toml {
        table: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid entry in {table}: {reason}")]
    InvalidEntry { table: String, reason: String },
}

/// Bundle reading and parsing errors
#[derive(Error, Debug)]
pub enum BundleError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("XML parse error: {0}")]
    Xml(String),

    #[error("no dublin_core.xml in {0}")]
    MissingMetadata(String),
}
