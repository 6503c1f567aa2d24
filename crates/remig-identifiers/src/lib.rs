//! Identifier normalization and validation for migrated records
//!
//! This crate provides tools for working with publication identifiers:
//! - DOI normalization and offline syntax check
//! - ISSN and ISBN (10/13) checksum validation
//! - ORCID checksum validation and canonical URI form
//! - Handle parsing and canonical handle URIs
//! - Splitting multi-valued identifier fields
//! - Optional online DOI reachability (`online` feature)

pub mod extractors;
#[cfg(feature = "online")]
pub mod online;
pub mod resolver;
pub mod validators;

pub use extractors::*;
#[cfg(feature = "online")]
pub use online::*;
pub use resolver::*;
pub use validators::*;
