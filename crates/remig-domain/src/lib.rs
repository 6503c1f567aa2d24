//! Domain types for migrating legacy repository bundles
//!
//! This crate provides the data model shared by the migration pipeline:
//! - Triple: one `(element, qualifier, value)` fact from a bundle export
//! - BundleLocation: where a bundle came from and which handle it resolves to
//! - Record: the normalized publication record handed downstream
//! - EntityDescription, PublicationDate, PublicationInstance: descriptive metadata
//! - Contributor, Identity, Affiliation: people attached to a record
//! - ErrorDetails, WarningDetails: classified diagnostics
//! - Embargo, ContentFile: content files and their access restrictions

pub mod contributor;
pub mod diagnostics;
pub mod embargo;
pub mod entity;
pub mod location;
pub mod publication_type;
pub mod record;
pub mod triple;

pub use contributor::*;
pub use diagnostics::*;
pub use embargo::*;
pub use entity::*;
pub use location::*;
pub use publication_type::*;
pub use record::*;
pub use triple::*;
