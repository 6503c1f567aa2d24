//! Metadata normalization and validation for migrating repository bundles
//!
//! This crate turns legacy repository exports into normalized records:
//! - Bundle reading: `dublin_core.xml`, `contents` and `handle` files
//! - Triple store: consumable `(element, qualifier, value)` facts
//! - Type mapping, date inference, contributor resolution, language mapping
//! - Lookup tables: channel registry, customers, contributor overrides,
//!   affiliations, embargoes
//! - Validation into blocking errors and advisory warnings
//! - Record assembly and a parallel runner across bundles

pub mod assembler;
pub mod bundle;
pub mod config;
pub mod context;
pub mod contributors;
pub mod dates;
pub mod embargo;
pub mod error;
pub mod extract;
pub mod language;
pub mod registry;
pub mod runner;
pub mod store;
pub mod types;
pub mod validator;

pub use assembler::{Assembled, AssemblyError, AssemblyState, RecordAssembler, RejectedBundle};
pub use bundle::{parse_contents, parse_dublin_core, resolve_handle, BundleSource};
pub use config::{DoiCheck, Environment, MigrationConfig};
pub use context::MigrationContext;
pub use contributors::{ContributorResolver, ResolvedContributors};
pub use dates::{infer_date, infer_first};
pub use embargo::EmbargoTable;
pub use error::{BundleError, ConfigError, MigrationError, RegistryError, Result};
pub use extract::{ExtractedFields, FieldValue};
pub use language::{LanguageResolution, LanguageTable};
pub use registry::{
    AffiliationRegistry, ChannelEntry, ChannelMatch, ChannelRegistry, ContributorOverride,
    ContributorOverrides, CustomerRegistry,
};
pub use runner::{BundleOutcome, MigrationRunner, OrphanEmbargo, RunReport, RunSummary};
pub use store::{Field, TripleStore};
pub use types::TypeMapper;
pub use validator::{DoiChecker, ValidationReport, Validator};
