//! Shared, read-only context of a migration run
//!
//! Built once at startup. Every registry sits behind an `Arc` so workers can
//! share it without copying. A missing or unreadable configured table is
//! fatal here, before any bundle is touched.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use remig_domain::ResourceOwner;

use crate::config::{DoiCheck, MigrationConfig};
use crate::embargo::EmbargoTable;
use crate::error::{ConfigError, MigrationError, RegistryError};
use crate::language::LanguageTable;
use crate::registry::{AffiliationRegistry, ChannelRegistry, ContributorOverrides, CustomerRegistry};
use crate::types::TypeMapper;
use crate::validator::DoiChecker;

pub struct MigrationContext {
    pub config: MigrationConfig,
    pub journals: Arc<ChannelRegistry>,
    pub publishers: Arc<ChannelRegistry>,
    pub customers: Arc<CustomerRegistry>,
    pub overrides: Arc<ContributorOverrides>,
    pub affiliations: Arc<AffiliationRegistry>,
    pub type_mapper: Arc<TypeMapper>,
    pub languages: Arc<LanguageTable>,
    pub embargoes: Arc<EmbargoTable>,
    pub doi_checker: Option<Arc<dyn DoiChecker>>,
}

impl std::fmt::Debug for MigrationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationContext")
            .field("customer", &self.config.customer)
            .field("environment", &self.config.environment)
            .field("journals", &self.journals.len())
            .field("publishers", &self.publishers.len())
            .field("embargoes", &self.embargoes.len())
            .field("online_doi_check", &self.doi_checker.is_some())
            .finish()
    }
}

/// Load an optional table, or fall back when it is not configured
fn load_or<T>(
    path: Option<&Path>,
    load: impl FnOnce(&Path) -> Result<T, RegistryError>,
    fallback: impl FnOnce() -> Result<T, RegistryError>,
) -> Result<T, RegistryError> {
    match path {
        Some(path) => load(path),
        None => fallback(),
    }
}

impl MigrationContext {
    /// Load every table the configuration names
    pub fn load(config: MigrationConfig) -> Result<Self, MigrationError> {
        let tables = &config.tables;

        let journals = load_or(
            tables.journals.as_deref(),
            |p| ChannelRegistry::load(p, "journals"),
            || Ok(ChannelRegistry::default()),
        )?;
        let publishers = load_or(
            tables.publishers.as_deref(),
            |p| ChannelRegistry::load(p, "publishers"),
            || Ok(ChannelRegistry::default()),
        )?;
        let overrides = load_or(
            tables.contributors.as_deref(),
            ContributorOverrides::load,
            || Ok(ContributorOverrides::default()),
        )?;
        let affiliations = load_or(
            tables.affiliations.as_deref(),
            AffiliationRegistry::load,
            || Ok(AffiliationRegistry::default()),
        )?;
        let embargoes = load_or(
            tables.embargoes.as_deref(),
            EmbargoTable::load,
            || Ok(EmbargoTable::default()),
        )?;
        let customers = load_or(
            tables.customers.as_deref(),
            CustomerRegistry::load,
            CustomerRegistry::embedded,
        )?;
        let type_mapper = load_or(
            tables.type_mapping.as_deref(),
            TypeMapper::load,
            TypeMapper::embedded,
        )?;
        let languages = load_or(
            tables.languages.as_deref(),
            LanguageTable::load,
            LanguageTable::embedded,
        )?;

        let doi_checker = online_checker(config.doi_check)?;

        info!(
            "loaded {} journals, {} publishers, {} contributor overrides, {} embargoes",
            journals.len(),
            publishers.len(),
            overrides.len(),
            embargoes.len()
        );

        let context = Self {
            journals: Arc::new(journals),
            publishers: Arc::new(publishers),
            customers: Arc::new(customers),
            overrides: Arc::new(overrides),
            affiliations: Arc::new(affiliations),
            type_mapper: Arc::new(type_mapper),
            languages: Arc::new(languages),
            embargoes: Arc::new(embargoes),
            doi_checker,
            config,
        };
        context.warn_unknown_customer();
        Ok(context)
    }

    /// Context with embedded tables and empty external registries
    pub fn embedded(config: MigrationConfig) -> Result<Self, MigrationError> {
        let context = Self {
            journals: Arc::new(ChannelRegistry::default()),
            publishers: Arc::new(ChannelRegistry::default()),
            customers: Arc::new(CustomerRegistry::embedded()?),
            overrides: Arc::new(ContributorOverrides::default()),
            affiliations: Arc::new(AffiliationRegistry::default()),
            type_mapper: Arc::new(TypeMapper::embedded()?),
            languages: Arc::new(LanguageTable::embedded()?),
            embargoes: Arc::new(EmbargoTable::default()),
            doi_checker: None,
            config,
        };
        context.warn_unknown_customer();
        Ok(context)
    }

    pub fn with_journals(mut self, journals: ChannelRegistry) -> Self {
        self.journals = Arc::new(journals);
        self
    }

    pub fn with_publishers(mut self, publishers: ChannelRegistry) -> Self {
        self.publishers = Arc::new(publishers);
        self
    }

    pub fn with_overrides(mut self, overrides: ContributorOverrides) -> Self {
        self.overrides = Arc::new(overrides);
        self
    }

    pub fn with_affiliations(mut self, affiliations: AffiliationRegistry) -> Self {
        self.affiliations = Arc::new(affiliations);
        self
    }

    pub fn with_embargoes(mut self, embargoes: EmbargoTable) -> Self {
        self.embargoes = Arc::new(embargoes);
        self
    }

    pub fn with_doi_checker(mut self, checker: Arc<dyn DoiChecker>) -> Self {
        self.doi_checker = Some(checker);
        self
    }

    /// Owner stamped on every record of this run
    pub fn resource_owner(&self) -> ResourceOwner {
        self.customers
            .resource_owner(&self.config.customer, self.config.environment.as_str())
    }

    fn warn_unknown_customer(&self) {
        if self
            .customers
            .organization(&self.config.customer, self.config.environment.as_str())
            .is_none()
        {
            warn!(
                "no organization for customer '{}' in {}; records get an empty owner affiliation",
                self.config.customer, self.config.environment
            );
        }
    }
}

#[cfg(feature = "online")]
fn online_checker(check: DoiCheck) -> Result<Option<Arc<dyn DoiChecker>>, ConfigError> {
    match check {
        DoiCheck::Offline => Ok(None),
        DoiCheck::Online => {
            let client = remig_identifiers::DoiResolverClient::new()
                .map_err(|_| ConfigError::OnlineCheckUnavailable)?;
            Ok(Some(Arc::new(client)))
        }
    }
}

#[cfg(not(feature = "online"))]
fn online_checker(check: DoiCheck) -> Result<Option<Arc<dyn DoiChecker>>, ConfigError> {
    match check {
        DoiCheck::Offline => Ok(None),
        DoiCheck::Online => Err(ConfigError::OnlineCheckUnavailable),
    }
}
