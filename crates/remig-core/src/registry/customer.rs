//! Customer registry: customer short name -> environment -> organization id

use std::collections::HashMap;
use std::path::Path;

use remig_domain::ResourceOwner;

use super::read_table;
use crate::error::RegistryError;

const EMBEDDED: &str = include_str!("../../data/customers.toml");
const TABLE: &str = "customers";

/// Immutable customer lookup table
#[derive(Debug, Clone, Default)]
pub struct CustomerRegistry {
    customers: HashMap<String, HashMap<String, String>>,
}

impl CustomerRegistry {
    /// The table shipped with the crate
    pub fn embedded() -> Result<Self, RegistryError> {
        Self::from_toml(EMBEDDED)
    }

    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        Self::from_toml(&read_table(path)?)
    }

    pub fn from_toml(content: &str) -> Result<Self, RegistryError> {
        let parsed: HashMap<String, HashMap<String, String>> =
            toml::from_str(content).map_err(|source| RegistryError::Toml {
                table: TABLE.to_string(),
                source,
            })?;

        let customers = parsed
            .into_iter()
            .map(|(customer, environments)| {
                let environments = environments
                    .into_iter()
                    .map(|(env, id)| (env.to_lowercase(), id))
                    .collect();
                (customer.to_lowercase(), environments)
            })
            .collect();

        Ok(Self { customers })
    }

    pub fn contains(&self, customer: &str) -> bool {
        self.customers.contains_key(&customer.to_lowercase())
    }

    /// Organization identifier of a customer in an environment
    pub fn organization(&self, customer: &str, environment: &str) -> Option<&str> {
        self.customers
            .get(&customer.to_lowercase())
            .and_then(|envs| envs.get(&environment.to_lowercase()))
            .map(String::as_str)
    }

    /// Owner of records migrated for a customer; empty affiliation if unknown
    pub fn resource_owner(&self, customer: &str, environment: &str) -> ResourceOwner {
        ResourceOwner {
            owner: customer.to_string(),
            owner_affiliation: self
                .organization(customer, environment)
                .unwrap_or_default()
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_table_has_every_environment() {
        let registry = CustomerRegistry::embedded().unwrap();
        assert!(registry.contains("NTNU"));
        for env in ["sandbox", "develop", "test", "production"] {
            assert!(registry.organization("ntnu", env).is_some());
        }
    }

    #[test]
    fn test_unknown_customer_has_empty_affiliation() {
        let registry = CustomerRegistry::from_toml("[abc]\nproduction = \"org-1\"\n").unwrap();
        assert_eq!(registry.organization("abc", "PRODUCTION"), Some("org-1"));
        assert_eq!(registry.organization("abc", "sandbox"), None);

        let owner = registry.resource_owner("xyz", "production");
        assert_eq!(owner.owner, "xyz");
        assert_eq!(owner.owner_affiliation, "");
    }

    #[test]
    fn test_malformed_table() {
        assert!(matches!(
            CustomerRegistry::from_toml("abc = 1"),
            Err(RegistryError::Toml { .. })
        ));
    }
}
