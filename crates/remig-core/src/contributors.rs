//! Contributor Resolver
//!
//! Turns `contributor.*` and `creator.*` triples into ordered contributors:
//! role mapping by table, "Last, First" reordering, override-registry merge,
//! sequence numbering and the singleton ORCID attachment.

use tracing::{debug, warn};

use remig_domain::{
    assign_sequence, reorder_name, Affiliation, Contributor, ContributorRole, Identity, Triple,
};
use remig_identifiers::normalize_orcid;

use crate::registry::{AffiliationRegistry, ContributorOverrides};
use crate::store::TripleStore;

/// What a contributor-ish triple turns into
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleMapping {
    /// A contributor with this role
    Role(ContributorRole),
    /// No contributor of its own; feeds the singleton ORCID attachment
    OrcidCandidate,
}

/// Source `(element, qualifier)` to role
const ROLE_TABLE: &[(&str, Option<&str>, RoleMapping)] = &[
    ("contributor", Some("author"), RoleMapping::Role(ContributorRole::Creator)),
    ("creator", Some("author"), RoleMapping::Role(ContributorRole::Creator)),
    ("contributor", Some("advisor"), RoleMapping::Role(ContributorRole::Supervisor)),
    ("contributor", Some("supervisor"), RoleMapping::Role(ContributorRole::Supervisor)),
    ("contributor", Some("editor"), RoleMapping::Role(ContributorRole::Editor)),
    ("contributor", Some("illustrator"), RoleMapping::Role(ContributorRole::Illustrator)),
    ("contributor", Some("other"), RoleMapping::Role(ContributorRole::RoleOther)),
    ("contributor", None, RoleMapping::Role(ContributorRole::RoleOther)),
    ("contributor", Some("orcid"), RoleMapping::OrcidCandidate),
    ("creator", Some("orcid"), RoleMapping::OrcidCandidate),
    ("creator", None, RoleMapping::OrcidCandidate),
];

/// Role mapping for a triple, if it is a contributor triple at all
pub fn role_mapping(triple: &Triple) -> Option<RoleMapping> {
    ROLE_TABLE
        .iter()
        .find(|(element, qualifier, _)| triple.is(element, *qualifier))
        .map(|(_, _, mapping)| *mapping)
}

/// Outcome of contributor resolution
#[derive(Debug, Clone, Default)]
pub struct ResolvedContributors {
    pub contributors: Vec<Contributor>,
    /// Distinct ORCID candidate values found in the bundle
    pub orcids: Vec<String>,
}

/// Resolves contributors against the shared override tables
pub struct ContributorResolver<'a> {
    overrides: &'a ContributorOverrides,
    affiliations: &'a AffiliationRegistry,
}

impl<'a> ContributorResolver<'a> {
    pub fn new(overrides: &'a ContributorOverrides, affiliations: &'a AffiliationRegistry) -> Self {
        Self {
            overrides,
            affiliations,
        }
    }

    pub fn resolve(&self, store: &TripleStore) -> ResolvedContributors {
        let mut resolved = ResolvedContributors::default();

        for triple in store.filter(|t| role_mapping(t).is_some()) {
            let Some(mapping) = role_mapping(triple) else {
                continue;
            };
            let value = store.scrape_value(triple);

            match mapping {
                RoleMapping::OrcidCandidate => {
                    let candidate = value.trim().to_string();
                    if !candidate.is_empty() && !contains_orcid(&resolved.orcids, &candidate) {
                        resolved.orcids.push(candidate);
                    }
                }
                RoleMapping::Role(role) => {
                    let name = reorder_name(&value);
                    if name.is_empty() {
                        debug!("dropping contributor with empty name from {}", triple);
                        continue;
                    }
                    let duplicate = resolved
                        .contributors
                        .iter()
                        .any(|c| c.identity.name == name && c.role == role);
                    if duplicate {
                        continue;
                    }
                    resolved.contributors.push(Contributor::new(
                        Identity::new(name),
                        role,
                        triple.qualifier.clone(),
                    ));
                }
            }
        }

        for contributor in &mut resolved.contributors {
            self.apply_override(contributor);
        }

        assign_sequence(&mut resolved.contributors);
        attach_singleton_orcid(&mut resolved.contributors, &resolved.orcids);

        resolved
    }

    /// Overwrite identity and affiliations from the override registry
    fn apply_override(&self, contributor: &mut Contributor) {
        let Some(entry) = self.overrides.get(&contributor.identity.name) else {
            return;
        };
        debug!("contributor '{}' found in override registry", entry.name);

        contributor.identity.name = entry.name.clone();
        contributor.identity.external_identifier = entry.identifier.clone();
        contributor.affiliations.clear();
        if let Some(handle) = &entry.affiliation {
            contributor
                .affiliations
                .insert(Affiliation::new(self.affiliations.resolve(handle)));
        }
    }
}

fn contains_orcid(orcids: &[String], candidate: &str) -> bool {
    let key = normalize_orcid(candidate).unwrap_or_else(|| candidate.to_string());
    orcids
        .iter()
        .any(|o| normalize_orcid(o).unwrap_or_else(|| o.clone()) == key)
}

/// Attach the bundle's ORCID when there is exactly one contributor and one ORCID
pub fn attach_singleton_orcid(contributors: &mut [Contributor], orcids: &[String]) {
    if contributors.len() == 1 && orcids.len() == 1 {
        match normalize_orcid(&orcids[0]) {
            Some(normalized) => contributors[0].identity.orcid = Some(normalized),
            None => warn!("ignoring invalid ORCID '{}'", orcids[0]),
        }
    } else if !orcids.is_empty() {
        debug!(
            "not attaching ORCID: {} contributors, {} ORCIDs",
            contributors.len(),
            orcids.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ContributorOverride;

    const ORCID: &str = "0000-0002-1825-0097";

    fn resolve(triples: Vec<Triple>) -> ResolvedContributors {
        let overrides = ContributorOverrides::default();
        let affiliations = AffiliationRegistry::default();
        let store = TripleStore::new(triples);
        ContributorResolver::new(&overrides, &affiliations).resolve(&store)
    }

    #[test]
    fn test_role_mapping_table() {
        assert_eq!(
            role_mapping(&Triple::new("contributor", Some("advisor"), "x")),
            Some(RoleMapping::Role(ContributorRole::Supervisor))
        );
        assert_eq!(
            role_mapping(&Triple::new("creator", None, "x")),
            Some(RoleMapping::OrcidCandidate)
        );
        assert_eq!(role_mapping(&Triple::new("contributor", Some("department"), "x")), None);
    }

    #[test]
    fn test_resolve_reorders_and_sequences() {
        let resolved = resolve(vec![
            Triple::new("contributor", Some("author"), "Nordmann, Ola"),
            Triple::new("contributor", Some("author"), "Kari Hansen"),
            Triple::new("contributor", Some("advisor"), "Berg, Per"),
            Triple::new("contributor", Some("author"), "  "),
        ]);
        let names: Vec<&str> = resolved
            .contributors
            .iter()
            .map(|c| c.identity.name.as_str())
            .collect();
        assert_eq!(names, vec!["Ola Nordmann", "Kari Hansen", "Per Berg"]);
        let sequences: Vec<u32> = resolved.contributors.iter().map(|c| c.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3]);
        assert_eq!(resolved.contributors[2].role, ContributorRole::Supervisor);
        assert_eq!(resolved.contributors[2].source_role.as_deref(), Some("advisor"));
    }

    #[test]
    fn test_duplicate_name_and_role_collapsed() {
        let resolved = resolve(vec![
            Triple::new("contributor", Some("author"), "Nordmann, Ola"),
            Triple::new("creator", Some("author"), "Ola Nordmann"),
            Triple::new("contributor", Some("editor"), "Ola Nordmann"),
        ]);
        assert_eq!(resolved.contributors.len(), 2);
    }

    #[test]
    fn test_singleton_orcid_attached() {
        let resolved = resolve(vec![
            Triple::new("contributor", Some("author"), "Nordmann, Ola"),
            Triple::new("contributor", Some("orcid"), ORCID),
        ]);
        assert_eq!(
            resolved.contributors[0].identity.orcid.as_deref(),
            Some("https://orcid.org/0000-0002-1825-0097")
        );
    }

    #[test]
    fn test_orcid_not_attached_with_two_contributors() {
        let resolved = resolve(vec![
            Triple::new("contributor", Some("author"), "Nordmann, Ola"),
            Triple::new("contributor", Some("author"), "Hansen, Kari"),
            Triple::new("creator", None, ORCID),
        ]);
        assert!(resolved.contributors.iter().all(|c| c.identity.orcid.is_none()));
    }

    #[test]
    fn test_orcid_not_attached_with_two_orcids() {
        let resolved = resolve(vec![
            Triple::new("contributor", Some("author"), "Nordmann, Ola"),
            Triple::new("contributor", Some("orcid"), ORCID),
            Triple::new("contributor", Some("orcid"), "0000-0001-5109-3700"),
        ]);
        assert_eq!(resolved.orcids.len(), 2);
        assert!(resolved.contributors[0].identity.orcid.is_none());
    }

    #[test]
    fn test_same_orcid_in_two_forms_counts_once() {
        let resolved = resolve(vec![
            Triple::new("contributor", Some("author"), "Nordmann, Ola"),
            Triple::new("contributor", Some("orcid"), ORCID),
            Triple::new("creator", None, "https://orcid.org/0000-0002-1825-0097"),
        ]);
        assert_eq!(resolved.orcids.len(), 1);
        assert!(resolved.contributors[0].identity.orcid.is_some());
    }

    #[test]
    fn test_override_merge() {
        let overrides = ContributorOverrides::from_entries(vec![ContributorOverride {
            name: "Ola Nordmann".to_string(),
            identifier: Some("12345".to_string()),
            affiliation: Some("11250/100".to_string()),
        }]);
        let affiliations = AffiliationRegistry::from_entries(vec![(
            "11250/100".to_string(),
            "194.63.10.0".to_string(),
        )]);
        let store = TripleStore::new(vec![Triple::new("contributor", Some("author"), "Nordmann, Ola")]);
        let resolved = ContributorResolver::new(&overrides, &affiliations).resolve(&store);

        let contributor = &resolved.contributors[0];
        assert_eq!(contributor.identity.external_identifier.as_deref(), Some("12345"));
        assert!(contributor
            .affiliations
            .contains(&Affiliation::new("194.63.10.0")));
    }

    #[test]
    fn test_all_contributor_triples_consumed() {
        let store = TripleStore::new(vec![
            Triple::new("contributor", Some("author"), "Nordmann, Ola"),
            Triple::new("creator", None, ORCID),
            Triple::new("contributor", Some("department"), "Biology"),
        ]);
        let overrides = ContributorOverrides::default();
        let affiliations = AffiliationRegistry::default();
        ContributorResolver::new(&overrides, &affiliations).resolve(&store);
        let unconsumed = store.unconsumed(|_| false);
        assert_eq!(unconsumed.len(), 1);
        assert!(unconsumed[0].is("contributor", Some("department")));
    }
}
