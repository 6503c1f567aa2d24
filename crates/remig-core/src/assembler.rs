//! Record assembler
//!
//! Drives one bundle through `Parsing -> Validating -> Accepted | Rejected`.
//! The assembler is the only place where a non-empty error list turns into a
//! rejection. Every other component hands back data.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, info_span, warn};

use remig_domain::{
    AdditionalIdentifier, BundleLocation, Channel, ContentBundle, ContentFile, EntityDescription,
    ErrorDetails, PublicationContext, PublicationMetadata, PublicationType, Record, WarningDetails,
};
use remig_identifiers::HandleError;

use crate::bundle::{parse_contents, parse_dublin_core, resolve_handle, BundleSource};
use crate::context::MigrationContext;
use crate::contributors::ContributorResolver;
use crate::dates::infer_first;
use crate::error::BundleError;
use crate::extract::ExtractedFields;
use crate::registry::ChannelMatch;
use crate::store::{fields, ignore_list, TripleStore};
use crate::validator::{ValidationInput, ValidationReport, Validator};

/// Source name of the handle in a record's additional identifiers
pub const HANDLE_SOURCE: &str = "handle";

/// Where a bundle is in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyState {
    Parsing,
    Validating,
    Accepted,
    Rejected,
}

impl fmt::Display for AssemblyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssemblyState::Parsing => "parsing",
            AssemblyState::Validating => "validating",
            AssemblyState::Accepted => "accepted",
            AssemblyState::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// A bundle that failed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedBundle {
    pub location: BundleLocation,
    pub errors: Vec<ErrorDetails>,
    pub warnings: Vec<WarningDetails>,
}

impl fmt::Display for RejectedBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<&str> = self.errors.iter().map(|e| e.code.as_str()).collect();
        write!(f, "{} rejected: {}", self.location, codes.join(", "))
    }
}

/// Why a bundle produced no record
#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("{0}")]
    Rejected(Box<RejectedBundle>),

    #[error("no handle for bundle {path}: {source}")]
    MissingHandle {
        path: String,
        #[source]
        source: HandleError,
    },

    #[error("unreadable bundle {path}: {source}")]
    Bundle {
        path: String,
        #[source]
        source: BundleError,
    },
}

/// An accepted record and the source fields nothing used
#[derive(Debug, Clone)]
pub struct Assembled {
    pub record: Record,
    pub location: BundleLocation,
    /// `element.qualifier` names of unconsumed, non-ignored triples
    pub unmapped_fields: Vec<String>,
}

/// Channel lookups of one bundle
#[derive(Debug, Default)]
struct ChannelLookups {
    journal: Option<ChannelMatch>,
    publisher: Option<ChannelMatch>,
    series: Option<ChannelMatch>,
}

/// Assembles records against a shared context
pub struct RecordAssembler<'a> {
    context: &'a MigrationContext,
}

impl<'a> RecordAssembler<'a> {
    pub fn new(context: &'a MigrationContext) -> Self {
        Self { context }
    }

    /// Turn one bundle into a record or a classified failure
    pub fn assemble(&self, source: &BundleSource) -> Result<Assembled, AssemblyError> {
        let path = source.display_path();
        let triples = parse_dublin_core(&source.dublin_core).map_err(|source| {
            AssemblyError::Bundle {
                path: path.clone(),
                source,
            }
        })?;
        let handle = resolve_handle(source.handle.as_deref(), &triples).map_err(|source| {
            AssemblyError::MissingHandle {
                path: path.clone(),
                source,
            }
        })?;

        let span = info_span!("bundle", handle = %handle);
        let _guard = span.enter();

        let store = TripleStore::new(triples);
        let title = store.values(fields::TITLE).first().map(|t| t.to_string());
        let location = BundleLocation::new(path, title, handle);
        self.assemble_store(&store, location, source.contents.as_deref())
    }

    /// Run the state machine over an already parsed store
    pub fn assemble_store(
        &self,
        store: &TripleStore,
        location: BundleLocation,
        contents: Option<&str>,
    ) -> Result<Assembled, AssemblyError> {
        let context = self.context;
        let config = &context.config;
        let mut state = AssemblyState::Parsing;
        debug!("{}: {}", location, state);

        let fields = ExtractedFields::extract(store, &config.external_identifier_qualifier);

        let type_labels = context.type_mapper.normalize(&fields.raw_types);
        let publication_type = context.type_mapper.map_normalized(&type_labels);
        let has_peer_review_marker = context.type_mapper.has_peer_review_marker(&type_labels);
        let publication_date = infer_first(&fields.date_values);

        let contributors = ContributorResolver::new(&context.overrides, &context.affiliations)
            .resolve(store)
            .contributors;

        let language = context.languages.resolve(&fields.languages);
        let lookups = self.lookup_channels(&fields, publication_type);

        let mut content_files = contents.map(parse_contents).unwrap_or_default();
        let has_documents = content_files.iter().any(ContentFile::is_document);
        // Rejected bundles match their embargoes too
        if context.embargoes.attach(&location.handle, &mut content_files) {
            debug!("embargo attached");
        }

        state = AssemblyState::Validating;
        debug!("{}: {}", location, state);

        let validator = match &context.doi_checker {
            Some(checker) => Validator::with_doi_checker(checker.as_ref()),
            None => Validator::offline(),
        };
        let ValidationReport { errors, warnings } = validator.validate(&ValidationInput {
            store,
            fields: &fields,
            external_qualifier: &config.external_identifier_qualifier,
            type_labels: &type_labels,
            publication_type,
            has_peer_review_marker,
            publication_date: publication_date.as_ref(),
            contributors: &contributors,
            language: &language,
            journal: lookups.journal.as_ref(),
            has_documents,
        });

        let unmapped_fields = self.unmapped_fields(store);

        let publication_type = match publication_type {
            Some(publication_type) if errors.is_empty() => publication_type,
            _ => {
                state = AssemblyState::Rejected;
                debug!("{}: {}", location, state);
                let rejected = RejectedBundle {
                    location,
                    errors,
                    warnings,
                };
                warn!("{}", rejected);
                return Err(AssemblyError::Rejected(Box::new(rejected)));
            }
        };

        let entity_description = EntityDescription {
            main_title: fields.main_title.clone(),
            alternative_titles: fields.alternative_titles.clone(),
            abstracts: fields.abstracts.clone(),
            descriptions: fields.descriptions.clone(),
            tags: fields.tags.clone(),
            contributors,
            publication_date,
            publication_instance: fields.instance.clone(),
            language: context.languages.code_for(&language).to_string(),
        };

        let publication = PublicationMetadata {
            publication_type,
            context: publication_context(&fields, &lookups),
            doi: fields.doi.clone(),
            rights_holder: fields.rights_holder.clone(),
        };

        let mut record = Record::new(
            location.handle.clone(),
            location.path.clone(),
            publication,
            entity_description,
        );
        record.owner = context.resource_owner();
        record
            .additional_identifiers
            .push(AdditionalIdentifier::new(HANDLE_SOURCE, location.handle.clone()));
        record.content_bundle = content_bundle(content_files, &fields);
        record.warnings = warnings;
        record.prioritized_fields = context
            .type_mapper
            .prioritized_fields(publication_type)
            .iter()
            .cloned()
            .collect();

        state = AssemblyState::Accepted;
        info!(
            "{}: {} as {} with {} warning(s)",
            location,
            state,
            publication_type,
            record.warnings.len()
        );
        if !unmapped_fields.is_empty() {
            info!("unmapped fields: {}", unmapped_fields.join(", "));
        }

        Ok(Assembled {
            record,
            location,
            unmapped_fields,
        })
    }

    fn lookup_channels(
        &self,
        fields: &ExtractedFields,
        publication_type: Option<PublicationType>,
    ) -> ChannelLookups {
        let context = self.context;
        let journal_shaped = publication_type
            .map(|t| context.type_mapper.is_journal_type(t))
            .unwrap_or(false);

        let journal = journal_shaped.then(|| {
            context
                .journals
                .lookup_journal(&fields.issns, fields.journal_title.as_deref())
        });
        let publisher = fields
            .publisher_name
            .as_deref()
            .map(|name| context.publishers.lookup_title(name));
        let series = fields
            .series_title
            .as_deref()
            .map(|title| context.journals.lookup_title(title));

        for (kind, lookup) in [("publisher", &publisher), ("series", &series)] {
            if let Some(ChannelMatch::Ambiguous(ids)) = lookup {
                debug!("{} title matches {} registry entries", kind, ids.len());
            }
        }

        ChannelLookups {
            journal,
            publisher,
            series,
        }
    }

    fn unmapped_fields(&self, store: &TripleStore) -> Vec<String> {
        let ignored = ignore_list(&self.context.config.diagnostics.ignored_fields);
        let mut names: Vec<String> = Vec::new();
        for triple in store.unconsumed(ignored) {
            let name = triple.field_name();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}

fn content_bundle(mut files: Vec<ContentFile>, fields: &ExtractedFields) -> ContentBundle {
    let version = fields.version.parsed().copied();
    let license = fields.license.parsed().cloned();
    for file in files.iter_mut().filter(|f| f.is_document()) {
        file.version = version;
        file.license = license.clone();
    }
    ContentBundle { files }
}

fn resolved_channel(name: Option<&String>, lookup: Option<&ChannelMatch>) -> Option<Channel> {
    if name.is_none() && lookup.is_none() {
        return None;
    }
    Some(Channel {
        id: lookup.and_then(ChannelMatch::identifier).map(str::to_string),
        name: name.cloned(),
    })
}

fn publication_context(fields: &ExtractedFields, lookups: &ChannelLookups) -> PublicationContext {
    PublicationContext {
        journal: resolved_channel(fields.journal_title.as_ref(), lookups.journal.as_ref()),
        publisher: resolved_channel(fields.publisher_name.as_ref(), lookups.publisher.as_ref()),
        series: resolved_channel(fields.series_title.as_ref(), lookups.series.as_ref()),
        series_number: fields.series_number.clone(),
        issns: fields.issns.clone(),
        isbns: fields.isbns.clone(),
    }
}
