//! Parallel migration runner
//!
//! Bundles are independent: each rayon worker parses, assembles and validates
//! one bundle with its own triple store. The only shared mutable state is the
//! atomic counters in [`RunStats`] and the `matched` flags of the embargo
//! table.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{error, info, warn};

use remig_domain::Embargo;

use crate::assembler::{Assembled, AssemblyError, RecordAssembler, RejectedBundle};
use crate::bundle::BundleSource;
use crate::context::MigrationContext;

/// Counters shared by the workers
#[derive(Debug, Default)]
pub struct RunStats {
    accepted: AtomicUsize,
    rejected: AtomicUsize,
    failed: AtomicUsize,
    embargoed: AtomicUsize,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, outcome: &BundleOutcome) {
        match outcome {
            BundleOutcome::Accepted(assembled) => {
                self.accepted.fetch_add(1, Ordering::Relaxed);
                if assembled.record.content_bundle.is_embargoed() {
                    self.embargoed.fetch_add(1, Ordering::Relaxed);
                }
            }
            BundleOutcome::Rejected(_) => {
                self.rejected.fetch_add(1, Ordering::Relaxed);
            }
            BundleOutcome::Failed { .. } => {
                self.failed.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Copy the counters once all workers are done
    pub fn snapshot(&self) -> RunSummary {
        RunSummary {
            accepted: self.accepted.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            embargoed: self.embargoed.load(Ordering::Relaxed),
        }
    }
}

/// Final counts of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub accepted: usize,
    pub rejected: usize,
    pub failed: usize,
    /// Accepted records with at least one embargoed file
    pub embargoed: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.accepted + self.rejected + self.failed
    }
}

/// What happened to one bundle
#[derive(Debug)]
pub enum BundleOutcome {
    Accepted(Box<Assembled>),
    Rejected(Box<RejectedBundle>),
    /// No record and no validation: unreadable bundle or missing handle
    Failed { path: PathBuf, reason: String },
}

impl BundleOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, BundleOutcome::Accepted(_))
    }
}

/// An embargo no content file picked up
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrphanEmbargo {
    pub handle: String,
    pub filename: String,
}

impl From<&Embargo> for OrphanEmbargo {
    fn from(embargo: &Embargo) -> Self {
        Self {
            handle: embargo.handle.clone(),
            filename: embargo.filename.clone(),
        }
    }
}

/// Everything a run produced, in input order
#[derive(Debug)]
pub struct RunReport {
    pub outcomes: Vec<BundleOutcome>,
    pub summary: RunSummary,
    pub orphan_embargoes: Vec<OrphanEmbargo>,
}

pub struct MigrationRunner<'a> {
    context: &'a MigrationContext,
}

impl<'a> MigrationRunner<'a> {
    pub fn new(context: &'a MigrationContext) -> Self {
        Self { context }
    }

    /// Process every bundle in parallel and wait for all of them
    pub fn run(&self, bundles: Vec<BundleSource>) -> RunReport {
        let stats = RunStats::new();
        let assembler = RecordAssembler::new(self.context);
        info!("migrating {} bundles", bundles.len());

        let outcomes: Vec<BundleOutcome> = bundles
            .into_par_iter()
            .map(|source| {
                let outcome = process(&assembler, &source);
                stats.record(&outcome);
                outcome
            })
            .collect();

        let orphan_embargoes: Vec<OrphanEmbargo> = self
            .context
            .embargoes
            .orphans()
            .into_iter()
            .map(OrphanEmbargo::from)
            .collect();
        for orphan in &orphan_embargoes {
            warn!(
                "embargo declared but no matching file found: {} {}",
                orphan.handle, orphan.filename
            );
        }

        let summary = stats.snapshot();
        info!(
            "{} bundles: {} accepted ({} embargoed), {} rejected, {} failed",
            summary.total(),
            summary.accepted,
            summary.embargoed,
            summary.rejected,
            summary.failed
        );

        RunReport {
            outcomes,
            summary,
            orphan_embargoes,
        }
    }
}

fn process(assembler: &RecordAssembler<'_>, source: &BundleSource) -> BundleOutcome {
    match assembler.assemble(source) {
        Ok(assembled) => BundleOutcome::Accepted(Box::new(assembled)),
        Err(AssemblyError::Rejected(rejected)) => BundleOutcome::Rejected(rejected),
        Err(e) => {
            error!("{}", e);
            BundleOutcome::Failed {
                path: source.path.clone(),
                reason: e.to_string(),
            }
        }
    }
}
