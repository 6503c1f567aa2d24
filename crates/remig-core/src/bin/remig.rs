//! remig - migrate a directory of repository bundles
//!
//! Reads its settings from the environment:
//! - `REMIG_CONFIG`: migration configuration (TOML)
//! - `REMIG_INPUT`: directory with one subdirectory per bundle
//! - `REMIG_OUTPUT`: directory for `<handle>.json` and `<handle>.rejected.json`

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use remig_core::{
    BundleOutcome, BundleSource, ConfigError, MigrationConfig, MigrationContext, MigrationRunner,
};

fn env_path(name: &str) -> Result<PathBuf, ConfigError> {
    std::env::var(name)
        .map(PathBuf::from)
        .map_err(|_| ConfigError::MissingVariable(name.to_string()))
}

/// Every subdirectory of the input directory, sorted by name
fn read_bundles(input: &Path) -> Result<Vec<BundleSource>, Box<dyn std::error::Error>> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(input)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();

    let mut bundles = Vec::with_capacity(dirs.len());
    for dir in dirs {
        match BundleSource::from_dir(&dir) {
            Ok(bundle) => bundles.push(bundle),
            Err(e) => error!("skipping {}: {}", dir.display(), e),
        }
    }
    Ok(bundles)
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), Box<dyn std::error::Error>> {
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = env_path("REMIG_CONFIG")?;
    let input = env_path("REMIG_INPUT")?;
    let output = env_path("REMIG_OUTPUT")?;

    let config = MigrationConfig::load(&config_path)?;
    let context = MigrationContext::load(config)?;
    let bundles = read_bundles(&input)?;

    fs::create_dir_all(&output)?;
    let report = MigrationRunner::new(&context).run(bundles);

    for outcome in &report.outcomes {
        match outcome {
            BundleOutcome::Accepted(assembled) => {
                let suffix = assembled.location.handle_suffix();
                write_json(&output.join(format!("{}.json", suffix)), &assembled.record)?;
            }
            BundleOutcome::Rejected(rejected) => {
                let suffix = rejected.location.handle_suffix();
                write_json(&output.join(format!("{}.rejected.json", suffix)), rejected)?;
            }
            BundleOutcome::Failed { .. } => {}
        }
    }

    info!(
        "wrote {} records and {} rejections to {}",
        report.summary.accepted,
        report.summary.rejected,
        output.display()
    );
    Ok(())
}
