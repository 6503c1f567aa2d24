//! Read-only lookup tables shared by all bundle workers
//!
//! Every table is loaded once before processing starts and never changes
//! afterwards, so workers read them concurrently without locking.
//!
//! - [`ChannelRegistry`]: journals, publishers and series by ISSN or title
//! - [`CustomerRegistry`]: customer -> environment -> organization id
//! - [`ContributorOverrides`]: canonical contributor identities by name
//! - [`AffiliationRegistry`]: affiliation handle -> organization id

mod affiliation;
mod channel;
mod contributor_override;
mod customer;

pub use affiliation::AffiliationRegistry;
pub use channel::{ChannelEntry, ChannelMatch, ChannelRegistry};
pub use contributor_override::{ContributorOverride, ContributorOverrides};
pub use customer::CustomerRegistry;

use std::fs;
use std::path::Path;

use crate::error::RegistryError;

/// Delimiter of every CSV lookup table
pub const TABLE_DELIMITER: u8 = b';';

/// Read a table file into memory
pub fn read_table(path: &Path) -> Result<String, RegistryError> {
    fs::read_to_string(path).map_err(|source| RegistryError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Semicolon-separated CSV reader over in-memory content
pub(crate) fn csv_reader(content: &str, has_headers: bool) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .delimiter(TABLE_DELIMITER)
        .has_headers(has_headers)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes())
}

/// Rows of a headerless-or-headed table, header row dropped when its first
/// column equals `first_header` (case-insensitive)
pub(crate) fn csv_rows(
    content: &str,
    table: &str,
    first_header: &str,
) -> Result<Vec<csv::StringRecord>, RegistryError> {
    let mut rows = Vec::new();
    for (index, result) in csv_reader(content, false).records().enumerate() {
        let record = result.map_err(|source| RegistryError::Csv {
            table: table.to_string(),
            source,
        })?;
        let first = record.get(0).unwrap_or_default();
        if index == 0 && first.eq_ignore_ascii_case(first_header) {
            continue;
        }
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows.push(record);
    }
    Ok(rows)
}

/// A column value, `None` when missing or blank
pub(crate) fn column(record: &csv::StringRecord, index: usize) -> Option<String> {
    record
        .get(index)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
