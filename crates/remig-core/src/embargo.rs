//! Embargo table and matcher
//!
//! The table is a text export with three columns after the header and footer
//! noise are stripped: `handle | filename | date`. Both `|` and `;` work as
//! separators, so database dumps and CSV exports load the same way.
//!
//! The table is shared read-only between workers. Matching only flips the
//! atomic `matched` flag of an [`Embargo`].

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::{debug, warn};

use remig_domain::{ContentFile, Embargo};
use remig_identifiers::handle_path;

use crate::error::RegistryError;
use crate::registry::read_table;

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

/// Embargoes grouped by handle
#[derive(Debug, Default)]
pub struct EmbargoTable {
    by_handle: BTreeMap<String, Vec<Embargo>>,
}

fn key(handle: &str) -> String {
    handle_path(handle).unwrap_or_else(|| handle.trim().to_string())
}

/// Parse an expiry date or timestamp as UTC
pub fn parse_expiry(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(instant.with_timezone(&Utc));
    }
    if let Some(instant) = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
    {
        return Some(instant.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

fn is_noise(line: &str) -> bool {
    line.is_empty()
        || line.chars().all(|c| matches!(c, '-' | '+' | '='))
        || (line.starts_with('(') && line.ends_with(')'))
}

impl EmbargoTable {
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        Ok(Self::parse(&read_table(path)?))
    }

    /// Parse the text export. Rows that do not fit are logged and skipped.
    pub fn parse(content: &str) -> Self {
        let mut embargoes = Vec::new();

        for (number, line) in content.lines().enumerate() {
            let line = line.trim();
            if is_noise(line) {
                continue;
            }

            let separator = if line.contains('|') { '|' } else { ';' };
            let columns: Vec<&str> = line.split(separator).map(str::trim).collect();
            if columns.len() != 3 {
                warn!("embargo line {}: expected 3 columns, got {}", number + 1, columns.len());
                continue;
            }
            if columns[0].eq_ignore_ascii_case("handle") {
                continue;
            }

            match parse_expiry(columns[2]) {
                Some(expiry) => embargoes.push(Embargo::new(key(columns[0]), columns[1], expiry)),
                None => warn!("embargo line {}: unreadable date '{}'", number + 1, columns[2]),
            }
        }

        Self::from_embargoes(embargoes)
    }

    pub fn from_embargoes(embargoes: Vec<Embargo>) -> Self {
        let mut by_handle: BTreeMap<String, Vec<Embargo>> = BTreeMap::new();
        for embargo in embargoes {
            by_handle.entry(key(&embargo.handle)).or_default().push(embargo);
        }
        Self { by_handle }
    }

    pub fn len(&self) -> usize {
        self.by_handle.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_handle.is_empty()
    }

    pub fn embargoes_for(&self, handle: &str) -> &[Embargo] {
        self.by_handle
            .get(&key(handle))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Set embargo dates on the files of one record.
    ///
    /// Each file takes the first embargo with the same filename. Returns
    /// whether any file was embargoed.
    pub fn attach(&self, handle: &str, files: &mut [ContentFile]) -> bool {
        let embargoes = self.embargoes_for(handle);
        if embargoes.is_empty() {
            return false;
        }

        let mut attached = false;
        for file in files.iter_mut() {
            if let Some(embargo) = embargoes.iter().find(|e| e.filename == file.filename) {
                debug!("embargo until {} on {}", embargo.expiry, file.filename);
                file.embargo_date = Some(embargo.expiry);
                embargo.mark_matched();
                attached = true;
            }
        }
        attached
    }

    /// Document embargoes no content file picked up, ordered by handle
    pub fn orphans(&self) -> Vec<&Embargo> {
        self.by_handle
            .values()
            .flatten()
            .filter(|e| !e.is_matched() && !e.is_generated_artifact())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use remig_domain::BundleType;

    const EXPORT: &str = "
 handle      | filename        | date
-------------+-----------------+------------
 11250/2455  | report.pdf      | 2025-01-01
 11250/2455  | report.pdf.txt  | 2025-01-01
 11250/9999  | thesis.pdf      | 2030-06-30 12:00:00
 broken line
 11250/1     | x.pdf           | someday
(4 rows)
";

    #[test]
    fn test_parse_export() {
        let table = EmbargoTable::parse(EXPORT);
        assert_eq!(table.len(), 3);
        assert_eq!(table.embargoes_for("https://hdl.handle.net/11250/2455").len(), 2);
        assert_eq!(
            table.embargoes_for("11250/9999")[0].expiry,
            Utc.with_ymd_and_hms(2030, 6, 30, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_semicolon_export() {
        let table = EmbargoTable::parse("handle;filename;date\n11250/5;a.pdf;2024-12-24\n");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_attach_by_filename() {
        let table = EmbargoTable::parse(EXPORT);
        let mut files = vec![
            ContentFile::new("report.pdf", BundleType::Original),
            ContentFile::new("appendix.pdf", BundleType::Original),
        ];

        assert!(table.attach("https://hdl.handle.net/11250/2455", &mut files));
        assert_eq!(
            files[0].embargo_date,
            Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(files[1].embargo_date, None);

        let embargoes = table.embargoes_for("11250/2455");
        assert!(embargoes[0].is_matched());
        assert!(!embargoes[1].is_matched());
    }

    #[test]
    fn test_orphans_skip_generated_artifacts() {
        let table = EmbargoTable::parse(EXPORT);
        let mut files = vec![ContentFile::new("report.pdf", BundleType::Original)];
        table.attach("11250/2455", &mut files);

        let orphans: Vec<&str> = table.orphans().iter().map(|e| e.filename.as_str()).collect();
        assert_eq!(orphans, vec!["thesis.pdf"]);
    }

    #[test]
    fn test_unknown_handle() {
        let table = EmbargoTable::parse(EXPORT);
        let mut files = vec![ContentFile::new("report.pdf", BundleType::Original)];
        assert!(!table.attach("11250/1234", &mut files));
        assert_eq!(files[0].embargo_date, None);
    }
}
