//! Embargoes on content files

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};

/// A time-bounded access restriction on one file of one bundle.
///
/// Embargoes live in a table shared read-only between workers; `matched`
/// is the only mutable part and only ever goes from `false` to `true`.
#[derive(Debug)]
pub struct Embargo {
    pub handle: String,
    pub filename: String,
    pub expiry: DateTime<Utc>,
    matched: AtomicBool,
}

impl Embargo {
    pub fn new(handle: impl Into<String>, filename: impl Into<String>, expiry: DateTime<Utc>) -> Self {
        Self {
            handle: handle.into(),
            filename: filename.into(),
            expiry,
            matched: AtomicBool::new(false),
        }
    }

    /// Whether a content file has been matched to this embargo
    pub fn is_matched(&self) -> bool {
        self.matched.load(Ordering::Acquire)
    }

    /// Record that a content file picked up this embargo
    pub fn mark_matched(&self) {
        self.matched.store(true, Ordering::Release);
    }

    /// Generated derivatives (`x.pdf.txt`, `x.pdf.jpg`) rather than documents
    pub fn is_generated_artifact(&self) -> bool {
        is_generated_artifact(&self.filename)
    }
}

/// True for text-extraction and thumbnail files derived from another file
pub fn is_generated_artifact(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    let mut parts = lower.rsplit('.');
    let last = parts.next().unwrap_or_default();
    let has_inner_extension = parts.next().is_some() && parts.next().is_some();
    has_inner_extension && matches!(last, "txt" | "jpg")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_matched_flag_is_monotonic() {
        let expiry = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let embargo = Embargo::new("11250/1", "report.pdf", expiry);
        assert!(!embargo.is_matched());
        embargo.mark_matched();
        embargo.mark_matched();
        assert!(embargo.is_matched());
    }

    #[test]
    fn test_generated_artifacts() {
        assert!(is_generated_artifact("report.pdf.txt"));
        assert!(is_generated_artifact("report.pdf.jpg"));
        assert!(!is_generated_artifact("report.pdf"));
        assert!(!is_generated_artifact("notes.txt"));
        assert!(!is_generated_artifact("photo.jpg"));
    }
}
