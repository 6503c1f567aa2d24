//! Source bundle location

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a source bundle: where it was read from, its title and the
/// resolved handle URI. Built once before parsing and used only as context
/// for diagnostics.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BundleLocation {
    pub path: String,
    pub title: Option<String>,
    pub handle: String,
}

impl BundleLocation {
    pub fn new(path: impl Into<String>, title: Option<String>, handle: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title,
            handle: handle.into(),
        }
    }

    /// Last path segment of the handle (`https://hdl.handle.net/11250/42` -> `42`)
    pub fn handle_suffix(&self) -> &str {
        self.handle
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(&self.handle)
    }
}

impl fmt::Display for BundleLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.title {
            Some(title) => write!(f, "{} [{}] \"{}\"", self.path, self.handle, title),
            None => write!(f, "{} [{}]", self.path, self.handle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_suffix() {
        let location = BundleLocation::new("export/item_1", None, "https://hdl.handle.net/11250/2455");
        assert_eq!(location.handle_suffix(), "2455");
    }

    #[test]
    fn test_display_includes_title() {
        let location = BundleLocation::new(
            "export/item_1",
            Some("On Fjords".to_string()),
            "https://hdl.handle.net/11250/1",
        );
        assert_eq!(
            location.to_string(),
            "export/item_1 [https://hdl.handle.net/11250/1] \"On Fjords\""
        );
    }
}
