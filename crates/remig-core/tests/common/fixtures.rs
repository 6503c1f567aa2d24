//! Test fixture loading utilities

use std::path::PathBuf;

use remig_core::{BundleSource, MigrationConfig, MigrationContext};

/// Get the path to a fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

/// Load a fixture file as a string
#[allow(dead_code)]
pub fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", name))
}

/// Read a bundle directory fixture
#[allow(dead_code)]
pub fn load_bundle(name: &str) -> BundleSource {
    BundleSource::from_dir(&fixture_path(&format!("bundles/{}", name)))
        .unwrap_or_else(|e| panic!("Failed to load bundle {}: {}", name, e))
}

/// Context built from `test_fixtures/config.toml`
#[allow(dead_code)]
pub fn fixture_context() -> MigrationContext {
    let config = MigrationConfig::load(&fixture_path("config.toml")).expect("fixture config");
    MigrationContext::load(config).expect("fixture tables")
}

/// Wrap `dcvalue` elements into a `dublin_core.xml` document
#[allow(dead_code)]
pub fn dublin_core(values: &[(&str, Option<&str>, &str)]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<dublin_core schema=\"dc\">\n");
    for (element, qualifier, value) in values {
        xml.push_str(&format!(
            "  <dcvalue element=\"{}\" qualifier=\"{}\">{}</dcvalue>\n",
            element,
            qualifier.unwrap_or("none"),
            value
        ));
    }
    xml.push_str("</dublin_core>\n");
    xml
}

/// In-memory bundle with a handle and the given values
#[allow(dead_code)]
pub fn bundle(handle: &str, values: &[(&str, Option<&str>, &str)]) -> BundleSource {
    BundleSource::from_parts(format!("memory/{}", handle), dublin_core(values)).with_handle(handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_path() {
        let path = fixture_path("config.toml");
        assert!(path.to_string_lossy().contains("test_fixtures"));
    }

    #[test]
    fn test_dublin_core_builder() {
        let xml = dublin_core(&[("title", None, "A"), ("date", Some("issued"), "2020")]);
        assert!(xml.contains("<dcvalue element=\"title\" qualifier=\"none\">A</dcvalue>"));
        assert!(xml.contains("qualifier=\"issued\""));
    }
}
