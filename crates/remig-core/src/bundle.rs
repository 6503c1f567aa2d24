//! Bundle reader
//!
//! A bundle is one directory of the legacy export:
//! - `dublin_core.xml`: `<dcvalue element=".." qualifier="..">value</dcvalue>` entries
//! - `contents`: one content file per line, `filename\tbundle:NAME`
//! - `handle`: the bundle's persistent handle (`prefix/suffix`)
//!
//! Archive extraction happens before this point; the reader only sees plain
//! directories.

use std::fs;
use std::path::{Path, PathBuf};

use quick_xml::events::Event;
use quick_xml::Reader;

use remig_domain::{BundleType, ContentFile, Triple};
use remig_identifiers::{parse_handle, HandleError};

use crate::error::BundleError;
use crate::store::fields;

const DUBLIN_CORE_FILE: &str = "dublin_core.xml";
const CONTENTS_FILE: &str = "contents";
const HANDLE_FILE: &str = "handle";

/// Raw content of one bundle directory
#[derive(Debug, Clone)]
pub struct BundleSource {
    pub path: PathBuf,
    pub dublin_core: String,
    pub contents: Option<String>,
    pub handle: Option<String>,
}

impl BundleSource {
    /// Read a bundle directory. Only `dublin_core.xml` is required.
    pub fn from_dir(dir: &Path) -> Result<Self, BundleError> {
        let metadata_path = dir.join(DUBLIN_CORE_FILE);
        if !metadata_path.is_file() {
            return Err(BundleError::MissingMetadata(dir.display().to_string()));
        }

        Ok(Self {
            path: dir.to_path_buf(),
            dublin_core: read_file(&metadata_path)?,
            contents: read_optional(&dir.join(CONTENTS_FILE))?,
            handle: read_optional(&dir.join(HANDLE_FILE))?,
        })
    }

    /// Build a source from in-memory parts
    pub fn from_parts(path: impl Into<PathBuf>, dublin_core: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            dublin_core: dublin_core.into(),
            contents: None,
            handle: None,
        }
    }

    /// Builder method to set the `contents` listing
    pub fn with_contents(mut self, contents: impl Into<String>) -> Self {
        self.contents = Some(contents.into());
        self
    }

    /// Builder method to set the `handle` file content
    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.handle = Some(handle.into());
        self
    }

    pub fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

fn read_file(path: &Path) -> Result<String, BundleError> {
    fs::read_to_string(path).map_err(|source| BundleError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn read_optional(path: &Path) -> Result<Option<String>, BundleError> {
    if path.is_file() {
        read_file(path).map(Some)
    } else {
        Ok(None)
    }
}

/// Parse `dublin_core.xml` into triples, in document order
pub fn parse_dublin_core(xml: &str) -> Result<Vec<Triple>, BundleError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut triples = Vec::new();
    let mut buf = Vec::new();
    let mut current: Option<(String, Option<String>)> = None;
    let mut text = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"dcvalue" => {
                let mut element = None;
                let mut qualifier = None;
                for attr in e.attributes().flatten() {
                    let value = attr
                        .unescape_value()
                        .map(|v| v.trim().to_string())
                        .unwrap_or_default();
                    match attr.key.as_ref() {
                        b"element" => element = Some(value),
                        b"qualifier" => qualifier = Some(value),
                        _ => {}
                    }
                }
                let qualifier = qualifier.filter(|q| !q.is_empty() && q != "none");
                current = element.map(|element| (element, qualifier));
                text.clear();
            }
            Ok(Event::Text(e)) if current.is_some() => {
                text.push_str(&e.unescape().unwrap_or_default());
            }
            Ok(Event::CData(e)) if current.is_some() => {
                text.push_str(&String::from_utf8_lossy(&e.into_inner()));
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"dcvalue" => {
                if let Some((element, qualifier)) = current.take() {
                    let value = text.trim();
                    if !value.is_empty() {
                        triples.push(Triple::new(element, qualifier.as_deref(), value));
                    }
                }
                text.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(BundleError::Xml(format!("XML parse error: {}", e))),
            _ => {}
        }
        buf.clear();
    }

    Ok(triples)
}

/// Parse a `contents` listing into content files
pub fn parse_contents(text: &str) -> Vec<ContentFile> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut columns = line.split('\t');
            let filename = columns.next().unwrap_or_default().trim();
            let mut bundle = BundleType::Original;
            let mut description = None;
            for column in columns {
                if let Some(name) = column.strip_prefix("bundle:") {
                    bundle = BundleType::from_name(name);
                } else if let Some(text) = column.strip_prefix("description:") {
                    let text = text.trim();
                    if !text.is_empty() {
                        description = Some(text.to_string());
                    }
                }
            }
            let mut file = ContentFile::new(filename, bundle);
            file.description = description;
            file
        })
        .filter(|file| !file.filename.is_empty())
        .collect()
}

/// Resolve the bundle's handle: the `handle` file first, then `identifier.uri`.
pub fn resolve_handle(handle_file: Option<&str>, triples: &[Triple]) -> Result<String, HandleError> {
    if let Some(content) = handle_file {
        if !content.trim().is_empty() {
            return parse_handle(content);
        }
    }

    triples
        .iter()
        .filter(|t| fields::URI.matches(t))
        .find_map(|t| parse_handle(&t.value).ok())
        .ok_or(HandleError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8" standalone="no"?>
<dublin_core schema="dc">
  <dcvalue element="title" qualifier="none">Fish &amp; Chips</dcvalue>
  <dcvalue element="date" qualifier="issued">2019-05-01</dcvalue>
  <dcvalue element="contributor" qualifier="author">Nordmann, Ola</dcvalue>
  <dcvalue element="subject">  salmon  </dcvalue>
  <dcvalue element="description" qualifier="abstract"></dcvalue>
  <dcvalue element="identifier" qualifier="uri">https://hdl.handle.net/11250/2455</dcvalue>
</dublin_core>"#;

    #[test]
    fn test_parse_dublin_core() {
        let triples = parse_dublin_core(SAMPLE).unwrap();
        assert_eq!(triples.len(), 5);
        assert!(triples[0].is("title", None));
        assert_eq!(triples[0].value, "Fish & Chips");
        assert!(triples[1].is("date", Some("issued")));
        assert_eq!(triples[3].value, "salmon");
        assert!(triples[3].is("subject", None));
    }

    #[test]
    fn test_parse_dublin_core_malformed() {
        let result = parse_dublin_core("<dublin_core><dcvalue element=\"title\">x</other></dublin_core>");
        assert!(matches!(result, Err(BundleError::Xml(_))));
    }

    #[test]
    fn test_parse_contents() {
        let files = parse_contents(
            "report.pdf\tbundle:ORIGINAL\tdescription:Main text\nlicense.txt\tbundle:LICENSE\nreport.pdf.txt\tbundle:TEXT\nloose.pdf\n\n",
        );
        assert_eq!(files.len(), 4);
        assert_eq!(files[0].bundle, BundleType::Original);
        assert_eq!(files[0].description.as_deref(), Some("Main text"));
        assert_eq!(files[1].bundle, BundleType::License);
        assert_eq!(files[2].bundle, BundleType::Text);
        assert_eq!(files[3].bundle, BundleType::Original);
    }

    #[test]
    fn test_resolve_handle_prefers_handle_file() {
        let triples = parse_dublin_core(SAMPLE).unwrap();
        assert_eq!(
            resolve_handle(Some("11250/99\n"), &triples),
            Ok("https://hdl.handle.net/11250/99".to_string())
        );
        assert_eq!(
            resolve_handle(None, &triples),
            Ok("https://hdl.handle.net/11250/2455".to_string())
        );
    }

    #[test]
    fn test_resolve_handle_missing() {
        let triples = vec![Triple::new("title", None, "No handle")];
        assert_eq!(resolve_handle(None, &triples), Err(HandleError::NotFound));
        assert_eq!(resolve_handle(Some("  "), &triples), Err(HandleError::NotFound));
    }
}
