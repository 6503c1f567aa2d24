//! Metadata triples from a bundle export

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;

/// One `(element, qualifier, value)` metadata fact.
///
/// A triple is immutable apart from its `consumed` flag, which flips from
/// `false` to `true` once an extractor has used the value. The flag never
/// flips back.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Triple {
    pub element: String,
    pub qualifier: Option<String>,
    pub value: String,
    #[serde(skip)]
    consumed: Cell<bool>,
}

impl Triple {
    /// Create a new, unconsumed triple
    pub fn new(element: impl Into<String>, qualifier: Option<&str>, value: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            qualifier: qualifier.map(str::to_string),
            value: value.into(),
            consumed: Cell::new(false),
        }
    }

    /// Whether an extractor has used this triple
    pub fn is_consumed(&self) -> bool {
        self.consumed.get()
    }

    /// Mark the triple as used. Idempotent.
    pub fn mark_consumed(&self) {
        self.consumed.set(true);
    }

    /// Check element and qualifier. `None` matches only unqualified triples.
    pub fn is(&self, element: &str, qualifier: Option<&str>) -> bool {
        self.element == element && self.qualifier.as_deref() == qualifier
    }

    /// Dotted field name, e.g. `date.issued` or `title`
    pub fn field_name(&self) -> String {
        match &self.qualifier {
            Some(qualifier) => format!("{}.{}", self.element, qualifier),
            None => self.element.clone(),
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {:?}", self.field_name(), self.value)
    }
}
