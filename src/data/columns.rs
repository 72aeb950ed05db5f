//! Column Resolver
//! Maps whatever header spellings a CSV uses onto the canonical fields.

use super::model::CanonicalField;
use serde::Serialize;
use std::collections::BTreeMap;

/// Canonical field → source header (or absent).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    sources: BTreeMap<CanonicalField, Option<String>>,
}

impl ColumnMapping {
    /// Resolve every canonical field against the given headers.
    ///
    /// Spellings are tried in their listed order and, for each spelling, the
    /// headers in file order. Comparison ignores case and surrounding
    /// whitespace. The first hit wins.
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Self {
        let sources = CanonicalField::ALL
            .iter()
            .map(|&field| (field, find_header(field.variants(), headers)))
            .collect();
        Self { sources }
    }

    /// Header backing `field`, if one was found.
    pub fn source(&self, field: CanonicalField) -> Option<&str> {
        self.sources.get(&field).and_then(|s| s.as_deref())
    }

    /// All fields in resolution order, for display.
    pub fn entries(&self) -> impl Iterator<Item = (CanonicalField, Option<&str>)> + '_ {
        CanonicalField::ALL
            .iter()
            .map(move |&field| (field, self.source(field)))
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

fn find_header<S: AsRef<str>>(variants: &[&str], headers: &[S]) -> Option<String> {
    variants.iter().find_map(|variant| {
        let wanted = normalize(variant);
        headers
            .iter()
            .map(AsRef::as_ref)
            .find(|header| normalize(header) == wanted)
            .map(str::to_string)
    })
}
