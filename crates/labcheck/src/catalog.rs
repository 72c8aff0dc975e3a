//! Named collections of worksheet documents
//!
//! A [`WorksheetCatalog`] is the menu an application offers: each entry pairs
//! a stable id and display metadata with the worksheet document itself, kept
//! as text so loading needs no further IO.

use labcheck_core::Worksheet;
use labcheck_csv::{LoadError, WorksheetReader};
use serde::{Deserialize, Serialize};

/// One offered worksheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stable identifier, for example "titration"
    pub id: String,
    /// Display name
    pub name: String,
    /// One-line description
    pub description: String,
    /// The worksheet document text
    pub source: String,
}

impl CatalogEntry {
    pub fn new<I, N, D, S>(id: I, name: N, description: D, source: S) -> Self
    where
        I: Into<String>,
        N: Into<String>,
        D: Into<String>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            source: source.into(),
        }
    }

    /// Parse this entry's document into a worksheet
    pub fn load(&self) -> Result<Worksheet, LoadError> {
        WorksheetReader::read_str(&self.source)
    }
}

/// An ordered collection of worksheet documents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorksheetCatalog {
    entries: Vec<CatalogEntry>,
}

impl WorksheetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry at the end
    pub fn push(&mut self, entry: CatalogEntry) {
        self.entries.push(entry);
    }

    /// Look an entry up by id
    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// The entry offered when the caller names none: the first one
    pub fn default_entry(&self) -> Option<&CatalogEntry> {
        self.entries.first()
    }

    /// Iterate over entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<CatalogEntry> for WorksheetCatalog {
    fn from_iter<T: IntoIterator<Item = CatalogEntry>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
