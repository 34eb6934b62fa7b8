//! Document filters understood by storage drivers.

use super::document::{Document, DocumentId};

/// Selection of documents within a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Every document
    All,
    /// The document with this identifier
    Id(DocumentId),
}

impl Filter {
    pub fn by_id(id: DocumentId) -> Self {
        Filter::Id(id)
    }

    /// Check whether a document matches this filter
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Id(id) => doc.id() == id,
        }
    }
}
