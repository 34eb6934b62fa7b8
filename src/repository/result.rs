//! Operation outcomes.

use crate::store::Document;

/// Outcome of a repository operation
#[derive(Debug, Clone, PartialEq)]
pub enum OperationResult<T = Document> {
    /// The operation succeeded and produced a value
    Found(T),
    /// No document has the requested identifier
    NotFound,
    /// Malformed identifier or payload
    Invalid(String),
    /// The backing store failed
    StorageFailure(String),
}

impl<T> OperationResult<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, OperationResult::Found(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, OperationResult::NotFound)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, OperationResult::Invalid(_))
    }

    pub fn is_storage_failure(&self) -> bool {
        matches!(self, OperationResult::StorageFailure(_))
    }

    /// The produced value, if any
    pub fn found(self) -> Option<T> {
        match self {
            OperationResult::Found(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> From<Option<T>> for OperationResult<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => OperationResult::Found(value),
            None => OperationResult::NotFound,
        }
    }
}
