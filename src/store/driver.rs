//! Storage driver capability
//!
//! The narrow set of primitives a collection handle must provide. Futures
//! are boxed so the trait stays object safe and the repository can hold an
//! `Arc<dyn StorageDriver>` chosen at startup.

use std::future::Future;
use std::pin::Pin;

use super::document::{Document, Payload};
use super::errors::DriverResult;
use super::filter::Filter;
use super::id::IdFormat;

/// Boxed future returned by driver operations
pub type DriverFuture<'a, T> = Pin<Box<dyn Future<Output = DriverResult<T>> + Send + 'a>>;

/// Options for find-and-modify updates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOptions {
    /// Return the document after the update instead of before it
    pub return_updated: bool,
}

impl UpdateOptions {
    pub fn returning_updated() -> Self {
        Self {
            return_updated: true,
        }
    }
}

/// Document collection handle
pub trait StorageDriver: Send + Sync {
    /// Identifier format the backing store enforces
    fn id_format(&self) -> IdFormat;

    /// All documents matching the filter, in storage-native order
    fn find<'a>(&'a self, filter: &'a Filter) -> DriverFuture<'a, Vec<Document>>;

    /// First document matching the filter
    fn find_one<'a>(&'a self, filter: &'a Filter) -> DriverFuture<'a, Option<Document>>;

    /// Insert a new document built from the payload
    fn insert(&self, payload: Payload) -> DriverFuture<'_, Document>;

    /// Merge the patch into the first matching document
    fn find_one_and_update<'a>(
        &'a self,
        filter: &'a Filter,
        patch: Payload,
        options: UpdateOptions,
    ) -> DriverFuture<'a, Option<Document>>;

    /// Remove the first matching document and return it
    fn find_one_and_delete<'a>(&'a self, filter: &'a Filter) -> DriverFuture<'a, Option<Document>>;
}
