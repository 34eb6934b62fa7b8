//! In-process document store
//!
//! Holds named collections in memory behind a single async lock. Every
//! find-and-modify runs under one write guard, so it is atomic with respect
//! to every other operation on the store.
//!
//! The store can be switched offline to simulate an unreachable backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

use super::document::{Document, DocumentId, Payload, ID_FIELD};
use super::driver::{DriverFuture, StorageDriver, UpdateOptions};
use super::errors::{DriverError, DriverResult};
use super::filter::Filter;
use super::id::IdFormat;
use super::schema::{CollectionSchema, ValidationDetails};

/// Collection contents and its optional schema
#[derive(Debug, Default)]
struct CollectionState {
    schema: Option<CollectionSchema>,
    /// Documents in insertion order
    documents: Vec<Document>,
}

impl CollectionState {
    fn position(&self, filter: &Filter) -> Option<usize> {
        self.documents.iter().position(|doc| filter.matches(doc))
    }

    fn contains_id(&self, id: &DocumentId) -> bool {
        self.documents.iter().any(|doc| doc.id() == id)
    }

    /// Check unique fields of `candidate` against every other document
    fn check_unique(&self, candidate: &Document) -> DriverResult<()> {
        let Some(schema) = &self.schema else {
            return Ok(());
        };

        for field in schema.unique_fields() {
            let Some(value) = candidate.get(field) else {
                continue;
            };
            if value.is_null() {
                continue;
            }
            let clash = self
                .documents
                .iter()
                .filter(|doc| doc.id() != candidate.id())
                .any(|doc| doc.get(field) == Some(value));
            if clash {
                return Err(DriverError::Constraint(format!(
                    "duplicate key: {} = {}",
                    field, value
                )));
            }
        }
        Ok(())
    }
}

struct StoreInner {
    id_format: IdFormat,
    collections: RwLock<HashMap<String, CollectionState>>,
    online: AtomicBool,
}

/// In-memory document store shared by cloning
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<StoreInner>,
}

impl MemoryStore {
    pub fn new(id_format: IdFormat) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                id_format,
                collections: RwLock::new(HashMap::new()),
                online: AtomicBool::new(true),
            }),
        }
    }

    pub fn id_format(&self) -> IdFormat {
        self.inner.id_format
    }

    /// Create a collection or replace the schema of an existing one.
    ///
    /// Existing documents are kept and not re-validated.
    pub async fn define_collection(&self, name: &str, schema: Option<CollectionSchema>) {
        let mut collections = self.inner.collections.write().await;
        collections.entry(name.to_string()).or_default().schema = schema;
    }

    /// Handle to a single collection
    pub fn collection(&self, name: impl Into<String>) -> MemoryCollection {
        MemoryCollection {
            store: self.clone(),
            name: name.into(),
        }
    }

    /// Bring the store online or take it offline
    pub fn set_online(&self, online: bool) {
        self.inner.online.store(online, Ordering::SeqCst);
    }

    pub fn is_online(&self) -> bool {
        self.inner.online.load(Ordering::SeqCst)
    }

    fn ensure_online(&self) -> DriverResult<()> {
        if self.is_online() {
            Ok(())
        } else {
            Err(DriverError::Unavailable("memory store is offline".to_string()))
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(IdFormat::default())
    }
}

/// Driver for one collection of a [`MemoryStore`]
#[derive(Clone)]
pub struct MemoryCollection {
    store: MemoryStore,
    name: String,
}

impl MemoryCollection {
    /// Insert a fixture document as is, bypassing schema defaults.
    ///
    /// The id must still match the store's format and be unused.
    pub async fn seed(&self, doc: Document) -> DriverResult<()> {
        self.store.ensure_online()?;
        self.store.id_format().parse(doc.id().as_str())?;

        let mut collections = self.store.inner.collections.write().await;
        let state = collections.entry(self.name.clone()).or_default();
        if state.contains_id(doc.id()) {
            return Err(DriverError::Constraint(format!("duplicate key: _id = {}", doc.id())));
        }
        state.documents.push(doc);
        Ok(())
    }

    async fn find_inner(&self, filter: &Filter) -> DriverResult<Vec<Document>> {
        self.store.ensure_online()?;
        let collections = self.store.inner.collections.read().await;
        Ok(collections
            .get(&self.name)
            .map(|state| {
                state
                    .documents
                    .iter()
                    .filter(|doc| filter.matches(doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_one_inner(&self, filter: &Filter) -> DriverResult<Option<Document>> {
        self.store.ensure_online()?;
        let collections = self.store.inner.collections.read().await;
        Ok(collections
            .get(&self.name)
            .and_then(|state| state.documents.iter().find(|doc| filter.matches(doc)))
            .cloned())
    }

    async fn insert_inner(&self, mut payload: Payload) -> DriverResult<Document> {
        self.store.ensure_online()?;

        let id = match payload.remove(ID_FIELD) {
            Some(Value::String(raw)) => self.store.id_format().parse(&raw)?,
            Some(other) => {
                return Err(DriverError::Validation(ValidationDetails::type_mismatch(
                    ID_FIELD,
                    "string",
                    other.to_string(),
                )))
            }
            None => self.store.id_format().generate(),
        };

        let mut collections = self.store.inner.collections.write().await;
        let state = collections.entry(self.name.clone()).or_default();

        let fields = match &state.schema {
            Some(schema) => schema.prepare_insert(payload)?,
            None => payload,
        };

        if state.contains_id(&id) {
            return Err(DriverError::Constraint(format!("duplicate key: _id = {}", id)));
        }

        let doc = Document::new(id, fields);
        state.check_unique(&doc)?;
        state.documents.push(doc.clone());
        Ok(doc)
    }

    async fn find_one_and_update_inner(
        &self,
        filter: &Filter,
        mut patch: Payload,
        options: UpdateOptions,
    ) -> DriverResult<Option<Document>> {
        self.store.ensure_online()?;

        let mut collections = self.store.inner.collections.write().await;
        let Some(state) = collections.get_mut(&self.name) else {
            return Ok(None);
        };
        let Some(index) = state.position(filter) else {
            return Ok(None);
        };

        let original = state.documents[index].clone();

        // `_id` is immutable; resending it in any accepted spelling is a no-op
        let resent = match patch.remove(ID_FIELD) {
            Some(Value::String(raw)) => match self.store.id_format().parse(&raw) {
                Ok(id) if &id == original.id() => None,
                _ => Some(Value::String(raw)),
            },
            other => other,
        };
        if let Some(other) = resent {
            return Err(DriverError::Validation(ValidationDetails::new(
                ID_FIELD,
                format!("immutable value '{}'", original.id()),
                format!("attempted change to {}", other),
            )));
        }

        let patch = match &state.schema {
            Some(schema) => schema.prepare_update(patch)?,
            None => patch,
        };

        let mut updated = original.clone();
        updated.merge(patch);
        state.check_unique(&updated)?;
        state.documents[index] = updated.clone();

        Ok(Some(if options.return_updated { updated } else { original }))
    }

    async fn find_one_and_delete_inner(&self, filter: &Filter) -> DriverResult<Option<Document>> {
        self.store.ensure_online()?;

        let mut collections = self.store.inner.collections.write().await;
        let Some(state) = collections.get_mut(&self.name) else {
            return Ok(None);
        };
        Ok(state
            .position(filter)
            .map(|index| state.documents.remove(index)))
    }
}

impl StorageDriver for MemoryCollection {
    fn id_format(&self) -> IdFormat {
        self.store.id_format()
    }

    fn find<'a>(&'a self, filter: &'a Filter) -> DriverFuture<'a, Vec<Document>> {
        Box::pin(self.find_inner(filter))
    }

    fn find_one<'a>(&'a self, filter: &'a Filter) -> DriverFuture<'a, Option<Document>> {
        Box::pin(self.find_one_inner(filter))
    }

    fn insert(&self, payload: Payload) -> DriverFuture<'_, Document> {
        Box::pin(self.insert_inner(payload))
    }

    fn find_one_and_update<'a>(
        &'a self,
        filter: &'a Filter,
        patch: Payload,
        options: UpdateOptions,
    ) -> DriverFuture<'a, Option<Document>> {
        Box::pin(self.find_one_and_update_inner(filter, patch, options))
    }

    fn find_one_and_delete<'a>(&'a self, filter: &'a Filter) -> DriverFuture<'a, Option<Document>> {
        Box::pin(self.find_one_and_delete_inner(filter))
    }
}
