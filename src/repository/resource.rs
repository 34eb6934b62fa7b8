//! Resource repository over a single collection.

use std::sync::Arc;

use crate::store::{
    Document, DocumentId, DriverError, DriverFuture, DriverResult, Filter, IdFormat, Payload,
    StorageDriver, UpdateOptions,
};

use super::context::OperationContext;
use super::errors::{classify, RepositoryDefect, RepositoryResult};
use super::result::OperationResult;

/// CRUD facade over one document collection.
///
/// Holds no mutable state; clones share the same driver handle and may be
/// used concurrently from any number of tasks.
#[derive(Clone)]
pub struct ResourceRepository {
    driver: Arc<dyn StorageDriver>,
}

impl ResourceRepository {
    pub fn new(driver: Arc<dyn StorageDriver>) -> Self {
        Self { driver }
    }

    pub fn id_format(&self) -> IdFormat {
        self.driver.id_format()
    }

    /// All documents in storage-native order. Never `NotFound`.
    pub async fn list_all(&self, ctx: &OperationContext) -> RepositoryResult<Vec<Document>> {
        let filter = Filter::All;
        match self.call(ctx, self.driver.find(&filter)).await {
            Ok(docs) => Ok(OperationResult::Found(docs)),
            Err(err) => classify(err),
        }
    }

    /// Look up one document by id
    pub async fn get_by_id(&self, ctx: &OperationContext, id: &str) -> RepositoryResult<Document> {
        let id = match self.parse_id(id) {
            Ok(id) => id,
            Err(err) => return classify(err),
        };
        let filter = Filter::by_id(id.clone());
        match self.call(ctx, self.driver.find_one(&filter)).await {
            Ok(found) => check_returned(&id, found),
            Err(err) => classify(err),
        }
    }

    /// Insert a new document; the result carries the store-assigned id
    pub async fn create(&self, ctx: &OperationContext, payload: Payload) -> RepositoryResult<Document> {
        match self.call(ctx, self.driver.insert(payload)).await {
            Ok(doc) => {
                if self.driver.id_format().parse(doc.id().as_str()).is_err() {
                    return Err(RepositoryDefect::MalformedAssignedId(doc.id().to_string()));
                }
                Ok(OperationResult::Found(doc))
            }
            Err(err) => classify(err),
        }
    }

    /// Merge `payload` into an existing document and return the result.
    ///
    /// Never creates a missing document.
    pub async fn update_by_id(
        &self,
        ctx: &OperationContext,
        id: &str,
        payload: Payload,
    ) -> RepositoryResult<Document> {
        let id = match self.parse_id(id) {
            Ok(id) => id,
            Err(err) => return classify(err),
        };
        let filter = Filter::by_id(id.clone());
        let update = self
            .driver
            .find_one_and_update(&filter, payload, UpdateOptions::returning_updated());
        match self.call(ctx, update).await {
            Ok(updated) => check_returned(&id, updated),
            Err(err) => classify(err),
        }
    }

    /// Remove a document and return it as it was before removal
    pub async fn delete_by_id(&self, ctx: &OperationContext, id: &str) -> RepositoryResult<Document> {
        let id = match self.parse_id(id) {
            Ok(id) => id,
            Err(err) => return classify(err),
        };
        let filter = Filter::by_id(id.clone());
        match self.call(ctx, self.driver.find_one_and_delete(&filter)).await {
            Ok(removed) => check_returned(&id, removed),
            Err(err) => classify(err),
        }
    }

    fn parse_id(&self, raw: &str) -> DriverResult<DocumentId> {
        self.driver.id_format().parse(raw)
    }

    /// Await a driver call, abandoning it once the context deadline passes
    async fn call<T>(&self, ctx: &OperationContext, fut: DriverFuture<'_, T>) -> DriverResult<T> {
        match ctx.deadline() {
            Some(deadline) => match tokio::time::timeout_at(deadline, fut).await {
                Ok(result) => result,
                Err(_) => Err(DriverError::DeadlineExceeded {
                    elapsed_ms: ctx.elapsed_ms(),
                }),
            },
            None => fut.await,
        }
    }
}

/// A by-id answer must be absent or carry the requested id
fn check_returned(requested: &DocumentId, found: Option<Document>) -> RepositoryResult<Document> {
    match found {
        Some(doc) if doc.id() != requested => Err(RepositoryDefect::MismatchedId {
            requested: requested.to_string(),
            returned: doc.id().to_string(),
        }),
        other => Ok(OperationResult::from(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::{json, Value};
    use std::time::Duration;

    fn payload(value: Value) -> Payload {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn repo(store: &MemoryStore) -> ResourceRepository {
        ResourceRepository::new(Arc::new(store.collection("items")))
    }

    /// Driver that never answers
    struct StalledDriver;

    fn stalled<'a, T: Send + 'a>() -> DriverFuture<'a, T> {
        Box::pin(std::future::pending::<DriverResult<T>>())
    }

    impl StorageDriver for StalledDriver {
        fn id_format(&self) -> IdFormat {
            IdFormat::Opaque
        }

        fn find<'a>(&'a self, _filter: &'a Filter) -> DriverFuture<'a, Vec<Document>> {
            stalled()
        }

        fn find_one<'a>(&'a self, _filter: &'a Filter) -> DriverFuture<'a, Option<Document>> {
            stalled()
        }

        fn insert(&self, _payload: Payload) -> DriverFuture<'_, Document> {
            stalled()
        }

        fn find_one_and_update<'a>(
            &'a self,
            _filter: &'a Filter,
            _patch: Payload,
            _options: UpdateOptions,
        ) -> DriverFuture<'a, Option<Document>> {
            stalled()
        }

        fn find_one_and_delete<'a>(&'a self, _filter: &'a Filter) -> DriverFuture<'a, Option<Document>> {
            stalled()
        }
    }

    /// Driver that answers every call with a document under a fixed id
    struct WrongIdDriver {
        id: &'static str,
    }

    impl WrongIdDriver {
        fn doc(&self) -> Document {
            Document::new(DocumentId::new(self.id), payload(json!({"name": "Imposter"})))
        }
    }

    impl StorageDriver for WrongIdDriver {
        fn id_format(&self) -> IdFormat {
            IdFormat::ObjectId
        }

        fn find<'a>(&'a self, _filter: &'a Filter) -> DriverFuture<'a, Vec<Document>> {
            let docs = vec![self.doc()];
            Box::pin(async move { Ok(docs) })
        }

        fn find_one<'a>(&'a self, _filter: &'a Filter) -> DriverFuture<'a, Option<Document>> {
            let doc = self.doc();
            Box::pin(async move { Ok(Some(doc)) })
        }

        fn insert(&self, _payload: Payload) -> DriverFuture<'_, Document> {
            let doc = self.doc();
            Box::pin(async move { Ok(doc) })
        }

        fn find_one_and_update<'a>(
            &'a self,
            _filter: &'a Filter,
            _patch: Payload,
            _options: UpdateOptions,
        ) -> DriverFuture<'a, Option<Document>> {
            let doc = self.doc();
            Box::pin(async move { Ok(Some(doc)) })
        }

        fn find_one_and_delete<'a>(&'a self, _filter: &'a Filter) -> DriverFuture<'a, Option<Document>> {
            let doc = self.doc();
            Box::pin(async move { Ok(Some(doc)) })
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let store = MemoryStore::default();
        let repo = repo(&store);
        let ctx = OperationContext::new();

        let created = repo
            .create(&ctx, payload(json!({"name": "Veggie"})))
            .await
            .unwrap()
            .found()
            .unwrap();

        let fetched = repo.get_by_id(&ctx, created.id().as_str()).await.unwrap();
        assert_eq!(fetched, OperationResult::Found(created));
    }

    #[tokio::test]
    async fn test_malformed_id_is_invalid() {
        let store = MemoryStore::default();
        let repo = repo(&store);
        let ctx = OperationContext::new();

        assert!(repo.get_by_id(&ctx, "short").await.unwrap().is_invalid());
        assert!(repo
            .update_by_id(&ctx, "short", Payload::new())
            .await
            .unwrap()
            .is_invalid());
        assert!(repo.delete_by_id(&ctx, "short").await.unwrap().is_invalid());
    }

    #[tokio::test]
    async fn test_malformed_id_checked_before_store() {
        let store = MemoryStore::default();
        store.set_online(false);
        let repo = repo(&store);

        let result = repo.get_by_id(&OperationContext::new(), "short").await.unwrap();
        assert!(result.is_invalid());
    }

    #[tokio::test]
    async fn test_offline_store_is_storage_failure() {
        let store = MemoryStore::default();
        store.set_online(false);
        let repo = repo(&store);
        let ctx = OperationContext::new();

        assert!(repo.list_all(&ctx).await.unwrap().is_storage_failure());
        assert!(repo
            .create(&ctx, payload(json!({"name": "x"})))
            .await
            .unwrap()
            .is_storage_failure());
    }

    #[tokio::test]
    async fn test_deadline_exceeded_is_storage_failure() {
        let repo = ResourceRepository::new(Arc::new(StalledDriver));
        let ctx = OperationContext::with_timeout(Duration::from_millis(20));

        let result = repo.get_by_id(&ctx, "a1").await.unwrap();
        match result {
            OperationResult::StorageFailure(detail) => assert!(detail.contains("Deadline exceeded")),
            other => panic!("expected storage failure, got {:?}", other),
        }
        assert!(repo.list_all(&ctx).await.unwrap().is_storage_failure());
    }

    #[test]
    fn test_check_returned_flags_mismatch() {
        let requested = DocumentId::new("a1");
        let other = Document::new(DocumentId::new("b2"), Payload::new());

        let err = check_returned(&requested, Some(other)).unwrap_err();
        assert!(matches!(err, RepositoryDefect::MismatchedId { .. }));
        assert!(check_returned(&requested, None).unwrap().is_not_found());
    }

    #[tokio::test]
    async fn test_by_id_answer_for_other_document_is_defect() {
        let repo = ResourceRepository::new(Arc::new(WrongIdDriver {
            id: "5f8d0d55b54764421b7156c3",
        }));
        let ctx = OperationContext::new();
        let requested = "64b7f0c2a1e4d3b2c1a09f87";

        let expect_mismatch = |result: RepositoryResult<Document>| match result {
            Err(RepositoryDefect::MismatchedId { requested: r, returned }) => {
                assert_eq!(r, requested);
                assert_eq!(returned, "5f8d0d55b54764421b7156c3");
            }
            other => panic!("expected mismatched id, got {:?}", other),
        };

        expect_mismatch(repo.get_by_id(&ctx, requested).await);
        expect_mismatch(
            repo.update_by_id(&ctx, requested, payload(json!({"name": "x"})))
                .await,
        );
        expect_mismatch(repo.delete_by_id(&ctx, requested).await);

        // Asking for the id the driver answers with is fine
        let found = repo.get_by_id(&ctx, "5f8d0d55b54764421b7156c3").await.unwrap();
        assert!(found.is_found());
    }

    #[tokio::test]
    async fn test_create_with_malformed_assigned_id_is_defect() {
        let repo = ResourceRepository::new(Arc::new(WrongIdDriver { id: "not-hex" }));
        let result = repo
            .create(&OperationContext::new(), payload(json!({"name": "x"})))
            .await;
        match result {
            Err(RepositoryDefect::MalformedAssignedId(id)) => assert_eq!(id, "not-hex"),
            other => panic!("expected malformed assigned id, got {:?}", other),
        }
    }
}
