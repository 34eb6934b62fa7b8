//! Pizza HTTP Routes
//!
//! Each handler parses the request into an explicit body type, runs one
//! repository operation and renders the outcome.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Extension, Json, Router,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::pizza::{CreatePizza, UpdatePizza};
use crate::repository::{OperationContext, ResourceRepository};
use crate::store::Document;

use super::errors::{into_rest, RestResult};

/// Name used in not-found messages
const RESOURCE: &str = "pizza";

// ==================
// Shared State
// ==================

/// Per-request id assigned by the server's logging middleware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(pub Uuid);

/// Pizza state shared across handlers
pub struct PizzaState {
    repository: ResourceRepository,
    request_timeout: Duration,
}

impl PizzaState {
    pub fn new(repository: ResourceRepository, request_timeout: Duration) -> Self {
        Self {
            repository,
            request_timeout,
        }
    }

    fn context(&self, request_id: RequestId) -> OperationContext {
        OperationContext::with_timeout(self.request_timeout).with_request_id(request_id.0)
    }
}

// ==================
// Routes
// ==================

/// Create pizza routes, relative to the `/api` mount point.
///
/// Handlers expect a [`RequestId`] extension, which [`HttpServer`] adds.
///
/// [`HttpServer`]: super::HttpServer
pub fn pizza_routes(state: Arc<PizzaState>) -> Router {
    Router::new()
        .route("/pizzas", get(list_pizzas_handler).post(create_pizza_handler))
        .route(
            "/pizzas/{id}",
            get(get_pizza_handler)
                .put(update_pizza_handler)
                .delete(delete_pizza_handler),
        )
        .with_state(state)
}

/// Liveness probe
pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_handler))
}

// ==================
// Handlers
// ==================

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_pizzas_handler(
    State(state): State<Arc<PizzaState>>,
    Extension(request_id): Extension<RequestId>,
) -> RestResult<Json<Vec<Document>>> {
    let result = state.repository.list_all(&state.context(request_id)).await;
    into_rest(RESOURCE, result).map(Json)
}

async fn get_pizza_handler(
    State(state): State<Arc<PizzaState>>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> RestResult<Json<Document>> {
    let result = state.repository.get_by_id(&state.context(request_id), &id).await;
    into_rest(RESOURCE, result).map(Json)
}

async fn create_pizza_handler(
    State(state): State<Arc<PizzaState>>,
    Extension(request_id): Extension<RequestId>,
    body: Result<Json<CreatePizza>, JsonRejection>,
) -> RestResult<Json<Document>> {
    let Json(body) = body?;
    let result = state
        .repository
        .create(&state.context(request_id), body.into_payload())
        .await;
    into_rest(RESOURCE, result).map(Json)
}

async fn update_pizza_handler(
    State(state): State<Arc<PizzaState>>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<String>,
    body: Result<Json<UpdatePizza>, JsonRejection>,
) -> RestResult<Json<Document>> {
    let Json(body) = body?;
    let result = state
        .repository
        .update_by_id(&state.context(request_id), &id, body.into_payload())
        .await;
    into_rest(RESOURCE, result).map(Json)
}

async fn delete_pizza_handler(
    State(state): State<Arc<PizzaState>>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> RestResult<Json<Document>> {
    let result = state.repository.delete_by_id(&state.context(request_id), &id).await;
    into_rest(RESOURCE, result).map(Json)
}
