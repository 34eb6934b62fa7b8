//! # HTTP Server
//!
//! Axum server combining the pizza and health routers, CORS and
//! per-request logging.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware,
    middleware::Next,
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use uuid::Uuid;

use crate::observability::{log_event, log_event_with_fields, Event};
use crate::repository::ResourceRepository;

use super::config::HttpServerConfig;
use super::errors::FailureDetail;
use super::routes::{health_routes, pizza_routes, PizzaState, RequestId};

/// Response header echoing the request id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// HTTP server for the pizza API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server serving `repository` as the pizza collection
    pub fn new(config: HttpServerConfig, repository: ResourceRepository) -> Self {
        let router = Self::build_router(&config, repository);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &HttpServerConfig, repository: ResourceRepository) -> Router {
        let pizza_state = Arc::new(PizzaState::new(repository, config.request_timeout()));

        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(health_routes())
            .nest("/api", pizza_routes(pizza_state))
            .layer(middleware::from_fn(log_requests))
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until Ctrl-C
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(&addr).await?;
        let local = listener.local_addr()?.to_string();

        log_event_with_fields(Event::ServerListening, &[("addr", local.as_str())]);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        log_event(Event::ServerStopped);
        Ok(())
    }
}

async fn shutdown_signal() {
    // If the handler cannot be installed, run until killed
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Assign a request id and log one line per request.
///
/// 5xx responses are logged as `REQUEST_FAILED`, everything else as
/// `REQUEST_COMPLETE`. Error responses add their kind and message.
async fn log_requests(mut request: Request, next: Next) -> Response {
    let request_id = RequestId(Uuid::new_v4());
    request.extensions_mut().insert(request_id);

    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let mut response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis().to_string();
    let id = request_id.0.to_string();

    let mut fields: Vec<(&str, &str)> = vec![
        ("elapsed_ms", elapsed_ms.as_str()),
        ("method", method.as_str()),
        ("path", path.as_str()),
        ("request_id", id.as_str()),
        ("status", status.as_str()),
    ];
    let failure = response.extensions().get::<FailureDetail>().cloned();
    if let Some(failure) = &failure {
        fields.push(("error", failure.error.as_str()));
        fields.push(("kind", failure.kind));
    }

    let event = if status.is_server_error() {
        Event::RequestFailed
    } else {
        Event::RequestComplete
    };
    log_event_with_fields(event, &fields);

    if let Ok(value) = HeaderValue::from_str(&id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn repository() -> ResourceRepository {
        let store = MemoryStore::default();
        ResourceRepository::new(Arc::new(store.collection("pizzas")))
    }

    #[test]
    fn test_server_creation() {
        let server = HttpServer::new(HttpServerConfig::default(), repository());
        assert_eq!(server.socket_addr(), "0.0.0.0:3001");
    }

    #[test]
    fn test_server_with_custom_port() {
        let server = HttpServer::new(HttpServerConfig::with_port(8080), repository());
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_router_builds_with_origins() {
        let config = HttpServerConfig {
            cors_origins: vec!["http://localhost:3000".to_string()],
            ..Default::default()
        };
        let _router = HttpServer::new(config, repository()).router();
    }
}
