//! # REST API Module
//!
//! HTTP endpoints for the pizza collection:
//!
//! - `GET    /api/pizzas`      - list every pizza
//! - `POST   /api/pizzas`      - create a pizza
//! - `GET    /api/pizzas/{id}` - fetch one pizza
//! - `PUT    /api/pizzas/{id}` - update a pizza, returns the new state
//! - `DELETE /api/pizzas/{id}` - delete a pizza, returns the removed state
//! - `GET    /health`          - liveness probe

pub mod config;
pub mod errors;
pub mod routes;
pub mod server;

pub use config::HttpServerConfig;
pub use errors::{ErrorResponse, FailureDetail, RestError, RestResult};
pub use routes::{health_routes, pizza_routes, PizzaState, RequestId};
pub use server::{HttpServer, REQUEST_ID_HEADER};
