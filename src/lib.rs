//! pizza-api - REST resource repository for a pizza collection
//!
//! Layers, bottom-up:
//! - `store`: document model, storage driver trait and the in-memory store
//! - `repository`: generic CRUD over a driver with a tagged outcome
//! - `pizza`: the pizza schema and request bodies
//! - `rest_api`: axum routes mapping outcomes onto HTTP statuses
//! - `observability`: structured JSON logging
//! - `cli`: configuration loading and the `serve` command

pub mod cli;
pub mod observability;
pub mod pizza;
pub mod repository;
pub mod rest_api;
pub mod store;
