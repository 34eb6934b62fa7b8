//! Pizza resource
//!
//! The `pizzas` collection, its store-enforced schema and the typed
//! request bodies accepted by the HTTP layer.

mod model;

pub use model::{CreatePizza, PizzaSize, UpdatePizza};

use std::sync::Arc;

use serde_json::json;

use crate::repository::ResourceRepository;
use crate::store::{CollectionSchema, FieldDef, FieldType, MemoryStore};

/// Collection holding pizza documents
pub const COLLECTION: &str = "pizzas";

/// Schema enforced by the store on the `pizzas` collection
pub fn schema() -> CollectionSchema {
    let sizes = PizzaSize::ALL.iter().map(|s| s.as_str().to_string()).collect();

    CollectionSchema::new()
        .field("name", FieldDef::new(FieldType::String).required().trimmed())
        .field("createdBy", FieldDef::new(FieldType::String).required().trimmed())
        .field("createdAt", FieldDef::new(FieldType::DateTime).default_now())
        .field(
            "size",
            FieldDef::new(FieldType::Enum(sizes))
                .required()
                .with_default(json!(PizzaSize::default().as_str())),
        )
        .field(
            "toppings",
            FieldDef::new(FieldType::Array(Box::new(FieldType::String))).with_default(json!([])),
        )
}

/// Register the pizza schema on the store and build its repository
pub async fn repository(store: &MemoryStore) -> ResourceRepository {
    store.define_collection(COLLECTION, Some(schema())).await;
    ResourceRepository::new(Arc::new(store.collection(COLLECTION)))
}
