//! Document store subsystem
//!
//! The store owns every persisted document. It exposes a narrow driver
//! capability per collection (`find`, `find_one`, `insert`,
//! `find_one_and_update`, `find_one_and_delete`) that the repository layer
//! consumes without knowing the storage technology behind it.
//!
//! # Design Principles
//!
//! - Identifier format is decided by the store, not by callers
//! - Collection schemas are enforced by the store on every write
//! - Find-and-modify operations are atomic per collection
//! - Insertion order is the storage-native listing order

mod document;
mod driver;
mod errors;
mod filter;
mod id;
mod memory;
mod schema;

pub use document::{Document, DocumentId, Payload, ID_FIELD};
pub use driver::{DriverFuture, StorageDriver, UpdateOptions};
pub use errors::{DriverError, DriverResult};
pub use filter::Filter;
pub use id::IdFormat;
pub use memory::{MemoryCollection, MemoryStore};
pub use schema::{CollectionSchema, FieldDef, FieldDefault, FieldType, ValidationDetails};
