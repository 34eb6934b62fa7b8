//! # Resource Repository
//!
//! Generic CRUD facade over one document collection. Each operation makes
//! a single driver call and folds the outcome into an [`OperationResult`]
//! an HTTP layer can render without looking at driver error shapes.
//!
//! # Invariants
//!
//! - Every operation yields exactly one `OperationResult` variant
//! - Malformed ids are rejected before the driver is called
//! - Update returns the post-update document, delete the pre-delete one
//! - No retries and no logging; callers own both
//! - Driver contract violations surface as [`RepositoryDefect`], never as
//!   `StorageFailure`

mod context;
mod errors;
mod resource;
mod result;

pub use context::OperationContext;
pub use errors::{RepositoryDefect, RepositoryResult};
pub use resource::ResourceRepository;
pub use result::OperationResult;
