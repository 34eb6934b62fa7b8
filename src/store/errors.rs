//! Driver error types
//!
//! Every failure a storage driver can report. The repository maps each
//! variant onto exactly one outcome, so new variants must be classified
//! there as well.

use thiserror::Error;

use super::schema::ValidationDetails;

/// Result type for driver operations
pub type DriverResult<T> = Result<T, DriverError>;

/// Storage driver errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    // ==================
    // Caller input
    // ==================
    /// Identifier does not match the store's id format
    #[error("Invalid id '{value}': {reason}")]
    InvalidId { value: String, reason: String },

    /// Payload rejected by the collection schema
    #[error("Validation failed: {0}")]
    Validation(ValidationDetails),

    // ==================
    // Store side
    // ==================
    /// Store cannot be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Store-level constraint such as a unique index
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Operation did not finish before the caller's deadline
    #[error("Deadline exceeded after {elapsed_ms}ms")]
    DeadlineExceeded { elapsed_ms: u128 },

    // ==================
    // Defects
    // ==================
    /// Driver broke its own contract
    #[error("Driver contract violation: {0}")]
    ContractViolation(String),
}

impl DriverError {
    pub fn invalid_id(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidId {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

impl From<ValidationDetails> for DriverError {
    fn from(details: ValidationDetails) -> Self {
        Self::Validation(details)
    }
}
