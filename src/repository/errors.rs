//! # Repository Errors
//!
//! Expected outcomes (absence, bad input, store failures) are values of
//! [`OperationResult`]. Only driver defects are errors.

use thiserror::Error;

use super::result::OperationResult;
use crate::store::DriverError;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<OperationResult<T>, RepositoryDefect>;

/// Programmer error in the storage driver
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryDefect {
    /// Driver reported a violation of its own contract
    #[error("Driver contract violation: {0}")]
    Driver(String),

    /// Driver answered with a different document than the one asked for
    #[error("Driver returned document '{returned}' for id '{requested}'")]
    MismatchedId { requested: String, returned: String },

    /// Driver assigned an id its own format rejects
    #[error("Driver assigned malformed id '{0}'")]
    MalformedAssignedId(String),
}

/// Fold a driver error into an operation outcome.
///
/// Total over `DriverError`: caller input becomes `Invalid`, store-side
/// failures become `StorageFailure`, contract violations become a defect.
pub(crate) fn classify<T>(err: DriverError) -> RepositoryResult<T> {
    match err {
        DriverError::InvalidId { .. } | DriverError::Validation(_) => {
            Ok(OperationResult::Invalid(err.to_string()))
        }
        DriverError::Unavailable(_)
        | DriverError::Constraint(_)
        | DriverError::DeadlineExceeded { .. } => Ok(OperationResult::StorageFailure(err.to_string())),
        DriverError::ContractViolation(detail) => Err(RepositoryDefect::Driver(detail)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ValidationDetails;

    #[test]
    fn test_classify_caller_input() {
        let result = classify::<()>(DriverError::invalid_id("zz", "too short")).unwrap();
        assert!(result.is_invalid());

        let result =
            classify::<()>(DriverError::Validation(ValidationDetails::missing_field("name"))).unwrap();
        assert!(result.is_invalid());
    }

    #[test]
    fn test_classify_store_failures() {
        for err in [
            DriverError::Unavailable("down".into()),
            DriverError::Constraint("dup".into()),
            DriverError::DeadlineExceeded { elapsed_ms: 10 },
        ] {
            assert!(classify::<()>(err).unwrap().is_storage_failure());
        }
    }

    #[test]
    fn test_classify_contract_violation_is_defect() {
        let err = classify::<()>(DriverError::ContractViolation("bad".into())).unwrap_err();
        assert_eq!(err, RepositoryDefect::Driver("bad".into()));
    }
}
