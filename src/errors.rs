// Copyright 2025 Cowboy AI, LLC.

//! Error types for domain operations

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    EntityNotFound {
        /// Type of entity that wasn't found
        entity_type: String,
        /// ID that was searched for
        id: String,
    },

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Invariant violation
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Withdrawal exceeding the available balance
    #[error("Insufficient funds: balance {balance} is less than requested {requested}")]
    InsufficientFunds {
        /// Balance available at the time of the withdrawal
        balance: Decimal,
        /// Amount that was requested
        requested: Decimal,
    },

    /// Already exists error (uniqueness violation)
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Concurrency conflict
    #[error("Concurrency conflict: expected version {expected}, but found {actual}")]
    ConcurrencyConflict {
        /// Expected version
        expected: u64,
        /// Actual version
        actual: u64,
    },

    /// Operation the entity deliberately does not support
    #[error("Operation not supported: {operation} on {entity_type}")]
    UnsupportedOperation {
        /// Entity type the operation was attempted on
        entity_type: &'static str,
        /// The rejected operation
        operation: &'static str,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Anything else, with the original message preserved for diagnostics
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Coarse failure classification exposed to callers
///
/// Every [`DomainError`] variant maps onto exactly one kind, which is what
/// the HTTP layer translates into a response class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Malformed input or domain rule violation; locally recoverable
    Validation,
    /// A referenced id is absent
    NotFound,
    /// Uniqueness or concurrency violation
    Conflict,
    /// Anything else; logged, message kept for internal diagnostics only
    Unexpected,
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

impl DomainError {
    /// Build an `EntityNotFound` for a typed id
    pub fn not_found(entity_type: &str, id: impl std::fmt::Display) -> Self {
        DomainError::EntityNotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }

    /// Classify this error into the caller-facing failure taxonomy
    pub fn kind(&self) -> FailureKind {
        match self {
            DomainError::EntityNotFound { .. } => FailureKind::NotFound,
            DomainError::ValidationError(_)
            | DomainError::InvariantViolation(_)
            | DomainError::InsufficientFunds { .. }
            | DomainError::UnsupportedOperation { .. } => FailureKind::Validation,
            DomainError::AlreadyExists(_) | DomainError::ConcurrencyConflict { .. } => {
                FailureKind::Conflict
            }
            DomainError::SerializationError(_) | DomainError::Unexpected(_) => {
                FailureKind::Unexpected
            }
        }
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        self.kind() == FailureKind::NotFound
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        self.kind() == FailureKind::Validation
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        self.kind() == FailureKind::Conflict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test error creation and display messages
    ///
    /// ```mermaid
    /// graph TD
    ///     A[DomainError] -->|Display| B[Error Message]
    ///     A -->|kind| C[FailureKind]
    /// ```
    #[test]
    fn test_error_display_messages() {
        let err = DomainError::not_found("Account", "123");
        assert_eq!(err.to_string(), "Entity not found: Account with id 123");

        let err = DomainError::ValidationError("Email format invalid".to_string());
        assert_eq!(err.to_string(), "Validation error: Email format invalid");

        let err = DomainError::InvariantViolation("Balance cannot be negative".to_string());
        assert_eq!(
            err.to_string(),
            "Invariant violation: Balance cannot be negative"
        );

        let err = DomainError::InsufficientFunds {
            balance: Decimal::new(10000, 2),
            requested: Decimal::new(15000, 2),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient funds: balance 100.00 is less than requested 150.00"
        );

        let err = DomainError::AlreadyExists("Category 'Food'".to_string());
        assert_eq!(err.to_string(), "Already exists: Category 'Food'");

        let err = DomainError::ConcurrencyConflict {
            expected: 5,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "Concurrency conflict: expected version 5, but found 3"
        );

        let err = DomainError::UnsupportedOperation {
            entity_type: "Transfer",
            operation: "update",
        };
        assert_eq!(
            err.to_string(),
            "Operation not supported: update on Transfer"
        );

        let err = DomainError::Unexpected("Something went wrong".to_string());
        assert_eq!(err.to_string(), "Unexpected error: Something went wrong");
    }

    /// Test every variant maps onto exactly one failure kind
    #[test]
    fn test_failure_kind_mapping() {
        assert_eq!(
            DomainError::not_found("User", "x").kind(),
            FailureKind::NotFound
        );
        assert_eq!(
            DomainError::ValidationError("bad".into()).kind(),
            FailureKind::Validation
        );
        assert_eq!(
            DomainError::InvariantViolation("bad".into()).kind(),
            FailureKind::Validation
        );
        assert_eq!(
            DomainError::InsufficientFunds {
                balance: Decimal::ZERO,
                requested: Decimal::ONE,
            }
            .kind(),
            FailureKind::Validation
        );
        assert_eq!(
            DomainError::UnsupportedOperation {
                entity_type: "Transfer",
                operation: "update",
            }
            .kind(),
            FailureKind::Validation
        );
        assert_eq!(
            DomainError::AlreadyExists("dup".into()).kind(),
            FailureKind::Conflict
        );
        assert_eq!(
            DomainError::ConcurrencyConflict {
                expected: 1,
                actual: 2,
            }
            .kind(),
            FailureKind::Conflict
        );
        assert_eq!(
            DomainError::SerializationError("bad json".into()).kind(),
            FailureKind::Unexpected
        );
        assert_eq!(
            DomainError::Unexpected("boom".into()).kind(),
            FailureKind::Unexpected
        );
    }

    /// Test helper predicates match their kinds only
    #[test]
    fn test_helper_method_exclusivity() {
        let conflict = DomainError::AlreadyExists("dup".into());
        assert!(conflict.is_conflict());
        assert!(!conflict.is_not_found());
        assert!(!conflict.is_validation());

        let validation = DomainError::ValidationError("bad".into());
        assert!(validation.is_validation());
        assert!(!validation.is_conflict());
        assert!(!validation.is_not_found());

        let not_found = DomainError::not_found("Account", "123");
        assert!(not_found.is_not_found());
        assert!(!not_found.is_conflict());
        assert!(!not_found.is_validation());
    }

    /// Test serde_json error conversion
    #[test]
    fn test_serde_json_conversion() {
        let invalid_json = "{ invalid json }";
        let serde_err = serde_json::from_str::<serde_json::Value>(invalid_json).unwrap_err();

        let domain_err: DomainError = serde_err.into();

        match domain_err {
            DomainError::SerializationError(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected SerializationError"),
        }
    }

    /// Test error cloning preserves the message
    #[test]
    fn test_error_clone() {
        let original = DomainError::ValidationError("Test error".to_string());
        let cloned = original.clone();

        assert_eq!(original.to_string(), cloned.to_string());
    }
}
