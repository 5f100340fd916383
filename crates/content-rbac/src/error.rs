//! Error types for permission scheme loading

use thiserror::Error;

use crate::operations::Operation;

/// Permission scheme error types.
///
/// A lookup that finds no entry is not an error (it denies); these cover a
/// scheme that is unusable as a whole.
#[derive(Debug, Error)]
pub enum SchemeError {
    /// Scheme document could not be parsed or contains unknown names
    #[error("Malformed permission scheme: {0}")]
    Malformed(String),

    /// Scheme document has no section for the operation
    #[error("Permission scheme for '{0}' is not loaded")]
    NotLoaded(Operation),

    /// Operation is not governed by a permission scheme
    #[error("Operation '{0}' has no permission scheme")]
    Unsupported(Operation),

    /// A scheme was supplied for the wrong operation
    #[error("Permission scheme for '{found}' supplied where '{expected}' was expected")]
    OperationMismatch {
        /// Operation the slot expects.
        expected: Operation,
        /// Operation of the supplied scheme.
        found: Operation,
    },
}

impl From<serde_json::Error> for SchemeError {
    fn from(err: serde_json::Error) -> Self {
        SchemeError::Malformed(err.to_string())
    }
}

/// Result type for permission scheme operations.
pub type SchemeResult<T> = Result<T, SchemeError>;
