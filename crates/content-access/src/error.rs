//! Error types for access decisions
//!
//! A decision never fails because access is denied; denial is a
//! [`Decision`](crate::Decision). Errors cover configuration that cannot be
//! evaluated and collaborators that could not be reached.

use content_rbac::SchemeError;
use content_workflow::WorkflowError;
use thiserror::Error;

/// Access decision error types.
#[derive(Debug, Error)]
pub enum AccessError {
    /// Permission scheme, workflow or group configuration is missing or malformed
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Role, membership or group lookup failed
    #[error("Collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),
}

/// Result type for access decisions.
pub type AccessResult<T> = Result<T, AccessError>;

impl AccessError {
    /// Check if this error should be logged at error level.
    ///
    /// Configuration errors need an operator; collaborator failures are
    /// usually transient and left to the caller to retry.
    pub fn is_server_error(&self) -> bool {
        matches!(self, AccessError::Configuration(_))
    }

    /// Whether retrying the same decision may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AccessError::CollaboratorUnavailable(_))
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AccessError::Configuration(_) => "CONFIGURATION_ERROR",
            AccessError::CollaboratorUnavailable(_) => "COLLABORATOR_UNAVAILABLE",
        }
    }
}

impl From<SchemeError> for AccessError {
    fn from(err: SchemeError) -> Self {
        AccessError::Configuration(err.to_string())
    }
}

impl From<WorkflowError> for AccessError {
    fn from(err: WorkflowError) -> Self {
        AccessError::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use content_rbac::Operation;

    #[test]
    fn test_conversions_are_configuration_errors() {
        let err: AccessError = SchemeError::NotLoaded(Operation::Delete).into();
        assert!(matches!(err, AccessError::Configuration(_)));
        assert!(err.to_string().contains("delete"));

        let err: AccessError = WorkflowError::UnknownWorkflow("news".to_string()).into();
        assert!(err.is_server_error());
        assert!(!err.is_retryable());
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
    }

    #[test]
    fn test_collaborator_unavailable() {
        let err = AccessError::CollaboratorUnavailable("membership store offline".to_string());
        assert!(!err.is_server_error());
        assert!(err.is_retryable());
        assert_eq!(err.error_code(), "COLLABORATOR_UNAVAILABLE");
    }
}
