//! Error types for workflow definitions and lookups

use thiserror::Error;

/// Workflow error types.
///
/// Every variant describes unusable configuration: an item in a state its
/// workflow does not declare, a workflow nobody registered, or a definition
/// that does not hold together.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// No workflow registered under this id
    #[error("Unknown workflow: {0}")]
    UnknownWorkflow(String),

    /// No workflow registered for a content bundle
    #[error("No workflow for bundle: {0}")]
    NoWorkflowForBundle(String),

    /// Bundle's workflow depends on the parent's moderation, but there is no parent
    #[error("Workflow for bundle '{0}' depends on moderation but the item has no parent")]
    ParentRequired(String),

    /// State is not declared by the workflow
    #[error("State '{state}' is not declared by workflow '{workflow}'")]
    UndeclaredState {
        /// Workflow id.
        workflow: String,
        /// Offending state.
        state: String,
    },

    /// Transition does not exist or does not apply from the current state
    #[error("Transition '{transition}' cannot be applied from state '{state}'")]
    InvalidTransition {
        /// Transition id.
        transition: String,
        /// Current state.
        state: String,
    },

    /// Workflow definition is inconsistent
    #[error("Invalid workflow '{workflow}': {message}")]
    InvalidDefinition {
        /// Workflow id.
        workflow: String,
        /// What is wrong with it.
        message: String,
    },

    /// State name is empty or contains whitespace
    #[error("Invalid state name: {0:?}")]
    InvalidStateName(String),

    /// Definition document could not be parsed
    #[error("Malformed workflow document: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for WorkflowError {
    fn from(err: serde_json::Error) -> Self {
        WorkflowError::Malformed(err.to_string())
    }
}

/// Result type for workflow operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;
