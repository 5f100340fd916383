//! Engine configuration.
//!
//! Capability names and configuration file locations. Configuration is
//! loaded from environment variables with defaults matching the stock
//! community-content setup.

use content_rbac::{Operation, PermissionScheme, SchemeDocument};
use content_workflow::StaticWorkflowRegistry;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::collaborators::ConfigStore;
use crate::error::{AccessError, AccessResult};

/// Capability that lets an actor see other users' unpublished drafts.
pub const DEFAULT_DRAFT_CAPABILITY: &str = "access draft community content";

/// Membership capability checked for commenting.
pub const DEFAULT_COMMENT_CAPABILITY: &str = "post comments";

/// Access engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Platform capability bypassing the draft-ownership gate.
    pub draft_capability: String,

    /// Membership capability required to comment.
    pub comment_capability: String,

    /// Path of the permission scheme document.
    pub scheme_path: Option<PathBuf>,

    /// Path of the workflow registry document.
    pub workflows_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            draft_capability: DEFAULT_DRAFT_CAPABILITY.to_string(),
            comment_capability: DEFAULT_COMMENT_CAPABILITY.to_string(),
            scheme_path: None,
            workflows_path: None,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `ACCESS_DRAFT_CAPABILITY`: Draft bypass capability (default: access draft community content)
    /// - `ACCESS_COMMENT_CAPABILITY`: Comment capability (default: post comments)
    /// - `ACCESS_SCHEME_PATH`: Permission scheme document
    /// - `ACCESS_WORKFLOWS_PATH`: Workflow registry document
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            draft_capability: std::env::var("ACCESS_DRAFT_CAPABILITY")
                .unwrap_or(default.draft_capability),
            comment_capability: std::env::var("ACCESS_COMMENT_CAPABILITY")
                .unwrap_or(default.comment_capability),
            scheme_path: std::env::var("ACCESS_SCHEME_PATH").ok().map(PathBuf::from),
            workflows_path: std::env::var("ACCESS_WORKFLOWS_PATH").ok().map(PathBuf::from),
        }
    }

    pub fn with_scheme_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.scheme_path = Some(path.into());
        self
    }

    pub fn with_workflows_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.workflows_path = Some(path.into());
        self
    }

    /// Open the configured permission scheme document.
    pub fn scheme_store(&self) -> AccessResult<JsonConfigStore> {
        let path = self.scheme_path.as_deref().ok_or_else(|| {
            AccessError::Configuration("ACCESS_SCHEME_PATH is not set".to_string())
        })?;
        JsonConfigStore::from_path(path)
    }

    /// Load the configured workflow registry document.
    pub fn workflow_registry(&self) -> AccessResult<StaticWorkflowRegistry> {
        let path = self.workflows_path.as_deref().ok_or_else(|| {
            AccessError::Configuration("ACCESS_WORKFLOWS_PATH is not set".to_string())
        })?;
        let json = read_document(path)?;
        Ok(StaticWorkflowRegistry::from_json(&json)?)
    }
}

/// Permission schemes read from a JSON scheme document.
///
/// The document is parsed once; each `load_scheme` call extracts one
/// operation's section.
///
/// # Example
///
/// ```
/// use content_access::{ConfigStore, JsonConfigStore};
/// use content_rbac::Operation;
///
/// let store = JsonConfigStore::from_json(r#"{
///     "view": { "document": { "validated": { "any": ["anonymous"] } } }
/// }"#).unwrap();
///
/// assert!(store.load_scheme(Operation::View).is_ok());
/// assert!(store.load_scheme(Operation::Delete).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct JsonConfigStore {
    document: SchemeDocument,
}

impl JsonConfigStore {
    pub fn new(document: SchemeDocument) -> Self {
        Self { document }
    }

    /// Parse a scheme document.
    pub fn from_json(json: &str) -> AccessResult<Self> {
        Ok(Self::new(SchemeDocument::from_json(json)?))
    }

    /// Read and parse a scheme document from disk.
    pub fn from_path(path: &Path) -> AccessResult<Self> {
        let json = read_document(path)?;
        Self::from_json(&json)
    }

    pub fn document(&self) -> &SchemeDocument {
        &self.document
    }
}

impl ConfigStore for JsonConfigStore {
    fn load_scheme(&self, operation: Operation) -> AccessResult<PermissionScheme> {
        Ok(self.document.scheme(operation)?)
    }
}

fn read_document(path: &Path) -> AccessResult<String> {
    debug!(path = %path.display(), "Reading access configuration");
    std::fs::read_to_string(path).map_err(|e| {
        AccessError::Configuration(format!("cannot read {}: {}", path.display(), e))
    })
}
