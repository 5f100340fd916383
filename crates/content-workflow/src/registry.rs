//! # Workflow Registry
//!
//! Maps content bundles to workflows and workflow ids to their definitions.
//! Registries are populated once at startup and validated eagerly: a bundle
//! bound to an unregistered workflow is rejected when it is bound, not when
//! the first item of that bundle is evaluated.
//!
//! ```text
//! document   → "document"
//! discussion → { pre_moderated: "discussion_pre", post_moderated: "discussion_post" }
//!                 └─ chosen by the parent group's moderation mode
//! ```

use content_groups::{GroupEntity, ModerationMode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{WorkflowError, WorkflowResult};
use crate::item::ContentItem;
use crate::workflow::Workflow;

/// Source of workflow definitions.
///
/// Implementations must be shareable across threads; lookups are read-only.
pub trait WorkflowRegistry: Send + Sync {
    /// Workflow id governing `item`.
    ///
    /// `parent` is the item's group, needed by bundles whose workflow depends
    /// on the group's moderation mode.
    fn workflow_for(&self, item: &ContentItem, parent: Option<&GroupEntity>) -> WorkflowResult<String>;

    /// Definition of a workflow.
    fn definition_of(&self, workflow_id: &str) -> WorkflowResult<Arc<Workflow>>;

    /// Ids of all registered workflows, sorted.
    fn workflow_ids(&self) -> Vec<String>;
}

/// How a bundle selects its workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BundleWorkflow {
    /// Always the same workflow.
    Fixed(String),

    /// Depends on the parent group's moderation mode.
    Moderated {
        pre_moderated: String,
        post_moderated: String,
    },
}

impl BundleWorkflow {
    pub fn fixed(workflow_id: impl Into<String>) -> Self {
        Self::Fixed(workflow_id.into())
    }

    pub fn moderated(pre_moderated: impl Into<String>, post_moderated: impl Into<String>) -> Self {
        Self::Moderated {
            pre_moderated: pre_moderated.into(),
            post_moderated: post_moderated.into(),
        }
    }

    /// The workflow for a moderation mode. `None` if the selection depends on
    /// moderation and none is given.
    pub fn select(&self, moderation: Option<ModerationMode>) -> Option<&str> {
        match (self, moderation) {
            (Self::Fixed(id), _) => Some(id.as_str()),
            (Self::Moderated { pre_moderated, .. }, Some(ModerationMode::PreModeration)) => {
                Some(pre_moderated.as_str())
            }
            (Self::Moderated { post_moderated, .. }, Some(ModerationMode::PostModeration)) => {
                Some(post_moderated.as_str())
            }
            (Self::Moderated { .. }, None) => None,
        }
    }

    /// Every workflow id the binding can select.
    pub fn workflow_ids(&self) -> Vec<&str> {
        match self {
            Self::Fixed(id) => vec![id.as_str()],
            Self::Moderated {
                pre_moderated,
                post_moderated,
            } => vec![pre_moderated.as_str(), post_moderated.as_str()],
        }
    }
}

/// The on-disk registry document.
///
/// ```json
/// {
///   "workflows": [ { "id": "document", "states": [...], "transitions": [...] } ],
///   "bundles": { "document": "document" }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryDocument {
    pub workflows: Vec<Workflow>,

    #[serde(default)]
    pub bundles: HashMap<String, BundleWorkflow>,
}

/// Registry backed by definitions loaded at startup.
///
/// # Example
///
/// ```
/// use content_workflow::{BundleWorkflow, StaticWorkflowRegistry, Workflow, WorkflowRegistry};
///
/// let workflow = Workflow::from_json(r#"{
///     "id": "document",
///     "states": [{ "id": "__new__", "initial": true }, { "id": "validated", "published": true }],
///     "transitions": [{ "id": "validate", "from": ["__new__"], "to": "validated" }]
/// }"#).unwrap();
///
/// let mut registry = StaticWorkflowRegistry::new();
/// registry.register(workflow).unwrap();
/// registry.bind_bundle("document", BundleWorkflow::fixed("document")).unwrap();
///
/// assert!(registry.definition_of("document").is_ok());
/// assert!(registry.bind_bundle("news", BundleWorkflow::fixed("news")).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticWorkflowRegistry {
    workflows: HashMap<String, Arc<Workflow>>,
    bundles: HashMap<String, BundleWorkflow>,
}

impl StaticWorkflowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a parsed document.
    pub fn from_document(document: RegistryDocument) -> WorkflowResult<Self> {
        let mut registry = Self::new();
        for workflow in document.workflows {
            registry.register(workflow)?;
        }
        for (bundle, binding) in document.bundles {
            registry.bind_bundle(bundle, binding)?;
        }
        Ok(registry)
    }

    /// Parse and validate a registry document.
    pub fn from_json(json: &str) -> WorkflowResult<Self> {
        let document: RegistryDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    /// Register a workflow. Workflow ids are unique.
    pub fn register(&mut self, workflow: Workflow) -> WorkflowResult<()> {
        if self.workflows.contains_key(workflow.id()) {
            return Err(WorkflowError::InvalidDefinition {
                workflow: workflow.id().to_string(),
                message: "registered twice".to_string(),
            });
        }
        self.workflows
            .insert(workflow.id().to_string(), Arc::new(workflow));
        Ok(())
    }

    /// Bind a bundle to its workflow(s). Every target must be registered.
    pub fn bind_bundle(&mut self, bundle: impl Into<String>, binding: BundleWorkflow) -> WorkflowResult<()> {
        if let Some(missing) = binding
            .workflow_ids()
            .into_iter()
            .find(|id| !self.workflows.contains_key(*id))
        {
            return Err(WorkflowError::UnknownWorkflow(missing.to_string()));
        }
        self.bundles.insert(bundle.into(), binding);
        Ok(())
    }

    pub fn bundle(&self, bundle: &str) -> Option<&BundleWorkflow> {
        self.bundles.get(bundle)
    }

    pub fn len(&self) -> usize {
        self.workflows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }
}

impl WorkflowRegistry for StaticWorkflowRegistry {
    fn workflow_for(&self, item: &ContentItem, parent: Option<&GroupEntity>) -> WorkflowResult<String> {
        let binding = self
            .bundles
            .get(item.bundle())
            .ok_or_else(|| WorkflowError::NoWorkflowForBundle(item.bundle().to_string()))?;

        binding
            .select(parent.map(GroupEntity::moderation))
            .map(str::to_string)
            .ok_or_else(|| WorkflowError::ParentRequired(item.bundle().to_string()))
    }

    fn definition_of(&self, workflow_id: &str) -> WorkflowResult<Arc<Workflow>> {
        self.workflows
            .get(workflow_id)
            .cloned()
            .ok_or_else(|| WorkflowError::UnknownWorkflow(workflow_id.to_string()))
    }

    fn workflow_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.workflows.keys().cloned().collect();
        ids.sort_unstable();
        ids
    }
}
