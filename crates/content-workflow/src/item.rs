//! Workflow-governed content items

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{WorkflowError, WorkflowResult};
use crate::state::StateName;
use crate::workflow::Workflow;

/// A content item governed by a workflow.
///
/// The item's state only changes through [`ContentItem::apply_transition`];
/// everything else about it is owned by the surrounding application.
///
/// # Examples
///
/// ```
/// use content_workflow::{ContentItem, StateName};
/// use uuid::Uuid;
///
/// let owner = Uuid::now_v7();
/// let group = Uuid::now_v7();
/// let item = ContentItem::new("document", StateName::draft(), owner)
///     .in_group(group)
///     .with_revision(1);
///
/// assert!(!item.is_new());
/// assert!(!item.has_published_version());
/// assert_eq!(item.parent_id(), Some(group));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    id: Uuid,
    bundle: String,
    state: StateName,
    #[serde(default)]
    published: bool,
    owner_id: Uuid,
    #[serde(default)]
    parent_id: Option<Uuid>,
    #[serde(default)]
    revision_id: Option<u64>,
    #[serde(default)]
    published_revision: bool,
}

impl ContentItem {
    /// Creates an unsaved, unpublished item with no parent.
    ///
    /// # Arguments
    ///
    /// * `bundle` - Content type (e.g. `document`, `discussion`)
    /// * `state` - Current workflow state
    /// * `owner_id` - The user who owns the item
    pub fn new(bundle: impl Into<String>, state: StateName, owner_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            bundle: bundle.into(),
            state,
            published: false,
            owner_id,
            parent_id: None,
            revision_id: None,
            published_revision: false,
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Place the item in a group.
    pub fn in_group(mut self, parent_id: Uuid) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Mark the item as saved with the given revision.
    pub fn with_revision(mut self, revision_id: u64) -> Self {
        self.revision_id = Some(revision_id);
        self
    }

    pub fn with_published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    /// Record that an earlier revision of the item was published.
    pub fn with_published_revision(mut self, published_revision: bool) -> Self {
        self.published_revision = published_revision;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn bundle(&self) -> &str {
        &self.bundle
    }

    pub fn state(&self) -> &StateName {
        &self.state
    }

    pub fn is_published(&self) -> bool {
        self.published
    }

    pub fn owner_id(&self) -> Uuid {
        self.owner_id
    }

    pub fn parent_id(&self) -> Option<Uuid> {
        self.parent_id
    }

    pub fn revision_id(&self) -> Option<u64> {
        self.revision_id
    }

    /// Whether the item has never been saved.
    pub fn is_new(&self) -> bool {
        self.revision_id.is_none()
    }

    /// Whether any version of the item has been published.
    ///
    /// Unsaved items never have; saved items have if the current revision is
    /// published or a published revision exists.
    pub fn has_published_version(&self) -> bool {
        !self.is_new() && (self.published || self.published_revision)
    }

    /// Fire a transition, moving the item to the transition's target state.
    ///
    /// The published flag follows the target state. Once published, the
    /// item keeps a published version even if it later leaves a published
    /// state.
    ///
    /// # Errors
    ///
    /// `UndeclaredState` if the item's state is not part of `workflow`,
    /// `InvalidTransition` if the transition is unknown or does not leave
    /// from the current state.
    pub fn apply_transition(&mut self, workflow: &Workflow, transition_id: &str) -> WorkflowResult<()> {
        workflow.ensure_state(self.state.as_str())?;
        let transition = workflow
            .transition(transition_id)
            .filter(|t| t.applies_from(self.state.as_str()))
            .ok_or_else(|| WorkflowError::InvalidTransition {
                transition: transition_id.to_string(),
                state: self.state.to_string(),
            })?;

        if self.published {
            self.published_revision = true;
        }
        self.state = transition.to.clone();
        self.published = workflow.is_published_state(self.state.as_str());
        Ok(())
    }
}
