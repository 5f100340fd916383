//! Group domain models
//!
//! A group is the container that content items belong to (a collection or a
//! solution). Groups are owned by the surrounding application; access
//! control only reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

use crate::settings::{ELibraryMode, GroupSettings, ModerationMode};

/// Kind of group.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GroupBundle {
    /// A collection of content and solutions
    Collection,

    /// A solution grouping its own releases and content
    Solution,
}

impl GroupBundle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Collection => "collection",
            Self::Solution => "solution",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "collection" => Some(Self::Collection),
            "solution" => Some(Self::Solution),
            _ => None,
        }
    }
}

impl fmt::Display for GroupBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workflow state of a group.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GroupState {
    /// Being prepared by its owner, not yet proposed
    Draft,

    /// Proposed and awaiting validation
    Proposed,

    /// Published
    Validated,

    /// Owner asked for the group to be archived
    ArchivalRequest,

    /// Owner asked for the group to be deleted
    DeletionRequest,

    /// Archived; content is read-only
    Archived,
}

impl GroupState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Proposed => "proposed",
            Self::Validated => "validated",
            Self::ArchivalRequest => "archival_request",
            Self::DeletionRequest => "deletion_request",
            Self::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "proposed" => Some(Self::Proposed),
            "validated" => Some(Self::Validated),
            "archival_request" => Some(Self::ArchivalRequest),
            "deletion_request" => Some(Self::DeletionRequest),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }

    /// Whether the group is publicly visible in this state.
    ///
    /// Groups with a pending archival or deletion request are still published.
    pub fn is_published(&self) -> bool {
        matches!(
            self,
            Self::Validated | Self::ArchivalRequest | Self::DeletionRequest | Self::Archived
        )
    }

    pub fn is_archived(&self) -> bool {
        matches!(self, Self::Archived)
    }
}

impl fmt::Display for GroupState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A group entity: the parent container of workflow-governed content.
///
/// # Examples
///
/// ```
/// use content_groups::{GroupBundle, GroupEntity, GroupState, ModerationMode, ELibraryMode};
///
/// let group = GroupEntity::new(GroupBundle::Collection, "Open Data")
///     .with_state(GroupState::Validated)
///     .with_moderation(ModerationMode::PreModeration)
///     .with_e_library(ELibraryMode::RegisteredUsers);
///
/// assert!(group.state.is_published());
/// assert_eq!(group.moderation(), ModerationMode::PreModeration);
/// assert_eq!(group.e_library(), ELibraryMode::RegisteredUsers);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupEntity {
    /// Unique identifier for the group
    pub id: Uuid,

    /// Collection or solution
    pub bundle: GroupBundle,

    /// Human-readable label
    pub label: String,

    /// Current workflow state
    pub state: GroupState,

    /// Content settings
    #[serde(default)]
    pub settings: GroupSettings,

    /// Owner user ID (the user who created the group)
    pub owner_id: Option<Uuid>,

    /// When the group was created
    pub created_at: DateTime<Utc>,

    /// Custom metadata for extensibility
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl GroupEntity {
    /// Creates a new draft group with default settings.
    ///
    /// # Arguments
    ///
    /// * `bundle` - Collection or solution
    /// * `label` - The group label
    pub fn new(bundle: GroupBundle, label: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            bundle,
            label: label.into(),
            state: GroupState::Draft,
            settings: GroupSettings::default(),
            owner_id: None,
            created_at: Utc::now(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn with_state(mut self, state: GroupState) -> Self {
        self.state = state;
        self
    }

    pub fn with_moderation(mut self, moderation: ModerationMode) -> Self {
        self.settings.moderation = moderation;
        self
    }

    pub fn with_e_library(mut self, e_library: ELibraryMode) -> Self {
        self.settings.e_library = e_library;
        self
    }

    pub fn with_owner(mut self, owner_id: Uuid) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn moderation(&self) -> ModerationMode {
        self.settings.moderation
    }

    pub fn e_library(&self) -> ELibraryMode {
        self.settings.e_library
    }

    pub fn is_collection(&self) -> bool {
        self.bundle == GroupBundle::Collection
    }

    pub fn is_solution(&self) -> bool {
        self.bundle == GroupBundle::Solution
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_creation() {
        let group = GroupEntity::new(GroupBundle::Solution, "Interop Toolkit");

        assert_eq!(group.label, "Interop Toolkit");
        assert_eq!(group.state, GroupState::Draft);
        assert!(group.is_solution());
        assert!(!group.is_collection());
        assert_eq!(group.moderation(), ModerationMode::PostModeration);
        assert!(group.owner_id.is_none());
    }

    #[test]
    fn test_group_state_parse() {
        for state in [
            GroupState::Draft,
            GroupState::Proposed,
            GroupState::Validated,
            GroupState::ArchivalRequest,
            GroupState::DeletionRequest,
            GroupState::Archived,
        ] {
            assert_eq!(GroupState::parse(state.as_str()), Some(state));
        }
        assert_eq!(GroupState::parse("published"), None);
    }

    #[test]
    fn test_group_state_visibility() {
        assert!(!GroupState::Draft.is_published());
        assert!(!GroupState::Proposed.is_published());
        assert!(GroupState::Validated.is_published());
        assert!(GroupState::ArchivalRequest.is_published());
        assert!(GroupState::Archived.is_published());
        assert!(GroupState::Archived.is_archived());
    }

    #[test]
    fn test_group_deserialize() {
        let json = r#"{
            "id": "0190f5a2-3c4e-7b8a-9d1f-2a3b4c5d6e7f",
            "bundle": "collection",
            "label": "Semantic Assets",
            "state": "validated",
            "settings": { "moderation": "pre_moderation", "e_library": "1" },
            "owner_id": null,
            "created_at": "2024-01-01T00:00:00Z"
        }"#;
        let group: GroupEntity = serde_json::from_str(json).unwrap();
        assert!(group.is_collection());
        assert_eq!(group.state, GroupState::Validated);
        assert_eq!(group.e_library(), ELibraryMode::MembersFacilitators);
        assert!(group.metadata.is_empty());
    }
}
