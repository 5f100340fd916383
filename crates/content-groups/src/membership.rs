//! Membership domain models
//!
//! A membership links a user to a group, carrying the roles the user holds
//! there and any extra group-level permissions granted on top of them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::roles::GroupRole;

/// State of a group membership.
///
/// Only active memberships confer roles or permissions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MembershipState {
    /// Full member
    Active,

    /// Requested to join, awaiting approval
    Pending,

    /// Banned from the group
    Blocked,
}

impl Default for MembershipState {
    fn default() -> Self {
        Self::Active
    }
}

/// Group membership linking a user to a group.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use content_groups::{GroupMembership, GroupRole};
///
/// let group_id = Uuid::now_v7();
/// let user_id = Uuid::now_v7();
/// let membership = GroupMembership::new(group_id, user_id, GroupRole::Member)
///     .with_permission("post comments");
/// assert!(membership.is_active());
/// assert!(membership.has_permission("post comments"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMembership {
    /// Unique membership ID
    pub id: Uuid,

    /// Group ID
    pub group_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Roles within the group
    #[serde(default)]
    pub roles: Vec<GroupRole>,

    /// Membership state
    #[serde(default)]
    pub state: MembershipState,

    /// When the user joined
    pub joined_at: DateTime<Utc>,

    /// Group-level permissions granted to this membership
    ///
    /// Named capabilities such as `post comments`.
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl GroupMembership {
    /// Creates a new active membership holding a single role.
    ///
    /// # Arguments
    ///
    /// * `group_id` - The group ID
    /// * `user_id` - The user ID
    /// * `role` - The user's first role in the group
    pub fn new(group_id: Uuid, user_id: Uuid, role: GroupRole) -> Self {
        Self {
            id: Uuid::now_v7(),
            group_id,
            user_id,
            roles: vec![role],
            state: MembershipState::Active,
            joined_at: Utc::now(),
            permissions: Vec::new(),
        }
    }

    /// Add another role to the membership.
    pub fn with_role(mut self, role: GroupRole) -> Self {
        self.add_role(role);
        self
    }

    /// Set the membership state.
    pub fn with_state(mut self, state: MembershipState) -> Self {
        self.state = state;
        self
    }

    /// Grant a group-level permission.
    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.add_permission(permission);
        self
    }

    pub fn add_role(&mut self, role: GroupRole) {
        if !self.roles.contains(&role) {
            self.roles.push(role);
        }
    }

    /// Add a group-level permission to this membership.
    ///
    /// # Arguments
    ///
    /// * `permission` - The permission identifier to add
    pub fn add_permission(&mut self, permission: impl Into<String>) {
        let perm = permission.into();
        if !self.permissions.contains(&perm) {
            self.permissions.push(perm);
        }
    }

    /// Remove a group-level permission from this membership.
    pub fn remove_permission(&mut self, permission: &str) {
        self.permissions.retain(|p| p != permission);
    }

    pub fn is_active(&self) -> bool {
        self.state == MembershipState::Active
    }

    /// Roles this membership confers. Empty unless the membership is active.
    pub fn effective_roles(&self) -> &[GroupRole] {
        if self.is_active() {
            &self.roles
        } else {
            &[]
        }
    }

    /// Check if this membership grants a group-level permission.
    ///
    /// Inactive memberships grant nothing.
    ///
    /// # Arguments
    ///
    /// * `permission` - The permission identifier to check
    pub fn has_permission(&self, permission: &str) -> bool {
        self.is_active() && self.permissions.iter().any(|p| p == permission)
    }
}
