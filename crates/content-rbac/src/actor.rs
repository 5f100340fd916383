//! # Actors
//!
//! The user on whose behalf an access decision is made. Every decision
//! takes the actor explicitly; there is no ambient current user.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::roles::{Role, RoleSet};

/// A requesting user.
///
/// Carries what is known about the user independently of any group:
/// authentication status, platform-wide roles and platform-wide
/// capabilities. Group roles are resolved separately per group.
///
/// # Example
///
/// ```
/// use content_rbac::{Actor, Role};
/// use uuid::Uuid;
///
/// let moderator = Actor::new(Uuid::now_v7())
///     .with_role(Role::Moderator)
///     .with_capability("access draft community content");
/// assert!(moderator.has_capability("access draft community content"));
/// assert_eq!(moderator.implicit_role(), Role::Authenticated);
///
/// let anonymous = Actor::anonymous();
/// assert_eq!(anonymous.implicit_role(), Role::Anonymous);
/// assert!(!anonymous.owns(anonymous.id));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// User ID (nil for anonymous users)
    pub id: Uuid,

    /// Whether the user is logged in
    pub authenticated: bool,

    /// Platform-wide roles (e.g. moderator)
    #[serde(default)]
    pub roles: RoleSet,

    /// Platform-wide capabilities (named permissions)
    #[serde(default)]
    pub capabilities: BTreeSet<String>,
}

impl Actor {
    /// Creates an authenticated actor with no platform roles.
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            authenticated: true,
            roles: RoleSet::new(),
            capabilities: BTreeSet::new(),
        }
    }

    /// Creates the anonymous actor.
    pub fn anonymous() -> Self {
        Self {
            id: Uuid::nil(),
            authenticated: false,
            roles: RoleSet::new(),
            capabilities: BTreeSet::new(),
        }
    }

    /// Add a platform-wide role.
    ///
    /// Group roles and authentication roles are ignored here: the former are
    /// resolved per group, the latter follow from `authenticated`.
    pub fn with_role(mut self, role: Role) -> Self {
        if is_platform_wide(role) {
            self.roles.insert(role);
        }
        self
    }

    /// Add a platform-wide capability.
    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.insert(capability.into());
        self
    }

    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.contains(capability)
    }

    pub fn is_anonymous(&self) -> bool {
        !self.authenticated
    }

    /// `Authenticated` or `Anonymous`, depending on login status.
    pub fn implicit_role(&self) -> Role {
        if self.authenticated {
            Role::Authenticated
        } else {
            Role::Anonymous
        }
    }

    /// Whether this actor is the given owner. Anonymous actors own nothing.
    pub fn owns(&self, owner_id: Uuid) -> bool {
        self.authenticated && self.id == owner_id
    }

    /// Platform-wide roles plus the implicit authentication role.
    ///
    /// Group and authentication roles in `roles` are dropped, whichever way
    /// the actor was built.
    pub fn platform_roles(&self) -> RoleSet {
        let mut roles: RoleSet = self.roles.iter().filter(|r| is_platform_wide(*r)).collect();
        roles.insert(self.implicit_role());
        roles
    }
}

fn is_platform_wide(role: Role) -> bool {
    !role.is_group_role() && !matches!(role, Role::Anonymous | Role::Authenticated)
}
