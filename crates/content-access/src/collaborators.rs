//! # Collaborators
//!
//! Everything the engine needs from the surrounding system, behind traits.
//! Implementations report lookup failures as
//! [`AccessError::CollaboratorUnavailable`](crate::AccessError) and must be
//! safe to call from several decisions at once.

use content_groups::GroupEntity;
use content_rbac::{Actor, Operation, PermissionScheme, RoleSet};
use content_workflow::ContentItem;

use crate::error::AccessResult;

/// Group-level view access.
pub trait GroupAccess: Send + Sync {
    /// Whether `actor` may see `group` at all.
    fn can_view(&self, group: &GroupEntity, actor: &Actor) -> AccessResult<bool>;
}

/// Group membership store.
pub trait Membership: Send + Sync {
    /// Group roles `actor` holds in `group`.
    ///
    /// Only active memberships yield roles.
    fn roles_of(&self, actor: &Actor, group: &GroupEntity) -> AccessResult<RoleSet>;

    /// Whether the actor's membership in `group` grants `capability`.
    ///
    /// `None` when the actor has no active membership in the group.
    fn has_permission(
        &self,
        actor: &Actor,
        group: &GroupEntity,
        capability: &str,
    ) -> AccessResult<Option<bool>>;
}

/// Resolution of the group a content item belongs to.
pub trait GroupLookup: Send + Sync {
    /// The item's audience group.
    fn parent_of(&self, item: &ContentItem) -> AccessResult<Option<GroupEntity>>;

    /// The group reached through the item's relation path.
    ///
    /// Defaults to the audience group.
    fn relation_parent_of(&self, item: &ContentItem) -> AccessResult<Option<GroupEntity>> {
        self.parent_of(item)
    }
}

/// Source of permission schemes.
pub trait ConfigStore: Send + Sync {
    /// Load the scheme of one operation.
    ///
    /// Fails with a configuration error if the scheme is missing or malformed.
    fn load_scheme(&self, operation: Operation) -> AccessResult<PermissionScheme>;
}
