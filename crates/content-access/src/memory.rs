//! In-memory group directory.
//!
//! Implements every group-side collaborator over plain maps. Suitable for
//! single-process deployments and testing; production systems implement the
//! collaborator traits over their own entity storage.

use content_groups::{GroupEntity, GroupMembership};
use content_rbac::{Actor, Role, RoleSet};
use content_workflow::ContentItem;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::collaborators::{GroupAccess, GroupLookup, Membership};
use crate::error::{AccessError, AccessResult};

/// Directory statistics.
#[derive(Debug, Clone, Default)]
pub struct DirectoryStats {
    /// Membership lookups served
    pub membership_lookups: u64,
    /// Group lookups served
    pub group_lookups: u64,
}

#[derive(Debug, Default)]
struct DirectoryState {
    groups: HashMap<Uuid, GroupEntity>,
    /// Memberships keyed by (group, user)
    memberships: HashMap<(Uuid, Uuid), GroupMembership>,
    /// Relation-path parents keyed by item
    relation_parents: HashMap<Uuid, Uuid>,
}

/// In-memory groups, memberships and item relations.
///
/// Unpublished groups are visible to their owner, to members with an active
/// membership and to platform moderators; published groups to everyone.
///
/// # Example
///
/// ```
/// use content_access::{GroupAccess, MemoryDirectory, Membership};
/// use content_groups::{GroupBundle, GroupEntity, GroupMembership, GroupRole, GroupState};
/// use content_rbac::{Actor, Role};
/// use uuid::Uuid;
///
/// let directory = MemoryDirectory::new();
/// let group = GroupEntity::new(GroupBundle::Collection, "Open Data")
///     .with_state(GroupState::Validated);
/// let actor = Actor::new(Uuid::now_v7());
///
/// directory.add_group(group.clone());
/// directory.add_membership(GroupMembership::new(group.id, actor.id, GroupRole::Facilitator));
///
/// assert!(directory.can_view(&group, &Actor::anonymous()).unwrap());
/// assert!(directory.roles_of(&actor, &group).unwrap().contains(Role::Facilitator));
/// ```
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    state: RwLock<DirectoryState>,
    offline: AtomicBool,
    membership_lookups: AtomicU64,
    group_lookups: AtomicU64,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a group.
    pub fn add_group(&self, group: GroupEntity) {
        self.write().groups.insert(group.id, group);
    }

    pub fn group(&self, group_id: Uuid) -> Option<GroupEntity> {
        self.read().groups.get(&group_id).cloned()
    }

    pub fn remove_group(&self, group_id: Uuid) -> Option<GroupEntity> {
        let mut state = self.write();
        state.memberships.retain(|(group, _), _| *group != group_id);
        state.relation_parents.retain(|_, group| *group != group_id);
        state.groups.remove(&group_id)
    }

    /// Add or replace a membership.
    pub fn add_membership(&self, membership: GroupMembership) {
        self.write()
            .memberships
            .insert((membership.group_id, membership.user_id), membership);
    }

    pub fn membership(&self, group_id: Uuid, user_id: Uuid) -> Option<GroupMembership> {
        self.read().memberships.get(&(group_id, user_id)).cloned()
    }

    pub fn remove_membership(&self, group_id: Uuid, user_id: Uuid) -> Option<GroupMembership> {
        self.write().memberships.remove(&(group_id, user_id))
    }

    /// Record the group reached through an item's relation path.
    pub fn relate(&self, item_id: Uuid, group_id: Uuid) {
        self.write().relation_parents.insert(item_id, group_id);
    }

    /// Simulate the backing store going away. Every lookup fails while offline.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn stats(&self) -> DirectoryStats {
        DirectoryStats {
            membership_lookups: self.membership_lookups.load(Ordering::Relaxed),
            group_lookups: self.group_lookups.load(Ordering::Relaxed),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, DirectoryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, DirectoryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_online(&self) -> AccessResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(AccessError::CollaboratorUnavailable(
                "group directory is offline".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    fn active_membership(&self, group_id: Uuid, actor: &Actor) -> Option<GroupMembership> {
        if actor.is_anonymous() {
            return None;
        }
        self.read()
            .memberships
            .get(&(group_id, actor.id))
            .filter(|m| m.is_active())
            .cloned()
    }

    fn resolve(&self, group_id: Uuid) -> AccessResult<GroupEntity> {
        self.group_lookups.fetch_add(1, Ordering::Relaxed);
        self.group(group_id).ok_or_else(|| {
            AccessError::Configuration(format!("content references unknown group {group_id}"))
        })
    }
}

impl GroupAccess for MemoryDirectory {
    fn can_view(&self, group: &GroupEntity, actor: &Actor) -> AccessResult<bool> {
        self.ensure_online()?;
        if group.state.is_published() || actor.roles.contains(Role::Moderator) {
            return Ok(true);
        }
        if actor.is_anonymous() {
            return Ok(false);
        }
        if group.owner_id == Some(actor.id) {
            return Ok(true);
        }
        Ok(self.active_membership(group.id, actor).is_some())
    }
}

impl Membership for MemoryDirectory {
    fn roles_of(&self, actor: &Actor, group: &GroupEntity) -> AccessResult<RoleSet> {
        self.ensure_online()?;
        self.membership_lookups.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .active_membership(group.id, actor)
            .map(|m| m.effective_roles().iter().copied().map(Role::from).collect())
            .unwrap_or_default())
    }

    fn has_permission(
        &self,
        actor: &Actor,
        group: &GroupEntity,
        capability: &str,
    ) -> AccessResult<Option<bool>> {
        self.ensure_online()?;
        Ok(self
            .active_membership(group.id, actor)
            .map(|m| m.has_permission(capability)))
    }
}

impl GroupLookup for MemoryDirectory {
    fn parent_of(&self, item: &ContentItem) -> AccessResult<Option<GroupEntity>> {
        self.ensure_online()?;
        item.parent_id().map(|id| self.resolve(id)).transpose()
    }

    fn relation_parent_of(&self, item: &ContentItem) -> AccessResult<Option<GroupEntity>> {
        self.ensure_online()?;
        let related = self.read().relation_parents.get(&item.id()).copied();
        match related {
            Some(group_id) => self.resolve(group_id).map(Some),
            None => self.parent_of(item),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use content_groups::{GroupBundle, GroupRole, GroupState, MembershipState};
    use content_workflow::StateName;

    fn setup() -> (MemoryDirectory, GroupEntity) {
        let directory = MemoryDirectory::new();
        let group = GroupEntity::new(GroupBundle::Solution, "Validator");
        directory.add_group(group.clone());
        (directory, group)
    }

    #[test]
    fn test_unpublished_group_visibility() {
        let (directory, group) = setup();
        let owner = Actor::new(Uuid::now_v7());
        let member = Actor::new(Uuid::now_v7());
        let stranger = Actor::new(Uuid::now_v7());
        let moderator = Actor::new(Uuid::now_v7()).with_role(Role::Moderator);

        let group = group.with_owner(owner.id);
        directory.add_group(group.clone());
        directory.add_membership(GroupMembership::new(group.id, member.id, GroupRole::Member));

        assert!(directory.can_view(&group, &owner).unwrap());
        assert!(directory.can_view(&group, &member).unwrap());
        assert!(directory.can_view(&group, &moderator).unwrap());
        assert!(!directory.can_view(&group, &stranger).unwrap());
        assert!(!directory.can_view(&group, &Actor::anonymous()).unwrap());

        let published = group.with_state(GroupState::Validated);
        assert!(directory.can_view(&published, &Actor::anonymous()).unwrap());
    }

    #[test]
    fn test_inactive_membership_yields_nothing() {
        let (directory, group) = setup();
        let actor = Actor::new(Uuid::now_v7());
        directory.add_membership(
            GroupMembership::new(group.id, actor.id, GroupRole::Facilitator)
                .with_state(MembershipState::Blocked)
                .with_permission("post comments"),
        );

        assert!(directory.roles_of(&actor, &group).unwrap().is_empty());
        assert_eq!(directory.has_permission(&actor, &group, "post comments").unwrap(), None);
        assert!(!directory.can_view(&group, &actor).unwrap());
    }

    #[test]
    fn test_membership_roles_and_permissions() {
        let (directory, group) = setup();
        let actor = Actor::new(Uuid::now_v7());
        directory.add_membership(
            GroupMembership::new(group.id, actor.id, GroupRole::Member)
                .with_role(GroupRole::Administrator)
                .with_permission("post comments"),
        );

        let roles = directory.roles_of(&actor, &group).unwrap();
        assert_eq!(roles, RoleSet::from_roles([Role::Member, Role::Administrator]));
        assert_eq!(
            directory.has_permission(&actor, &group, "post comments").unwrap(),
            Some(true)
        );
        assert_eq!(
            directory.has_permission(&actor, &group, "delete any content").unwrap(),
            Some(false)
        );
        assert_eq!(
            directory
                .has_permission(&Actor::anonymous(), &group, "post comments")
                .unwrap(),
            None
        );
        assert_eq!(directory.stats().membership_lookups, 1);
    }

    #[test]
    fn test_parent_lookup() {
        let (directory, group) = setup();
        let owner = Uuid::now_v7();
        let orphan = ContentItem::new("news", StateName::draft(), owner);
        let child = orphan.clone().in_group(group.id);
        let dangling = orphan.clone().in_group(Uuid::now_v7());

        assert!(directory.parent_of(&orphan).unwrap().is_none());
        assert_eq!(directory.parent_of(&child).unwrap().map(|g| g.id), Some(group.id));
        assert!(matches!(
            directory.parent_of(&dangling),
            Err(AccessError::Configuration(_))
        ));
    }

    #[test]
    fn test_relation_parent_falls_back() {
        let (directory, group) = setup();
        let other = GroupEntity::new(GroupBundle::Collection, "Related");
        directory.add_group(other.clone());

        let item = ContentItem::new("discussion", StateName::draft(), Uuid::now_v7()).in_group(group.id);
        assert_eq!(
            directory.relation_parent_of(&item).unwrap().map(|g| g.id),
            Some(group.id)
        );

        directory.relate(item.id(), other.id);
        assert_eq!(
            directory.relation_parent_of(&item).unwrap().map(|g| g.id),
            Some(other.id)
        );
    }

    #[test]
    fn test_offline() {
        let (directory, group) = setup();
        directory.set_offline(true);

        let actor = Actor::new(Uuid::now_v7());
        assert!(matches!(
            directory.roles_of(&actor, &group),
            Err(AccessError::CollaboratorUnavailable(_))
        ));
        assert!(directory.can_view(&group, &actor).is_err());

        directory.set_offline(false);
        assert!(directory.roles_of(&actor, &group).is_ok());
    }

    #[test]
    fn test_remove_group_drops_memberships() {
        let (directory, group) = setup();
        let user = Uuid::now_v7();
        directory.add_membership(GroupMembership::new(group.id, user, GroupRole::Member));

        assert!(directory.remove_group(group.id).is_some());
        assert!(directory.membership(group.id, user).is_none());
        assert!(directory.group(group.id).is_none());
    }
}
