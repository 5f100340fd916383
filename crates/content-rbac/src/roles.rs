//! # Roles
//!
//! Role names understood by permission schemes and the role sets built
//! from them.

use content_groups::GroupRole;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A role a permission scheme can grant.
///
/// Roles come from three sources:
/// - **Authentication status**: exactly one of `Anonymous` or `Authenticated`
/// - **Platform-wide**: `Moderator`, held regardless of group
/// - **Group membership**: `Owner`, `Member`, `Facilitator`, `Administrator`
///
/// # Example
///
/// ```
/// use content_rbac::Role;
///
/// assert_eq!(Role::parse("facilitator"), Some(Role::Facilitator));
/// assert_eq!(Role::parse("og_member"), Some(Role::Member));
/// assert!(Role::Member.is_group_role());
/// assert!(!Role::Moderator.is_group_role());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Not logged in.
    Anonymous,

    /// Logged in.
    Authenticated,

    /// Platform-wide content moderator.
    Moderator,

    /// Owner of the group.
    #[serde(alias = "og_owner")]
    Owner,

    /// Member of the group.
    #[serde(alias = "og_member")]
    Member,

    /// Facilitator of the group.
    #[serde(alias = "og_facilitator")]
    Facilitator,

    /// Administrator of the group.
    #[serde(alias = "og_administrator")]
    Administrator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Anonymous => "anonymous",
            Role::Authenticated => "authenticated",
            Role::Moderator => "moderator",
            Role::Owner => "owner",
            Role::Member => "member",
            Role::Facilitator => "facilitator",
            Role::Administrator => "administrator",
        }
    }

    /// Parse role from string representation.
    ///
    /// Group roles may carry an `og_` prefix, as written in scheme files
    /// that distinguish site roles from group roles.
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        let name = lower.strip_prefix("og_").unwrap_or(lower.as_str());
        match name {
            "anonymous" => Some(Role::Anonymous),
            "authenticated" => Some(Role::Authenticated),
            "moderator" => Some(Role::Moderator),
            "owner" => Some(Role::Owner),
            "member" => Some(Role::Member),
            "facilitator" => Some(Role::Facilitator),
            "administrator" => Some(Role::Administrator),
            _ => None,
        }
    }

    /// Whether this role is only ever held through group membership.
    pub fn is_group_role(&self) -> bool {
        matches!(
            self,
            Role::Owner | Role::Member | Role::Facilitator | Role::Administrator
        )
    }

    /// All roles.
    pub fn all() -> [Role; 7] {
        [
            Role::Anonymous,
            Role::Authenticated,
            Role::Moderator,
            Role::Owner,
            Role::Member,
            Role::Facilitator,
            Role::Administrator,
        ]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<GroupRole> for Role {
    fn from(role: GroupRole) -> Self {
        match role {
            GroupRole::Member => Role::Member,
            GroupRole::Facilitator => Role::Facilitator,
            GroupRole::Administrator => Role::Administrator,
            GroupRole::Owner => Role::Owner,
        }
    }
}

/// An ordered set of roles.
///
/// # Example
///
/// ```
/// use content_rbac::{Role, RoleSet};
///
/// let granted = RoleSet::from_roles([Role::Moderator, Role::Facilitator]);
/// let held = RoleSet::from_roles([Role::Authenticated, Role::Facilitator]);
///
/// assert!(granted.intersects(&held));
/// assert_eq!(granted.intersection(&held), RoleSet::from_roles([Role::Facilitator]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet {
    roles: BTreeSet<Role>,
}

impl RoleSet {
    /// Create a new empty role set.
    pub fn new() -> Self {
        Self {
            roles: BTreeSet::new(),
        }
    }

    pub fn from_roles<I>(roles: I) -> Self
    where
        I: IntoIterator<Item = Role>,
    {
        roles.into_iter().collect()
    }

    /// Add a role. Returns `true` if it was not present yet.
    pub fn insert(&mut self, role: Role) -> bool {
        self.roles.insert(role)
    }

    pub fn contains(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Whether the two sets share at least one role.
    pub fn intersects(&self, other: &RoleSet) -> bool {
        !self.roles.is_disjoint(&other.roles)
    }

    pub fn intersection(&self, other: &RoleSet) -> RoleSet {
        self.roles.intersection(&other.roles).copied().collect()
    }

    /// Merge another role set into this one.
    pub fn merge(&mut self, other: &RoleSet) {
        self.roles.extend(other.roles.iter().copied());
    }

    pub fn union(&self, other: &RoleSet) -> RoleSet {
        let mut merged = self.clone();
        merged.merge(other);
        merged
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.roles.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<T: IntoIterator<Item = Role>>(iter: T) -> Self {
        Self {
            roles: iter.into_iter().collect(),
        }
    }
}

impl Extend<Role> for RoleSet {
    fn extend<T: IntoIterator<Item = Role>>(&mut self, iter: T) {
        self.roles.extend(iter);
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.roles.iter().map(Role::as_str).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        for role in Role::all() {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("OG_FACILITATOR"), Some(Role::Facilitator));
        assert_eq!(Role::parse("editor"), None);
    }

    #[test]
    fn test_group_role_conversion() {
        assert_eq!(Role::from(GroupRole::Member), Role::Member);
        assert_eq!(Role::from(GroupRole::Owner), Role::Owner);
        assert!(GroupRole::all().iter().all(|r| Role::from(*r).is_group_role()));
    }

    #[test]
    fn test_role_set_operations() {
        let mut set = RoleSet::new();
        assert!(set.is_empty());
        assert!(set.insert(Role::Member));
        assert!(!set.insert(Role::Member));

        let other = RoleSet::from_roles([Role::Facilitator, Role::Moderator]);
        assert!(!set.intersects(&other));

        set.merge(&other);
        assert_eq!(set.len(), 3);
        assert!(set.contains(Role::Moderator));
        assert!(set.intersects(&other));
    }

    #[test]
    fn test_role_set_serde() {
        let set: RoleSet = serde_json::from_str(r#"["moderator", "facilitator"]"#).unwrap();
        assert_eq!(set, RoleSet::from_roles([Role::Facilitator, Role::Moderator]));
        assert!(serde_json::from_str::<RoleSet>(r#"["editor"]"#).is_err());
    }

    #[test]
    fn test_role_set_display() {
        let set = RoleSet::from_roles([Role::Member, Role::Authenticated]);
        assert_eq!(set.to_string(), "[authenticated, member]");
    }
}
