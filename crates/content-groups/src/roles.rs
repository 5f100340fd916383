//! Group roles
//!
//! Roles a user can hold through membership of a group. Unlike platform-wide
//! roles these only exist relative to one group.

use serde::{Deserialize, Serialize};

/// Role held through membership of a group.
///
/// A membership may carry several roles at once (a facilitator is usually
/// also a member). Roles are not hierarchical: each one is granted or not
/// by the permission scheme on its own.
///
/// # Examples
///
/// ```
/// use content_groups::GroupRole;
///
/// assert_eq!(GroupRole::parse("facilitator"), Some(GroupRole::Facilitator));
/// assert_eq!(GroupRole::Administrator.as_str(), "administrator");
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GroupRole {
    /// Plain member of the group
    Member,

    /// Facilitator (curates group content)
    Facilitator,

    /// Group administrator
    Administrator,

    /// Owner of the group
    Owner,
}

impl GroupRole {
    /// Parse role from string representation.
    ///
    /// Accepts the bare role name as well as the `<entity>-<bundle>-<role>`
    /// ids used by group role configuration (e.g. `rdf_entity-collection-member`).
    ///
    /// # Examples
    ///
    /// ```
    /// use content_groups::GroupRole;
    ///
    /// assert_eq!(GroupRole::parse("MEMBER"), Some(GroupRole::Member));
    /// assert_eq!(
    ///     GroupRole::parse("rdf_entity-solution-facilitator"),
    ///     Some(GroupRole::Facilitator)
    /// );
    /// assert_eq!(GroupRole::parse("invalid"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        let name = lower.rsplit('-').next().unwrap_or(lower.as_str());
        match name {
            "member" => Some(Self::Member),
            "facilitator" => Some(Self::Facilitator),
            "administrator" => Some(Self::Administrator),
            "owner" => Some(Self::Owner),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Facilitator => "facilitator",
            Self::Administrator => "administrator",
            Self::Owner => "owner",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Member => "Member",
            Self::Facilitator => "Facilitator",
            Self::Administrator => "Administrator",
            Self::Owner => "Owner",
        }
    }

    /// All group roles.
    pub fn all() -> [Self; 4] {
        [Self::Member, Self::Facilitator, Self::Administrator, Self::Owner]
    }
}
