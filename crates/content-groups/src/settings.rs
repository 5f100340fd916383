//! Group content settings
//!
//! Settings on a group that shape how content inside it is governed:
//! the moderation mode (which workflow group content follows) and the
//! e-library creation mode (who may create content at all).
//!
//! Both settings are fixed when the group is created.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Moderation policy of a group.
///
/// Pre-moderated groups send new content through a proposal step before
/// it becomes visible; post-moderated groups publish directly and moderate
/// afterwards.
///
/// The stored flag follows the platform convention: `1` for pre-moderation,
/// `0` for post-moderation.
///
/// # Examples
///
/// ```
/// use content_groups::ModerationMode;
///
/// assert_eq!(ModerationMode::from_flag(1), Some(ModerationMode::PreModeration));
/// assert_eq!(ModerationMode::PostModeration.flag(), 0);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ModerationMode {
    /// Content is published and moderated afterwards.
    PostModeration,

    /// Content needs approval before it is published.
    PreModeration,
}

impl ModerationMode {
    /// Map the stored flag to a mode.
    pub fn from_flag(flag: u8) -> Option<Self> {
        match flag {
            0 => Some(Self::PostModeration),
            1 => Some(Self::PreModeration),
            _ => None,
        }
    }

    /// The stored flag for this mode.
    pub fn flag(&self) -> u8 {
        match self {
            Self::PostModeration => 0,
            Self::PreModeration => 1,
        }
    }

    /// Parse from the snake_case name or the numeric flag.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "post_moderation" | "post_moderated" | "0" => Some(Self::PostModeration),
            "pre_moderation" | "pre_moderated" | "1" => Some(Self::PreModeration),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PostModeration => "post_moderation",
            Self::PreModeration => "pre_moderation",
        }
    }

    pub fn is_pre_moderated(&self) -> bool {
        matches!(self, Self::PreModeration)
    }
}

impl Default for ModerationMode {
    fn default() -> Self {
        Self::PostModeration
    }
}

/// E-library creation mode of a group.
///
/// Controls which roles may create content in the group. The permission
/// scheme's `create` section is keyed by this value.
///
/// Stored numerically as `0`, `1`, `2` in declaration order; the snake_case
/// names are accepted everywhere the number is.
///
/// # Examples
///
/// ```
/// use content_groups::ELibraryMode;
///
/// assert_eq!(ELibraryMode::parse("0"), Some(ELibraryMode::OnlyFacilitators));
/// assert_eq!(ELibraryMode::parse("registered_users"), Some(ELibraryMode::RegisteredUsers));
/// assert_eq!(ELibraryMode::MembersFacilitators.as_str(), "members_facilitators");
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum ELibraryMode {
    /// Only facilitators may create content.
    OnlyFacilitators = 0,

    /// Members and facilitators may create content.
    MembersFacilitators = 1,

    /// Any registered user may create content.
    RegisteredUsers = 2,
}

impl ELibraryMode {
    /// All modes in storage order.
    pub fn all() -> [Self; 3] {
        [
            Self::OnlyFacilitators,
            Self::MembersFacilitators,
            Self::RegisteredUsers,
        ]
    }

    /// Parse from the snake_case name or the numeric storage value.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "only_facilitators" | "0" => Some(Self::OnlyFacilitators),
            "members_facilitators" | "1" => Some(Self::MembersFacilitators),
            "registered_users" | "2" => Some(Self::RegisteredUsers),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnlyFacilitators => "only_facilitators",
            Self::MembersFacilitators => "members_facilitators",
            Self::RegisteredUsers => "registered_users",
        }
    }

    /// The numeric storage value.
    pub fn value(&self) -> u8 {
        *self as u8
    }
}

impl Default for ELibraryMode {
    fn default() -> Self {
        Self::OnlyFacilitators
    }
}

impl fmt::Display for ELibraryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for ELibraryMode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("unknown e-library mode: {value}"))
    }
}

impl From<ELibraryMode> for String {
    fn from(mode: ELibraryMode) -> Self {
        mode.as_str().to_string()
    }
}

/// Content settings of a group.
///
/// # Examples
///
/// ```
/// use content_groups::settings::GroupSettings;
/// use content_groups::{ELibraryMode, ModerationMode};
///
/// let settings = GroupSettings::default();
/// assert_eq!(settings.moderation, ModerationMode::PostModeration);
/// assert_eq!(settings.e_library, ELibraryMode::OnlyFacilitators);
/// ```
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupSettings {
    /// Moderation mode
    #[serde(default)]
    pub moderation: ModerationMode,

    /// E-library creation mode
    #[serde(default)]
    pub e_library: ELibraryMode,
}

impl GroupSettings {
    pub fn new(moderation: ModerationMode, e_library: ELibraryMode) -> Self {
        Self {
            moderation,
            e_library,
        }
    }
}
