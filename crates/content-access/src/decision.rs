//! Tri-state access decisions

use serde::{Deserialize, Serialize};
use std::fmt;

/// The outcome of an access check.
///
/// `Neutral` means "no opinion": the engine defers to whatever default the
/// surrounding system applies. It is distinct from `Forbidden`, which is a
/// definitive denial that no other check can override.
///
/// # Example
///
/// ```
/// use content_access::Decision;
///
/// assert_eq!(Decision::allowed_if(true), Decision::Allowed);
/// assert_eq!(Decision::allowed_if(false), Decision::Forbidden);
///
/// // Forbidden wins every combination
/// assert_eq!(Decision::Allowed.or(Decision::Forbidden), Decision::Forbidden);
/// assert_eq!(Decision::Neutral.or(Decision::Allowed), Decision::Allowed);
/// assert_eq!(Decision::Allowed.and(Decision::Neutral), Decision::Neutral);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Access is granted.
    Allowed,

    /// Access is denied.
    Forbidden,

    /// No opinion.
    #[default]
    Neutral,
}

impl Decision {
    /// `Allowed` if the condition holds, `Forbidden` otherwise.
    pub fn allowed_if(condition: bool) -> Self {
        if condition {
            Decision::Allowed
        } else {
            Decision::Forbidden
        }
    }

    /// `Forbidden` if the condition holds, `Neutral` otherwise.
    pub fn forbidden_if(condition: bool) -> Self {
        if condition {
            Decision::Forbidden
        } else {
            Decision::Neutral
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, Decision::Forbidden)
    }

    pub fn is_neutral(&self) -> bool {
        matches!(self, Decision::Neutral)
    }

    /// Both checks must allow.
    pub fn and(self, other: Decision) -> Decision {
        match (self, other) {
            (Decision::Forbidden, _) | (_, Decision::Forbidden) => Decision::Forbidden,
            (Decision::Neutral, _) | (_, Decision::Neutral) => Decision::Neutral,
            (Decision::Allowed, Decision::Allowed) => Decision::Allowed,
        }
    }

    /// Either check may allow; a denial still wins.
    pub fn or(self, other: Decision) -> Decision {
        match (self, other) {
            (Decision::Forbidden, _) | (_, Decision::Forbidden) => Decision::Forbidden,
            (Decision::Allowed, _) | (_, Decision::Allowed) => Decision::Allowed,
            (Decision::Neutral, Decision::Neutral) => Decision::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Allowed => "allowed",
            Decision::Forbidden => "forbidden",
            Decision::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
