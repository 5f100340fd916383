//! Workflow state names

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

use crate::error::{WorkflowError, WorkflowResult};

/// Initial pseudo-state of content that has not been saved yet.
pub const NEW_STATE: &str = "__new__";

/// Unpublished working state of content.
pub const DRAFT_STATE: &str = "draft";

/// Conventionally terminal state of content.
pub const ARCHIVED_STATE: &str = "archived";

/// The name of a workflow state.
///
/// Validated on construction: non-empty, no whitespace.
///
/// # Examples
///
/// ```
/// use content_workflow::StateName;
///
/// let state = StateName::new("validated").unwrap();
/// assert_eq!(state.as_str(), "validated");
/// assert!(StateName::new("").is_err());
/// assert!(StateName::new("in review").is_err());
/// assert!(StateName::new("__new__").unwrap().is_new());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StateName(String);

impl StateName {
    pub fn new(name: impl Into<String>) -> WorkflowResult<Self> {
        let name = name.into();
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(WorkflowError::InvalidStateName(name));
        }
        Ok(Self(name))
    }

    /// The `__new__` state.
    pub fn initial() -> Self {
        Self(NEW_STATE.to_string())
    }

    /// The `draft` state.
    pub fn draft() -> Self {
        Self(DRAFT_STATE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_new(&self) -> bool {
        self.0 == NEW_STATE
    }

    pub fn is_draft(&self) -> bool {
        self.0 == DRAFT_STATE
    }

    pub fn is_archived(&self) -> bool {
        self.0 == ARCHIVED_STATE
    }
}

impl fmt::Display for StateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StateName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for StateName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StateName {
    type Error = WorkflowError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for StateName {
    type Error = WorkflowError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StateName> for String {
    fn from(state: StateName) -> Self {
        state.0
    }
}

impl PartialEq<str> for StateName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for StateName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
