//! # Operations
//!
//! Operations an actor can request on a workflow-governed content item.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operations that can be performed on content items.
///
/// - **View**: See the item
/// - **Create**: Create an item inside a group
/// - **Update**: Edit the item, i.e. fire a workflow transition out of its state
/// - **Delete**: Remove the item
/// - **PostComment**: Comment on the item
///
/// The first four are governed by a permission scheme; commenting is governed
/// by the group membership.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// View the item.
    View,

    /// Create an item.
    Create,

    /// Update the item.
    Update,

    /// Delete the item.
    Delete,

    /// Post a comment on the item.
    #[serde(alias = "post comments")]
    PostComment,
}

impl Operation {
    /// Get the string representation of the operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::View => "view",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::PostComment => "post_comment",
        }
    }

    /// Parse operation from string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive, supports aliases)
    ///
    /// # Example
    ///
    /// ```
    /// use content_rbac::Operation;
    ///
    /// assert_eq!(Operation::parse("view"), Some(Operation::View));
    /// assert_eq!(Operation::parse("read"), Some(Operation::View)); // Alias
    /// assert_eq!(Operation::parse("post comments"), Some(Operation::PostComment)); // Alias
    /// assert_eq!(Operation::parse("publish"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "view" | "read" => Some(Operation::View),
            "create" => Some(Operation::Create),
            "update" | "edit" => Some(Operation::Update),
            "delete" | "remove" => Some(Operation::Delete),
            "post_comment" | "post comments" | "comment" => Some(Operation::PostComment),
            _ => None,
        }
    }

    /// Whether this operation is decided by a permission scheme.
    pub fn uses_scheme(&self) -> bool {
        !matches!(self, Operation::PostComment)
    }

    /// The operations a permission scheme is loaded for.
    pub fn scheme_operations() -> [Operation; 4] {
        [
            Operation::View,
            Operation::Create,
            Operation::Update,
            Operation::Delete,
        ]
    }

    /// All operations.
    pub fn all() -> [Operation; 5] {
        [
            Operation::View,
            Operation::Create,
            Operation::Update,
            Operation::Delete,
            Operation::PostComment,
        ]
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_parse() {
        for op in Operation::all() {
            assert_eq!(Operation::parse(op.as_str()), Some(op));
        }
        assert_eq!(Operation::parse("EDIT"), Some(Operation::Update));
        assert_eq!(Operation::parse("comment"), Some(Operation::PostComment));
        assert_eq!(Operation::parse("archive"), None);
    }

    #[test]
    fn test_scheme_operations() {
        assert!(Operation::scheme_operations().iter().all(Operation::uses_scheme));
        assert!(!Operation::PostComment.uses_scheme());
    }

    #[test]
    fn test_operation_serde() {
        assert_eq!(
            serde_json::to_string(&Operation::PostComment).unwrap(),
            "\"post_comment\""
        );
        let op: Operation = serde_json::from_str("\"post comments\"").unwrap();
        assert_eq!(op, Operation::PostComment);
    }
}
