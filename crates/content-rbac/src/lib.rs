//! # Content RBAC
//!
//! Roles, operations and permission schemes for workflow-governed content.
//!
//! ## Overview
//!
//! The content-rbac crate handles:
//! - **Roles**: Platform, authentication and group roles a scheme can grant
//! - **Operations**: View, create, update, delete and comment
//! - **Actors**: The requesting user, passed explicitly to every decision
//! - **Permission Schemes**: Per-operation role tables keyed by workflow and
//!   state (or e-library mode for create)
//!
//! ## Architecture
//!
//! ```text
//! SchemeSet
//!   ├─ view    workflow → state → RoleGrant { own, any }
//!   ├─ create  workflow → e-library mode → [RoleSet, ...]
//!   ├─ update  workflow → state → RoleGrant { own, any }
//!   └─ delete  workflow → state → RoleGrant { own, any }
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use content_rbac::{Operation, Role, RoleSet, SchemeSet};
//!
//! let schemes = SchemeSet::from_json(r#"{
//!     "view":   { "document": { "validated": { "any": ["anonymous", "authenticated"] } } },
//!     "create": { "document": { "registered_users": [["authenticated"]] } },
//!     "update": { "document": { "validated": { "any": ["facilitator"] } } },
//!     "delete": { "document": { "validated": { "any": ["moderator"] } } }
//! }"#).unwrap();
//!
//! let roles = schemes.get(Operation::View).unwrap().allowed_roles("document", "validated");
//! assert!(roles.intersects(&RoleSet::from_roles([Role::Anonymous])));
//! ```
//!
//! ## Deny by Default
//!
//! A lookup the scheme has no entry for yields an empty role set. Only a
//! scheme that is missing or unparsable as a whole is an error.

pub mod actor;
pub mod error;
pub mod operations;
pub mod roles;
pub mod scheme;

// Re-export main types for convenience
pub use actor::Actor;
pub use error::{SchemeError, SchemeResult};
pub use operations::Operation;
pub use roles::{Role, RoleSet};
pub use scheme::{PermissionScheme, RoleGrant, SchemeDocument, SchemeRules, SchemeSet};
