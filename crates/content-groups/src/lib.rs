//! # Content Groups
//!
//! Group entities and memberships for workflow access control.
//!
//! ## Overview
//!
//! The content-groups crate handles:
//! - **Groups**: Collections and solutions that contain content items
//! - **Settings**: Moderation mode and e-library creation mode per group
//! - **Roles**: Roles a user holds inside a group
//! - **Memberships**: User-group relationships carrying roles and permissions
//!
//! ## Architecture
//!
//! ```text
//! User
//!   └─ GroupMembership ─→ GroupEntity
//!        ├─ roles             ├─ state
//!        └─ permissions       └─ settings (moderation, e-library)
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use content_groups::{GroupBundle, GroupEntity, GroupMembership, GroupRole, GroupState};
//! use uuid::Uuid;
//!
//! let group = GroupEntity::new(GroupBundle::Collection, "Open Standards")
//!     .with_state(GroupState::Validated);
//!
//! let user_id = Uuid::now_v7();
//! let membership = GroupMembership::new(group.id, user_id, GroupRole::Member)
//!     .with_permission("post comments");
//! ```
//!
//! ## Integration
//!
//! This crate is a leaf: `content-rbac` maps group roles onto scheme roles
//! and `content-access` resolves memberships through its collaborators.

pub mod group;
pub mod membership;
pub mod roles;
pub mod settings;

// Re-export main types for convenience
pub use group::{GroupBundle, GroupEntity, GroupState};
pub use membership::{GroupMembership, MembershipState};
pub use roles::GroupRole;
pub use settings::{ELibraryMode, GroupSettings, ModerationMode};
