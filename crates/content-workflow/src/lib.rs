//! # Content Workflow
//!
//! Content items, workflow definitions and transition availability.
//!
//! ## Overview
//!
//! The content-workflow crate handles:
//! - **States**: Validated state names (`__new__`, `draft`, `validated`, ...)
//! - **Workflows**: Named state machines with one initial state and explicit
//!   transitions between declared states
//! - **Registry**: Bundle → workflow selection, including workflows chosen by
//!   the parent group's moderation mode
//! - **State Machine**: Which transitions an actor may fire, derived from the
//!   update scheme's grant on the source state
//!
//! ## Usage
//!
//! ```rust,no_run
//! use content_rbac::{Operation, PermissionScheme, Role, RoleSet};
//! use content_workflow::{StaticWorkflowRegistry, WorkflowStateMachine};
//! use std::sync::Arc;
//!
//! let registry = StaticWorkflowRegistry::from_json(
//!     &std::fs::read_to_string("workflows.json").unwrap(),
//! ).unwrap();
//! let update = PermissionScheme::from_json(
//!     Operation::Update,
//!     r#"{ "document": { "validated": { "any": ["member"] } } }"#,
//! ).unwrap();
//!
//! let machine = WorkflowStateMachine::new(Arc::new(registry), Arc::new(update));
//! let roles = RoleSet::from_roles([Role::Authenticated, Role::Member]);
//! let targets = machine.target_states_reachable_by("document", "validated", &roles, false).unwrap();
//! ```

pub mod error;
pub mod item;
pub mod machine;
pub mod registry;
pub mod state;
pub mod workflow;

// Re-export main types for convenience
pub use error::{WorkflowError, WorkflowResult};
pub use item::ContentItem;
pub use machine::WorkflowStateMachine;
pub use registry::{BundleWorkflow, RegistryDocument, StaticWorkflowRegistry, WorkflowRegistry};
pub use state::{StateName, ARCHIVED_STATE, DRAFT_STATE, NEW_STATE};
pub use workflow::{Transition, Workflow, WorkflowDefinition, WorkflowState};
