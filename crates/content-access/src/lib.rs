//! # Content Access
//!
//! Access decisions for workflow-governed group content.
//!
//! ## Overview
//!
//! The content-access crate handles:
//! - **Decisions**: Tri-state allowed / forbidden / neutral outcomes
//! - **Role Resolution**: Platform, authentication and membership roles per
//!   group, memoized per evaluation batch
//! - **Decision Engine**: Parent visibility, the draft-ownership gate and the
//!   per-operation scheme checks, in that order
//! - **Collaborators**: Traits for group lookup, group access, membership and
//!   scheme storage, with an in-memory directory
//!
//! ## Architecture
//!
//! ```text
//! AccessDecisionEngine::can_perform(item, operation, actor)
//!   ├─ GroupLookup          parent group (relation path for comments)
//!   ├─ GroupAccess          can the actor see the group?
//!   ├─ draft gate           someone else's unpublished draft?
//!   ├─ RoleResolver         roles in the group (EvaluationBatch cache)
//!   ├─ SchemeSet            view / create / delete grants
//!   └─ WorkflowStateMachine update = any transition out of the state
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use content_access::{AccessDecisionEngine, EvaluationBatch, JsonConfigStore, MemoryDirectory};
//! use content_rbac::{Actor, Operation};
//! use content_workflow::{ContentItem, StateName, StaticWorkflowRegistry};
//! use std::sync::Arc;
//! use uuid::Uuid;
//!
//! let engine = AccessDecisionEngine::builder()
//!     .config_store(Arc::new(JsonConfigStore::from_path(std::path::Path::new("scheme.json")).unwrap()))
//!     .workflows(Arc::new(StaticWorkflowRegistry::from_json(
//!         &std::fs::read_to_string("workflows.json").unwrap(),
//!     ).unwrap()))
//!     .directory(Arc::new(MemoryDirectory::new()))
//!     .build()
//!     .unwrap();
//!
//! let actor = Actor::new(Uuid::now_v7());
//! let item = ContentItem::new("document", StateName::draft(), actor.id).with_revision(1);
//!
//! // Related decisions share one batch
//! let batch = EvaluationBatch::new();
//! let can_view = engine.can_perform_in(&batch, &item, Operation::View, &actor).unwrap();
//! let transitions = engine.available_transitions_in(&batch, &item, &actor).unwrap();
//! ```
//!
//! ## Logging
//!
//! Decisions are logged at `debug`, collaborator failures at `warn` and
//! configuration failures at `error`. The crate installs no subscriber.

pub mod collaborators;
pub mod config;
pub mod decision;
pub mod engine;
pub mod error;
#[cfg(feature = "memory")]
pub mod memory;
pub mod resolver;

// Re-export main types for convenience
pub use collaborators::{ConfigStore, GroupAccess, GroupLookup, Membership};
pub use config::{EngineConfig, JsonConfigStore, DEFAULT_COMMENT_CAPABILITY, DEFAULT_DRAFT_CAPABILITY};
pub use decision::Decision;
pub use engine::{AccessDecisionEngine, AccessEngineBuilder};
pub use error::{AccessError, AccessResult};
#[cfg(feature = "memory")]
pub use memory::{DirectoryStats, MemoryDirectory};
pub use resolver::{EvaluationBatch, RoleResolver};
