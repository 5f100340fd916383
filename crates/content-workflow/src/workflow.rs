//! Workflow definitions
//!
//! A workflow is a named finite state machine: a set of states, exactly one
//! of them initial, and a list of transitions between them. Transitions
//! carry no roles of their own; who may fire them is decided from the
//! permission scheme (see [`crate::machine`]).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{WorkflowError, WorkflowResult};
use crate::state::StateName;

/// A state declared by a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowState {
    /// State id
    pub id: StateName,

    /// Human-readable label
    #[serde(default)]
    pub label: String,

    /// Whether this is the initial state
    #[serde(default)]
    pub initial: bool,

    /// Whether content in this state is published
    #[serde(default)]
    pub published: bool,
}

/// A transition between workflow states.
///
/// A transition may leave from several source states but always lands in
/// a single target state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Transition id, unique within its workflow
    pub id: String,

    /// Human-readable label
    #[serde(default)]
    pub label: String,

    /// Source states
    pub from: Vec<StateName>,

    /// Target state
    pub to: StateName,
}

impl Transition {
    /// Whether the transition can be fired from `state`.
    pub fn applies_from(&self, state: &str) -> bool {
        self.from.iter().any(|s| s.as_str() == state)
    }
}

/// Raw workflow definition as it appears in configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkflowDefinition {
    pub id: String,

    #[serde(default)]
    pub label: String,

    pub states: Vec<WorkflowState>,

    #[serde(default)]
    pub transitions: Vec<Transition>,
}

/// A validated workflow.
///
/// # Examples
///
/// ```
/// use content_workflow::Workflow;
///
/// let workflow = Workflow::from_json(r#"{
///     "id": "document",
///     "states": [
///         { "id": "__new__", "initial": true },
///         { "id": "validated", "published": true },
///         { "id": "archived", "published": true }
///     ],
///     "transitions": [
///         { "id": "validate", "from": ["__new__"], "to": "validated" },
///         { "id": "update_published", "from": ["validated"], "to": "validated" },
///         { "id": "disable", "from": ["validated"], "to": "archived" }
///     ]
/// }"#).unwrap();
///
/// let ids: Vec<&str> = workflow.transitions_from("validated").iter().map(|t| t.id.as_str()).collect();
/// assert_eq!(ids, vec!["update_published", "disable"]);
/// assert!(workflow.transitions_from("archived").is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WorkflowDefinition", into = "WorkflowDefinition")]
pub struct Workflow {
    id: String,
    label: String,
    states: Vec<WorkflowState>,
    transitions: Vec<Transition>,
}

impl Workflow {
    /// Validate a definition.
    ///
    /// # Errors
    ///
    /// `InvalidDefinition` if the workflow declares no states, not exactly
    /// one initial state, duplicate state or transition ids, a transition
    /// without source states, or a transition touching an undeclared state.
    pub fn new(definition: WorkflowDefinition) -> WorkflowResult<Self> {
        let WorkflowDefinition {
            id,
            label,
            states,
            transitions,
        } = definition;
        let invalid = |message: String| WorkflowError::InvalidDefinition {
            workflow: id.clone(),
            message,
        };

        if states.is_empty() {
            return Err(invalid("no states declared".to_string()));
        }

        let mut declared = HashSet::new();
        for state in &states {
            if !declared.insert(state.id.as_str()) {
                return Err(invalid(format!("state '{}' declared twice", state.id)));
            }
        }

        let initial_count = states.iter().filter(|s| s.initial).count();
        if initial_count != 1 {
            return Err(invalid(format!(
                "expected exactly one initial state, found {initial_count}"
            )));
        }

        let mut transition_ids = HashSet::new();
        for transition in &transitions {
            if !transition_ids.insert(transition.id.as_str()) {
                return Err(invalid(format!(
                    "transition '{}' declared twice",
                    transition.id
                )));
            }
            if transition.from.is_empty() {
                return Err(invalid(format!(
                    "transition '{}' has no source state",
                    transition.id
                )));
            }
            for state in transition.from.iter().chain(std::iter::once(&transition.to)) {
                if !declared.contains(state.as_str()) {
                    return Err(invalid(format!(
                        "transition '{}' references undeclared state '{}'",
                        transition.id, state
                    )));
                }
            }
        }

        Ok(Self {
            id,
            label,
            states,
            transitions,
        })
    }

    /// Parse and validate a workflow from JSON.
    pub fn from_json(json: &str) -> WorkflowResult<Self> {
        let definition: WorkflowDefinition = serde_json::from_str(json)?;
        Self::new(definition)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn states(&self) -> &[WorkflowState] {
        &self.states
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// The initial state.
    pub fn initial_state(&self) -> &StateName {
        // Construction guarantees exactly one initial state.
        self.states
            .iter()
            .find(|s| s.initial)
            .map(|s| &s.id)
            .unwrap_or(&self.states[0].id)
    }

    pub fn state(&self, state: &str) -> Option<&WorkflowState> {
        self.states.iter().find(|s| s.id.as_str() == state)
    }

    pub fn has_state(&self, state: &str) -> bool {
        self.state(state).is_some()
    }

    /// Whether content in `state` is published. Undeclared states are not.
    pub fn is_published_state(&self, state: &str) -> bool {
        self.state(state).map(|s| s.published).unwrap_or(false)
    }

    pub fn transition(&self, id: &str) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.id == id)
    }

    /// Transitions that can be fired from `state`, in declaration order.
    pub fn transitions_from(&self, state: &str) -> Vec<&Transition> {
        self.transitions
            .iter()
            .filter(|t| t.applies_from(state))
            .collect()
    }

    /// Fail unless `state` is declared.
    pub fn ensure_state(&self, state: &str) -> WorkflowResult<()> {
        if self.has_state(state) {
            Ok(())
        } else {
            Err(WorkflowError::UndeclaredState {
                workflow: self.id.clone(),
                state: state.to_string(),
            })
        }
    }
}

impl TryFrom<WorkflowDefinition> for Workflow {
    type Error = WorkflowError;

    fn try_from(definition: WorkflowDefinition) -> Result<Self, Self::Error> {
        Self::new(definition)
    }
}

impl From<Workflow> for WorkflowDefinition {
    fn from(workflow: Workflow) -> Self {
        Self {
            id: workflow.id,
            label: workflow.label,
            states: workflow.states,
            transitions: workflow.transitions,
        }
    }
}
