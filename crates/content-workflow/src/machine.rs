//! # Workflow State Machine
//!
//! Computes which transitions an actor may fire from a state.
//!
//! Transitions carry no roles of their own. The roles allowed to fire a
//! transition are the `update` scheme's grant for the transition's *source*
//! state: update access on a state means the right to fire every transition
//! out of it. Restricting individual transitions out of the same state to
//! different roles is not supported.

use content_rbac::{Operation, PermissionScheme, RoleSet};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::error::WorkflowResult;
use crate::registry::WorkflowRegistry;
use crate::state::StateName;
use crate::workflow::Transition;

/// Transition availability over a workflow registry and the update scheme.
///
/// # Example
///
/// ```
/// use content_rbac::{Operation, PermissionScheme, Role, RoleGrant, RoleSet};
/// use content_workflow::{BundleWorkflow, StaticWorkflowRegistry, Workflow, WorkflowStateMachine};
/// use std::sync::Arc;
///
/// let mut registry = StaticWorkflowRegistry::new();
/// registry.register(Workflow::from_json(r#"{
///     "id": "document",
///     "states": [{ "id": "__new__", "initial": true }, { "id": "validated", "published": true }],
///     "transitions": [
///         { "id": "validate", "from": ["__new__"], "to": "validated" },
///         { "id": "update_published", "from": ["validated"], "to": "validated" }
///     ]
/// }"#).unwrap()).unwrap();
///
/// let mut update = PermissionScheme::new(Operation::Update).unwrap();
/// update.insert_grant("document", "validated", RoleGrant::any([Role::Member])).unwrap();
///
/// let machine = WorkflowStateMachine::new(Arc::new(registry), Arc::new(update));
/// let member = RoleSet::from_roles([Role::Authenticated, Role::Member]);
/// let outsider = RoleSet::from_roles([Role::Authenticated]);
///
/// assert_eq!(machine.available_transitions("document", "validated", &member, false).unwrap().len(), 1);
/// assert!(machine.available_transitions("document", "validated", &outsider, false).unwrap().is_empty());
/// ```
#[derive(Clone)]
pub struct WorkflowStateMachine {
    registry: Arc<dyn WorkflowRegistry>,
    update: Arc<PermissionScheme>,
}

impl WorkflowStateMachine {
    /// Creates a state machine.
    ///
    /// `update` should be the update scheme; any other scheme grants no
    /// transitions.
    pub fn new(registry: Arc<dyn WorkflowRegistry>, update: Arc<PermissionScheme>) -> Self {
        Self { registry, update }
    }

    pub fn registry(&self) -> &Arc<dyn WorkflowRegistry> {
        &self.registry
    }

    pub fn update_scheme(&self) -> &PermissionScheme {
        &self.update
    }

    /// Transitions leaving `state`, in declaration order.
    ///
    /// # Errors
    ///
    /// `UnknownWorkflow` if the workflow is not registered, `UndeclaredState`
    /// if the workflow does not declare `state`.
    pub fn transitions_from(&self, workflow_id: &str, state: &str) -> WorkflowResult<Vec<Transition>> {
        let workflow = self.registry.definition_of(workflow_id)?;
        workflow.ensure_state(state)?;
        Ok(workflow
            .transitions_from(state)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Roles allowed to fire transitions out of `state`.
    pub fn required_roles(&self, workflow_id: &str, state: &str) -> RoleSet {
        if self.update.operation() != Operation::Update {
            return RoleSet::new();
        }
        self.update.allowed_roles(workflow_id, state)
    }

    /// Transitions out of `state` the actor may fire, in declaration order.
    ///
    /// # Arguments
    ///
    /// * `roles` - The actor's resolved roles
    /// * `is_owner` - Whether the actor owns the item (enables `own` grants)
    pub fn available_transitions(
        &self,
        workflow_id: &str,
        state: &str,
        roles: &RoleSet,
        is_owner: bool,
    ) -> WorkflowResult<Vec<Transition>> {
        let transitions = self.transitions_from(workflow_id, state)?;
        if self.update.operation() != Operation::Update {
            return Ok(Vec::new());
        }

        let permitted = self
            .update
            .grant(workflow_id, state)
            .map(|grant| grant.permits(roles, is_owner))
            .unwrap_or(false);

        if permitted {
            Ok(transitions)
        } else {
            Ok(Vec::new())
        }
    }

    /// Target states of the transitions the actor may fire.
    pub fn target_states_reachable_by(
        &self,
        workflow_id: &str,
        state: &str,
        roles: &RoleSet,
        is_owner: bool,
    ) -> WorkflowResult<BTreeSet<StateName>> {
        Ok(self
            .available_transitions(workflow_id, state, roles, is_owner)?
            .into_iter()
            .map(|t| t.to)
            .collect())
    }
}

impl std::fmt::Debug for WorkflowStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowStateMachine")
            .field("workflows", &self.registry.workflow_ids())
            .field("update", &self.update)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorkflowError;
    use crate::registry::StaticWorkflowRegistry;
    use content_rbac::{Role, RoleGrant};

    const DOCUMENT: &str = r#"{
        "workflows": [{
            "id": "document",
            "states": [
                { "id": "__new__", "initial": true },
                { "id": "draft" },
                { "id": "proposed" },
                { "id": "validated", "published": true },
                { "id": "archived", "published": true }
            ],
            "transitions": [
                { "id": "save_as_draft", "from": ["__new__", "draft"], "to": "draft" },
                { "id": "propose", "from": ["__new__", "draft"], "to": "proposed" },
                { "id": "validate", "from": ["__new__", "draft", "proposed"], "to": "validated" },
                { "id": "update_published", "from": ["validated"], "to": "validated" },
                { "id": "request_changes", "from": ["validated"], "to": "proposed" },
                { "id": "disable", "from": ["validated"], "to": "archived" }
            ]
        }],
        "bundles": { "document": "document" }
    }"#;

    fn machine() -> WorkflowStateMachine {
        let registry = StaticWorkflowRegistry::from_json(DOCUMENT).unwrap();
        let mut update = PermissionScheme::new(Operation::Update).unwrap();
        update
            .insert_grant("document", "draft", RoleGrant::own([Role::Member, Role::Facilitator]))
            .unwrap();
        update
            .insert_grant(
                "document",
                "validated",
                RoleGrant::any([Role::Facilitator, Role::Moderator]).with_own([Role::Member]),
            )
            .unwrap();
        WorkflowStateMachine::new(Arc::new(registry), Arc::new(update))
    }

    fn roles(roles: &[Role]) -> RoleSet {
        roles.iter().copied().collect()
    }

    #[test]
    fn test_transitions_from_in_order() {
        let ids: Vec<String> = machine()
            .transitions_from("document", "validated")
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["update_published", "request_changes", "disable"]);
    }

    #[test]
    fn test_transitions_from_unknown() {
        let machine = machine();
        assert!(matches!(
            machine.transitions_from("news", "draft"),
            Err(WorkflowError::UnknownWorkflow(_))
        ));
        assert!(matches!(
            machine.transitions_from("document", "deleted"),
            Err(WorkflowError::UndeclaredState { .. })
        ));
    }

    #[test]
    fn test_source_state_grant_covers_all_transitions() {
        let machine = machine();
        let facilitator = roles(&[Role::Authenticated, Role::Facilitator]);

        let available = machine
            .available_transitions("document", "validated", &facilitator, false)
            .unwrap();
        assert_eq!(available.len(), 3);

        let targets = machine
            .target_states_reachable_by("document", "validated", &facilitator, false)
            .unwrap();
        let targets: Vec<&str> = targets.iter().map(StateName::as_str).collect();
        assert_eq!(targets, vec!["archived", "proposed", "validated"]);
    }

    #[test]
    fn test_own_grant_requires_ownership() {
        let machine = machine();
        let member = roles(&[Role::Authenticated, Role::Member]);

        assert!(!machine
            .available_transitions("document", "draft", &member, true)
            .unwrap()
            .is_empty());
        assert!(machine
            .available_transitions("document", "draft", &member, false)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_no_grant_no_transitions() {
        let machine = machine();
        let moderator = roles(&[Role::Authenticated, Role::Moderator]);

        // Proposed has transitions but no update grant
        assert!(machine
            .available_transitions("document", "proposed", &moderator, false)
            .unwrap()
            .is_empty());
        // Archived has no transitions at all
        assert!(machine
            .target_states_reachable_by("document", "archived", &moderator, false)
            .unwrap()
            .is_empty());
        assert!(machine.required_roles("document", "archived").is_empty());
    }

    #[test]
    fn test_non_update_scheme_grants_nothing() {
        let registry = StaticWorkflowRegistry::from_json(DOCUMENT).unwrap();
        let mut delete = PermissionScheme::new(Operation::Delete).unwrap();
        delete
            .insert_grant("document", "validated", RoleGrant::any([Role::Moderator]))
            .unwrap();
        let machine = WorkflowStateMachine::new(Arc::new(registry), Arc::new(delete));

        let moderator = roles(&[Role::Authenticated, Role::Moderator]);
        assert!(machine
            .available_transitions("document", "validated", &moderator, false)
            .unwrap()
            .is_empty());
    }
}
