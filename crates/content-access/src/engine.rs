//! # Access Decision Engine
//!
//! Decides whether an actor may view, create, update, delete or comment on a
//! workflow-governed content item.
//!
//! ## Evaluation Order
//!
//! Checks run in a fixed order and stop at the first definitive answer:
//!
//! ```text
//! 1. parent group    none                      → Neutral
//! 2. group access    actor cannot see group    → Forbidden
//! 3. draft gate      someone else's draft      → Forbidden
//! 4. operation       view / delete             → scheme grant for (workflow, state)
//!                    create                    → create clauses for (workflow, e-library mode)
//!                    update                    → any transition available
//!                    post_comment              → archived: Forbidden, else membership capability
//! ```
//!
//! `post_comment` resolves its group through the item's relation path.
//!
//! Missing or inconsistent configuration is an error, never a grant: an
//! unknown workflow, an item in a state its workflow does not declare, or a
//! scheme that was not loaded fail the decision with
//! [`AccessError::Configuration`].

use content_groups::GroupEntity;
use content_rbac::{Actor, Operation, PermissionScheme, RoleSet, SchemeSet};
use content_workflow::{ContentItem, Transition, WorkflowRegistry, WorkflowStateMachine};
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

use crate::collaborators::{ConfigStore, GroupAccess, GroupLookup, Membership};
use crate::config::EngineConfig;
use crate::decision::Decision;
use crate::error::{AccessError, AccessResult};
use crate::resolver::{EvaluationBatch, RoleResolver};

/// Outcome of the checks shared by every operation.
enum Gate {
    /// Decided before reaching the operation.
    Closed(Decision),

    /// Passed; evaluation continues against this parent group.
    Open(GroupEntity),
}

/// What an operation is evaluated against once the gate is passed.
struct Subject {
    workflow_id: String,
    roles: RoleSet,
    is_owner: bool,
}

/// The access decision engine.
///
/// Immutable once built and shareable across threads. Each decision takes
/// the actor explicitly.
///
/// # Example
///
/// ```rust,no_run
/// use content_access::{AccessDecisionEngine, EngineConfig, MemoryDirectory};
/// use content_rbac::{Actor, Operation};
/// use content_workflow::{ContentItem, StateName};
/// use std::sync::Arc;
/// use uuid::Uuid;
///
/// let config = EngineConfig::from_env();
/// let directory = Arc::new(MemoryDirectory::new());
///
/// let engine = AccessDecisionEngine::builder()
///     .config_store(Arc::new(config.scheme_store().unwrap()))
///     .workflows(Arc::new(config.workflow_registry().unwrap()))
///     .directory(directory)
///     .config(config)
///     .build()
///     .unwrap();
///
/// let item = ContentItem::new("document", StateName::draft(), Uuid::now_v7());
/// let decision = engine.can_perform(&item, Operation::View, &Actor::anonymous()).unwrap();
/// ```
pub struct AccessDecisionEngine {
    config: EngineConfig,
    schemes: Arc<SchemeSet>,
    machine: WorkflowStateMachine,
    resolver: RoleResolver,
    groups: Arc<dyn GroupLookup>,
    group_access: Arc<dyn GroupAccess>,
    membership: Arc<dyn Membership>,
}

impl AccessDecisionEngine {
    pub fn builder() -> AccessEngineBuilder {
        AccessEngineBuilder::new()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn schemes(&self) -> &SchemeSet {
        &self.schemes
    }

    pub fn state_machine(&self) -> &WorkflowStateMachine {
        &self.machine
    }

    pub fn resolver(&self) -> &RoleResolver {
        &self.resolver
    }

    /// Decide one operation in a fresh evaluation batch.
    pub fn can_perform(
        &self,
        item: &ContentItem,
        operation: Operation,
        actor: &Actor,
    ) -> AccessResult<Decision> {
        self.can_perform_in(&EvaluationBatch::new(), item, operation, actor)
    }

    /// Decide one operation, memoizing role lookups in `batch`.
    ///
    /// # Errors
    ///
    /// `Configuration` if the item's workflow, its state or a permission
    /// scheme cannot be resolved; `CollaboratorUnavailable` if a group or
    /// membership lookup fails.
    #[instrument(
        level = "debug",
        skip_all,
        fields(item_id = %item.id(), operation = %operation, actor_id = %actor.id)
    )]
    pub fn can_perform_in(
        &self,
        batch: &EvaluationBatch,
        item: &ContentItem,
        operation: Operation,
        actor: &Actor,
    ) -> AccessResult<Decision> {
        let decision = self.decide(batch, item, operation, actor).map_err(report)?;
        debug!(decision = %decision, state = %item.state(), "Access decision");
        Ok(decision)
    }

    /// Ids of the transitions `actor` may fire on `item`, in declaration order.
    ///
    /// Empty whenever update would not be allowed.
    pub fn available_transitions(&self, item: &ContentItem, actor: &Actor) -> AccessResult<Vec<String>> {
        self.available_transitions_in(&EvaluationBatch::new(), item, actor)
    }

    /// [`available_transitions`](Self::available_transitions) within a batch.
    #[instrument(level = "debug", skip_all, fields(item_id = %item.id(), actor_id = %actor.id))]
    pub fn available_transitions_in(
        &self,
        batch: &EvaluationBatch,
        item: &ContentItem,
        actor: &Actor,
    ) -> AccessResult<Vec<String>> {
        let transitions = self
            .update_transitions(batch, item, actor)
            .map_err(report)?
            .into_iter()
            .map(|t| t.id)
            .collect::<Vec<_>>();
        debug!(count = transitions.len(), "Available transitions");
        Ok(transitions)
    }

    fn decide(
        &self,
        batch: &EvaluationBatch,
        item: &ContentItem,
        operation: Operation,
        actor: &Actor,
    ) -> AccessResult<Decision> {
        let parent = match self.gate(item, operation, actor)? {
            Gate::Closed(decision) => return Ok(decision),
            Gate::Open(parent) => parent,
        };

        if operation == Operation::PostComment {
            return self.comment_decision(item, &parent, actor);
        }

        let subject = self.subject(batch, item, &parent, actor)?;
        let state = item.state().as_str();

        Ok(match operation {
            Operation::View => Decision::allowed_if(grant_permits(
                self.schemes.view(),
                &subject,
                state,
            )),
            // E-library mode of the audience parent, which is also the relation parent
            Operation::Create => Decision::allowed_if(
                self.schemes
                    .create()
                    .clauses(&subject.workflow_id, parent.e_library())
                    .iter()
                    .any(|clause| clause.intersects(&subject.roles)),
            ),
            Operation::Delete => Decision::allowed_if(grant_permits(
                self.schemes.delete(),
                &subject,
                state,
            )),
            Operation::Update => Decision::allowed_if(
                !self.permitted_transitions(item, &subject)?.is_empty(),
            ),
            Operation::PostComment => Decision::Neutral,
        })
    }

    /// Transitions out of the item's state the actor may fire. Empty when
    /// the gate closes.
    fn update_transitions(
        &self,
        batch: &EvaluationBatch,
        item: &ContentItem,
        actor: &Actor,
    ) -> AccessResult<Vec<Transition>> {
        let parent = match self.gate(item, Operation::Update, actor)? {
            Gate::Closed(_) => return Ok(Vec::new()),
            Gate::Open(parent) => parent,
        };
        let subject = self.subject(batch, item, &parent, actor)?;
        self.permitted_transitions(item, &subject)
    }

    /// Shared by the update decision and the transition listing.
    fn permitted_transitions(&self, item: &ContentItem, subject: &Subject) -> AccessResult<Vec<Transition>> {
        Ok(self.machine.available_transitions(
            &subject.workflow_id,
            item.state().as_str(),
            &subject.roles,
            subject.is_owner,
        )?)
    }

    /// Parent visibility and the draft-ownership gate.
    fn gate(&self, item: &ContentItem, operation: Operation, actor: &Actor) -> AccessResult<Gate> {
        let parent = if operation == Operation::PostComment {
            self.groups.relation_parent_of(item)?
        } else {
            self.groups.parent_of(item)?
        };
        let Some(parent) = parent else {
            return Ok(Gate::Closed(Decision::Neutral));
        };

        if !self.group_access.can_view(&parent, actor)? {
            return Ok(Gate::Closed(Decision::Forbidden));
        }

        if self.is_hidden_draft(item, actor) {
            return Ok(Gate::Closed(Decision::Forbidden));
        }

        Ok(Gate::Open(parent))
    }

    /// A never-published draft is only reachable by its owner, unless the
    /// actor holds the draft capability.
    fn is_hidden_draft(&self, item: &ContentItem, actor: &Actor) -> bool {
        !actor.has_capability(&self.config.draft_capability)
            && !item.has_published_version()
            && item.state().is_draft()
            && !actor.owns(item.owner_id())
    }

    fn comment_decision(
        &self,
        item: &ContentItem,
        parent: &GroupEntity,
        actor: &Actor,
    ) -> AccessResult<Decision> {
        if parent.state.is_archived() || item.state().is_archived() {
            return Ok(Decision::Forbidden);
        }
        Ok(self
            .membership
            .has_permission(actor, parent, &self.config.comment_capability)?
            .map(Decision::allowed_if)
            .unwrap_or(Decision::Neutral))
    }

    /// Resolve the workflow and the actor's roles for an item.
    fn subject(
        &self,
        batch: &EvaluationBatch,
        item: &ContentItem,
        parent: &GroupEntity,
        actor: &Actor,
    ) -> AccessResult<Subject> {
        let registry = self.machine.registry();
        let workflow_id = registry.workflow_for(item, Some(parent))?;
        registry
            .definition_of(&workflow_id)?
            .ensure_state(item.state().as_str())?;

        Ok(Subject {
            workflow_id,
            roles: self.resolver.roles_in(batch, actor, Some(parent))?,
            is_owner: actor.owns(item.owner_id()),
        })
    }
}

impl std::fmt::Debug for AccessDecisionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessDecisionEngine")
            .field("config", &self.config)
            .field("machine", &self.machine)
            .finish_non_exhaustive()
    }
}

fn grant_permits(scheme: &PermissionScheme, subject: &Subject, state: &str) -> bool {
    scheme
        .grant(&subject.workflow_id, state)
        .map(|grant| grant.permits(&subject.roles, subject.is_owner))
        .unwrap_or(false)
}

/// Log a failed decision at the level its kind deserves.
fn report(err: AccessError) -> AccessError {
    if err.is_server_error() {
        error!(error = %err, code = err.error_code(), "Access configuration failure");
    } else {
        warn!(error = %err, code = err.error_code(), "Access collaborator failure");
    }
    err
}

/// Builder for [`AccessDecisionEngine`].
///
/// Schemes come either ready-made ([`schemes`](Self::schemes)) or from a
/// [`ConfigStore`]. Building validates the schemes against the registered
/// workflows: a scheme entry for a state its workflow does not declare is
/// rejected, an entry for an unregistered workflow is logged and ignored.
#[derive(Default)]
pub struct AccessEngineBuilder {
    config: EngineConfig,
    schemes: Option<SchemeSet>,
    store: Option<Arc<dyn ConfigStore>>,
    registry: Option<Arc<dyn WorkflowRegistry>>,
    groups: Option<Arc<dyn GroupLookup>>,
    group_access: Option<Arc<dyn GroupAccess>>,
    membership: Option<Arc<dyn Membership>>,
}

impl AccessEngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Use an already loaded scheme set.
    pub fn schemes(mut self, schemes: SchemeSet) -> Self {
        self.schemes = Some(schemes);
        self
    }

    /// Load schemes from a store when building.
    pub fn config_store(mut self, store: Arc<dyn ConfigStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn workflows(mut self, registry: Arc<dyn WorkflowRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn group_lookup(mut self, groups: Arc<dyn GroupLookup>) -> Self {
        self.groups = Some(groups);
        self
    }

    pub fn group_access(mut self, group_access: Arc<dyn GroupAccess>) -> Self {
        self.group_access = Some(group_access);
        self
    }

    pub fn membership(mut self, membership: Arc<dyn Membership>) -> Self {
        self.membership = Some(membership);
        self
    }

    /// Use one directory for group lookup, group access and membership.
    pub fn directory<D>(self, directory: Arc<D>) -> Self
    where
        D: GroupLookup + GroupAccess + Membership + 'static,
    {
        self.group_lookup(directory.clone())
            .group_access(directory.clone())
            .membership(directory)
    }

    /// Build the engine.
    ///
    /// # Errors
    ///
    /// `Configuration` if a collaborator is missing, a scheme cannot be
    /// loaded, or the schemes reference undeclared workflow states.
    pub fn build(self) -> AccessResult<AccessDecisionEngine> {
        self.try_build().map_err(report)
    }

    fn try_build(self) -> AccessResult<AccessDecisionEngine> {
        let schemes = match (self.schemes, self.store) {
            (Some(schemes), _) => schemes,
            (None, Some(store)) => SchemeSet::new(
                store.load_scheme(Operation::View)?,
                store.load_scheme(Operation::Create)?,
                store.load_scheme(Operation::Update)?,
                store.load_scheme(Operation::Delete)?,
            )?,
            (None, None) => return Err(missing("permission schemes")),
        };
        let registry = self.registry.ok_or_else(|| missing("workflow registry"))?;
        let groups = self.groups.ok_or_else(|| missing("group lookup"))?;
        let group_access = self.group_access.ok_or_else(|| missing("group access"))?;
        let membership = self.membership.ok_or_else(|| missing("membership store"))?;

        validate_schemes(&schemes, registry.as_ref())?;

        let machine = WorkflowStateMachine::new(registry, Arc::new(schemes.update().clone()));
        debug!(
            workflows = machine.registry().workflow_ids().len(),
            "Access decision engine ready"
        );

        Ok(AccessDecisionEngine {
            config: self.config,
            schemes: Arc::new(schemes),
            machine,
            resolver: RoleResolver::new(membership.clone()),
            groups,
            group_access,
            membership,
        })
    }
}

fn missing(what: &str) -> AccessError {
    AccessError::Configuration(format!("{what} not configured"))
}

/// Every state a scheme mentions must be declared by its workflow.
fn validate_schemes(schemes: &SchemeSet, registry: &dyn WorkflowRegistry) -> AccessResult<()> {
    for scheme in schemes.iter() {
        for workflow_id in scheme.workflow_ids() {
            let Ok(workflow) = registry.definition_of(workflow_id) else {
                warn!(
                    operation = %scheme.operation(),
                    workflow = workflow_id,
                    "Permission scheme mentions an unregistered workflow"
                );
                continue;
            };
            for state in scheme.states(workflow_id) {
                workflow.ensure_state(state)?;
            }
        }
    }
    Ok(())
}

#[cfg(all(test, feature = "memory"))]
mod tests {
    use super::*;
    use crate::memory::MemoryDirectory;
    use content_workflow::StaticWorkflowRegistry;

    const WORKFLOWS: &str = r#"{
        "workflows": [{
            "id": "document",
            "states": [
                { "id": "__new__", "initial": true },
                { "id": "draft" },
                { "id": "validated", "published": true }
            ],
            "transitions": [
                { "id": "save_as_draft", "from": ["__new__", "draft"], "to": "draft" },
                { "id": "validate", "from": ["__new__", "draft"], "to": "validated" }
            ]
        }],
        "bundles": { "document": "document" }
    }"#;

    fn schemes(view_state: &str) -> SchemeSet {
        SchemeSet::from_json(&format!(
            r#"{{
                "view":   {{ "document": {{ "{view_state}": {{ "any": ["authenticated"] }} }},
                            "news": {{ "published": {{ "any": ["anonymous"] }} }} }},
                "create": {{ "document": {{ "registered_users": [["authenticated"]] }} }},
                "update": {{ "document": {{ "draft": {{ "own": ["member"] }} }} }},
                "delete": {{ "document": {{}} }}
            }}"#
        ))
        .unwrap()
    }

    fn builder(schemes: SchemeSet) -> AccessEngineBuilder {
        AccessDecisionEngine::builder()
            .schemes(schemes)
            .workflows(Arc::new(StaticWorkflowRegistry::from_json(WORKFLOWS).unwrap()))
            .directory(Arc::new(MemoryDirectory::new()))
    }

    #[test]
    fn test_build() {
        let engine = builder(schemes("validated")).build().unwrap();
        assert_eq!(engine.config(), &EngineConfig::default());
        assert_eq!(engine.schemes().update().operation(), Operation::Update);
    }

    #[test]
    fn test_rejects_undeclared_scheme_state() {
        let err = builder(schemes("published")).build().unwrap_err();
        assert!(matches!(err, AccessError::Configuration(_)));
        assert!(err.to_string().contains("published"));
    }

    #[test]
    fn test_requires_collaborators() {
        let err = AccessDecisionEngine::builder()
            .schemes(schemes("validated"))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("workflow registry"));

        let err = AccessDecisionEngine::builder()
            .workflows(Arc::new(StaticWorkflowRegistry::from_json(WORKFLOWS).unwrap()))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("permission schemes"));
    }

    #[test]
    fn test_store_missing_section() {
        let store = crate::config::JsonConfigStore::from_json(
            r#"{ "view": { "document": { "validated": { "any": ["anonymous"] } } } }"#,
        )
        .unwrap();
        let err = AccessDecisionEngine::builder()
            .config_store(Arc::new(store))
            .workflows(Arc::new(StaticWorkflowRegistry::from_json(WORKFLOWS).unwrap()))
            .directory(Arc::new(MemoryDirectory::new()))
            .build()
            .unwrap_err();
        assert!(matches!(err, AccessError::Configuration(_)));
    }

    #[test]
    fn test_engine_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AccessDecisionEngine>();
        assert_send_sync::<EvaluationBatch>();
    }
}
