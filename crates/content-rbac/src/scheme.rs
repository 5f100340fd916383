//! # Permission Schemes
//!
//! A permission scheme maps `(workflow, key)` to the roles allowed to perform
//! one operation. The key is the content state for view, update and delete,
//! and the parent group's e-library mode for create.
//!
//! ```text
//! view / update / delete:  workflow → state → { own: [roles], any: [roles] }
//! create:                  workflow → e-library mode → [[roles], [roles], ...]
//! ```
//!
//! Schemes are immutable once loaded. Absent entries deny: every lookup of a
//! workflow, state or mode the scheme does not mention yields no roles.

use content_groups::ELibraryMode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{SchemeError, SchemeResult};
use crate::operations::Operation;
use crate::roles::RoleSet;

/// Roles granted an operation on content in one state.
///
/// `any` roles are granted the operation on every item; `own` roles only on
/// items the actor owns.
///
/// # Example
///
/// ```
/// use content_rbac::{Role, RoleGrant, RoleSet};
///
/// let grant = RoleGrant::any([Role::Moderator]).with_own([Role::Member]);
/// let member = RoleSet::from_roles([Role::Authenticated, Role::Member]);
///
/// assert!(grant.permits(&member, true));
/// assert!(!grant.permits(&member, false));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoleGrant {
    /// Roles granted the operation on their own items only.
    #[serde(default)]
    pub own: RoleSet,

    /// Roles granted the operation on any item.
    #[serde(default)]
    pub any: RoleSet,
}

impl RoleGrant {
    /// Grant for any item.
    pub fn any<I>(roles: I) -> Self
    where
        I: IntoIterator<Item = crate::roles::Role>,
    {
        Self {
            own: RoleSet::new(),
            any: RoleSet::from_roles(roles),
        }
    }

    /// Grant for own items only.
    pub fn own<I>(roles: I) -> Self
    where
        I: IntoIterator<Item = crate::roles::Role>,
    {
        Self {
            own: RoleSet::from_roles(roles),
            any: RoleSet::new(),
        }
    }

    pub fn with_own<I>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = crate::roles::Role>,
    {
        self.own.extend(roles);
        self
    }

    /// Check whether an actor holding `roles` is granted the operation.
    ///
    /// # Arguments
    ///
    /// * `roles` - The actor's resolved roles
    /// * `is_owner` - Whether the actor owns the item
    pub fn permits(&self, roles: &RoleSet, is_owner: bool) -> bool {
        self.any.intersects(roles) || (is_owner && self.own.intersects(roles))
    }

    /// All roles mentioned by the grant, regardless of ownership.
    pub fn roles(&self) -> RoleSet {
        self.any.union(&self.own)
    }

    pub fn is_empty(&self) -> bool {
        self.own.is_empty() && self.any.is_empty()
    }
}

/// Grants keyed by workflow id, then by content state.
pub type StateRules = HashMap<String, HashMap<String, RoleGrant>>;

/// Create clauses keyed by workflow id, then by e-library mode.
///
/// Each clause is a role set; an actor satisfying any one clause may create.
pub type LibraryRules = HashMap<String, HashMap<ELibraryMode, Vec<RoleSet>>>;

/// The rule table of a permission scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemeRules {
    /// Keyed by content state (view, update, delete).
    ByState(StateRules),

    /// Keyed by e-library mode (create).
    ByLibraryMode(LibraryRules),
}

/// The permission scheme of one operation.
///
/// # Example
///
/// ```
/// use content_rbac::{Operation, PermissionScheme, Role, RoleGrant};
///
/// let mut scheme = PermissionScheme::new(Operation::Delete).unwrap();
/// scheme
///     .insert_grant("document", "validated", RoleGrant::any([Role::Moderator]))
///     .unwrap();
///
/// assert!(scheme.allowed_roles("document", "validated").contains(Role::Moderator));
/// // Absent entries deny
/// assert!(scheme.allowed_roles("document", "archived").is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionScheme {
    operation: Operation,
    rules: SchemeRules,
}

impl PermissionScheme {
    /// Create an empty scheme for an operation.
    ///
    /// The rule table kind follows the operation: create is keyed by
    /// e-library mode, everything else by state.
    ///
    /// # Errors
    ///
    /// `Unsupported` for operations without a scheme.
    pub fn new(operation: Operation) -> SchemeResult<Self> {
        let rules = match operation {
            Operation::Create => SchemeRules::ByLibraryMode(HashMap::new()),
            Operation::PostComment => return Err(SchemeError::Unsupported(operation)),
            _ => SchemeRules::ByState(HashMap::new()),
        };
        Ok(Self { operation, rules })
    }

    /// Build a scheme from a rule table.
    ///
    /// # Errors
    ///
    /// `Unsupported` for operations without a scheme, `Malformed` if the
    /// rule table kind does not fit the operation.
    pub fn from_rules(operation: Operation, rules: SchemeRules) -> SchemeResult<Self> {
        if !operation.uses_scheme() {
            return Err(SchemeError::Unsupported(operation));
        }
        let fits = match (&rules, operation) {
            (SchemeRules::ByLibraryMode(_), Operation::Create) => true,
            (SchemeRules::ByState(_), op) => op != Operation::Create,
            _ => false,
        };
        if !fits {
            return Err(SchemeError::Malformed(format!(
                "'{operation}' scheme has the wrong key kind"
            )));
        }
        Ok(Self { operation, rules })
    }

    /// Parse the scheme for one operation from its JSON section.
    ///
    /// # Example
    ///
    /// ```
    /// use content_rbac::{Operation, PermissionScheme, Role};
    /// use content_groups::ELibraryMode;
    ///
    /// let scheme = PermissionScheme::from_json(
    ///     Operation::Create,
    ///     r#"{ "document": { "only_facilitators": [["moderator"], ["facilitator"]] } }"#,
    /// ).unwrap();
    /// assert_eq!(scheme.clauses("document", ELibraryMode::OnlyFacilitators).len(), 2);
    /// ```
    pub fn from_json(operation: Operation, json: &str) -> SchemeResult<Self> {
        let rules = match operation {
            Operation::Create => SchemeRules::ByLibraryMode(serde_json::from_str(json)?),
            Operation::PostComment => return Err(SchemeError::Unsupported(operation)),
            _ => SchemeRules::ByState(serde_json::from_str(json)?),
        };
        Ok(Self { operation, rules })
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn rules(&self) -> &SchemeRules {
        &self.rules
    }

    /// Add a state grant.
    ///
    /// # Errors
    ///
    /// `Malformed` if this is a create scheme.
    pub fn insert_grant(
        &mut self,
        workflow_id: impl Into<String>,
        state: impl Into<String>,
        grant: RoleGrant,
    ) -> SchemeResult<()> {
        match &mut self.rules {
            SchemeRules::ByState(rules) => {
                rules
                    .entry(workflow_id.into())
                    .or_default()
                    .insert(state.into(), grant);
                Ok(())
            }
            SchemeRules::ByLibraryMode(_) => Err(SchemeError::Malformed(
                "create scheme is keyed by e-library mode".to_string(),
            )),
        }
    }

    /// Add a create clause.
    ///
    /// # Errors
    ///
    /// `Malformed` if this is not a create scheme.
    pub fn insert_clause(
        &mut self,
        workflow_id: impl Into<String>,
        mode: ELibraryMode,
        clause: RoleSet,
    ) -> SchemeResult<()> {
        match &mut self.rules {
            SchemeRules::ByLibraryMode(rules) => {
                rules
                    .entry(workflow_id.into())
                    .or_default()
                    .entry(mode)
                    .or_default()
                    .push(clause);
                Ok(())
            }
            SchemeRules::ByState(_) => Err(SchemeError::Malformed(format!(
                "'{}' scheme is keyed by state",
                self.operation
            ))),
        }
    }

    /// Roles allowed for `(workflow_id, key)`.
    ///
    /// `key` is a state for state-keyed schemes and an e-library mode for the
    /// create scheme. For grants this is the union of own and any roles; for
    /// create it is the union of all clauses. Unknown keys yield an empty set.
    pub fn allowed_roles(&self, workflow_id: &str, key: &str) -> RoleSet {
        match &self.rules {
            SchemeRules::ByState(_) => self
                .grant(workflow_id, key)
                .map(RoleGrant::roles)
                .unwrap_or_default(),
            SchemeRules::ByLibraryMode(_) => match ELibraryMode::parse(key) {
                Some(mode) => {
                    let mut roles = RoleSet::new();
                    for clause in self.clauses(workflow_id, mode) {
                        roles.merge(clause);
                    }
                    roles
                }
                None => RoleSet::new(),
            },
        }
    }

    /// The grant for a workflow state, if the scheme has one.
    pub fn grant(&self, workflow_id: &str, state: &str) -> Option<&RoleGrant> {
        match &self.rules {
            SchemeRules::ByState(rules) => rules.get(workflow_id)?.get(state),
            SchemeRules::ByLibraryMode(_) => None,
        }
    }

    /// The create clauses for a workflow and e-library mode.
    pub fn clauses(&self, workflow_id: &str, mode: ELibraryMode) -> &[RoleSet] {
        match &self.rules {
            SchemeRules::ByLibraryMode(rules) => rules
                .get(workflow_id)
                .and_then(|modes| modes.get(&mode))
                .map(Vec::as_slice)
                .unwrap_or(&[]),
            SchemeRules::ByState(_) => &[],
        }
    }

    /// Whether the scheme mentions the workflow at all.
    pub fn has_workflow(&self, workflow_id: &str) -> bool {
        match &self.rules {
            SchemeRules::ByState(rules) => rules.contains_key(workflow_id),
            SchemeRules::ByLibraryMode(rules) => rules.contains_key(workflow_id),
        }
    }

    /// Workflow ids mentioned by the scheme, sorted.
    pub fn workflow_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = match &self.rules {
            SchemeRules::ByState(rules) => rules.keys().map(String::as_str).collect(),
            SchemeRules::ByLibraryMode(rules) => rules.keys().map(String::as_str).collect(),
        };
        ids.sort_unstable();
        ids
    }

    /// States the scheme mentions for a workflow. Empty for create schemes.
    pub fn states(&self, workflow_id: &str) -> Vec<&str> {
        match &self.rules {
            SchemeRules::ByState(rules) => {
                let mut states: Vec<&str> = rules
                    .get(workflow_id)
                    .map(|s| s.keys().map(String::as_str).collect())
                    .unwrap_or_default();
                states.sort_unstable();
                states
            }
            SchemeRules::ByLibraryMode(_) => Vec::new(),
        }
    }
}

/// The on-disk permission scheme document.
///
/// One optional section per operation; a missing section means that
/// operation's scheme was never loaded.
///
/// ```json
/// {
///   "view":   { "document": { "validated": { "any": ["anonymous", "authenticated"] } } },
///   "create": { "document": { "only_facilitators": [["moderator"], ["facilitator"]] } },
///   "update": { "document": { "validated": { "own": ["member"], "any": ["facilitator"] } } },
///   "delete": { "document": { "validated": { "any": ["moderator"] } } }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemeDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<StateRules>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create: Option<LibraryRules>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<StateRules>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<StateRules>,
}

impl SchemeDocument {
    /// Parse a scheme document.
    ///
    /// Unknown sections, unknown role names and unknown e-library modes are
    /// rejected here rather than at lookup time.
    pub fn from_json(json: &str) -> SchemeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Extract the scheme of one operation.
    ///
    /// # Errors
    ///
    /// `NotLoaded` if the document has no section for the operation,
    /// `Unsupported` for operations without a scheme.
    pub fn scheme(&self, operation: Operation) -> SchemeResult<PermissionScheme> {
        let rules = match operation {
            Operation::View => self.view.clone().map(SchemeRules::ByState),
            Operation::Create => self.create.clone().map(SchemeRules::ByLibraryMode),
            Operation::Update => self.update.clone().map(SchemeRules::ByState),
            Operation::Delete => self.delete.clone().map(SchemeRules::ByState),
            Operation::PostComment => return Err(SchemeError::Unsupported(operation)),
        };
        let rules = rules.ok_or(SchemeError::NotLoaded(operation))?;
        PermissionScheme::from_rules(operation, rules)
    }
}

/// The four loaded permission schemes.
///
/// Shared read-only between decisions; build it once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemeSet {
    view: PermissionScheme,
    create: PermissionScheme,
    update: PermissionScheme,
    delete: PermissionScheme,
}

impl SchemeSet {
    /// Assemble a scheme set, checking each scheme sits in its own slot.
    pub fn new(
        view: PermissionScheme,
        create: PermissionScheme,
        update: PermissionScheme,
        delete: PermissionScheme,
    ) -> SchemeResult<Self> {
        for (expected, scheme) in [
            (Operation::View, &view),
            (Operation::Create, &create),
            (Operation::Update, &update),
            (Operation::Delete, &delete),
        ] {
            if scheme.operation() != expected {
                return Err(SchemeError::OperationMismatch {
                    expected,
                    found: scheme.operation(),
                });
            }
        }
        Ok(Self {
            view,
            create,
            update,
            delete,
        })
    }

    /// Load all four schemes from a document.
    pub fn from_document(document: &SchemeDocument) -> SchemeResult<Self> {
        Self::new(
            document.scheme(Operation::View)?,
            document.scheme(Operation::Create)?,
            document.scheme(Operation::Update)?,
            document.scheme(Operation::Delete)?,
        )
    }

    /// Parse and load all four schemes from JSON.
    pub fn from_json(json: &str) -> SchemeResult<Self> {
        Self::from_document(&SchemeDocument::from_json(json)?)
    }

    /// The scheme of an operation.
    ///
    /// # Errors
    ///
    /// `Unsupported` for `PostComment`.
    pub fn get(&self, operation: Operation) -> SchemeResult<&PermissionScheme> {
        match operation {
            Operation::View => Ok(&self.view),
            Operation::Create => Ok(&self.create),
            Operation::Update => Ok(&self.update),
            Operation::Delete => Ok(&self.delete),
            Operation::PostComment => Err(SchemeError::Unsupported(operation)),
        }
    }

    pub fn view(&self) -> &PermissionScheme {
        &self.view
    }

    pub fn create(&self) -> &PermissionScheme {
        &self.create
    }

    pub fn update(&self) -> &PermissionScheme {
        &self.update
    }

    pub fn delete(&self) -> &PermissionScheme {
        &self.delete
    }

    pub fn iter(&self) -> impl Iterator<Item = &PermissionScheme> {
        [&self.view, &self.create, &self.update, &self.delete].into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::Role;

    const DOCUMENT: &str = r#"{
        "view": {
            "document": {
                "validated": { "any": ["anonymous", "authenticated"] },
                "draft": { "own": ["authenticated"], "any": ["moderator"] }
            }
        },
        "create": {
            "document": {
                "only_facilitators": [["moderator"], ["facilitator"]],
                "2": [["authenticated"]]
            }
        },
        "update": {
            "document": {
                "validated": { "any": ["moderator", "facilitator", "member"] }
            }
        },
        "delete": {
            "document": {
                "validated": { "own": ["member"], "any": ["moderator"] }
            }
        }
    }"#;

    #[test]
    fn test_role_grant_permits() {
        let grant = RoleGrant::any([Role::Moderator]).with_own([Role::Member]);

        let moderator = RoleSet::from_roles([Role::Authenticated, Role::Moderator]);
        assert!(grant.permits(&moderator, false));

        let member = RoleSet::from_roles([Role::Authenticated, Role::Member]);
        assert!(grant.permits(&member, true));
        assert!(!grant.permits(&member, false));

        let nobody = RoleSet::from_roles([Role::Anonymous]);
        assert!(!grant.permits(&nobody, true));
    }

    #[test]
    fn test_role_grant_roles() {
        let grant = RoleGrant::own([Role::Owner]).with_own([Role::Member]);
        assert!(grant.any.is_empty());
        assert_eq!(grant.roles(), RoleSet::from_roles([Role::Owner, Role::Member]));
        assert!(RoleGrant::default().is_empty());
    }

    #[test]
    fn test_scheme_set_from_json() {
        let set = SchemeSet::from_json(DOCUMENT).unwrap();

        let view = set.get(Operation::View).unwrap();
        assert_eq!(view.operation(), Operation::View);
        assert!(view
            .allowed_roles("document", "validated")
            .contains(Role::Anonymous));

        let create = set.create();
        assert_eq!(
            create.allowed_roles("document", "only_facilitators"),
            RoleSet::from_roles([Role::Moderator, Role::Facilitator])
        );
        assert_eq!(
            create.clauses("document", ELibraryMode::RegisteredUsers),
            &[RoleSet::from_roles([Role::Authenticated])]
        );
        assert!(create
            .clauses("document", ELibraryMode::MembersFacilitators)
            .is_empty());
    }

    #[test]
    fn test_absent_entries_deny() {
        let set = SchemeSet::from_json(DOCUMENT).unwrap();

        assert!(set.delete().allowed_roles("document", "archived").is_empty());
        assert!(set.delete().allowed_roles("discussion", "validated").is_empty());
        assert!(set.delete().grant("document", "archived").is_none());
        assert!(set.create().allowed_roles("document", "everyone").is_empty());
    }

    #[test]
    fn test_missing_section_not_loaded() {
        let err = SchemeSet::from_json(r#"{ "view": {}, "create": {}, "update": {} }"#)
            .unwrap_err();
        assert!(matches!(err, SchemeError::NotLoaded(Operation::Delete)));
    }

    #[test]
    fn test_malformed_documents_rejected() {
        let unknown_role = r#"{ "view": { "document": { "validated": { "any": ["editor"] } } } }"#;
        assert!(matches!(
            SchemeDocument::from_json(unknown_role),
            Err(SchemeError::Malformed(_))
        ));

        let unknown_section = r#"{ "publish": {} }"#;
        assert!(SchemeDocument::from_json(unknown_section).is_err());

        let unknown_mode = r#"{ "create": { "document": { "everyone": [["authenticated"]] } } }"#;
        assert!(SchemeDocument::from_json(unknown_mode).is_err());
    }

    #[test]
    fn test_post_comment_has_no_scheme() {
        let set = SchemeSet::from_json(DOCUMENT).unwrap();
        assert!(matches!(
            set.get(Operation::PostComment),
            Err(SchemeError::Unsupported(Operation::PostComment))
        ));
        assert!(PermissionScheme::from_json(Operation::PostComment, "{}").is_err());
        assert!(matches!(
            PermissionScheme::new(Operation::PostComment),
            Err(SchemeError::Unsupported(Operation::PostComment))
        ));
    }

    #[test]
    fn test_scheme_set_slot_mismatch() {
        let err = SchemeSet::new(
            PermissionScheme::new(Operation::View).unwrap(),
            PermissionScheme::new(Operation::Create).unwrap(),
            PermissionScheme::new(Operation::Delete).unwrap(),
            PermissionScheme::new(Operation::Delete).unwrap(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SchemeError::OperationMismatch {
                expected: Operation::Update,
                found: Operation::Delete
            }
        ));
    }

    #[test]
    fn test_insert_wrong_kind() {
        let mut create = PermissionScheme::new(Operation::Create).unwrap();
        assert!(create
            .insert_grant("document", "validated", RoleGrant::any([Role::Moderator]))
            .is_err());
        create
            .insert_clause(
                "document",
                ELibraryMode::OnlyFacilitators,
                RoleSet::from_roles([Role::Facilitator]),
            )
            .unwrap();
        assert!(create.has_workflow("document"));

        let mut view = PermissionScheme::new(Operation::View).unwrap();
        assert!(view
            .insert_clause("document", ELibraryMode::OnlyFacilitators, RoleSet::new())
            .is_err());
    }

    #[test]
    fn test_from_rules_kind_check() {
        assert!(PermissionScheme::from_rules(
            Operation::View,
            SchemeRules::ByLibraryMode(HashMap::new())
        )
        .is_err());
        assert!(PermissionScheme::from_rules(
            Operation::Create,
            SchemeRules::ByState(HashMap::new())
        )
        .is_err());
        assert!(PermissionScheme::from_rules(
            Operation::Update,
            SchemeRules::ByState(HashMap::new())
        )
        .is_ok());
    }

    #[test]
    fn test_workflow_and_state_listing() {
        let set = SchemeSet::from_json(DOCUMENT).unwrap();
        assert_eq!(set.view().workflow_ids(), vec!["document"]);
        assert_eq!(set.view().states("document"), vec!["draft", "validated"]);
        assert!(set.create().states("document").is_empty());
        assert_eq!(set.iter().count(), 4);
    }
}
