//! # Role Resolution
//!
//! The roles an actor holds with respect to one group: platform-wide roles,
//! the implicit `authenticated` or `anonymous` role, and the group roles of
//! the actor's active membership.
//!
//! Membership lookups can be memoized in an [`EvaluationBatch`]. A batch is
//! owned by the caller and scoped to a set of related decisions (one page,
//! one request); roles never leak from one batch to the next.

use chrono::{DateTime, Utc};
use content_groups::GroupEntity;
use content_rbac::{Actor, RoleSet};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::collaborators::Membership;
use crate::error::AccessResult;

/// Memoized group roles for a batch of related decisions.
///
/// # Example
///
/// ```
/// use content_access::EvaluationBatch;
///
/// let batch = EvaluationBatch::new();
/// assert!(batch.is_empty());
/// batch.reset();
/// ```
#[derive(Debug)]
pub struct EvaluationBatch {
    /// Group roles keyed by (user, group)
    group_roles: RwLock<HashMap<(Uuid, Uuid), RoleSet>>,
    started_at: RwLock<DateTime<Utc>>,
}

impl EvaluationBatch {
    pub fn new() -> Self {
        Self {
            group_roles: RwLock::new(HashMap::new()),
            started_at: RwLock::new(Utc::now()),
        }
    }

    /// When the batch was created or last reset.
    pub fn started_at(&self) -> DateTime<Utc> {
        *self.started_at.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of memoized (user, group) entries.
    pub fn len(&self) -> usize {
        self.group_roles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every memoized entry and start a new batch.
    pub fn reset(&self) {
        let mut group_roles = self
            .group_roles
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        debug!(entries = group_roles.len(), "Resetting evaluation batch");
        group_roles.clear();
        *self.started_at.write().unwrap_or_else(PoisonError::into_inner) = Utc::now();
    }

    fn get(&self, user_id: Uuid, group_id: Uuid) -> Option<RoleSet> {
        self.group_roles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(user_id, group_id))
            .cloned()
    }

    fn insert(&self, user_id: Uuid, group_id: Uuid, roles: RoleSet) {
        self.group_roles
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((user_id, group_id), roles);
    }
}

impl Default for EvaluationBatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves the roles an actor holds in a group.
#[derive(Clone)]
pub struct RoleResolver {
    membership: Arc<dyn Membership>,
}

impl RoleResolver {
    pub fn new(membership: Arc<dyn Membership>) -> Self {
        Self { membership }
    }

    /// Roles of `actor` in `group`, without memoization.
    ///
    /// Without a group only platform-wide and authentication roles apply.
    pub fn roles_for(&self, actor: &Actor, group: Option<&GroupEntity>) -> AccessResult<RoleSet> {
        let mut roles = actor.platform_roles();
        if let Some(group) = group {
            if !actor.is_anonymous() {
                roles.merge(&self.group_roles(actor, group)?);
            }
        }
        Ok(roles)
    }

    /// Roles of `actor` in `group`, memoizing the membership lookup in `batch`.
    pub fn roles_in(
        &self,
        batch: &EvaluationBatch,
        actor: &Actor,
        group: Option<&GroupEntity>,
    ) -> AccessResult<RoleSet> {
        let mut roles = actor.platform_roles();
        let Some(group) = group else {
            return Ok(roles);
        };
        if actor.is_anonymous() {
            return Ok(roles);
        }

        let group_roles = match batch.get(actor.id, group.id) {
            Some(cached) => cached,
            None => {
                let resolved = self.group_roles(actor, group)?;
                batch.insert(actor.id, group.id, resolved.clone());
                resolved
            }
        };
        roles.merge(&group_roles);
        Ok(roles)
    }

    /// Membership-derived roles only. Anything but group roles is dropped.
    fn group_roles(&self, actor: &Actor, group: &GroupEntity) -> AccessResult<RoleSet> {
        Ok(self
            .membership
            .roles_of(actor, group)?
            .iter()
            .filter(|role| role.is_group_role())
            .collect())
    }
}

impl std::fmt::Debug for RoleResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleResolver").finish_non_exhaustive()
    }
}
