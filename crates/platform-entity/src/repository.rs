//! Lookup contracts consumed by the access matcher
//!
//! The matcher never owns entity or grant storage. It reads through three
//! small traits that the hosting application implements over whatever backing
//! store it has. In-memory implementations are provided for wiring and tests.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::{Entity, User};
use crate::error::{RepositoryError, RepositoryResult};
use crate::id::EntityId;

/// Per-caller context forwarded to repository lookups.
///
/// Carries a correlation id so that lookups triggered by one authorization
/// decision can be tied together in the backing store's logs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepositoryContext {
    /// Correlation ID for distributed tracing
    pub correlation_id: Uuid,

    /// Name of the component issuing the lookups
    pub caller: String,
}

impl RepositoryContext {
    /// Create a context with a fresh correlation id.
    pub fn new(caller: impl Into<String>) -> Self {
        Self {
            correlation_id: Uuid::now_v7(),
            caller: caller.into(),
        }
    }

    /// Reuse an existing correlation id.
    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = correlation_id;
        self
    }
}

impl Default for RepositoryContext {
    fn default() -> Self {
        Self::new("platform-access")
    }
}

/// Entity lookup.
pub trait EntityRepository: Send + Sync {
    /// Fetch an entity with its associations.
    ///
    /// Returns `Ok(None)` when no entity has this id. Errors are reserved for
    /// transport-level failures.
    fn try_get_entity(
        &self,
        ctx: &RepositoryContext,
        id: &EntityId,
    ) -> RepositoryResult<Option<Entity>>;
}

/// Store of users' raw grant-descriptor strings.
pub trait UserAccessListStore: Send + Sync {
    /// Fetch the grant descriptors of a user. Order is irrelevant and an
    /// unknown user simply has an empty list.
    fn get_user_access_list(&self, user: &EntityId) -> RepositoryResult<Vec<String>>;
}

/// Resolution of external user ids.
pub trait UserDirectory: Send + Sync {
    /// Look up a user by external id.
    ///
    /// Fails with [`RepositoryError::NotFound`] when the user does not exist.
    fn get_user(&self, ctx: &RepositoryContext, user_id: &str) -> RepositoryResult<User>;
}

/// In-memory [`EntityRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryEntityRepository {
    entities: HashMap<EntityId, Entity>,
}

impl InMemoryEntityRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entity.
    pub fn insert(&mut self, entity: Entity) {
        self.entities.insert(entity.id, entity);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.insert(entity);
        self
    }

    /// Number of stored entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl EntityRepository for InMemoryEntityRepository {
    fn try_get_entity(
        &self,
        _ctx: &RepositoryContext,
        id: &EntityId,
    ) -> RepositoryResult<Option<Entity>> {
        Ok(self.entities.get(id).cloned())
    }
}

/// In-memory [`UserAccessListStore`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccessListStore {
    grants: HashMap<EntityId, Vec<String>>,
}

impl InMemoryAccessListStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append grant descriptors to a user's list.
    pub fn grant<I, S>(&mut self, user: EntityId, descriptors: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grants
            .entry(user)
            .or_default()
            .extend(descriptors.into_iter().map(Into::into));
    }

    /// Builder-style [`grant`](Self::grant).
    pub fn with_grants<I, S>(mut self, user: EntityId, descriptors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grant(user, descriptors);
        self
    }
}

impl UserAccessListStore for InMemoryAccessListStore {
    fn get_user_access_list(&self, user: &EntityId) -> RepositoryResult<Vec<String>> {
        Ok(self.grants.get(user).cloned().unwrap_or_default())
    }
}

/// In-memory [`UserDirectory`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    users: HashMap<String, User>,
}

impl InMemoryUserDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user.
    pub fn insert(&mut self, user: User) {
        self.users.insert(user.user_id.clone(), user);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_user(mut self, user: User) -> Self {
        self.insert(user);
        self
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn get_user(&self, _ctx: &RepositoryContext, user_id: &str) -> RepositoryResult<User> {
        self.users
            .get(user_id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("user {}", user_id)))
    }
}
