use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Todo, TodoPatch, User};
use crate::error::RepoError;

/// Generic repository trait shared by all entities.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity and return it as stored.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address (exact, case-sensitive match).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Todo repository.
///
/// The `*_owned` statements re-apply the ownership predicate themselves, so
/// a guard check followed by a mutation can never touch a foreign row.
#[async_trait]
pub trait TodoRepository: BaseRepository<Todo, Uuid> {
    /// All todos of a user, in no particular priority order.
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Todo>, RepoError>;

    /// Apply `patch` to the todo if it exists and belongs to `user_id`.
    /// Returns `None` when no row matched.
    async fn update_owned(
        &self,
        id: Uuid,
        user_id: Uuid,
        patch: &TodoPatch,
    ) -> Result<Option<Todo>, RepoError>;

    /// Delete the todo if it exists and belongs to `user_id`.
    async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> Result<bool, RepoError>;
}
