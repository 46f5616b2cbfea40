//! In-memory repositories - used when no database is configured and in tests.
//!
//! Data is lost on process restart.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use todo_core::domain::{Todo, TodoPatch, User};
use todo_core::error::RepoError;
use todo_core::ports::{BaseRepository, TodoRepository, UserRepository};

use super::mask_email;

/// Users kept in insertion order; the email check mirrors the unique index.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email || u.id == user.id) {
            return Err(RepoError::Constraint("users_email_key".to_string()));
        }
        users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }
}

/// Todos kept in insertion order, which doubles as creation order.
#[derive(Default)]
pub struct InMemoryTodoRepository {
    todos: RwLock<Vec<Todo>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Todo, Uuid> for InMemoryTodoRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Todo>, RepoError> {
        let todos = self.todos.read().await;
        Ok(todos.iter().find(|t| t.id == id).cloned())
    }

    async fn insert(&self, todo: Todo) -> Result<Todo, RepoError> {
        let mut todos = self.todos.write().await;
        if todos.iter().any(|t| t.id == todo.id) {
            return Err(RepoError::Constraint("todos_pkey".to_string()));
        }
        todos.push(todo.clone());
        Ok(todo)
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Todo>, RepoError> {
        let todos = self.todos.read().await;
        Ok(todos.iter().filter(|t| t.user_id == user_id).cloned().collect())
    }

    async fn update_owned(
        &self,
        id: Uuid,
        user_id: Uuid,
        patch: &TodoPatch,
    ) -> Result<Option<Todo>, RepoError> {
        let mut todos = self.todos.write().await;
        Ok(todos
            .iter_mut()
            .find(|t| t.id == id && t.user_id == user_id)
            .map(|t| {
                t.apply(patch);
                t.clone()
            }))
    }

    async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        let mut todos = self.todos.write().await;
        let before = todos.len();
        todos.retain(|t| !(t.id == id && t.user_id == user_id));
        Ok(todos.len() < before)
    }
}
