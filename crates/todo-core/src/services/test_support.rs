//! Test doubles for the ports used by the service tests.

use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Todo, TodoPatch, User};
use crate::error::RepoError;
use crate::ports::{
    AuthError, BaseRepository, PasswordService, TokenClaims, TokenService, TodoRepository,
    UserRepository,
};

#[derive(Default)]
pub struct StubTodoRepository {
    rows: Mutex<Vec<Todo>>,
}

impl StubTodoRepository {
    pub fn with(rows: Vec<Todo>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }
}

#[async_trait]
impl BaseRepository<Todo, Uuid> for StubTodoRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Todo>, RepoError> {
        Ok(self.rows.lock().unwrap().iter().find(|t| t.id == id).cloned())
    }

    async fn insert(&self, entity: Todo) -> Result<Todo, RepoError> {
        self.rows.lock().unwrap().push(entity.clone());
        Ok(entity)
    }
}

#[async_trait]
impl TodoRepository for StubTodoRepository {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Todo>, RepoError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update_owned(
        &self,
        id: Uuid,
        user_id: Uuid,
        patch: &TodoPatch,
    ) -> Result<Option<Todo>, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows
            .iter_mut()
            .find(|t| t.id == id && t.user_id == user_id)
            .map(|t| {
                t.apply(patch);
                t.clone()
            }))
    }

    async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|t| !(t.id == id && t.user_id == user_id));
        Ok(rows.len() != before)
    }
}

#[derive(Default)]
pub struct StubUserRepository {
    rows: Mutex<Vec<User>>,
}

#[async_trait]
impl BaseRepository<User, Uuid> for StubUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn insert(&self, entity: User) -> Result<User, RepoError> {
        self.rows.lock().unwrap().push(entity.clone());
        Ok(entity)
    }
}

#[async_trait]
impl UserRepository for StubUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }
}

/// Reversible "hash" so tests stay fast.
pub struct PlainPasswords;

impl PasswordService for PlainPasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("plain${password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(hash.strip_prefix("plain$") == Some(password))
    }
}

pub struct StaticTokens;

impl TokenService for StaticTokens {
    fn generate_token(&self, user_id: Uuid, _email: &str) -> Result<String, AuthError> {
        Ok(format!("token-for-{user_id}"))
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let id = token
            .strip_prefix("token-for-")
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or_else(|| AuthError::InvalidToken(token.to_string()))?;
        Ok(TokenClaims {
            user_id: id,
            email: String::new(),
            exp: 0,
        })
    }

    fn expiration_seconds(&self) -> u64 {
        86_400
    }
}
