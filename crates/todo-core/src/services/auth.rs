//! Registration and login.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::User;
use crate::error::DomainError;
use crate::ports::{PasswordService, TokenService, UserRepository};

const EMAIL_TAKEN: &str = "Email already exists";

/// A successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub expires_in: u64,
    pub user: User,
}

/// Authentication service. The token and password collaborators are passed
/// in at construction; nothing here reads process-wide configuration.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    /// Register a new account. Input format is validated at the edge.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, DomainError> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(DomainError::Duplicate(EMAIL_TAKEN.to_string()));
        }

        let password_hash = self
            .passwords
            .hash(password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        // A concurrent registration can still hit the unique index.
        let user = self
            .users
            .insert(User::new(email.to_string(), password_hash))
            .await
            .map_err(|e| match DomainError::from(e) {
                DomainError::Duplicate(_) => DomainError::Duplicate(EMAIL_TAKEN.to_string()),
                other => other,
            })?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Verify credentials and issue a token. Unknown email and wrong
    /// password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, DomainError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        if !valid {
            tracing::debug!(user_id = %user.id, "Password mismatch");
            return Err(DomainError::InvalidCredentials);
        }

        let token = self
            .tokens
            .generate_token(user.id, &user.email)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        Ok(LoginOutcome {
            token,
            expires_in: self.tokens.expiration_seconds(),
            user,
        })
    }

    /// Profile of an authenticated user.
    pub async fn current_user(&self, user_id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: "User",
                id: user_id,
            })
    }
}
