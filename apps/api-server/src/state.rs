//! Application state - shared across all handlers.

use std::sync::Arc;

use todo_core::ports::{PasswordService, TodoRepository, TokenService, UserRepository};
use todo_core::services::{AuthService, TodoService};
use todo_infra::database::DatabaseConfig;
use todo_infra::{
    Argon2PasswordService, InMemoryTodoRepository, InMemoryUserRepository, JwtConfig,
    JwtTokenService,
};

#[cfg(feature = "postgres")]
use todo_infra::{PostgresTodoRepository, PostgresUserRepository, database::connect};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub todos: TodoService,
    pub tokens: Arc<dyn TokenService>,
}

impl AppState {
    /// Wire services from explicit collaborators.
    pub fn from_parts(
        users: Arc<dyn UserRepository>,
        todos: Arc<dyn TodoRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            auth: AuthService::new(users, passwords, tokens.clone()),
            todos: TodoService::new(todos),
            tokens,
        }
    }

    /// Build the application state, falling back to in-memory repositories
    /// when the database is not configured or unreachable.
    pub async fn new(db_config: Option<&DatabaseConfig>, jwt: JwtConfig) -> Self {
        let (users, todos) = repositories(db_config).await;
        let state = Self::from_parts(
            users,
            todos,
            Arc::new(Argon2PasswordService::new()),
            Arc::new(JwtTokenService::new(jwt)),
        );

        tracing::info!("Application state initialized");
        state
    }

    /// In-memory state with the given collaborators' configuration.
    pub fn in_memory(jwt: JwtConfig, passwords: Arc<dyn PasswordService>) -> Self {
        Self::from_parts(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryTodoRepository::new()),
            passwords,
            Arc::new(JwtTokenService::new(jwt)),
        )
    }
}

type Repositories = (Arc<dyn UserRepository>, Arc<dyn TodoRepository>);

fn in_memory_repositories() -> Repositories {
    (
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryTodoRepository::new()),
    )
}

#[cfg(feature = "postgres")]
async fn repositories(db_config: Option<&DatabaseConfig>) -> Repositories {
    let Some(config) = db_config else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return in_memory_repositories();
    };

    match connect(config).await {
        Ok(conn) => (
            Arc::new(PostgresUserRepository::new(conn.clone())),
            Arc::new(PostgresTodoRepository::new(conn)),
        ),
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Using in-memory fallback.",
                e
            );
            in_memory_repositories()
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn repositories(_db_config: Option<&DatabaseConfig>) -> Repositories {
    tracing::info!("Running without postgres feature - using in-memory repositories");
    in_memory_repositories()
}
