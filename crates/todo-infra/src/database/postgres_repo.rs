//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use todo_core::domain::{Todo, TodoPatch, User};
use todo_core::error::RepoError;
use todo_core::ports::{BaseRepository, TodoRepository, UserRepository};

use super::entity::todo::{self, Entity as TodoEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::mask_email;
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL todo repository.
pub type PostgresTodoRepository = PostgresBaseRepository<TodoEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl TodoRepository for PostgresTodoRepository {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Todo>, RepoError> {
        let result = TodoEntity::find()
            .filter(todo::Column::UserId.eq(user_id))
            .order_by_asc(todo::Column::CreatedAt)
            .order_by_asc(todo::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn update_owned(
        &self,
        id: Uuid,
        user_id: Uuid,
        patch: &TodoPatch,
    ) -> Result<Option<Todo>, RepoError> {
        let mut update = TodoEntity::update_many()
            .col_expr(todo::Column::UpdatedAt, Expr::value(Utc::now().fixed_offset()));

        if let Some(title) = &patch.title {
            update = update.col_expr(todo::Column::Title, Expr::value(title.clone()));
        }
        if let Some(description) = &patch.description {
            update = update.col_expr(todo::Column::Description, Expr::value(description.clone()));
        }
        if let Some(due_date) = patch.due_date {
            update = update.col_expr(todo::Column::DueDate, Expr::value(due_date));
        }
        if let Some(is_completed) = patch.is_completed {
            update = update.col_expr(todo::Column::IsCompleted, Expr::value(is_completed));
        }

        // Ownership is part of the statement itself.
        let result = update
            .filter(todo::Column::Id.eq(id))
            .filter(todo::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        <Self as BaseRepository<Todo, Uuid>>::find_by_id(self, id).await
    }

    async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        let result = TodoEntity::delete_many()
            .filter(todo::Column::Id.eq(id))
            .filter(todo::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }
}
