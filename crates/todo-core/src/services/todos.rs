//! Todo use cases: listing in BR-012 order, grouping, guarded mutations.

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{NewTodo, Todo, TodoBuckets, TodoPatch, classify, prioritize, today_local};
use crate::error::DomainError;
use crate::ports::TodoRepository;

use super::authorize;

/// Todo service - the single entry point the HTTP layer uses for todos.
#[derive(Clone)]
pub struct TodoService {
    repo: Arc<dyn TodoRepository>,
    today: fn() -> NaiveDate,
}

impl TodoService {
    pub fn new(repo: Arc<dyn TodoRepository>) -> Self {
        Self {
            repo,
            today: today_local,
        }
    }

    /// Replace the source of "today" used for overdue decisions.
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn today(&self) -> NaiveDate {
        (self.today)()
    }

    /// All todos of `user_id`, sorted by BR-012.
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Todo>, DomainError> {
        let todos = self.repo.find_by_user(user_id).await?;
        Ok(prioritize(todos, self.today()))
    }

    /// All todos of `user_id`, sorted and then split into display buckets.
    pub async fn grouped(&self, user_id: Uuid) -> Result<TodoBuckets, DomainError> {
        let today = self.today();
        let todos = self.repo.find_by_user(user_id).await?;
        Ok(classify(prioritize(todos, today), today))
    }

    pub async fn get(&self, id: Uuid, user_id: Uuid) -> Result<Todo, DomainError> {
        authorize(self.repo.as_ref(), id, user_id).await
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        title: &str,
        description: Option<String>,
        due_date: Option<NaiveDate>,
    ) -> Result<Todo, DomainError> {
        let input = NewTodo::parse(title, description, due_date)?;
        let todo = self.repo.insert(Todo::new(user_id, input)).await?;

        tracing::info!(todo_id = %todo.id, user_id = %user_id, "Todo created");
        Ok(todo)
    }

    /// Partial update. The guard runs before the patch is validated, so a
    /// foreign or missing todo is reported as such whatever the payload.
    /// A row that vanished between the guard and the update statement is
    /// reported as `NotFound`.
    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        patch: TodoPatch,
    ) -> Result<Todo, DomainError> {
        authorize(self.repo.as_ref(), id, user_id).await?;
        let patch = patch.validated()?;

        let updated = self
            .repo
            .update_owned(id, user_id, &patch)
            .await?
            .ok_or_else(|| DomainError::todo_not_found(id))?;

        tracing::debug!(todo_id = %id, "Todo updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), DomainError> {
        authorize(self.repo.as_ref(), id, user_id).await?;

        if !self.repo.delete_owned(id, user_id).await? {
            return Err(DomainError::todo_not_found(id));
        }

        tracing::info!(todo_id = %id, "Todo deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::StubTodoRepository;
    use chrono::Duration;

    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn service(repo: Arc<StubTodoRepository>) -> TodoService {
        TodoService::new(repo).with_clock(fixed_today)
    }

    #[tokio::test]
    async fn test_create_requires_title() {
        let svc = service(Arc::new(StubTodoRepository::default()));

        let err = svc.create(Uuid::new_v4(), "  ", None, None).await.unwrap_err();

        assert!(matches!(err, DomainError::Validation(msg) if msg == "Title is required"));
    }

    #[tokio::test]
    async fn test_list_is_prioritized_and_scoped_to_user() {
        let repo = Arc::new(StubTodoRepository::default());
        let svc = service(repo.clone());
        let user = Uuid::new_v4();
        let today = fixed_today();

        svc.create(user, "undated", None, None).await.unwrap();
        svc.create(user, "next week", None, Some(today + Duration::days(7)))
            .await
            .unwrap();
        svc.create(user, "late", None, Some(today - Duration::days(1)))
            .await
            .unwrap();
        svc.create(Uuid::new_v4(), "someone else", None, None)
            .await
            .unwrap();

        let titles: Vec<String> = svc
            .list(user)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();

        assert_eq!(titles, vec!["late", "next week", "undated"]);
    }

    #[tokio::test]
    async fn test_grouped_buckets() {
        let repo = Arc::new(StubTodoRepository::default());
        let svc = service(repo.clone());
        let user = Uuid::new_v4();

        let done = svc.create(user, "done", None, None).await.unwrap();
        svc.update(
            done.id,
            user,
            TodoPatch {
                is_completed: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        svc.create(user, "today", None, Some(fixed_today())).await.unwrap();

        let buckets = svc.grouped(user).await.unwrap();

        assert_eq!(buckets.completed.len(), 1);
        assert_eq!(buckets.due_today.len(), 1);
        assert_eq!(buckets.len(), 2);
    }

    #[tokio::test]
    async fn test_update_foreign_todo_is_denied() {
        let svc = service(Arc::new(StubTodoRepository::default()));
        let owner = Uuid::new_v4();
        let todo = svc.create(owner, "mine", None, None).await.unwrap();

        let err = svc
            .update(
                todo.id,
                Uuid::new_v4(),
                TodoPatch {
                    is_completed: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::AccessDenied { .. }));
        assert!(!svc.get(todo.id, owner).await.unwrap().is_completed);
    }

    #[tokio::test]
    async fn test_update_rejects_blank_title() {
        let svc = service(Arc::new(StubTodoRepository::default()));
        let owner = Uuid::new_v4();
        let todo = svc.create(owner, "keep me", None, None).await.unwrap();

        let err = svc
            .update(
                todo.id,
                owner,
                TodoPatch {
                    title: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_blank_title_on_foreign_todo_is_denied() {
        let svc = service(Arc::new(StubTodoRepository::default()));
        let todo = svc.create(Uuid::new_v4(), "theirs", None, None).await.unwrap();
        let blank_title = || TodoPatch {
            title: Some("  ".to_string()),
            ..Default::default()
        };

        let foreign = svc
            .update(todo.id, Uuid::new_v4(), blank_title())
            .await
            .unwrap_err();
        let missing = svc
            .update(Uuid::new_v4(), todo.user_id, blank_title())
            .await
            .unwrap_err();

        assert!(matches!(foreign, DomainError::AccessDenied { .. }));
        assert!(matches!(missing, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_then_missing() {
        let svc = service(Arc::new(StubTodoRepository::default()));
        let owner = Uuid::new_v4();
        let todo = svc.create(owner, "temp", None, None).await.unwrap();

        svc.delete(todo.id, owner).await.unwrap();

        assert!(svc.list(owner).await.unwrap().is_empty());
        assert!(matches!(
            svc.delete(todo.id, owner).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_delete_foreign_todo_is_denied() {
        let svc = service(Arc::new(StubTodoRepository::default()));
        let todo = svc.create(Uuid::new_v4(), "theirs", None, None).await.unwrap();

        let err = svc.delete(todo.id, Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, DomainError::AccessDenied { .. }));
    }
}
