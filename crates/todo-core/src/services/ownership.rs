//! Ownership guard for todo reads and mutations.

use uuid::Uuid;

use crate::domain::Todo;
use crate::error::DomainError;
use crate::ports::TodoRepository;

/// Load a todo on behalf of `requester`.
///
/// Fails with `NotFound` when the todo does not exist for anyone and with
/// `AccessDenied` when it belongs to another user. The check is read-only;
/// the guarded mutation that follows is a separate statement.
pub async fn authorize(
    todos: &dyn TodoRepository,
    todo_id: Uuid,
    requester: Uuid,
) -> Result<Todo, DomainError> {
    let todo = todos
        .find_by_id(todo_id)
        .await?
        .ok_or_else(|| DomainError::todo_not_found(todo_id))?;

    if !todo.is_owned_by(requester) {
        tracing::warn!(todo_id = %todo_id, requester = %requester, "Todo access denied");
        return Err(DomainError::todo_access_denied(todo_id));
    }

    Ok(todo)
}
