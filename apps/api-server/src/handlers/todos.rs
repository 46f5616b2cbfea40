//! Todo handlers. Every route requires a bearer token.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use todo_core::domain::{Todo, TodoPatch};
use todo_shared::ErrorResponse;
use todo_shared::dto::{
    CreateTodoRequest, GroupedTodosResponse, MessageResponse, TodoEnvelope, TodoListResponse,
    TodoResponse, UpdateTodoRequest,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn todo_response(todo: Todo) -> TodoResponse {
    TodoResponse {
        id: todo.id.to_string(),
        user_id: todo.user_id.to_string(),
        title: todo.title,
        description: todo.description,
        due_date: todo.due_date,
        is_completed: todo.is_completed,
        created_at: todo.created_at.to_rfc3339(),
        updated_at: todo.updated_at.to_rfc3339(),
    }
}

fn todo_responses(todos: Vec<Todo>) -> Vec<TodoResponse> {
    todos.into_iter().map(todo_response).collect()
}

/// GET /api/todos - BR-012 order.
#[utoipa::path(
    get,
    path = "/api/todos",
    tag = "todos",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Todos in priority order", body = TodoListResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn list(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let todos = state.todos.list(identity.user_id).await?;

    Ok(HttpResponse::Ok().json(TodoListResponse {
        total: todos.len(),
        todos: todo_responses(todos),
    }))
}

/// GET /api/todos/grouped
#[utoipa::path(
    get,
    path = "/api/todos/grouped",
    tag = "todos",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Todos split into display buckets", body = GroupedTodosResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn grouped(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let buckets = state.todos.grouped(identity.user_id).await?;
    let total = buckets.len();

    Ok(HttpResponse::Ok().json(GroupedTodosResponse {
        overdue: todo_responses(buckets.overdue),
        due_today: todo_responses(buckets.due_today),
        upcoming: todo_responses(buckets.upcoming),
        no_due_date: todo_responses(buckets.no_due_date),
        completed: todo_responses(buckets.completed),
        total,
    }))
}

/// GET /api/todos/{id}
#[utoipa::path(
    get,
    path = "/api/todos/{id}",
    tag = "todos",
    params(("id" = Uuid, Path, description = "Todo id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The todo", body = TodoEnvelope),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Owned by another user", body = ErrorResponse),
        (status = 404, description = "No such todo", body = ErrorResponse)
    )
)]
pub async fn get(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let todo = state.todos.get(path.into_inner(), identity.user_id).await?;

    Ok(HttpResponse::Ok().json(TodoEnvelope {
        todo: todo_response(todo),
    }))
}

/// POST /api/todos
#[utoipa::path(
    post,
    path = "/api/todos",
    tag = "todos",
    request_body = CreateTodoRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Todo created", body = TodoEnvelope),
        (status = 400, description = "Missing or oversized title", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateTodoRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let todo = state
        .todos
        .create(identity.user_id, &req.title, req.description, req.due_date)
        .await?;

    Ok(HttpResponse::Created().json(TodoEnvelope {
        todo: todo_response(todo),
    }))
}

/// PUT /api/todos/{id}
#[utoipa::path(
    put,
    path = "/api/todos/{id}",
    tag = "todos",
    params(("id" = Uuid, Path, description = "Todo id")),
    request_body = UpdateTodoRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated todo", body = TodoEnvelope),
        (status = 400, description = "Empty or oversized title", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Owned by another user", body = ErrorResponse),
        (status = 404, description = "No such todo", body = ErrorResponse)
    )
)]
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateTodoRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let patch = TodoPatch {
        // `null` becomes an empty title, which the domain rejects.
        title: req.title.map(Option::unwrap_or_default),
        description: req.description,
        due_date: req.due_date,
        is_completed: req.is_completed,
    };

    let todo = state
        .todos
        .update(path.into_inner(), identity.user_id, patch)
        .await?;

    Ok(HttpResponse::Ok().json(TodoEnvelope {
        todo: todo_response(todo),
    }))
}

/// DELETE /api/todos/{id}
#[utoipa::path(
    delete,
    path = "/api/todos/{id}",
    tag = "todos",
    params(("id" = Uuid, Path, description = "Todo id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Todo deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Owned by another user", body = ErrorResponse),
        (status = 404, description = "No such todo", body = ErrorResponse)
    )
)]
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .todos
        .delete(path.into_inner(), identity.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Todo deleted successfully")))
}
