//! OpenAPI document and Swagger UI page under `/api-docs`.

use actix_web::{HttpResponse, HttpResponseBuilder};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use todo_shared::ErrorResponse;
use todo_shared::dto::{
    CreateTodoRequest, CurrentUserResponse, GroupedTodosResponse, LoginRequest, LoginResponse,
    MessageResponse, RegisterUserRequest, TodoEnvelope, TodoListResponse, TodoResponse,
    UpdateTodoRequest, UserResponse,
};

use super::health::HealthResponse;
use super::{auth, health, todos};

#[derive(OpenApi)]
#[openapi(
    info(title = "Todo API", description = "Personal todo lists with BR-012 prioritization."),
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::me,
        todos::list,
        todos::grouped,
        todos::get,
        todos::create,
        todos::update,
        todos::delete
    ),
    components(schemas(
        HealthResponse,
        ErrorResponse,
        RegisterUserRequest,
        LoginRequest,
        UserResponse,
        LoginResponse,
        CurrentUserResponse,
        MessageResponse,
        CreateTodoRequest,
        UpdateTodoRequest,
        TodoResponse,
        TodoEnvelope,
        TodoListResponse,
        GroupedTodosResponse
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Liveness"),
        (name = "auth", description = "Registration and bearer tokens"),
        (name = "todos", description = "Owner-scoped todo items")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

const SWAGGER_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Todo API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.onload = () => {
      window.ui = SwaggerUIBundle({ url: "/api-docs/openapi.json", dom_id: "#swagger-ui" });
    };
  </script>
</body>
</html>
"##;

fn with_doc_headers(mut builder: HttpResponseBuilder) -> HttpResponseBuilder {
    builder
        .insert_header((
            "Content-Security-Policy",
            "default-src 'none'; \
             script-src 'unsafe-inline' https://unpkg.com; \
             style-src 'unsafe-inline' https://unpkg.com; \
             img-src 'self' data:; \
             connect-src 'self'; \
             frame-ancestors 'none'",
        ))
        .insert_header(("X-Frame-Options", "DENY"))
        .insert_header(("X-Content-Type-Options", "nosniff"));
    builder
}

/// GET /api-docs/openapi.json
pub async fn openapi_json() -> HttpResponse {
    with_doc_headers(HttpResponse::Ok()).json(ApiDoc::openapi())
}

/// GET /api-docs
pub async fn swagger_ui() -> HttpResponse {
    with_doc_headers(HttpResponse::Ok())
        .content_type("text/html; charset=utf-8")
        .body(SWAGGER_HTML)
}
