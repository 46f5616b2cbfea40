//! End-to-end HTTP tests against in-memory repositories.

use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::{Days, Local};
use serde_json::{Value, json};

use api_server::state::AppState;
use todo_core::ports::RateLimiter;
use todo_infra::{Argon2PasswordService, InMemoryRateLimiter, JwtConfig, RateLimitConfig};

fn state() -> AppState {
    let passwords = Argon2PasswordService::with_params(1024, 1, 1).unwrap();
    AppState::in_memory(JwtConfig::default(), Arc::new(passwords))
}

fn limiter(max_requests: u32) -> Arc<dyn RateLimiter> {
    Arc::new(
        InMemoryRateLimiter::new(RateLimitConfig {
            max_requests,
            window: Duration::from_secs(60),
        })
        .unwrap(),
    )
}

macro_rules! app {
    ($state:expr, $limiter:expr) => {{
        let limiter = $limiter;
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(move |cfg| api_server::configure_app(cfg, limiter.clone())),
        )
        .await
    }};
}

macro_rules! send {
    ($app:expr, $req:expr) => {{
        let res = test::call_service($app, $req.to_request()).await;
        let status = res.status();
        let body = test::read_body(res).await;
        let json: Value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }};
}

/// Register `$email` with the default password and return a bearer token.
macro_rules! login_as {
    ($app:expr, $email:expr) => {{
        let (status, _) = send!(
            $app,
            test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(credentials($email))
        );
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send!(
            $app,
            test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(credentials($email))
        );
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }};
}

fn credentials(email: &str) -> Value {
    json!({ "email": email, "password": "password123" })
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

#[actix_web::test]
async fn test_full_todo_flow() {
    let app = app!(state(), limiter(100));

    // Register
    let (status, body) = send!(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(credentials("alice@example.com"))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered successfully");

    // Duplicate registration
    let (status, body) = send!(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(credentials("alice@example.com"))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Email already exists");

    // Wrong password
    let (status, body) = send!(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "alice@example.com", "password": "wrong-password" }))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Invalid email or password");

    // Login
    let (status, body) = send!(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(credentials("alice@example.com"))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 86400);
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert!(body["user"].get("password_hash").is_none());
    let alice = body["token"].as_str().unwrap().to_string();

    // Create
    let (status, body) = send!(
        &app,
        test::TestRequest::post()
            .uri("/api/todos")
            .insert_header(bearer(&alice))
            .set_json(json!({ "title": "  Write report  ", "due_date": "2030-01-15" }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["todo"]["title"], "Write report");
    assert_eq!(body["todo"]["is_completed"], false);
    assert_eq!(body["todo"]["due_date"], "2030-01-15");
    let todo_id = body["todo"]["id"].as_str().unwrap().to_string();

    // Another user cannot touch it
    let bob = login_as!(&app, "bob@example.com");
    let (status, _) = send!(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/todos/{todo_id}"))
            .insert_header(bearer(&bob))
            .set_json(json!({ "is_completed": true }))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send!(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/todos/{todo_id}"))
            .insert_header(bearer(&bob))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Owner deletes it
    let (status, body) = send!(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/todos/{todo_id}"))
            .insert_header(bearer(&alice))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Todo deleted successfully");

    // Gone from the list
    let (status, body) = send!(
        &app,
        test::TestRequest::get()
            .uri("/api/todos")
            .insert_header(bearer(&alice))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
    assert!(body["todos"].as_array().unwrap().is_empty());

    let (status, _) = send!(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/todos/{todo_id}"))
            .insert_header(bearer(&alice))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_list_is_prioritized_and_grouped() {
    let app = app!(state(), limiter(100));
    let token = login_as!(&app, "carol@example.com");
    let today = Local::now().date_naive();

    let mut ids = Vec::new();
    for (title, due) in [
        ("B", Some(today.checked_add_days(Days::new(1)).unwrap())),
        ("C", None),
        ("A", Some(today.checked_sub_days(Days::new(1)).unwrap())),
        ("D", Some(today)),
    ] {
        let (status, body) = send!(
            &app,
            test::TestRequest::post()
                .uri("/api/todos")
                .insert_header(bearer(&token))
                .set_json(json!({ "title": title, "due_date": due }))
    );
        assert_eq!(status, StatusCode::CREATED);
        ids.push(body["todo"]["id"].as_str().unwrap().to_string());
    }

    // Complete "C"
    let (status, body) = send!(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/todos/{}", ids[1]))
            .insert_header(bearer(&token))
            .set_json(json!({ "is_completed": true }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["todo"]["is_completed"], true);
    assert_eq!(body["todo"]["title"], "C");

    let (_, body) = send!(
        &app,
        test::TestRequest::get()
            .uri("/api/todos")
            .insert_header(bearer(&token))
    );
    let titles: Vec<&str> = body["todos"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["A", "D", "B", "C"]);

    let (status, body) = send!(
        &app,
        test::TestRequest::get()
            .uri("/api/todos/grouped")
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 4);
    assert_eq!(body["overdue"][0]["title"], "A");
    assert_eq!(body["due_today"][0]["title"], "D");
    assert_eq!(body["upcoming"][0]["title"], "B");
    assert_eq!(body["completed"][0]["title"], "C");
    assert!(body["no_due_date"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_update_clears_due_date_and_rejects_blank_title() {
    let app = app!(state(), limiter(100));
    let token = login_as!(&app, "dave@example.com");

    let (_, body) = send!(
        &app,
        test::TestRequest::post()
            .uri("/api/todos")
            .insert_header(bearer(&token))
            .set_json(json!({ "title": "Dentist", "description": "9am", "due_date": "2031-05-01" }))
    );
    let id = body["todo"]["id"].as_str().unwrap().to_string();

    let (status, body) = send!(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/todos/{id}"))
            .insert_header(bearer(&token))
            .set_json(json!({ "due_date": null }))
    );
    assert_eq!(status, StatusCode::OK);
    assert!(body["todo"]["due_date"].is_null());
    assert_eq!(body["todo"]["description"], "9am");

    let (status, body) = send!(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/todos/{id}"))
            .insert_header(bearer(&token))
            .set_json(json!({ "title": "   " }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Title is required");

    let (status, body) = send!(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/todos/{id}"))
            .insert_header(bearer(&token))
            .set_json(json!({ "title": null }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Title is required");

    let (status, body) = send!(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/todos/{id}"))
            .insert_header(bearer(&token))
            .set_json(json!({ "title": "x".repeat(256) }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Title must be at most 255 characters");

    // Ownership is checked before the payload.
    let other = login_as!(&app, "mallory@example.com");
    let (status, _) = send!(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/todos/{id}"))
            .insert_header(bearer(&other))
            .set_json(json!({ "title": "  " }))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send!(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/todos/{}", uuid::Uuid::new_v4()))
            .insert_header(bearer(&token))
            .set_json(json!({ "title": null }))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_requests_without_valid_token_are_rejected() {
    let app = app!(state(), limiter(100));

    let (status, _) = send!(&app, test::TestRequest::get().uri("/api/todos"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send!(
        &app,
        test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(bearer("not-a-jwt"))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Invalid token");
}

#[actix_web::test]
async fn test_me_returns_profile() {
    let app = app!(state(), limiter(100));
    let token = login_as!(&app, "erin@example.com");

    let (status, body) = send!(
        &app,
        test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(bearer(&token))
    );

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "erin@example.com");
}

#[actix_web::test]
async fn test_input_errors() {
    let app = app!(state(), limiter(100));
    let token = login_as!(&app, "frank@example.com");

    let (status, body) = send!(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({ "email": "not-an-email", "password": "short" }))
    );
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"].as_array().unwrap().len(), 2);

    let (status, body) = send!(
        &app,
        test::TestRequest::post()
            .uri("/api/todos")
            .insert_header(bearer(&token))
            .set_json(json!({ "description": "no title" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Title is required");

    let (status, _) = send!(
        &app,
        test::TestRequest::get()
            .uri("/api/todos/not-a-uuid")
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send!(
        &app,
        test::TestRequest::post()
            .uri("/api/todos")
            .insert_header(bearer(&token))
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json")
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send!(&app, test::TestRequest::get().uri("/api/nowhere"));
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_auth_routes_are_rate_limited() {
    let app = app!(state(), limiter(2));

    for _ in 0..2 {
        let (status, _) = send!(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(credentials("nobody@example.com"))
    );
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(credentials("nobody@example.com"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(res.headers().contains_key("Retry-After"));

    // Non-auth routes are not throttled.
    let (status, _) = send!(&app, test::TestRequest::get().uri("/api/health"));
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn test_api_docs_are_served() {
    let app = app!(state(), limiter(100));

    let (status, body) = send!(&app, test::TestRequest::get().uri("/api-docs/openapi.json"));
    assert_eq!(status, StatusCode::OK);
    assert!(body["openapi"].as_str().unwrap().starts_with("3."));
    assert!(body["paths"]["/api/todos/{id}"]["put"].is_object());
    assert!(body["components"]["securitySchemes"]["bearer_auth"].is_object());

    let res = test::call_service(&app, test::TestRequest::get().uri("/api-docs").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(
        res.headers()
            .get("Content-Type")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );
}
