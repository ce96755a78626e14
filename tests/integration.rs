//! Integration tests: health, auth flow (register/login/profile/logout),
//! todo lifecycle, pagination.
//!
//! Run with `cargo test`. Tests that need a database are skipped unless
//! `TEST_DATABASE_URL` (Postgres) is set; migrations run automatically.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::sync::Arc;
use tower::util::ServiceExt;
use tusk::auth::{AuthService, TokenService};
use tusk::db::{self, PgRevokedTokenRepository, PgTodoRepository, PgUserRepository};
use tusk::todos::TodoService;
use tusk::{create_app, AppState};

async fn test_state(database_url: &str) -> Result<AppState, Box<dyn std::error::Error>> {
    let db_pool = db::create_pool(database_url).await?;
    sqlx::migrate!().run(&db_pool).await?;

    let user_repo = Arc::new(PgUserRepository::new(db_pool.clone()));
    let todo_repo = Arc::new(PgTodoRepository::new(db_pool.clone()));
    let revoked_repo = Arc::new(PgRevokedTokenRepository::new(db_pool.clone()));

    let token_service = TokenService::new(
        revoked_repo,
        "test-jwt-secret-min-32-chars!!".to_string(),
        3600,
    );
    let auth_service = AuthService::new(user_repo, token_service.clone());
    let todo_service = TodoService::new(todo_repo);

    Ok(AppState {
        token_service,
        auth_service,
        todo_service,
    })
}

async fn app() -> Option<axum::Router> {
    let database_url = match std::env::var("TEST_DATABASE_URL") {
        Ok(u) => u,
        Err(_) => {
            eprintln!("Skip integration test: set TEST_DATABASE_URL");
            return None;
        }
    };
    match test_state(&database_url).await {
        Ok(s) => Some(create_app(s)),
        Err(e) => {
            eprintln!("Skip integration test: {}", e);
            None
        }
    }
}

fn unique_email() -> String {
    format!(
        "test-{}@example.com",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    )
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn bearer_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

async fn body_json(res: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn health_returns_ok() {
    let Some(app) = app().await else { return };

    let res = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn register_login_profile_logout_flow() {
    let Some(app) = app().await else { return };

    let email = unique_email();
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            serde_json::json!({ "email": email, "password": "password123", "role": "user" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let registered = body_json(res).await;
    assert!(registered.get("token").and_then(|v| v.as_str()).is_some());
    let user_id = registered.get("user_id").and_then(|v| v.as_str()).unwrap().to_string();

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            serde_json::json!({ "email": email, "password": "password123" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let logged_in = body_json(res).await;
    let token = logged_in
        .get("token")
        .and_then(|v| v.as_str())
        .unwrap()
        .to_string();

    // Profile requires a bearer token.
    let res = app
        .clone()
        .oneshot(get_request(&format!("/api/auth/profile/{}", user_id)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app
        .clone()
        .oneshot(bearer_request(
            "GET",
            &format!("/api/auth/profile/{}", user_id),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let profile = body_json(res).await;
    assert_eq!(profile.get("email").and_then(|v| v.as_str()), Some(email.as_str()));

    // Logout revokes the token; the same token is rejected afterwards even
    // though its signature and expiry are still valid.
    let res = app
        .clone()
        .oneshot(bearer_request("POST", "/api/auth/logout", &token))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .clone()
        .oneshot(bearer_request(
            "GET",
            &format!("/api/auth/profile/{}", user_id),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let Some(app) = app().await else { return };

    let email = unique_email();
    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            serde_json::json!({ "email": email, "password": "password123", "role": "user" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            serde_json::json!({ "email": email, "password": "wrongpassword" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(res).await;
    assert_eq!(body.get("code").and_then(|v| v.as_str()), Some("AUTH_ERROR"));
}

#[tokio::test]
async fn duplicate_email_registration_conflicts() {
    let Some(app) = app().await else { return };

    let email = unique_email();
    let payload =
        serde_json::json!({ "email": email, "password": "password123", "role": "user" });

    let res = app
        .clone()
        .oneshot(json_request("POST", "/api/auth/register", payload.clone()))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = app
        .oneshot(json_request("POST", "/api/auth/register", payload))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = body_json(res).await;
    assert_eq!(
        body.get("code").and_then(|v| v.as_str()),
        Some("CONFLICT_ERROR")
    );
    assert!(body
        .get("message")
        .and_then(|v| v.as_str())
        .unwrap()
        .contains("email"));
}

#[tokio::test]
async fn register_validation_lists_fields() {
    let Some(app) = app().await else { return };

    let res = app
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            serde_json::json!({ "email": "not-an-email", "password": "short", "role": "user" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(res).await;
    assert_eq!(
        body.get("code").and_then(|v| v.as_str()),
        Some("VALIDATION_ERROR")
    );
    let errors = body.get("errors").and_then(|v| v.as_array()).unwrap();
    let fields: Vec<&str> = errors
        .iter()
        .filter_map(|e| e.get("field").and_then(|f| f.as_str()))
        .collect();
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"password"));
}

#[tokio::test]
async fn todo_soft_delete_restore_hard_delete_lifecycle() {
    let Some(app) = app().await else { return };

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/todos",
            serde_json::json!({ "title": "water the plants", "description": "balcony only" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let todo = body_json(res).await;
    let id = todo.get("id").and_then(|v| v.as_str()).unwrap().to_string();

    // Soft delete hides it from default reads.
    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/todos/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .clone()
        .oneshot(get_request(&format!("/api/todos/{}", id)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = app
        .clone()
        .oneshot(get_request("/api/todos?page=1&limit=100"))
        .await
        .unwrap();
    let listing = body_json(res).await;
    let listed_ids: Vec<&str> = listing
        .get("data")
        .and_then(|v| v.as_array())
        .unwrap()
        .iter()
        .filter_map(|t| t.get("id").and_then(|i| i.as_str()))
        .collect();
    assert!(!listed_ids.contains(&id.as_str()));

    // Restore brings it back.
    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(format!("/api/todos/{}/restore", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .clone()
        .oneshot(get_request(&format!("/api/todos/{}", id)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Hard delete removes it permanently; restore then fails.
    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/todos/{}/hard", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(format!("/api/todos/{}/restore", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn partial_update_preserves_other_fields() {
    let Some(app) = app().await else { return };

    let res = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/todos",
            serde_json::json!({ "title": "read a book", "description": "chapter three" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let todo = body_json(res).await;
    let id = todo.get("id").and_then(|v| v.as_str()).unwrap().to_string();

    let res = app
        .oneshot(json_request(
            "PUT",
            &format!("/api/todos/{}", id),
            serde_json::json!({ "completed": true }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated = body_json(res).await;
    assert_eq!(
        updated.get("title").and_then(|v| v.as_str()),
        Some("read a book")
    );
    assert_eq!(
        updated.get("description").and_then(|v| v.as_str()),
        Some("chapter three")
    );
    assert_eq!(updated.get("completed").and_then(|v| v.as_bool()), Some(true));
}

#[tokio::test]
async fn pagination_falls_back_and_clamps() {
    let Some(app) = app().await else { return };

    let res = app
        .clone()
        .oneshot(get_request("/api/todos?page=0&limit=0"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let listing = body_json(res).await;
    assert_eq!(listing.get("page").and_then(|v| v.as_i64()), Some(1));
    assert_eq!(listing.get("limit").and_then(|v| v.as_i64()), Some(10));

    let res = app
        .oneshot(get_request("/api/todos?page=1&limit=500"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let listing = body_json(res).await;
    assert_eq!(listing.get("limit").and_then(|v| v.as_i64()), Some(100));
}
