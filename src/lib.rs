//! Todo-list and user-authentication API backend.
//!
//! JWT (HS256) authentication with a database-backed revocation list, and
//! todo CRUD with soft-delete/restore over PostgreSQL.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod pagination;
pub mod todos;

pub use config::Config;
pub use error::AppError;

use axum::routing::{delete, get, patch, post, put};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use auth::{AuthService, TokenService};
use todos::TodoService;

/// Shared application state, cloned per request. Services carry their own
/// pool handles.
#[derive(Clone)]
pub struct AppState {
    pub token_service: TokenService,
    pub auth_service: AuthService,
    pub todo_service: TodoService,
}

/// Build the API router (auth, todos, health). Used by main and by integration tests.
pub fn create_app(state: AppState) -> axum::Router {
    let auth_routes = axum::Router::new()
        .route("/register", post(auth::handlers::register))
        .route("/login", post(auth::handlers::login))
        .route("/profile/:id", get(auth::handlers::profile))
        .route(
            "/users/:id/change-password",
            put(auth::handlers::change_password),
        )
        .route(
            "/users/:id",
            delete(auth::handlers::delete_user),
        )
        .route("/users/:id/restore", put(auth::handlers::restore_user))
        .route("/logout", post(auth::handlers::logout));

    let todo_routes = axum::Router::new()
        .route(
            "/",
            post(todos::handlers::create_todo).get(todos::handlers::list_todos),
        )
        .route("/all", get(todos::handlers::list_todos_with_deleted))
        .route(
            "/:id",
            get(todos::handlers::get_todo)
                .put(todos::handlers::update_todo)
                .delete(todos::handlers::soft_delete_todo),
        )
        .route("/:id/restore", patch(todos::handlers::restore_todo))
        .route("/:id/hard", delete(todos::handlers::hard_delete_todo));

    axum::Router::new()
        .route("/health", get(health))
        .nest("/api/auth", auth_routes)
        .nest("/api/todos", todo_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET /health — liveness probe.
async fn health() -> &'static str {
    "OK"
}
