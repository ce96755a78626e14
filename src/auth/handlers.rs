//! Auth HTTP handlers: register, login, profile, password change,
//! user delete/restore, logout.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::middleware::auth::AuthClaims;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    pub role: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub old_password: String,
    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user_id: Uuid,
    pub email: String,
    pub role: String,
    pub token: String,
    /// Unix timestamp of the token's expiry.
    pub expires_at: i64,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user_id: Uuid,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    body.validate().map_err(AppError::from_validation)?;

    let (user, token, expires_at) = state
        .auth_service
        .register(&body.email, &body.password, &body.role)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user_id: user.id,
            email: user.email,
            role: user.role,
            token,
            expires_at: expires_at.timestamp(),
        }),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    body.validate().map_err(AppError::from_validation)?;

    let (user, token, expires_at) = state.auth_service.login(&body.email, &body.password).await?;

    Ok(Json(AuthResponse {
        user_id: user.id,
        email: user.email,
        role: user.role,
        token,
        expires_at: expires_at.timestamp(),
    }))
}

/// GET /api/auth/profile/:id (bearer token required)
pub async fn profile(
    State(state): State<AppState>,
    _claims: AuthClaims,
    Path(id): Path<Uuid>,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = state.auth_service.profile(id).await?;
    Ok(Json(ProfileResponse {
        user_id: user.id,
        email: user.email,
        role: user.role,
    }))
}

/// PUT /api/auth/users/:id/change-password (bearer token required)
pub async fn change_password(
    State(state): State<AppState>,
    _claims: AuthClaims,
    Path(id): Path<Uuid>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    body.validate().map_err(AppError::from_validation)?;

    state
        .auth_service
        .change_password(id, &body.old_password, &body.new_password)
        .await?;
    Ok(MessageResponse::new("Password changed successfully"))
}

/// DELETE /api/auth/users/:id — soft delete (bearer token required)
pub async fn delete_user(
    State(state): State<AppState>,
    _claims: AuthClaims,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    state.auth_service.delete_user(id).await?;
    Ok(MessageResponse::new("User deleted successfully"))
}

/// PUT /api/auth/users/:id/restore (bearer token required)
pub async fn restore_user(
    State(state): State<AppState>,
    _claims: AuthClaims,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    state.auth_service.restore_user(id).await?;
    Ok(MessageResponse::new("User restored successfully"))
}

/// POST /api/auth/logout — revoke the presented token's JTI.
pub async fn logout(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
) -> Result<Json<MessageResponse>, AppError> {
    let expires_at = claims
        .expires_at()
        .ok_or_else(|| AppError::auth("invalid token"))?;
    state.token_service.revoke(&claims.jti, expires_at).await?;
    Ok(MessageResponse::new("Logged out successfully"))
}
