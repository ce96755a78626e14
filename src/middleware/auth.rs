//! Bearer-token extractor: full validation including the revocation check.

use axum::http::header::AUTHORIZATION;

use crate::auth::Claims;
use crate::error::AppError;
use crate::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Extractor: validated claims from the request's bearer token. Rejects
/// missing/malformed headers and any token the token service refuses,
/// revoked JTIs included.
#[derive(Clone, Debug)]
pub struct AuthClaims(pub Claims);

#[axum::async_trait]
impl axum::extract::FromRequestParts<AppState> for AuthClaims {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix(BEARER_PREFIX))
            .ok_or_else(|| AppError::auth("Missing or invalid Authorization header"))?;
        let claims = state.token_service.validate(token).await?;
        Ok(AuthClaims(claims))
    }
}
