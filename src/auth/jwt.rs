//! JWT issue and validation backed by the revocation list.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::db::{RevokedTokenRepository, User};
use crate::error::{AppError, AppResult};

const ISSUER: &str = "tusk-api";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub email: String,
    pub role: String,
    /// Token id, the revocation key.
    pub jti: String,
    pub iss: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> AppResult<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|_| AppError::auth("invalid token"))
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Issues, validates and revokes HS256 access tokens. Validation consults
/// the revocation store, so a cryptographically valid token can still be
/// rejected after logout.
#[derive(Clone)]
pub struct TokenService {
    revoked: Arc<dyn RevokedTokenRepository>,
    secret: String,
    ttl: Duration,
}

impl TokenService {
    pub fn new(revoked: Arc<dyn RevokedTokenRepository>, secret: String, ttl_secs: i64) -> Self {
        Self {
            revoked,
            secret,
            ttl: Duration::seconds(ttl_secs),
        }
    }

    /// Sign a token for the user. Returns the token and its expiry instant.
    /// No side effects beyond signing.
    pub fn issue(&self, user: &User) -> AppResult<(String, DateTime<Utc>)> {
        let now = Utc::now();
        let expires_at = now + self.ttl;
        let jti = Uuid::new_v4().to_string();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role.clone(),
            jti: jti.clone(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("sign token: {}", e)))?;
        info!(user_id = %user.id, jti = %jti, "token issued");
        Ok((token, expires_at))
    }

    /// Verify signature and standard claims (HS256 only, exp, nbf, iss),
    /// then reject the token if its JTI is on the revocation list.
    pub async fn validate(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.validate_nbf = true;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| {
            warn!(error = %e, "token validation failed");
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::auth("token expired")
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::auth("invalid token signature")
                }
                // Malformed tokens and algorithm mismatches stay opaque.
                _ => AppError::auth("invalid token"),
            }
        })?;
        let claims = data.claims;

        if self.revoked.is_revoked(&claims.jti, Utc::now()).await? {
            warn!(jti = %claims.jti, "revoked token presented");
            return Err(AppError::auth("token is revoked"));
        }

        debug!(sub = %claims.sub, jti = %claims.jti, "token validated");
        Ok(claims)
    }

    /// Record a JTI so validation rejects it until natural expiry.
    pub async fn revoke(&self, jti: &str, expires_at: DateTime<Utc>) -> AppResult<()> {
        self.revoked.save(jti, expires_at).await?;
        info!(jti = %jti, "token revoked");
        Ok(())
    }

    /// Drop revocation rows past their expiry; those tokens fail on `exp` anyway.
    pub async fn clean_expired_revoked(&self) -> AppResult<u64> {
        let removed = self.revoked.delete_expired(Utc::now()).await?;
        if removed > 0 {
            info!(removed, "expired revocation entries cleaned");
        }
        Ok(removed)
    }
}
