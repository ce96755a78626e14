//! Revocation list persistence: JTIs of revoked tokens until natural expiry.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::DbPool;
use crate::error::AppResult;

/// Storage operations over the token revocation list. Duplicate saves of
/// the same JTI are allowed; `is_revoked` only considers unexpired rows.
#[async_trait]
pub trait RevokedTokenRepository: Send + Sync {
    async fn save(&self, jti: &str, expires_at: DateTime<Utc>) -> AppResult<()>;
    async fn is_revoked(&self, jti: &str, now: DateTime<Utc>) -> AppResult<bool>;
    /// Deletes rows whose expiry has passed; returns how many were removed.
    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

#[derive(Clone)]
pub struct PgRevokedTokenRepository {
    pool: DbPool,
}

impl PgRevokedTokenRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RevokedTokenRepository for PgRevokedTokenRepository {
    async fn save(&self, jti: &str, expires_at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query("INSERT INTO revoked_tokens (jti, expires_at) VALUES ($1, $2)")
            .bind(jti)
            .bind(expires_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn is_revoked(&self, jti: &str, now: DateTime<Utc>) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM revoked_tokens WHERE jti = $1 AND expires_at > $2",
        )
        .bind(jti)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let r = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(r.rows_affected())
    }
}
