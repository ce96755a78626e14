//! Auth application service: registration, login, user lifecycle.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::TokenService;
use crate::db::{User, UserRepository};
use crate::error::{AppError, AppResult, FieldError};

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: TokenService) -> Self {
        Self { users, tokens }
    }

    pub fn hash_password(password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("hash: {}", e)))?
            .to_string();
        Ok(hash)
    }

    pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("parse hash: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// Hash and persist a new user, then issue their first token. A duplicate
    /// email surfaces as a conflict naming the field.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        role: &str,
    ) -> AppResult<(User, String, DateTime<Utc>)> {
        validate_role(role)?;
        let password_hash = Self::hash_password(password)?;
        let user = self.users.create(email, &password_hash, role).await?;
        let (token, expires_at) = self.tokens.issue(&user)?;
        info!(user_id = %user.id, "user registered");
        Ok((user, token, expires_at))
    }

    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> AppResult<(User, String, DateTime<Utc>)> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::auth("invalid credentials"))?;

        if !Self::verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "login attempt with wrong password");
            return Err(AppError::auth("invalid credentials"));
        }

        let (token, expires_at) = self.tokens.issue(&user)?;
        info!(user_id = %user.id, "user logged in");
        Ok((user, token, expires_at))
    }

    pub async fn profile(&self, id: Uuid) -> AppResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("user not found"))
    }

    pub async fn change_password(
        &self,
        id: Uuid,
        old_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let user = self.profile(id).await?;
        if !Self::verify_password(old_password, &user.password_hash)? {
            warn!(user_id = %id, "password change with wrong old password");
            return Err(AppError::auth("invalid credentials"));
        }
        let hash = Self::hash_password(new_password)?;
        if !self.users.update_password(id, &hash).await? {
            return Err(AppError::not_found("user not found"));
        }
        info!(user_id = %id, "password changed");
        Ok(())
    }

    pub async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        if !self.users.soft_delete(id).await? {
            return Err(AppError::not_found("user not found"));
        }
        info!(user_id = %id, "user soft-deleted");
        Ok(())
    }

    /// Restoring a user that was never deleted is a no-op success.
    pub async fn restore_user(&self, id: Uuid) -> AppResult<()> {
        if !self.users.restore(id).await? {
            return Err(AppError::not_found("user not found"));
        }
        info!(user_id = %id, "user restored");
        Ok(())
    }
}

fn validate_role(role: &str) -> AppResult<()> {
    match role {
        "user" | "admin" => Ok(()),
        _ => Err(AppError::validation(
            "validation failed",
            vec![FieldError {
                field: "role".to_string(),
                message: "must be one of: user, admin".to_string(),
            }],
        )),
    }
}
