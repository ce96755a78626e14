//! Todo persistence: row type, capability trait, Postgres implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::DbPool;
use crate::error::AppResult;

#[derive(Debug, Clone, FromRow)]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Todo {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Storage operations over todo records. Default lookups and listings
/// exclude soft-deleted rows; restore and hard-delete look through the
/// marker so a soft-deleted row can still be targeted.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn create(&self, title: &str, description: &str, completed: bool) -> AppResult<Todo>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Todo>>;
    /// Rows for one page plus the total row count, newest first.
    async fn list(&self, offset: i64, limit: i64) -> AppResult<(Vec<Todo>, i64)>;
    async fn list_with_deleted(&self, offset: i64, limit: i64) -> AppResult<(Vec<Todo>, i64)>;
    /// Persists title/description/completed. Returns None when the row is
    /// missing or soft-deleted.
    async fn update(&self, todo: &Todo) -> AppResult<Option<Todo>>;
    /// Returns false when the row is missing or already soft-deleted.
    async fn soft_delete(&self, id: Uuid) -> AppResult<bool>;
    /// Clears the soft-delete marker. Returns false when no row exists at all.
    async fn restore(&self, id: Uuid) -> AppResult<bool>;
    /// Physical removal. Returns false when no row exists at all.
    async fn hard_delete(&self, id: Uuid) -> AppResult<bool>;
}

#[derive(Clone)]
pub struct PgTodoRepository {
    pool: DbPool,
}

impl PgTodoRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoRepository for PgTodoRepository {
    async fn create(&self, title: &str, description: &str, completed: bool) -> AppResult<Todo> {
        let row = sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (title, description, completed)
            VALUES ($1, $2, $3)
            RETURNING id, title, description, completed, created_at, updated_at, deleted_at
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(completed)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Todo>> {
        let row = sqlx::query_as::<_, Todo>(
            "SELECT id, title, description, completed, created_at, updated_at, deleted_at FROM todos WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list(&self, offset: i64, limit: i64) -> AppResult<(Vec<Todo>, i64)> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM todos WHERE deleted_at IS NULL")
                .fetch_one(&self.pool)
                .await?;
        let rows = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, title, description, completed, created_at, updated_at, deleted_at
            FROM todos
            WHERE deleted_at IS NULL
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok((rows, total))
    }

    async fn list_with_deleted(&self, offset: i64, limit: i64) -> AppResult<(Vec<Todo>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM todos")
            .fetch_one(&self.pool)
            .await?;
        let rows = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, title, description, completed, created_at, updated_at, deleted_at
            FROM todos
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok((rows, total))
    }

    async fn update(&self, todo: &Todo) -> AppResult<Option<Todo>> {
        let row = sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todos
            SET title = $2, description = $3, completed = $4, updated_at = now()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, title, description, completed, created_at, updated_at, deleted_at
            "#,
        )
        .bind(todo.id)
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.completed)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn soft_delete(&self, id: Uuid) -> AppResult<bool> {
        let r = sqlx::query(
            "UPDATE todos SET deleted_at = now(), updated_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(r.rows_affected() > 0)
    }

    async fn restore(&self, id: Uuid) -> AppResult<bool> {
        let r = sqlx::query("UPDATE todos SET deleted_at = NULL, updated_at = now() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(r.rows_affected() > 0)
    }

    async fn hard_delete(&self, id: Uuid) -> AppResult<bool> {
        let r = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(r.rows_affected() > 0)
    }
}
