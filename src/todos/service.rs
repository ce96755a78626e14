//! Todo business logic over the repository.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::db::{Todo, TodoRepository};
use crate::error::{AppError, AppResult};
use crate::pagination::{PageParams, Paginated};

/// Partial update: absent fields leave stored values untouched.
#[derive(Debug, Default, Clone)]
pub struct TodoUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Clone)]
pub struct TodoService {
    repo: Arc<dyn TodoRepository>,
}

impl TodoService {
    pub fn new(repo: Arc<dyn TodoRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(
        &self,
        title: &str,
        description: &str,
        completed: bool,
    ) -> AppResult<Todo> {
        let todo = self.repo.create(title, description, completed).await?;
        info!(todo_id = %todo.id, "todo created");
        Ok(todo)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Todo> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| todo_not_found(id))
    }

    pub async fn list(&self, params: PageParams) -> AppResult<Paginated<Todo>> {
        let (rows, total) = self.repo.list(params.offset(), params.limit).await?;
        Ok(Paginated::new(params, total, rows))
    }

    pub async fn list_with_deleted(&self, params: PageParams) -> AppResult<Paginated<Todo>> {
        let (rows, total) = self
            .repo
            .list_with_deleted(params.offset(), params.limit)
            .await?;
        Ok(Paginated::new(params, total, rows))
    }

    /// Merge the update into the stored row; a soft-deleted or missing id
    /// is not found.
    pub async fn update(&self, id: Uuid, update: TodoUpdate) -> AppResult<Todo> {
        let mut todo = self.get(id).await?;
        apply_update(&mut todo, &update);
        let updated = self
            .repo
            .update(&todo)
            .await?
            .ok_or_else(|| todo_not_found(id))?;
        info!(todo_id = %id, "todo updated");
        Ok(updated)
    }

    pub async fn soft_delete(&self, id: Uuid) -> AppResult<()> {
        if !self.repo.soft_delete(id).await? {
            return Err(todo_not_found(id));
        }
        info!(todo_id = %id, "todo soft-deleted");
        Ok(())
    }

    /// Restoring a todo that was never deleted is a no-op success; a row
    /// that no longer exists (hard-deleted) is not found.
    pub async fn restore(&self, id: Uuid) -> AppResult<()> {
        if !self.repo.restore(id).await? {
            return Err(todo_not_found(id));
        }
        info!(todo_id = %id, "todo restored");
        Ok(())
    }

    pub async fn hard_delete(&self, id: Uuid) -> AppResult<()> {
        if !self.repo.hard_delete(id).await? {
            return Err(todo_not_found(id));
        }
        info!(todo_id = %id, "todo hard-deleted");
        Ok(())
    }
}

fn todo_not_found(id: Uuid) -> AppError {
    AppError::not_found(format!("todo with id {} not found", id))
}

/// Merge a partial update into an existing todo. Empty strings are treated
/// as absent so a sparse payload never blanks stored fields.
fn apply_update(todo: &mut Todo, update: &TodoUpdate) {
    if let Some(title) = &update.title {
        if !title.is_empty() {
            todo.title = title.clone();
        }
    }
    if let Some(description) = &update.description {
        if !description.is_empty() {
            todo.description = description.clone();
        }
    }
    if let Some(completed) = update.completed {
        todo.completed = completed;
    }
}
