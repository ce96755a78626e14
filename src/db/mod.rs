//! Database layer: pool and per-entity repositories for PostgreSQL.

mod pool;
mod revoked_tokens;
mod todos;
mod users;

pub use pool::{create_pool, DbPool};
pub use revoked_tokens::{PgRevokedTokenRepository, RevokedTokenRepository};
pub use todos::{PgTodoRepository, Todo, TodoRepository};
pub use users::{PgUserRepository, User, UserRepository};
