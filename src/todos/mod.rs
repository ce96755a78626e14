//! Todo items: CRUD, soft-delete lifecycle, pagination.

pub mod handlers;
mod service;

pub use service::{TodoService, TodoUpdate};
