//! Authentication: JWT issue/validate/revoke, registration, login, user lifecycle.

pub mod handlers;
mod jwt;
mod service;

pub use jwt::{Claims, TokenService};
pub use service::AuthService;
