//! Request middleware: bearer-token extraction for protected routes.

pub mod auth;

pub use auth::AuthClaims;
