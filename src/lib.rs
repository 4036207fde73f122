// Library crate for the user service
// This file exposes the public API for the binaries and integration tests

pub mod auth;
pub mod config;
pub mod http;
pub mod shared;
pub mod user;

// Re-export commonly used types for easier access in tests
pub use auth::{Audience, TokenClaims, TokenConfig};
pub use config::AppConfig;
pub use http::build_router;
pub use shared::{AppError, AppState, ErrorBody};
pub use user::{models::UserModel, repository::InMemoryUserRepository};
