use std::str::FromStr;
use tracing::warn;

use crate::auth::TokenConfig;
use crate::shared::AppError;

/// Process configuration, read once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: String,
    pub seed_users: bool,
    pub token: TokenConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            bind_address: env_or("BIND_ADDRESS", "0.0.0.0:3000".to_string()),
            seed_users: env_or("SEED_USERS", true),
            token: TokenConfig::from_env()?,
        })
    }
}

/// Reads and parses an environment variable, falling back to `default` when
/// it is unset or does not parse
pub fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "Ignoring unparseable environment variable");
            default
        }),
        Err(_) => default,
    }
}
