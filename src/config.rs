//! Configuration
//!
//! All configuration values are loaded from environment variables once at
//! startup and injected explicitly; business logic never reads ambient
//! process state.

use std::env;

/// Development-only fallback signing secret. Must never be used in production
/// deployments; a warning is logged whenever it is picked up.
pub const DEV_JWT_SECRET: &str = "dev_jwt_secret";

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address to bind the HTTP listener to (from BIND_ADDR env var)
    pub bind_addr: String,

    /// SQLite connection string (from DATABASE_URL env var)
    pub database_url: String,

    /// Authentication settings
    pub auth: AuthConfig,
}

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT secret key for signing tokens (from JWT_SECRET env var)
    pub jwt_secret: String,

    /// Token expiration in seconds (from TOKEN_EXPIRATION env var)
    pub token_expiration: i64,

    /// Argon2 memory cost in KiB (from ARGON2_MEMORY_COST env var)
    pub argon2_memory_cost: u32,

    /// Argon2 time cost (iterations) (from ARGON2_TIME_COST env var)
    pub argon2_time_cost: u32,

    /// Argon2 parallelism (from ARGON2_PARALLELISM env var)
    pub argon2_parallelism: u32,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:5000".to_string()),

            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:data.db?mode=rwc".to_string()),

            auth: AuthConfig::from_env(),
        }
    }
}

impl AuthConfig {
    /// Load authentication configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                tracing::warn!(
                    "JWT_SECRET not set, falling back to the development default; \
                     set it before deploying"
                );
                DEV_JWT_SECRET.to_string()
            }),

            token_expiration: env::var("TOKEN_EXPIRATION")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(43200), // 12 hours default

            argon2_memory_cost: env::var("ARGON2_MEMORY_COST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(65536), // 64 MiB

            argon2_time_cost: env::var("ARGON2_TIME_COST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),

            argon2_parallelism: env::var("ARGON2_PARALLELISM")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt_secret.is_empty() {
            return Err("JWT_SECRET must not be empty".to_string());
        }

        if self.token_expiration <= 0 {
            return Err("TOKEN_EXPIRATION must be positive".to_string());
        }

        if self.argon2_parallelism == 0 {
            return Err("ARGON2_PARALLELISM must be at least 1".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "a".repeat(32),
            token_expiration: 43200,
            argon2_memory_cost: 65536,
            argon2_time_cost: 3,
            argon2_parallelism: 4,
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_config_validation_empty_secret() {
        let config = AuthConfig {
            jwt_secret: String::new(),
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_nonpositive_expiration() {
        let config = AuthConfig {
            token_expiration: 0,
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }
}
