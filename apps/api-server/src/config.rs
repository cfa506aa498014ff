//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Absent means the server runs on the in-memory store.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub jwt_secret: Option<String>,
    pub jwt_expiration_hours: i64,
    /// Empty means any origin is accepted.
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_env("PORT", 5000),
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            db_max_connections: parse_env("DB_MAX_CONNECTIONS", 20),
            db_min_connections: parse_env("DB_MIN_CONNECTIONS", 2),
            jwt_secret: env::var("JWT_SECRET").ok(),
            jwt_expiration_hours: parse_env("JWT_EXPIRATION_HOURS", 24),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .map(|v| parse_origins(&v))
                .unwrap_or_default(),
        }
    }

    #[cfg(feature = "postgres")]
    pub fn database_config(&self) -> Option<quill_infra::DatabaseConfig> {
        self.database_url
            .as_ref()
            .map(|url| quill_infra::DatabaseConfig {
                url: url.clone(),
                max_connections: self.db_max_connections,
                min_connections: self.db_min_connections,
            })
    }

    #[cfg(feature = "auth")]
    pub fn jwt_config(&self) -> quill_infra::JwtConfig {
        let defaults = quill_infra::JwtConfig::default();
        quill_infra::JwtConfig {
            secret: self.jwt_secret.clone().unwrap_or(defaults.secret),
            expiration_hours: self.jwt_expiration_hours,
            ..defaults
        }
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Invalid value, using default");
            default
        }),
        Err(_) => default,
    }
}

/// Split a comma-separated origin list, dropping blanks.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
