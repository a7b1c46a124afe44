//! Application configuration management

use std::env;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// SQLite URL (`sqlite://path/to.db` or `sqlite::memory:`)
    pub database_url: String,

    /// Maximum pooled connections to the store
    pub database_max_connections: u32,

    /// Secret used to sign and verify identity tokens
    pub jwt_secret: String,

    /// `jwt_secret` was generated because none was configured
    pub jwt_secret_generated: bool,

    /// Identity token lifetime in seconds
    pub token_lifetime_secs: i64,

    /// bcrypt cost factor for stored passwords
    pub bcrypt_cost: u32,

    /// Serve the pre-built client (production mode)
    pub serve_client: bool,

    /// Directory holding the pre-built client
    pub client_build_dir: String,

    /// Emit logs as JSON lines instead of human-readable text
    pub json_logs: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // A generated secret does not survive a restart, nor do tokens signed with it
        let (jwt_secret, jwt_secret_generated) =
            match lookup("JWT_SECRET").map(|s| s.trim().to_string()) {
                Some(secret) if !secret.is_empty() => (secret, false),
                _ => (format!("dev-secret-{}", uuid::Uuid::new_v4().simple()), true),
            };

        let app_env = lookup("APP_ENV").or_else(|| lookup("NODE_ENV"));

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),

            port: lookup("PORT")
                .unwrap_or_else(|| "3001".to_string())
                .parse()
                .context("Invalid PORT")?,

            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://./data/bookshelf.db".to_string()),

            database_max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|| "10".to_string())
                .parse()
                .context("Invalid DATABASE_MAX_CONNECTIONS")?,

            jwt_secret,
            jwt_secret_generated,

            token_lifetime_secs: lookup("TOKEN_LIFETIME_SECS")
                .unwrap_or_else(|| "7200".to_string())
                .parse()
                .context("Invalid TOKEN_LIFETIME_SECS")?,

            bcrypt_cost: lookup("BCRYPT_COST")
                .unwrap_or_else(|| "10".to_string())
                .parse()
                .context("Invalid BCRYPT_COST")?,

            serve_client: app_env.as_deref() == Some("production"),

            client_build_dir: lookup("CLIENT_BUILD_DIR")
                .unwrap_or_else(|| "./client/build".to_string()),

            json_logs: lookup("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        })
    }
}
