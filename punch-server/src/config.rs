//! Punch server configuration

use crate::engine::DEFAULT_STAMP_COOLDOWN_MS;
use crate::token::{DEFAULT_TOKEN_TTL_SECS, MIN_SECRET_LEN};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Punch server configuration
#[derive(Clone)]
pub struct Config {
    /// SQLite database file
    pub database_path: String,
    /// HTTP listen port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// Presentation token signing key
    pub presentation_secret: String,
    /// Session JWT key shared with the identity service
    pub session_secret: String,
    /// Presentation token validity window
    pub token_ttl_secs: i64,
    /// Per-card minimum interval between stamps
    pub stamp_cooldown_ms: i64,
    pub log_level: String,
    /// Daily rolling log files are written here when set
    pub log_dir: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_path", &self.database_path)
            .field("http_port", &self.http_port)
            .field("environment", &self.environment)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("stamp_cooldown_ms", &self.stamp_cooldown_ms)
            .field("log_level", &self.log_level)
            .field("log_dir", &self.log_dir)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        // Random per-process key in development
        let presentation_secret = match std::env::var("PRESENTATION_SECRET") {
            Ok(v) if !v.is_empty() => v,
            _ if environment == "development" => crate::token::generate_dev_secret(),
            _ => Self::require_secret("PRESENTATION_SECRET", &environment)?,
        };
        if environment != "development" && presentation_secret.len() < MIN_SECRET_LEN {
            return Err(
                format!("PRESENTATION_SECRET must be at least {MIN_SECRET_LEN} characters").into(),
            );
        }

        let token_ttl_secs = parse_env("TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS);
        if token_ttl_secs <= 0 {
            return Err("TOKEN_TTL_SECS must be positive".into());
        }
        let stamp_cooldown_ms = parse_env("STAMP_COOLDOWN_MS", DEFAULT_STAMP_COOLDOWN_MS);
        if stamp_cooldown_ms < 0 {
            return Err("STAMP_COOLDOWN_MS must not be negative".into());
        }

        Ok(Self {
            database_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "punch.db".into()),
            http_port: parse_env("HTTP_PORT", 8080),
            presentation_secret,
            session_secret: Self::require_secret("SESSION_SECRET", &environment)?,
            environment,
            token_ttl_secs,
            stamp_cooldown_ms,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
