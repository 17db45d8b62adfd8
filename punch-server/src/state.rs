//! Application state for punch-server

use std::sync::Arc;

use crate::config::Config;
use crate::db::DbService;
use crate::engine::TransactionEngine;
use crate::token::{TokenIssuer, TokenSigner};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool
    pub db: DbService,
    /// Member-side token issuance and card reads
    pub issuer: TokenIssuer,
    /// Staff-side stamp / redeem
    pub engine: TransactionEngine,
    /// Session JWT key
    pub session_secret: Arc<str>,
}

impl AppState {
    /// Open the database and wire the services
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let db = DbService::new(&config.database_path).await?;
        Ok(Self::with_db(db, config))
    }

    /// Wire the services over an already open database
    pub fn with_db(db: DbService, config: &Config) -> Self {
        // Loaded once, shared read-only by issuer and engine
        let signer = Arc::new(TokenSigner::new(
            config.presentation_secret.as_bytes(),
            config.token_ttl_secs,
        ));

        Self {
            issuer: TokenIssuer::new(db.pool.clone(), signer.clone()),
            engine: TransactionEngine::new(db.pool.clone(), signer, config.stamp_cooldown_ms),
            session_secret: Arc::from(config.session_secret.as_str()),
            db,
        }
    }
}
