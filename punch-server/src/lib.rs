//! Punch Server - rotating-token loyalty punch cards
//!
//! A member device asks for a short-lived presentation token and shows it as
//! a QR code; a staff terminal scans it to add a stamp or redeem a full card.
//! Each token is consumed at most once, and the claim, the card mutation and
//! the audit event commit together.
//!
//! ```text
//! punch-server/src/
//! ├── config.rs    # env configuration
//! ├── state.rs     # AppState wiring
//! ├── error.rs     # LoyaltyError taxonomy
//! ├── db/          # SQLite pool, migrations, repositories
//! ├── token/       # signer, issuer, verifier
//! ├── engine/      # stamp / redeem transactions
//! ├── auth/        # session middleware and extractors
//! └── api/         # HTTP routes
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod logger;
pub mod state;
pub mod token;

pub use config::Config;
pub use db::DbService;
pub use engine::{RedeemOutcome, StaffContext, TransactionEngine};
pub use error::{LoyaltyError, LoyaltyResult};
pub use state::AppState;
pub use token::{PresentationToken, TokenIssuer, TokenSigner};
