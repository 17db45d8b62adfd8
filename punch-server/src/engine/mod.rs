//! Transaction engine
//!
//! Stamp and redeem are each one SQLite transaction:
//!
//! ```text
//! BEGIN
//!   INSERT OR IGNORE token_uses      -- replay claim, takes the write lock
//!   SELECT card + bound program      -- re-read under the lock
//!   checks (status / full / cooldown)
//!   UPDATE card_instances
//!   INSERT stamp_events | redemption_events
//!   [INSERT replacement card]        -- redeem only
//! COMMIT
//! ```
//!
//! Any failure drops the transaction, which rolls back the claim with it, so
//! only committed operations consume a token.

mod redeem;
mod stamp;

use std::sync::Arc;

use shared::models::{CardInstance, RedeemResult};
use sqlx::SqlitePool;

use crate::error::{LoyaltyError, LoyaltyResult};
use crate::token::{PresentationToken, TokenSigner};

/// Per-card minimum interval between two stamps
pub const DEFAULT_STAMP_COOLDOWN_MS: i64 = 5_000;

/// Staff identity supplied by the staff-session layer, re-checked at call time
#[derive(Debug, Clone)]
pub struct StaffContext {
    pub tenant_id: String,
    pub staff_id: String,
    pub branch_id: String,
    pub enabled: bool,
}

/// Outcome of a successful redemption
///
/// `new_card` is `None` when the tenant had no active program, leaving the
/// member without a replacement card.
#[derive(Debug, Clone, PartialEq)]
pub struct RedeemOutcome {
    pub redeemed_card_id: i64,
    pub new_card: Option<CardInstance>,
}

impl From<RedeemOutcome> for RedeemResult {
    fn from(outcome: RedeemOutcome) -> Self {
        Self {
            redeemed_card_id: outcome.redeemed_card_id,
            new_card_id: outcome.new_card.map(|c| c.id),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransactionEngine {
    pool: SqlitePool,
    signer: Arc<TokenSigner>,
    cooldown_ms: i64,
}

impl TransactionEngine {
    pub fn new(pool: SqlitePool, signer: Arc<TokenSigner>, cooldown_ms: i64) -> Self {
        Self {
            pool,
            signer,
            cooldown_ms: cooldown_ms.max(0),
        }
    }

    pub fn cooldown_ms(&self) -> i64 {
        self.cooldown_ms
    }

    /// Staff gate plus stateless token checks, shared by stamp and redeem
    fn authorize(
        &self,
        staff: &StaffContext,
        raw_token: &str,
        now: i64,
    ) -> LoyaltyResult<PresentationToken> {
        if !staff.enabled {
            return Err(LoyaltyError::StaffDisabled {
                staff_id: staff.staff_id.clone(),
            });
        }
        self.signer.verify(raw_token, &staff.tenant_id, now)
    }
}

fn log_rejection(operation: &'static str, staff: &StaffContext, err: &LoyaltyError) {
    match err {
        LoyaltyError::Storage(_) | LoyaltyError::Signing(_) => tracing::error!(
            operation,
            tenant_id = %staff.tenant_id,
            staff_id = %staff.staff_id,
            error = %err,
            "Card operation failed"
        ),
        _ => tracing::warn!(
            operation,
            tenant_id = %staff.tenant_id,
            staff_id = %staff.staff_id,
            code = %err.code(),
            error = %err,
            "Card operation rejected"
        ),
    }
}
