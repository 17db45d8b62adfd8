//! Stamp / Redemption audit records (append-only)

use serde::{Deserialize, Serialize};

/// One recorded stamp
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StampEvent {
    pub id: i64,
    pub tenant_id: String,
    pub card_id: i64,
    pub staff_id: String,
    pub branch_id: String,
    pub jti: String,
    pub created_at: i64,
}

/// One recorded redemption
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RedemptionEvent {
    pub id: i64,
    pub tenant_id: String,
    pub card_id: i64,
    pub staff_id: String,
    pub branch_id: String,
    pub jti: String,
    pub created_at: i64,
}

/// A card together with its audit trail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardActivity {
    pub card: super::CardProgress,
    /// Oldest first
    pub stamps: Vec<StampEvent>,
    pub redemption: Option<RedemptionEvent>,
}
