//! Card Instance Models

use serde::{Deserialize, Serialize};

/// Card lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum CardStatus {
    /// Accumulating stamps
    Active,
    /// Reward handed out; the row is kept as history
    Redeemed,
}

impl CardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardStatus::Active => "ACTIVE",
            CardStatus::Redeemed => "REDEEMED",
        }
    }
}

/// A member's punch card, bound to one program version
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CardInstance {
    pub id: i64,
    pub tenant_id: String,
    pub member_id: String,
    pub program_id: i64,
    pub status: CardStatus,
    pub stamp_count: i32,
    pub created_at: i64,
    pub redeemed_at: Option<i64>,
}

/// Card joined with its bound program (what a device renders)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CardProgress {
    pub card_id: i64,
    pub tenant_id: String,
    pub member_id: String,
    pub program_id: i64,
    pub status: CardStatus,
    pub stamp_count: i32,
    pub stamps_required: i32,
    pub reward_description: String,
    pub created_at: i64,
    pub redeemed_at: Option<i64>,
}

impl CardProgress {
    pub fn is_active(&self) -> bool {
        self.status == CardStatus::Active
    }

    /// Full cards take no more stamps and are the only redeemable ones
    pub fn is_full(&self) -> bool {
        self.stamp_count >= self.stamps_required
    }
}
