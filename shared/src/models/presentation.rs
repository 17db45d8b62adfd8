//! Presentation token request / response payloads

use serde::{Deserialize, Serialize};

use super::card::CardProgress;

/// Response to a member device asking for a fresh token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    pub card: CardProgress,
    /// Opaque compact token, rendered as a QR payload by the device
    pub token: String,
    pub ttl_secs: i64,
}

/// Body of a staff stamp / redeem request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentTokenRequest {
    pub token: String,
}

/// Result of a successful stamp
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StampResult {
    pub card_id: i64,
    pub stamp_count: i32,
    pub stamps_required: i32,
}

/// Result of a successful redemption
///
/// `new_card_id` is `None` when the tenant had no active program at the time
/// of redemption, which leaves the member without a replacement card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RedeemResult {
    pub redeemed_card_id: i64,
    pub new_card_id: Option<i64>,
}
