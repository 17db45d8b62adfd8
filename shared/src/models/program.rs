//! Loyalty Program Models

use serde::{Deserialize, Serialize};

/// Versioned reward definition (集章计划)
///
/// At most one version per tenant has `is_active = true`. Cards snapshot the
/// `id` of the version active when they were created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Program {
    pub id: i64,
    pub tenant_id: String,
    pub version: i32,
    pub stamps_required: i32,
    pub reward_description: String,
    pub is_active: bool,
    pub created_at: i64,
}

/// Publish program payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramCreate {
    pub stamps_required: i32,
    pub reward_description: String,
}

impl ProgramCreate {
    /// Upper bound on stamps per card
    pub const MAX_STAMPS: i32 = 100;

    /// Validate the payload, returning a human-readable reason on failure
    pub fn validate(&self) -> Result<(), String> {
        if self.stamps_required < 1 || self.stamps_required > Self::MAX_STAMPS {
            return Err(format!(
                "stamps_required must be between 1 and {}",
                Self::MAX_STAMPS
            ));
        }
        if self.reward_description.trim().is_empty() {
            return Err("reward_description must not be empty".to_string());
        }
        Ok(())
    }
}
