//! Business error taxonomy for the token protocol and transaction engine
//!
//! `LoyaltyError` is the closed set of outcomes a stamp / redeem / issue call
//! can fail with. Every variant is terminal for the request; `Storage` and
//! `Signing` are the non-business variants and are logged, never shown to the
//! caller.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoyaltyError {
    #[error("presentation token is invalid: {0}")]
    TokenInvalid(String),

    #[error("presentation token expired")]
    TokenExpired,

    #[error("presentation token tenant {actual} does not match {expected}")]
    TokenTenantMismatch { expected: String, actual: String },

    #[error("presentation token {jti} already used")]
    TokenReplayed { jti: String },

    #[error("tenant {tenant_id} has no active program")]
    NoActiveProgram { tenant_id: String },

    #[error("card {card_id} not found")]
    CardNotFound { card_id: i64 },

    #[error("card {card_id} is not active")]
    CardNotActive { card_id: i64 },

    #[error("card {card_id} is full ({stamps_required} stamps)")]
    CardFull { card_id: i64, stamps_required: i32 },

    #[error("card {card_id} has {stamp_count}/{stamps_required} stamps")]
    CardNotEligible {
        card_id: i64,
        stamp_count: i32,
        stamps_required: i32,
    },

    #[error("card {card_id} stamped too recently, retry in {retry_after_ms}ms")]
    RateLimited { card_id: i64, retry_after_ms: i64 },

    #[error("staff {staff_id} is disabled")]
    StaffDisabled { staff_id: String },

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

impl LoyaltyError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::TokenInvalid(_) => ErrorCode::TokenInvalid,
            Self::TokenExpired => ErrorCode::TokenExpired,
            Self::TokenTenantMismatch { .. } => ErrorCode::TokenTenantMismatch,
            Self::TokenReplayed { .. } => ErrorCode::TokenReplayed,
            Self::NoActiveProgram { .. } => ErrorCode::NoActiveProgram,
            Self::CardNotFound { .. } => ErrorCode::CardNotFound,
            Self::CardNotActive { .. } => ErrorCode::CardNotActive,
            Self::CardFull { .. } => ErrorCode::CardFull,
            Self::CardNotEligible { .. } => ErrorCode::CardNotEligible,
            Self::RateLimited { .. } => ErrorCode::RateLimited,
            Self::StaffDisabled { .. } => ErrorCode::StaffDisabled,
            Self::Storage(_) | Self::Signing(_) => ErrorCode::InternalError,
        }
    }
}

impl From<LoyaltyError> for AppError {
    fn from(e: LoyaltyError) -> Self {
        let code = e.code();
        match e {
            LoyaltyError::Storage(db_err) => {
                tracing::error!(error = %db_err, "Loyalty storage error");
                AppError::new(ErrorCode::InternalError)
            }
            LoyaltyError::Signing(jwt_err) => {
                tracing::error!(error = %jwt_err, "Presentation token signing error");
                AppError::new(ErrorCode::InternalError)
            }
            LoyaltyError::TokenTenantMismatch { .. } | LoyaltyError::TokenInvalid(_) => {
                // Do not echo foreign tenant ids or decoder internals
                AppError::new(code)
            }
            LoyaltyError::TokenReplayed { .. }
            | LoyaltyError::TokenExpired
            | LoyaltyError::NoActiveProgram { .. }
            | LoyaltyError::StaffDisabled { .. } => AppError::new(code),
            LoyaltyError::CardNotFound { card_id } | LoyaltyError::CardNotActive { card_id } => {
                AppError::new(code).with_detail("card_id", card_id)
            }
            LoyaltyError::CardFull {
                card_id,
                stamps_required,
            } => AppError::new(code)
                .with_detail("card_id", card_id)
                .with_detail("stamps_required", stamps_required),
            LoyaltyError::CardNotEligible {
                card_id,
                stamp_count,
                stamps_required,
            } => AppError::new(code)
                .with_detail("card_id", card_id)
                .with_detail("stamp_count", stamp_count)
                .with_detail("stamps_required", stamps_required),
            LoyaltyError::RateLimited {
                card_id,
                retry_after_ms,
            } => AppError::new(code)
                .with_detail("card_id", card_id)
                .with_detail("retry_after_ms", retry_after_ms),
        }
    }
}

impl IntoResponse for LoyaltyError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

pub type LoyaltyResult<T> = Result<T, LoyaltyError>;
