//! `AppError` and the JSON body it renders as

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Error returned by every HTTP handler
///
/// Carries a stable [`ErrorCode`], a message and optional structured
/// details (card id, retry hint, stamp counts).
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Error with the default message for `code`
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }
}

/// Wire shape of an error: `{ "code": 4003, "message": "...", "details": {...} }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl From<AppError> for ErrorBody {
    fn from(err: AppError) -> Self {
        Self {
            code: err.code,
            message: err.message,
            details: err.details,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.http_status();

        if self.code.category() == ErrorCategory::System {
            tracing::error!(code = %self.code, message = %self.message, "System error occurred");
        }

        (status, axum::Json(ErrorBody::from(self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::CardFull);
        assert_eq!(err.code, ErrorCode::CardFull);
        assert_eq!(err.message, "Card is full and must be redeemed");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::new(ErrorCode::RateLimited)
            .with_detail("card_id", 42)
            .with_detail("retry_after_ms", 1200);

        let details = err.details.unwrap();
        assert_eq!(details.get("card_id").unwrap(), 42);
        assert_eq!(details.get("retry_after_ms").unwrap(), 1200);
    }

    #[test]
    fn test_app_error_http_status() {
        assert_eq!(
            AppError::new(ErrorCode::TokenReplayed).http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::not_authenticated().http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::permission_denied("staff only").http_status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_error_body_shape() {
        let err = AppError::new(ErrorCode::CardNotEligible).with_detail("stamp_count", 3);
        let json = serde_json::to_value(ErrorBody::from(err)).unwrap();

        assert_eq!(json["code"], 4004);
        assert_eq!(json["message"], "Card is not eligible for redemption");
        assert_eq!(json["details"]["stamp_count"], 3);

        let bare = serde_json::to_value(ErrorBody::from(AppError::not_authenticated())).unwrap();
        assert!(bare.get("details").is_none());
    }
}
