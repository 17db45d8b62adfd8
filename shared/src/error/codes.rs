//! Unified error codes for the punch-card platform
//!
//! Error codes are organized by category:
//! - 1xxx: Session / authentication errors
//! - 2xxx: Presentation token errors
//! - 3xxx: Staff errors
//! - 4xxx: Card errors
//! - 5xxx: Program errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so device clients can
/// switch on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 1xxx: Session ====================
    /// Caller is not authenticated
    NotAuthenticated = 1001,
    /// Session token has expired
    SessionExpired = 1002,
    /// Session token is invalid
    SessionInvalid = 1003,
    /// Session role does not allow this operation
    PermissionDenied = 1004,

    // ==================== 2xxx: Presentation token ====================
    /// Presentation token signature or payload is invalid
    TokenInvalid = 2001,
    /// Presentation token validity window has passed
    TokenExpired = 2002,
    /// Presentation token was issued for another tenant
    TokenTenantMismatch = 2003,
    /// Presentation token has already been consumed
    TokenReplayed = 2004,

    // ==================== 3xxx: Staff ====================
    /// Staff account is disabled or unknown
    StaffDisabled = 3001,

    // ==================== 4xxx: Card ====================
    /// Card not found in this tenant
    CardNotFound = 4001,
    /// Card is not active
    CardNotActive = 4002,
    /// Card already holds the required number of stamps
    CardFull = 4003,
    /// Card cannot be redeemed yet
    CardNotEligible = 4004,
    /// Card was stamped too recently
    RateLimited = 4005,

    // ==================== 5xxx: Program ====================
    /// Tenant has no active program
    NoActiveProgram = 5001,
    /// Program definition is invalid
    ProgramInvalid = 5003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // Session
            ErrorCode::NotAuthenticated => "Authentication required",
            ErrorCode::SessionExpired => "Session has expired",
            ErrorCode::SessionInvalid => "Session is invalid",
            ErrorCode::PermissionDenied => "Permission denied",

            // Presentation token
            ErrorCode::TokenInvalid => "Presentation token is invalid",
            ErrorCode::TokenExpired => "Presentation token has expired",
            ErrorCode::TokenTenantMismatch => "Presentation token belongs to another tenant",
            ErrorCode::TokenReplayed => "Presentation token has already been used",

            // Staff
            ErrorCode::StaffDisabled => "Staff account is disabled",

            // Card
            ErrorCode::CardNotFound => "Card not found",
            ErrorCode::CardNotActive => "Card is not active",
            ErrorCode::CardFull => "Card is full and must be redeemed",
            ErrorCode::CardNotEligible => "Card is not eligible for redemption",
            ErrorCode::RateLimited => "Card was stamped too recently",

            // Program
            ErrorCode::NoActiveProgram => "No active program for this tenant",
            ErrorCode::ProgramInvalid => "Program definition is invalid",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // Session
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::SessionExpired),
            1003 => Ok(ErrorCode::SessionInvalid),
            1004 => Ok(ErrorCode::PermissionDenied),

            // Presentation token
            2001 => Ok(ErrorCode::TokenInvalid),
            2002 => Ok(ErrorCode::TokenExpired),
            2003 => Ok(ErrorCode::TokenTenantMismatch),
            2004 => Ok(ErrorCode::TokenReplayed),

            // Staff
            3001 => Ok(ErrorCode::StaffDisabled),

            // Card
            4001 => Ok(ErrorCode::CardNotFound),
            4002 => Ok(ErrorCode::CardNotActive),
            4003 => Ok(ErrorCode::CardFull),
            4004 => Ok(ErrorCode::CardNotEligible),
            4005 => Ok(ErrorCode::RateLimited),

            // Program
            5001 => Ok(ErrorCode::NoActiveProgram),
            5003 => Ok(ErrorCode::ProgramInvalid),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::PermissionDenied.code(), 1004);

        assert_eq!(ErrorCode::TokenInvalid.code(), 2001);
        assert_eq!(ErrorCode::TokenExpired.code(), 2002);
        assert_eq!(ErrorCode::TokenTenantMismatch.code(), 2003);
        assert_eq!(ErrorCode::TokenReplayed.code(), 2004);

        assert_eq!(ErrorCode::StaffDisabled.code(), 3001);

        assert_eq!(ErrorCode::CardNotFound.code(), 4001);
        assert_eq!(ErrorCode::CardNotActive.code(), 4002);
        assert_eq!(ErrorCode::CardFull.code(), 4003);
        assert_eq!(ErrorCode::CardNotEligible.code(), 4004);
        assert_eq!(ErrorCode::RateLimited.code(), 4005);

        assert_eq!(ErrorCode::NoActiveProgram.code(), 5001);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(2004), Ok(ErrorCode::TokenReplayed));
        assert_eq!(ErrorCode::try_from(4003), Ok(ErrorCode::CardFull));
        assert_eq!(ErrorCode::try_from(9001), Ok(ErrorCode::InternalError));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(0), Err(InvalidErrorCode(0)));
        assert_eq!(ErrorCode::try_from(5002), Err(InvalidErrorCode(5002)));
        assert_eq!(ErrorCode::try_from(2999), Err(InvalidErrorCode(2999)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
    }

    #[test]
    fn test_serialize_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::TokenReplayed).unwrap(), "2004");
        assert_eq!(serde_json::to_string(&ErrorCode::CardFull).unwrap(), "4003");
    }

    #[test]
    fn test_deserialize() {
        let code: ErrorCode = serde_json::from_str("2002").unwrap();
        assert_eq!(code, ErrorCode::TokenExpired);

        let result: Result<ErrorCode, _> = serde_json::from_str("999");
        assert!(result.is_err());
    }

    #[test]
    fn test_display_and_message() {
        assert_eq!(format!("{}", ErrorCode::RateLimited), "4005");
        assert_eq!(
            ErrorCode::TokenReplayed.message(),
            "Presentation token has already been used"
        );
        assert_eq!(ErrorCode::InternalError.message(), "Internal server error");
    }

    #[test]
    fn test_invalid_error_code_display() {
        let err = InvalidErrorCode(999);
        assert_eq!(format!("{}", err), "invalid error code: 999");
    }
}
