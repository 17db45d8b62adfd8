//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // 404 Not Found
            Self::CardNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict (card state does not allow the transition)
            Self::TokenReplayed
            | Self::CardNotActive
            | Self::CardFull
            | Self::CardNotEligible => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated | Self::SessionExpired | Self::SessionInvalid => {
                StatusCode::UNAUTHORIZED
            }

            // 403 Forbidden
            Self::PermissionDenied | Self::StaffDisabled | Self::TokenTenantMismatch => {
                StatusCode::FORBIDDEN
            }

            // 422 Unprocessable Entity
            Self::NoActiveProgram => StatusCode::UNPROCESSABLE_ENTITY,

            // 429 Too Many Requests
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,

            // 500 Internal Server Error
            Self::InternalError | Self::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (malformed / expired presentation token, invalid program)
            Self::TokenInvalid | Self::TokenExpired | Self::ProgramInvalid => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}
