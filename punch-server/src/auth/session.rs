//! Session JWTs issued by the external identity service
//!
//! Member devices, staff terminals and tenant admins all authenticate with an
//! HS256 session token carrying the tenant and role. Presentation tokens use
//! a different key and audience and are never accepted here.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

/// Caller role carried by a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionRole {
    Member,
    Staff,
    Admin,
}

/// JWT claims of a session token
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Member / staff / admin ID
    pub sub: String,
    pub tenant_id: String,
    pub role: SessionRole,
    /// Staff branch (staff sessions only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated caller, inserted into request extensions by the middleware
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub subject: String,
    pub tenant_id: String,
    pub role: SessionRole,
    pub branch_id: Option<String>,
}

impl From<SessionClaims> for SessionIdentity {
    fn from(claims: SessionClaims) -> Self {
        Self {
            subject: claims.sub,
            tenant_id: claims.tenant_id,
            role: claims.role,
            branch_id: claims.branch_id,
        }
    }
}

/// Sign a session token. Used by tests and local tooling; production sessions
/// come from the identity service.
pub fn create_token(
    identity: &SessionIdentity,
    secret: &str,
    ttl: chrono::Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = SessionClaims {
        sub: identity.subject.clone(),
        tenant_id: identity.tenant_id.clone(),
        role: identity.role,
        branch_id: identity.branch_id.clone(),
        exp: (now + ttl).timestamp().max(0) as usize,
        iat: now.timestamp().max(0) as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify a session token and return the caller identity
pub fn verify_token(token: &str, secret: &str) -> Result<SessionIdentity, AppError> {
    let data = jsonwebtoken::decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::new(ErrorCode::SessionExpired),
        _ => {
            tracing::debug!("Session JWT validation failed: {e}");
            AppError::new(ErrorCode::SessionInvalid)
        }
    })?;

    Ok(data.claims.into())
}

/// Strip the `Bearer ` prefix of an Authorization header value
pub fn extract_bearer(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
