//! Role-checked session extractors
//!
//! Handlers take `MemberSession` / `StaffSession` / `AdminSession` instead of
//! reading extensions themselves. The identity is normally inserted by
//! [`require_session`](super::require_session); when a router is built
//! without the middleware the extractor verifies the header itself.

use axum::extract::FromRequestParts;
use http::request::Parts;
use shared::error::AppError;

use super::session::{SessionIdentity, SessionRole, extract_bearer, verify_token};
use crate::state::AppState;

impl FromRequestParts<AppState> for SessionIdentity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<SessionIdentity>() {
            return Ok(identity.clone());
        }

        let token = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(extract_bearer)
            .ok_or_else(AppError::not_authenticated)?;

        let identity = verify_token(token, &state.session_secret)?;
        parts.extensions.insert(identity.clone());
        Ok(identity)
    }
}

async fn with_role(
    parts: &mut Parts,
    state: &AppState,
    role: SessionRole,
) -> Result<SessionIdentity, AppError> {
    let identity = SessionIdentity::from_request_parts(parts, state).await?;
    if identity.role != role {
        tracing::warn!(
            subject = %identity.subject,
            tenant_id = %identity.tenant_id,
            actual = ?identity.role,
            required = ?role,
            "Session role rejected"
        );
        return Err(AppError::permission_denied(format!(
            "{role:?} session required"
        )));
    }
    Ok(identity)
}

/// A member device session (`sub` = member id)
#[derive(Debug, Clone)]
pub struct MemberSession(pub SessionIdentity);

/// A staff terminal session (`sub` = staff id)
#[derive(Debug, Clone)]
pub struct StaffSession(pub SessionIdentity);

/// A tenant admin session
#[derive(Debug, Clone)]
pub struct AdminSession(pub SessionIdentity);

impl FromRequestParts<AppState> for MemberSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        with_role(parts, state, SessionRole::Member).await.map(Self)
    }
}

impl FromRequestParts<AppState> for StaffSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        with_role(parts, state, SessionRole::Staff).await.map(Self)
    }
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        with_role(parts, state, SessionRole::Admin).await.map(Self)
    }
}
