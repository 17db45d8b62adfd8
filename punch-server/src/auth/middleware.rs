//! Session middleware
//!
//! Verifies `Authorization: Bearer <session>` on `/api/` routes and inserts
//! a [`SessionIdentity`] into the request extensions. Role checks happen in
//! the extractors.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::{AppError, ErrorCode};

use super::session::{SessionIdentity, extract_bearer, verify_token};
use crate::state::AppState;

pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // CORS preflight
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // Non-API routes (health, 404s) are public
    if !req.uri().path().starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    let header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match header {
        Some(value) => extract_bearer(value).ok_or_else(|| {
            AppError::with_message(ErrorCode::SessionInvalid, "Invalid authorization header")
        })?,
        None => {
            tracing::debug!(uri = %req.uri(), "Missing session");
            return Err(AppError::not_authenticated());
        }
    };

    let identity: SessionIdentity = verify_token(token, &state.session_secret)?;
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}
