//! Staff API Handlers

use axum::{Json, extract::State};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{PresentTokenRequest, RedeemResult, StampResult};

use crate::auth::{SessionIdentity, StaffSession};
use crate::db::staff;
use crate::engine::StaffContext;
use crate::state::AppState;

/// POST /api/staff/stamp
pub async fn stamp(
    State(state): State<AppState>,
    StaffSession(session): StaffSession,
    Json(req): Json<PresentTokenRequest>,
) -> AppResult<Json<StampResult>> {
    let ctx = staff_context(&state, &session).await?;
    let result = state.engine.stamp(&ctx, &req.token).await?;
    Ok(Json(result))
}

/// POST /api/staff/redeem
pub async fn redeem(
    State(state): State<AppState>,
    StaffSession(session): StaffSession,
    Json(req): Json<PresentTokenRequest>,
) -> AppResult<Json<RedeemResult>> {
    let ctx = staff_context(&state, &session).await?;
    let outcome = state.engine.redeem(&ctx, &req.token).await?;
    Ok(Json(outcome.into()))
}

/// Re-read the staff record right before the operation; the session may be
/// older than a disable.
async fn staff_context(state: &AppState, session: &SessionIdentity) -> AppResult<StaffContext> {
    let record = staff::find(&state.db.pool, &session.tenant_id, &session.subject)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to load staff record");
            AppError::new(ErrorCode::DatabaseError)
        })?;

    // The session names the branch the terminal is at; the record is the fallback
    let (record_branch, enabled) = match record {
        Some(r) => {
            let enabled = r.is_enabled();
            (Some(r.branch_id), enabled)
        }
        None => (None, false),
    };
    let branch_id = session
        .branch_id
        .clone()
        .or(record_branch)
        .unwrap_or_default();

    Ok(StaffContext {
        tenant_id: session.tenant_id.clone(),
        staff_id: session.subject.clone(),
        branch_id,
        enabled,
    })
}
