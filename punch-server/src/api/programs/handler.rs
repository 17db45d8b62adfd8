//! Program API Handlers

use axum::{Json, extract::State};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Program, ProgramCreate};
use shared::util::now_millis;

use crate::auth::AdminSession;
use crate::db::programs;
use crate::state::AppState;

fn db_error(e: sqlx::Error) -> AppError {
    tracing::error!(error = %e, "Program query failed");
    AppError::new(ErrorCode::DatabaseError)
}

/// GET /api/admin/programs
pub async fn list(
    State(state): State<AppState>,
    AdminSession(session): AdminSession,
) -> AppResult<Json<Vec<Program>>> {
    let all = programs::list(&state.db.pool, &session.tenant_id)
        .await
        .map_err(db_error)?;
    Ok(Json(all))
}

/// GET /api/admin/programs/active
pub async fn active(
    State(state): State<AppState>,
    AdminSession(session): AdminSession,
) -> AppResult<Json<Program>> {
    let program = programs::find_active(&state.db.pool, &session.tenant_id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| AppError::new(ErrorCode::NoActiveProgram))?;
    Ok(Json(program))
}

/// POST /api/admin/programs
pub async fn publish(
    State(state): State<AppState>,
    AdminSession(session): AdminSession,
    Json(payload): Json<ProgramCreate>,
) -> AppResult<Json<Program>> {
    payload
        .validate()
        .map_err(|msg| AppError::with_message(ErrorCode::ProgramInvalid, msg))?;

    let program = programs::publish(&state.db.pool, &session.tenant_id, &payload, now_millis())
        .await
        .map_err(db_error)?;

    tracing::info!(
        tenant_id = %session.tenant_id,
        program_id = program.id,
        version = program.version,
        stamps_required = program.stamps_required,
        "Program published"
    );
    Ok(Json(program))
}

/// DELETE /api/admin/programs/active
pub async fn deactivate(
    State(state): State<AppState>,
    AdminSession(session): AdminSession,
) -> AppResult<Json<bool>> {
    let deactivated = programs::deactivate(&state.db.pool, &session.tenant_id)
        .await
        .map_err(db_error)?;
    if deactivated {
        tracing::info!(tenant_id = %session.tenant_id, "Program deactivated");
    }
    Ok(Json(deactivated))
}
