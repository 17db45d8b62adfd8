//! Member API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{CardActivity, CardProgress, IssuedToken};

use crate::auth::MemberSession;
use crate::state::AppState;

/// POST /api/member/token
pub async fn issue_token(
    State(state): State<AppState>,
    MemberSession(session): MemberSession,
) -> AppResult<Json<IssuedToken>> {
    let issued = state
        .issuer
        .issue(&session.tenant_id, &session.subject)
        .await?;
    Ok(Json(issued))
}

/// GET /api/member/card
pub async fn current_card(
    State(state): State<AppState>,
    MemberSession(session): MemberSession,
) -> AppResult<Json<CardProgress>> {
    let card = state
        .issuer
        .current_card(&session.tenant_id, &session.subject)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::CardNotFound, "No active card"))?;
    Ok(Json(card))
}

/// GET /api/member/cards
pub async fn card_history(
    State(state): State<AppState>,
    MemberSession(session): MemberSession,
) -> AppResult<Json<Vec<CardProgress>>> {
    let cards = state
        .issuer
        .card_history(&session.tenant_id, &session.subject)
        .await?;
    Ok(Json(cards))
}

/// GET /api/member/cards/{card_id}
pub async fn card_activity(
    State(state): State<AppState>,
    MemberSession(session): MemberSession,
    Path(card_id): Path<i64>,
) -> AppResult<Json<CardActivity>> {
    let activity = state
        .issuer
        .card_activity(&session.tenant_id, &session.subject, card_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CardNotFound).with_detail("card_id", card_id))?;
    Ok(Json(activity))
}
