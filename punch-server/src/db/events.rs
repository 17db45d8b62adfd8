//! Stamp / redemption audit events (append-only)

use shared::models::{RedemptionEvent, StampEvent};
use shared::util::snowflake_id;
use sqlx::{SqliteExecutor, SqlitePool};

/// Who performed an operation and with which token
#[derive(Debug, Clone, Copy)]
pub struct EventActor<'a> {
    pub staff_id: &'a str,
    pub branch_id: &'a str,
    pub jti: &'a str,
}

pub async fn insert_stamp<'e, E>(
    exec: E,
    tenant_id: &str,
    card_id: i64,
    actor: EventActor<'_>,
    now: i64,
) -> Result<i64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO stamp_events (id, tenant_id, card_id, staff_id, branch_id, jti, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(tenant_id)
    .bind(card_id)
    .bind(actor.staff_id)
    .bind(actor.branch_id)
    .bind(actor.jti)
    .bind(now)
    .execute(exec)
    .await?;
    Ok(id)
}

pub async fn insert_redemption<'e, E>(
    exec: E,
    tenant_id: &str,
    card_id: i64,
    actor: EventActor<'_>,
    now: i64,
) -> Result<i64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO redemption_events (id, tenant_id, card_id, staff_id, branch_id, jti, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(tenant_id)
    .bind(card_id)
    .bind(actor.staff_id)
    .bind(actor.branch_id)
    .bind(actor.jti)
    .bind(now)
    .execute(exec)
    .await?;
    Ok(id)
}

/// Timestamp of the most recent stamp on a card
pub async fn last_stamp_at<'e, E>(exec: E, card_id: i64) -> Result<Option<i64>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let row: (Option<i64>,) =
        sqlx::query_as("SELECT MAX(created_at) FROM stamp_events WHERE card_id = ?")
            .bind(card_id)
            .fetch_one(exec)
            .await?;
    Ok(row.0)
}

pub async fn stamps_for_card(
    pool: &SqlitePool,
    tenant_id: &str,
    card_id: i64,
) -> Result<Vec<StampEvent>, sqlx::Error> {
    sqlx::query_as::<_, StampEvent>(
        "SELECT id, tenant_id, card_id, staff_id, branch_id, jti, created_at FROM stamp_events WHERE tenant_id = ? AND card_id = ? ORDER BY created_at, id",
    )
    .bind(tenant_id)
    .bind(card_id)
    .fetch_all(pool)
    .await
}

pub async fn redemption_for_card(
    pool: &SqlitePool,
    tenant_id: &str,
    card_id: i64,
) -> Result<Option<RedemptionEvent>, sqlx::Error> {
    sqlx::query_as::<_, RedemptionEvent>(
        "SELECT id, tenant_id, card_id, staff_id, branch_id, jti, created_at FROM redemption_events WHERE tenant_id = ? AND card_id = ?",
    )
    .bind(tenant_id)
    .bind(card_id)
    .fetch_optional(pool)
    .await
}
