//! Card instance repository
//!
//! Mutations are only called from the transaction engine and the token
//! issuer. At most one ACTIVE card per (tenant, member) is enforced by the
//! partial unique index `idx_cards_one_active`; a losing concurrent insert
//! surfaces as a unique violation.

use shared::models::{CardInstance, CardProgress, CardStatus};
use shared::util::snowflake_id;
use sqlx::{SqliteExecutor, SqlitePool};

const PROGRESS_SELECT: &str = "SELECT c.id AS card_id, c.tenant_id, c.member_id, c.program_id, c.status, c.stamp_count, p.stamps_required, p.reward_description, c.created_at, c.redeemed_at FROM card_instances c JOIN programs p ON p.id = c.program_id";

/// Card joined with its bound program, scoped to the tenant
pub async fn find_progress<'e, E>(
    exec: E,
    tenant_id: &str,
    card_id: i64,
) -> Result<Option<CardProgress>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, CardProgress>(&format!(
        "{PROGRESS_SELECT} WHERE c.id = ? AND c.tenant_id = ?"
    ))
    .bind(card_id)
    .bind(tenant_id)
    .fetch_optional(exec)
    .await
}

pub async fn find_active_progress<'e, E>(
    exec: E,
    tenant_id: &str,
    member_id: &str,
) -> Result<Option<CardProgress>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, CardProgress>(&format!(
        "{PROGRESS_SELECT} WHERE c.tenant_id = ? AND c.member_id = ? AND c.status = 'ACTIVE'"
    ))
    .bind(tenant_id)
    .bind(member_id)
    .fetch_optional(exec)
    .await
}

/// Every card the member has held in this tenant, newest first
pub async fn list_for_member(
    pool: &SqlitePool,
    tenant_id: &str,
    member_id: &str,
) -> Result<Vec<CardProgress>, sqlx::Error> {
    sqlx::query_as::<_, CardProgress>(&format!(
        "{PROGRESS_SELECT} WHERE c.tenant_id = ? AND c.member_id = ? ORDER BY c.created_at DESC, c.id DESC"
    ))
    .bind(tenant_id)
    .bind(member_id)
    .fetch_all(pool)
    .await
}

/// Insert a fresh ACTIVE card with zero stamps.
///
/// Fails with a unique violation if the member already holds an ACTIVE card.
pub async fn insert_active<'e, E>(
    exec: E,
    tenant_id: &str,
    member_id: &str,
    program_id: i64,
    now: i64,
) -> Result<CardInstance, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let card = CardInstance {
        id: snowflake_id(),
        tenant_id: tenant_id.to_string(),
        member_id: member_id.to_string(),
        program_id,
        status: CardStatus::Active,
        stamp_count: 0,
        created_at: now,
        redeemed_at: None,
    };

    sqlx::query(
        "INSERT INTO card_instances (id, tenant_id, member_id, program_id, status, stamp_count, created_at) VALUES (?, ?, ?, ?, 'ACTIVE', 0, ?)",
    )
    .bind(card.id)
    .bind(&card.tenant_id)
    .bind(&card.member_id)
    .bind(card.program_id)
    .bind(card.created_at)
    .execute(exec)
    .await?;

    Ok(card)
}

/// Add exactly one stamp to an ACTIVE card. Returns the new count, or `None`
/// if the card is not ACTIVE in this tenant.
pub async fn increment_stamp<'e, E>(
    exec: E,
    tenant_id: &str,
    card_id: i64,
) -> Result<Option<i32>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let row: Option<(i32,)> = sqlx::query_as(
        "UPDATE card_instances SET stamp_count = stamp_count + 1 WHERE id = ? AND tenant_id = ? AND status = 'ACTIVE' RETURNING stamp_count",
    )
    .bind(card_id)
    .bind(tenant_id)
    .fetch_optional(exec)
    .await?;
    Ok(row.map(|(count,)| count))
}

/// Transition an ACTIVE card to REDEEMED. Returns `false` if it was not ACTIVE.
pub async fn mark_redeemed<'e, E>(
    exec: E,
    tenant_id: &str,
    card_id: i64,
    now: i64,
) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        "UPDATE card_instances SET status = 'REDEEMED', redeemed_at = ? WHERE id = ? AND tenant_id = ? AND status = 'ACTIVE'",
    )
    .bind(now)
    .bind(card_id)
    .bind(tenant_id)
    .execute(exec)
    .await?;
    Ok(result.rows_affected() > 0)
}
