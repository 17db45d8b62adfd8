//! Replay guard
//!
//! A row keyed by (tenant_id, jti) exists iff the presentation token was
//! consumed by a committed stamp or redemption. The claim is always the first
//! write of the engine's transaction, so it commits or rolls back together
//! with the card mutation.

use sqlx::SqliteExecutor;

/// Claim a token identifier. Returns `false` if it was already consumed.
pub async fn claim<'e, E>(
    exec: E,
    tenant_id: &str,
    jti: &str,
    card_id: i64,
    now: i64,
) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    // INSERT OR IGNORE: the primary key decides, no read-then-write race
    let result = sqlx::query(
        "INSERT OR IGNORE INTO token_uses (tenant_id, jti, card_id, consumed_at) VALUES (?, ?, ?, ?)",
    )
    .bind(tenant_id)
    .bind(jti)
    .bind(card_id)
    .bind(now)
    .execute(exec)
    .await?;
    Ok(result.rows_affected() == 1)
}

#[cfg(test)]
pub(crate) async fn is_consumed<'e, E>(exec: E, tenant_id: &str, jti: &str) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT consumed_at FROM token_uses WHERE tenant_id = ? AND jti = ?")
            .bind(tenant_id)
            .bind(jti)
            .fetch_optional(exec)
            .await?;
    Ok(row.is_some())
}
