//! Program repository
//!
//! One active program per tenant is enforced by the partial unique index
//! `idx_programs_one_active`; publishing swaps the active version inside a
//! single transaction.

use shared::models::{Program, ProgramCreate};
use shared::util::snowflake_id;
use sqlx::{SqliteExecutor, SqlitePool};

const PROGRAM_COLUMNS: &str =
    "id, tenant_id, version, stamps_required, reward_description, is_active, created_at";

/// Currently active program for a tenant
pub async fn find_active<'e, E>(exec: E, tenant_id: &str) -> Result<Option<Program>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Program>(&format!(
        "SELECT {PROGRAM_COLUMNS} FROM programs WHERE tenant_id = ? AND is_active = 1"
    ))
    .bind(tenant_id)
    .fetch_optional(exec)
    .await
}

/// All versions for a tenant, newest first
pub async fn list(pool: &SqlitePool, tenant_id: &str) -> Result<Vec<Program>, sqlx::Error> {
    sqlx::query_as::<_, Program>(&format!(
        "SELECT {PROGRAM_COLUMNS} FROM programs WHERE tenant_id = ? ORDER BY version DESC"
    ))
    .bind(tenant_id)
    .fetch_all(pool)
    .await
}

/// Publish a new program version and make it the tenant's only active one.
///
/// Cards already issued keep the program id they were created with.
pub async fn publish(
    pool: &SqlitePool,
    tenant_id: &str,
    data: &ProgramCreate,
    now: i64,
) -> Result<Program, sqlx::Error> {
    let mut tx = pool.begin().await?;

    // Write first so the transaction holds the write lock before reading MAX(version)
    sqlx::query("UPDATE programs SET is_active = 0 WHERE tenant_id = ? AND is_active = 1")
        .bind(tenant_id)
        .execute(&mut *tx)
        .await?;

    let (version,): (i32,) =
        sqlx::query_as("SELECT COALESCE(MAX(version), 0) + 1 FROM programs WHERE tenant_id = ?")
            .bind(tenant_id)
            .fetch_one(&mut *tx)
            .await?;

    let program = Program {
        id: snowflake_id(),
        tenant_id: tenant_id.to_string(),
        version,
        stamps_required: data.stamps_required,
        reward_description: data.reward_description.trim().to_string(),
        is_active: true,
        created_at: now,
    };

    sqlx::query(
        "INSERT INTO programs (id, tenant_id, version, stamps_required, reward_description, is_active, created_at) VALUES (?, ?, ?, ?, ?, 1, ?)",
    )
    .bind(program.id)
    .bind(&program.tenant_id)
    .bind(program.version)
    .bind(program.stamps_required)
    .bind(&program.reward_description)
    .bind(program.created_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(program)
}

/// Deactivate the tenant's active program. Returns `false` if none was active.
pub async fn deactivate(pool: &SqlitePool, tenant_id: &str) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("UPDATE programs SET is_active = 0 WHERE tenant_id = ? AND is_active = 1")
            .bind(tenant_id)
            .execute(pool)
            .await?;
    Ok(result.rows_affected() > 0)
}
