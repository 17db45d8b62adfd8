//! Staff status lookups
//!
//! `staff_members` mirrors the staff-management service; this crate only
//! reads it to re-check a staff account right before a stamp or redemption.

use sqlx::SqlitePool;

pub const STATUS_ENABLED: &str = "ENABLED";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StaffRecord {
    pub id: String,
    pub tenant_id: String,
    pub branch_id: String,
    pub status: String,
}

impl StaffRecord {
    pub fn is_enabled(&self) -> bool {
        self.status == STATUS_ENABLED
    }
}

pub async fn find(
    pool: &SqlitePool,
    tenant_id: &str,
    staff_id: &str,
) -> Result<Option<StaffRecord>, sqlx::Error> {
    sqlx::query_as::<_, StaffRecord>(
        "SELECT id, tenant_id, branch_id, status FROM staff_members WHERE tenant_id = ? AND id = ?",
    )
    .bind(tenant_id)
    .bind(staff_id)
    .fetch_optional(pool)
    .await
}

/// Insert or update a staff mirror row
pub async fn upsert(
    pool: &SqlitePool,
    tenant_id: &str,
    staff_id: &str,
    branch_id: &str,
    status: &str,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO staff_members (id, tenant_id, branch_id, status, updated_at) VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (tenant_id, id)
            DO UPDATE SET branch_id = excluded.branch_id, status = excluded.status, updated_at = excluded.updated_at",
    )
    .bind(staff_id)
    .bind(tenant_id)
    .bind(branch_id)
    .bind(status)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}
