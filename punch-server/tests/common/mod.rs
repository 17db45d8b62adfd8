//! Shared setup for integration tests

#![allow(dead_code)]

use punch_server::{AppState, Config, DbService, StaffContext};
use shared::models::{Program, ProgramCreate};
use tempfile::TempDir;

pub const T0: i64 = 1_700_000_000_000;
pub const SESSION_SECRET: &str = "integration-session-secret";

pub struct TestApp {
    pub state: AppState,
    _dir: TempDir,
}

pub fn config(cooldown_ms: i64) -> Config {
    Config {
        database_path: String::new(),
        http_port: 0,
        environment: "test".into(),
        presentation_secret: "integration-presentation-secret-0123456789".into(),
        session_secret: SESSION_SECRET.into(),
        token_ttl_secs: 30,
        stamp_cooldown_ms: cooldown_ms,
        log_level: "debug".into(),
        log_dir: None,
    }
}

/// Fresh file-backed database (WAL, real concurrent connections)
pub async fn spawn_app(cooldown_ms: i64) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("punch.db");
    let db = DbService::new(path.to_str().unwrap()).await.unwrap();
    TestApp {
        state: AppState::with_db(db, &config(cooldown_ms)),
        _dir: dir,
    }
}

impl TestApp {
    pub async fn publish(&self, tenant_id: &str, stamps_required: i32) -> Program {
        let data = ProgramCreate {
            stamps_required,
            reward_description: "Free coffee".into(),
        };
        punch_server::db::programs::publish(&self.state.db.pool, tenant_id, &data, T0)
            .await
            .unwrap()
    }

    /// Replay-guard rows for a tenant
    pub async fn token_use_count(&self, tenant_id: &str) -> i64 {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM token_uses WHERE tenant_id = ?")
            .bind(tenant_id)
            .fetch_one(&self.state.db.pool)
            .await
            .unwrap();
        count
    }
}

pub fn staff(tenant_id: &str) -> StaffContext {
    StaffContext {
        tenant_id: tenant_id.into(),
        staff_id: "staff-1".into(),
        branch_id: "branch-1".into(),
        enabled: true,
    }
}
