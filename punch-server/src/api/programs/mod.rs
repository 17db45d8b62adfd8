//! Program administration API (tenant admin session)
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/admin/programs | GET | All program versions |
//! | /api/admin/programs | POST | Publish a new active version |
//! | /api/admin/programs/active | GET | Current active version |
//! | /api/admin/programs/active | DELETE | Deactivate the active version |

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/admin/programs", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::publish))
        .route("/active", get(handler::active).delete(handler::deactivate))
}
