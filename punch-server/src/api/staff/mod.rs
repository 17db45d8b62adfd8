//! Staff terminal API
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/staff/stamp | POST | Add one stamp with a scanned presentation token |
//! | /api/staff/redeem | POST | Redeem a full card with a scanned presentation token |

mod handler;

use axum::{Router, routing::post};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/staff", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/stamp", post(handler::stamp))
        .route("/redeem", post(handler::redeem))
}
