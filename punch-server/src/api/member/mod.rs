//! Member device API
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/member/token | POST | Fresh presentation token for the member's active card |
//! | /api/member/card | GET | Active card with progress |
//! | /api/member/cards | GET | Card history, newest first |
//! | /api/member/cards/{card_id} | GET | One card with its stamps and redemption |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/member", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/token", post(handler::issue_token))
        .route("/card", get(handler::current_card))
        .route("/cards", get(handler::card_history))
        .route("/cards/{card_id}", get(handler::card_activity))
}
