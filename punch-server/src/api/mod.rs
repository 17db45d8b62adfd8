//! HTTP API
//!
//! ```text
//! /health                      public
//! /api/member/*                member session
//! /api/staff/*                 staff session
//! /api/admin/programs[/active] admin session
//! ```

pub mod health;
pub mod member;
pub mod programs;
pub mod staff;

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::require_session;
use crate::state::AppState;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// All routes, no middleware and no state
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(member::router())
        .merge(staff::router())
        .merge(programs::router())
}

/// Fully configured application, used by the server and by oneshot tests
pub fn build_app(state: AppState) -> Router {
    build_router()
        // Session check before routes; injects SessionIdentity
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(
                    HeaderName::from_static(REQUEST_ID_HEADER),
                    XRequestId,
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    REQUEST_ID_HEADER,
                )))
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
