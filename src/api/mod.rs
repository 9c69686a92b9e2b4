//! HTTP management API.
//!
//! Thin glue over the registry: decode form fields, call the one matching
//! registry operation, encode the touched hosts as JSON. All real semantics
//! (locking, persistence, reload) live below this layer.

pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use self::handlers::*;
use crate::registry::Registry;

/// Shared state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/list", get(list))
        .route("/api/create", post(create))
        .route("/api/set", post(set))
        .route("/api/modify", post(modify))
        .route("/api/delete", post(delete))
        .route("/api/unset", post(unset))
        .route("/api/enable", post(enable))
        .route("/api/disable", post(disable))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
