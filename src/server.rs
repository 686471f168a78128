use axum::{middleware as axum_mw, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::handlers;
use crate::metrics::stream;
use crate::middleware::timing;
use crate::AppState;

/// Builds the full Axum `Router` with demo routes, stats routes and middleware.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // ── Demo endpoints ──────────────────────────────────────
        .route("/api/hello", get(handlers::demo::hello))
        .route("/api/items/:id", get(handlers::demo::get_item))
        .route("/api/slow/:ms", get(handlers::demo::slow))
        // ── Stats ───────────────────────────────────────────────
        .route("/api/stats", get(stream::get_stats))
        .route("/api/stats/root", get(stream::get_root_stats))
        .route("/api/stats/stream", get(stream::stats_stream))
        .route("/api/stats/:aspect", get(stream::get_aspect_stats))
        // ── Global middleware (applied bottom-up) ───────────────
        .layer(axum_mw::from_fn_with_state(
            state.clone(),
            timing::timing_middleware,
        ))
        .layer(CorsLayer::permissive())
        // ── Provide shared state to all routes above ────────────
        .with_state(state)
}
