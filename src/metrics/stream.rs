use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::StreamExt;

use super::{AspectStats, RegistrySnapshot};
use crate::handlers::AppError;
use crate::AppState;

// ─── GET /api/stats ──────────────────────────────────────────────
/// Every aspect's stats keyed by aspect name.

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<RegistrySnapshot> {
    Json(state.registry.snapshot())
}

// ─── GET /api/stats/root ─────────────────────────────────────────
/// Only the aspects that want to be shown on the root page.

pub async fn get_root_stats(
    State(state): State<Arc<AppState>>,
) -> Json<RegistrySnapshot> {
    Json(state.registry.root_snapshot())
}

// ─── GET /api/stats/:aspect ──────────────────────────────────────

pub async fn get_aspect_stats(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<AspectStats>, AppError> {
    state
        .registry
        .aspect(&name)
        .map(|aspect| Json(aspect.snapshot()))
        .ok_or_else(|| AppError::NotFound(format!("unknown aspect '{name}'")))
}

// ─── GET /api/stats/stream ───────────────────────────────────────
/// Server-Sent Events endpoint.
/// Pushes the full registry snapshot as JSON every `stream_interval_ms`.

pub async fn stats_stream(
    State(state): State<Arc<AppState>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    let interval = tokio::time::interval(state.config.stream_interval());

    let stream = IntervalStream::new(interval).map(move |_| {
        let snapshot = state.registry.snapshot();
        let json = serde_json::to_string(&snapshot).unwrap_or_default();
        Ok(Event::default().data(json))
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
