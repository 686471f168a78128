//! Request monitoring for axum servers.
//!
//! Two aspects observe every completed request: a per-path [`RequestCounter`]
//! and a [`RequestTimeAggregator`] that summarizes latencies (min, max, mean,
//! population stdev, p90/p95/p99) once per window. Both live in an
//! [`AspectRegistry`] shared by the timing middleware, the periodic ticker
//! and the stats endpoints.

use std::sync::Arc;

pub mod config;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod server;
pub mod ticker;

pub use config::{ConfigError, MonitorConfig};
pub use metrics::{
    Aspect, AspectRegistry, AspectStats, LatencySummary, RequestCounter, RequestTimeAggregator,
};

/// Shared application state available to every handler via `State<Arc<AppState>>`.
pub struct AppState {
    /// Every aspect — the middleware writes, the stats routes read.
    pub registry: Arc<AspectRegistry>,

    pub config: MonitorConfig,
}

impl AppState {
    pub fn new(registry: Arc<AspectRegistry>, config: MonitorConfig) -> Arc<Self> {
        Arc::new(Self { registry, config })
    }
}
