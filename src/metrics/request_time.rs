use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

use super::summary::LatencySummary;
use super::{Aspect, AspectStats, RequestEvent};

const NAME: &str = "RequestTime";

// ─── Public types ────────────────────────────────────────────────

/// Windowed request latency statistics.
///
/// Handlers push samples with `record_latency()`; the periodic tick calls
/// `recompute()` which reduces the pending window to a [`LatencySummary`]
/// and starts a new one. `snapshot()` only ever sees completed windows.
pub struct RequestTimeAggregator {
    // Held for a whole recompute; taken before `window` or `summary`.
    recompute: Mutex<()>,
    summary: Mutex<Computed>,
    window: Mutex<Vec<f64>>,
}

/// Read-only view of the last completed window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RequestTimeSnapshot {
    #[serde(flatten)]
    pub summary: LatencySummary,
    /// Number of samples the summary was computed from
    pub samples: usize,
    /// When the summary was computed; `None` until the first non-empty window
    pub computed_at: Option<DateTime<Utc>>,
}

// ─── Internal state ──────────────────────────────────────────────

#[derive(Clone, Copy)]
struct Computed {
    summary: LatencySummary,
    samples: usize,
    computed_at: Option<DateTime<Utc>>,
}

// ─── RequestTimeAggregator impl ──────────────────────────────────

impl RequestTimeAggregator {
    pub fn new() -> Self {
        Self {
            recompute: Mutex::new(()),
            summary: Mutex::new(Computed {
                summary: LatencySummary::empty(),
                samples: 0,
                computed_at: None,
            }),
            window: Mutex::new(Vec::new()),
        }
    }

    /// Append one latency (seconds) to the pending window. Values are stored as given.
    pub fn record_latency(&self, seconds: f64) {
        self.window.lock().push(seconds);
    }

    /// Summarize the pending window and clear it.
    ///
    /// An empty window leaves the previous summary untouched. The sort runs
    /// with neither the window nor the summary locked, so writers wait only
    /// for the buffer swap and readers only for the final store.
    pub fn recompute(&self) {
        let _serial = self.recompute.lock();

        let mut samples = {
            let mut window = self.window.lock();
            if window.is_empty() {
                tracing::trace!("request time window empty, keeping previous summary");
                return;
            }
            let capacity = window.capacity();
            std::mem::replace(&mut *window, Vec::with_capacity(capacity))
        };

        if let Some(summary) = LatencySummary::from_samples(&mut samples) {
            *self.summary.lock() = Computed {
                summary,
                samples: samples.len(),
                computed_at: Some(Utc::now()),
            };
            tracing::debug!(
                samples = samples.len(),
                mean = summary.mean,
                p99 = summary.p99,
                "request time window summarized"
            );
        }
    }

    pub fn snapshot(&self) -> RequestTimeSnapshot {
        let computed = *self.summary.lock();
        RequestTimeSnapshot {
            summary: computed.summary,
            samples: computed.samples,
            computed_at: computed.computed_at,
        }
    }

    /// Number of samples waiting for the next `recompute()`.
    pub fn pending(&self) -> usize {
        self.window.lock().len()
    }
}

impl Default for RequestTimeAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Aspect for RequestTimeAggregator {
    fn observe(&self, event: &RequestEvent<'_>) {
        self.record_latency(event.elapsed.as_secs_f64());
    }

    fn reset(&self) {
        self.recompute();
    }

    fn snapshot(&self) -> AspectStats {
        AspectStats::RequestTime(RequestTimeAggregator::snapshot(self))
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn in_root(&self) -> bool {
        false
    }
}

// ─── Tests ───────────────────────────────────────────────────────
