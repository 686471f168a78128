use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

use super::{Aspect, AspectStats, RequestEvent};

const NAME: &str = "Counter";

// ─── Public types ────────────────────────────────────────────────

/// Request totals for the current window, overall and per path.
///
/// `record_event` is called for every request, `reset_window` from the
/// periodic tick, `snapshot` from the stats endpoints.
pub struct RequestCounter {
    inner: Mutex<Inner>,
}

/// Read-only copy of the counter, detached from the live state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CounterSnapshot {
    pub total_requests: u64,
    pub requests_by_path: HashMap<String, u64>,
    pub window_started_at: DateTime<Utc>,
}

// ─── Internal state ──────────────────────────────────────────────

struct Inner {
    total_requests: u64,
    requests_by_path: HashMap<String, u64>,
    window_started_at: DateTime<Utc>,
}

impl Inner {
    fn new() -> Self {
        Self {
            total_requests: 0,
            requests_by_path: HashMap::new(),
            window_started_at: Utc::now(),
        }
    }
}

// ─── RequestCounter impl ─────────────────────────────────────────

impl RequestCounter {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::new()),
        }
    }

    /// Count one request against the total and against its path.
    ///
    /// The status code does not influence the tally.
    pub fn record_event(&self, path: &str, _status: u16) {
        let mut inner = self.inner.lock();
        inner.total_requests += 1;
        // Avoid allocating the key for paths we have already seen
        match inner.requests_by_path.get_mut(path) {
            Some(count) => *count += 1,
            None => {
                inner.requests_by_path.insert(path.to_owned(), 1);
            }
        }
    }

    /// Zero the total and forget every path.
    pub fn reset_window(&self) {
        let mut inner = self.inner.lock();
        tracing::debug!(
            total = inner.total_requests,
            paths = inner.requests_by_path.len(),
            "request counter window closed"
        );
        *inner = Inner::new();
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        let inner = self.inner.lock();
        CounterSnapshot {
            total_requests: inner.total_requests,
            requests_by_path: inner.requests_by_path.clone(),
            window_started_at: inner.window_started_at,
        }
    }
}

impl Default for RequestCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl Aspect for RequestCounter {
    fn observe(&self, event: &RequestEvent<'_>) {
        self.record_event(event.path, event.status);
    }

    fn reset(&self) {
        self.reset_window();
    }

    fn snapshot(&self) -> AspectStats {
        AspectStats::Counter(RequestCounter::snapshot(self))
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn in_root(&self) -> bool {
        false
    }
}

// ─── Tests ───────────────────────────────────────────────────────
