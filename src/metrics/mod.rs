pub mod counter;
pub mod registry;
pub mod request_time;
pub mod stream;
pub mod summary;

use std::time::Duration;

use serde::Serialize;

pub use counter::{CounterSnapshot, RequestCounter};
pub use registry::{AspectRegistry, RegistrySnapshot};
pub use request_time::{RequestTimeAggregator, RequestTimeSnapshot};
pub use summary::LatencySummary;

/// One completed request as seen by the timing middleware.
/// This is the "write" side — the middleware builds one and every aspect observes it.
#[derive(Debug, Clone, Copy)]
pub struct RequestEvent<'a> {
    /// Request path without the query string, e.g. "/api/items/7"
    pub path: &'a str,
    /// Response status code
    pub status: u16,
    /// Wall time from request arrival to response
    pub elapsed: Duration,
}

/// A pluggable metrics component.
///
/// Every method takes `&self`: implementations lock internally so one
/// instance can be shared by all request handlers, the tick task and the
/// stats endpoints at once.
pub trait Aspect: Send + Sync {
    /// Capture one completed request.
    fn observe(&self, event: &RequestEvent<'_>);

    /// Close the current window. Called from the periodic tick.
    fn reset(&self);

    /// Consistent point-in-time copy of the aspect's stats.
    fn snapshot(&self) -> AspectStats;

    /// Key used by the registry and the stats endpoints.
    fn name(&self) -> &'static str;

    /// Whether the stats belong on the application's root page.
    fn in_root(&self) -> bool;
}

/// Snapshot of any aspect. A closed set, so callers match instead of downcasting.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AspectStats {
    Counter(CounterSnapshot),
    RequestTime(RequestTimeSnapshot),
}

impl AspectStats {
    pub fn as_counter(&self) -> Option<&CounterSnapshot> {
        match self {
            Self::Counter(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_request_time(&self) -> Option<&RequestTimeSnapshot> {
        match self {
            Self::RequestTime(s) => Some(s),
            _ => None,
        }
    }
}
