use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use super::{
    Aspect, AspectStats, RequestCounter, RequestEvent, RequestTimeAggregator,
};

/// Holds one instance of every aspect.
///
/// Built once at startup and shared via `Arc` with the timing middleware
/// (write side), the tick task (reset side) and the stats endpoints (read side).
pub struct AspectRegistry {
    counter: Arc<RequestCounter>,
    request_time: Arc<RequestTimeAggregator>,
}

/// Stats of several aspects keyed by aspect name.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct RegistrySnapshot {
    pub aspects: BTreeMap<&'static str, AspectStats>,
}

impl RegistrySnapshot {
    pub fn get(&self, name: &str) -> Option<&AspectStats> {
        self.aspects.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.aspects.is_empty()
    }
}

impl AspectRegistry {
    pub fn new() -> Self {
        Self {
            counter: Arc::new(RequestCounter::new()),
            request_time: Arc::new(RequestTimeAggregator::new()),
        }
    }

    pub fn counter(&self) -> &Arc<RequestCounter> {
        &self.counter
    }

    pub fn request_time(&self) -> &Arc<RequestTimeAggregator> {
        &self.request_time
    }

    /// Every registered aspect, in a stable order.
    pub fn aspects(&self) -> [&dyn Aspect; 2] {
        [&*self.counter, &*self.request_time]
    }

    /// Look up an aspect by its `name()`.
    pub fn aspect(&self, name: &str) -> Option<&dyn Aspect> {
        self.aspects().into_iter().find(|a| a.name() == name)
    }

    /// Feed one completed request to every aspect. Called from the middleware.
    pub fn observe(&self, path: &str, status: u16, elapsed: Duration) {
        let event = RequestEvent {
            path,
            status,
            elapsed,
        };
        for aspect in self.aspects() {
            aspect.observe(&event);
        }
    }

    /// Close the current window of every aspect. Called from the tick task.
    pub fn tick(&self) {
        for aspect in self.aspects() {
            aspect.reset();
        }
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        self.collect(|_| true)
    }

    /// Only the aspects meant for the application's root page.
    pub fn root_snapshot(&self) -> RegistrySnapshot {
        self.collect(|a| a.in_root())
    }

    fn collect(&self, keep: impl Fn(&dyn Aspect) -> bool) -> RegistrySnapshot {
        let aspects = self
            .aspects()
            .into_iter()
            .filter(|a| keep(*a))
            .map(|a| (a.name(), a.snapshot()))
            .collect();
        RegistrySnapshot { aspects }
    }
}

impl Default for AspectRegistry {
    fn default() -> Self {
        Self::new()
    }
}
