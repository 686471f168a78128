use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::metrics::AspectRegistry;

/// Spawns the task that closes every aspect's window once per `period`.
///
/// The first tick fires one full period after spawning. Ticks missed
/// while the runtime was busy are delayed, never fired in a burst.
pub fn spawn_ticker(registry: Arc<AspectRegistry>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            // The latency sort is CPU-bound, run it off the async workers
            let registry = registry.clone();
            match tokio::task::spawn_blocking(move || registry.tick()).await {
                Ok(()) => {
                    tracing::debug!(period_secs = period.as_secs_f64(), "aspect windows closed")
                }
                Err(e) => tracing::warn!("aspect tick failed: {e}"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period() {
        let registry = Arc::new(AspectRegistry::new());
        let handle = spawn_ticker(registry.clone(), Duration::from_secs(60));

        registry.observe("/a", 200, Duration::from_millis(5));

        // Not yet a full period
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(registry.counter().snapshot().total_requests, 1);
        assert_eq!(registry.request_time().pending(), 1);

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(registry.counter().snapshot().total_requests, 0);
        assert_eq!(registry.request_time().pending(), 0);
        assert_eq!(registry.request_time().snapshot().samples, 1);

        handle.abort();
    }
}
