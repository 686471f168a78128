use std::sync::Arc;
use std::thread;
use std::time::Duration;

use reqmon::{AspectRegistry, RequestCounter, RequestTimeAggregator};

const PATH: &str = "/foo/bar";

#[test]
fn no_lost_increments_across_threads() {
    let counter = Arc::new(RequestCounter::new());
    let threads = 50;
    let per_thread = 200;

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let counter = counter.clone();
            thread::spawn(move || {
                for _ in 0..per_thread {
                    counter.record_event(PATH, 200);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let snap = counter.snapshot();
    assert_eq!(snap.requests_by_path[PATH], 10_000);
    assert_eq!(snap.total_requests, 10_000);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn no_lost_increments_across_tasks() {
    let counter = Arc::new(RequestCounter::new());

    let handles: Vec<_> = (0..10_000)
        .map(|_| {
            let counter = counter.clone();
            tokio::spawn(async move { counter.record_event(PATH, 404) })
        })
        .collect();
    for h in handles {
        h.await.unwrap();
    }

    assert_eq!(counter.snapshot().requests_by_path[PATH], 10_000);
}

#[test]
fn snapshots_are_never_torn() {
    let counter = Arc::new(RequestCounter::new());
    let paths = ["/a", "/b", "/c", "/d"];

    let writers: Vec<_> = paths
        .iter()
        .map(|&p| {
            let counter = counter.clone();
            thread::spawn(move || {
                for i in 0..5_000 {
                    counter.record_event(p, 200);
                    if i % 1_000 == 999 {
                        counter.reset_window();
                    }
                }
            })
        })
        .collect();

    let reader = {
        let counter = counter.clone();
        thread::spawn(move || {
            for _ in 0..2_000 {
                let snap = counter.snapshot();
                let sum: u64 = snap.requests_by_path.values().sum();
                assert_eq!(snap.total_requests, sum);
            }
        })
    };

    for w in writers {
        w.join().unwrap();
    }
    reader.join().unwrap();
}

#[test]
fn every_sample_lands_in_exactly_one_window() {
    let rt = Arc::new(RequestTimeAggregator::new());
    let writers = 8;
    let per_writer = 5_000;

    let handles: Vec<_> = (0..writers)
        .map(|_| {
            let rt = rt.clone();
            thread::spawn(move || {
                for _ in 0..per_writer {
                    rt.record_latency(0.001);
                }
            })
        })
        .collect();

    // Only this thread recomputes, so a changed `computed_at` means a new window
    let mut summarized = 0;
    let mut close_window = || {
        let before = rt.snapshot().computed_at;
        rt.recompute();
        let after = rt.snapshot();
        if after.computed_at != before {
            summarized += after.samples;
        }
    };

    while handles.iter().any(|h| !h.is_finished()) {
        close_window();
        thread::sleep(Duration::from_micros(200));
    }
    for h in handles {
        h.join().unwrap();
    }
    close_window();

    assert_eq!(rt.pending(), 0);
    assert_eq!(summarized, writers * per_writer);
}

#[test]
fn snapshot_does_not_wait_for_recompute() {
    let rt = Arc::new(RequestTimeAggregator::new());
    rt.record_latency(0.5);
    rt.recompute();
    let previous = rt.snapshot();

    // Large enough that the sort outlives the snapshot below by a wide margin
    for i in 0..3_000_000u32 {
        rt.record_latency(f64::from(i % 9_973) / 1_000.0);
    }

    let summarizer = {
        let rt = rt.clone();
        thread::spawn(move || rt.recompute())
    };

    // The window is swapped out before the sort starts
    while rt.pending() != 0 {
        thread::yield_now();
    }
    let during = rt.snapshot();
    let still_sorting = !summarizer.is_finished();
    summarizer.join().unwrap();

    assert!(still_sorting, "recompute finished before the snapshot returned");
    assert_eq!(during, previous);
    assert_eq!(rt.snapshot().samples, 3_000_000);
}

#[test]
fn writers_do_not_wait_for_recompute() {
    let rt = Arc::new(RequestTimeAggregator::new());
    for i in 0..3_000_000u32 {
        rt.record_latency(f64::from(i % 7_919));
    }

    let summarizer = {
        let rt = rt.clone();
        thread::spawn(move || rt.recompute())
    };
    while rt.pending() != 0 {
        thread::yield_now();
    }
    rt.record_latency(1.0);
    let still_sorting = !summarizer.is_finished();
    summarizer.join().unwrap();

    assert!(still_sorting, "recompute finished before the write returned");
    assert_eq!(rt.pending(), 1);
}

#[test]
fn registry_is_shareable() {
    let registry = Arc::new(AspectRegistry::new());

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let registry = registry.clone();
            thread::spawn(move || {
                for _ in 0..250 {
                    registry.observe(&format!("/p/{}", i % 4), 200, Duration::from_millis(2));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let counter = registry.counter().snapshot();
    assert_eq!(counter.total_requests, 4_000);
    assert_eq!(counter.requests_by_path.len(), 4);
    assert!(counter.requests_by_path.values().all(|&n| n == 1_000));
    assert_eq!(registry.request_time().pending(), 4_000);

    registry.tick();
    assert_eq!(registry.request_time().snapshot().samples, 4_000);
    assert_eq!(registry.counter().snapshot().total_requests, 0);
}
