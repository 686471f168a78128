use serde::Serialize;

/// Statistical breakdown of one latency window, in seconds.
/// Serialized straight into the stats JSON and the SSE stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatencySummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation (divides by N)
    pub stdev: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
}

impl LatencySummary {
    /// Reduce a window of samples. Sorts `samples` in place.
    /// Returns `None` for an empty window so the caller keeps its previous summary.
    pub fn from_samples(samples: &mut [f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        samples.sort_unstable_by(f64::total_cmp);

        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples
            .iter()
            .map(|v| {
                let d = v - mean;
                d * d
            })
            .sum::<f64>()
            / n;

        Some(Self {
            min: samples[0],
            max: samples[samples.len() - 1],
            mean,
            stdev: variance.sqrt(),
            p90: nearest_rank(samples, 90.0),
            p95: nearest_rank(samples, 95.0),
            p99: nearest_rank(samples, 99.0),
        })
    }

    /// All-zero placeholder used before the first non-empty window.
    pub fn empty() -> Self {
        Self {
            min: 0.0,
            max: 0.0,
            mean: 0.0,
            stdev: 0.0,
            p90: 0.0,
            p95: 0.0,
            p99: 0.0,
        }
    }
}

impl Default for LatencySummary {
    fn default() -> Self {
        Self::empty()
    }
}

/// Pick the sample at zero-based index `floor(pct/100 * N)` of an ascending,
/// non-empty slice, clamped to the last element. No interpolation.
///
/// This is the first sample with more than `pct` percent of the window below
/// it; whenever `pct * N / 100` is fractional it is the classic nearest rank.
fn nearest_rank(sorted: &[f64], pct: f64) -> f64 {
    let n = sorted.len();
    let index = (pct * n as f64 / 100.0).floor() as usize;
    sorted[index.min(n - 1)]
}
