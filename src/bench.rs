//! Wall-clock latency measurement for repeated stretch calls.

use std::fmt;
use std::time::{Duration, Instant};

use crate::error::{Parameter, StretchError};

/// Mean and population standard deviation of a set of timed runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyStats {
    pub runs: usize,
    pub mean: Duration,
    pub std_dev: Duration,
}

impl LatencyStats {
    /// Summarizes raw samples. Returns `None` for an empty slice.
    pub fn from_samples(samples: &[Duration]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let n = samples.len() as f64;
        let secs: Vec<f64> = samples.iter().map(Duration::as_secs_f64).collect();
        let mean = secs.iter().sum::<f64>() / n;
        let variance = secs.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            runs: samples.len(),
            mean: Duration::from_secs_f64(mean),
            std_dev: Duration::from_secs_f64(variance.sqrt()),
        })
    }
}

impl fmt::Display for LatencyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.3} +- {:.3} ms over {} runs",
            self.mean.as_secs_f64() * 1e3,
            self.std_dev.as_secs_f64() * 1e3,
            self.runs
        )
    }
}

/// Calls `run` `runs` times and reports its latency.
///
/// The first error returned by `run` aborts the measurement.
pub fn measure_latency<T, F>(runs: usize, mut run: F) -> Result<LatencyStats, StretchError>
where
    F: FnMut() -> Result<T, StretchError>,
{
    if runs == 0 {
        return Err(StretchError::invalid(Parameter::Runs, 0.0));
    }
    let mut samples = Vec::with_capacity(runs);
    for _ in 0..runs {
        let start = Instant::now();
        let out = run()?;
        samples.push(start.elapsed());
        drop(out);
    }
    let stats = LatencyStats::from_samples(&samples)
        .ok_or_else(|| StretchError::invalid(Parameter::Runs, 0.0))?;
    tracing::debug!(%stats, "latency measured");
    Ok(stats)
}
