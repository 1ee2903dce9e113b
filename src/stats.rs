use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::parser::Measurement;

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Computes the sample (n - 1) standard deviation given a pre-computed mean.
/// Returns 0.0 for fewer than two values.
pub fn sample_stddev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;

    variance.sqrt()
}

/// Converts a power level in dBm to milliwatts.
pub fn dbm_to_mw(dbm: f64) -> f64 {
    10f64.powf(dbm / 10.0)
}

/// Descriptive statistics of a received signal level series.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SignalStats {
    pub count: usize,
    pub mean_dbm: f64,
    pub stddev_db: f64,
    pub min_dbm: f64,
    pub max_dbm: f64,
}

impl SignalStats {
    pub fn from_signal(signal: &[f64]) -> Self {
        if signal.is_empty() {
            return SignalStats::default();
        }

        let mean_dbm = mean(signal);
        SignalStats {
            count: signal.len(),
            mean_dbm,
            stddev_db: sample_stddev(signal, mean_dbm),
            min_dbm: signal.iter().copied().fold(f64::INFINITY, f64::min),
            max_dbm: signal.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

/// First and last measurement timestamps of a run, in row order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeSpan {
    /// Returns `None` for an empty run or timestamps outside chrono's range.
    pub fn from_measurements(rows: &[Measurement]) -> Option<Self> {
        let start = rows.first()?.measured_at_utc()?;
        let end = rows.last()?.measured_at_utc()?;
        Some(TimeSpan { start, end })
    }

    pub fn duration_secs(&self) -> f64 {
        (self.end - self.start).num_milliseconds() as f64 / 1000.0
    }
}

/// Seconds elapsed since the first row, one entry per row.
pub fn normalized_time_axis(rows: &[Measurement]) -> Vec<f64> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };
    rows.iter()
        .map(|m| (m.measured_at - first.measured_at) as f64 / 1000.0)
        .collect()
}
