//! Small statistics helpers shared by the rollup and anomaly stages.

use serde::Serialize;
use std::fmt;

/// Raised when there are too few points for a statistic to be meaningful.
/// Callers surface this as an "insufficient data" state, never as NaN
/// output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InsufficientData {
    pub needed: usize,
    pub got: usize,
}

impl fmt::Display for InsufficientData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "insufficient data: needed {} points, got {}",
            self.needed, self.got
        )
    }
}

impl std::error::Error for InsufficientData {}

/// Arithmetic mean; None for an empty slice. Missing values never reach
/// this function, so a mean over N rows with M missing is the mean over
/// the N-M present values.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Quantile by linear interpolation between order statistics
/// (Hyndman-Fan type 7, the default of pandas `quantile`).
///
/// Input must be sorted ascending. `q` is in [0, 1].
pub fn quantile_linear(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    if sorted.len() == 1 {
        return Some(sorted[0]);
    }
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + fraction * (sorted[upper] - sorted[lower]))
}

/// Pearson correlation coefficient over two equal-length series.
///
/// None when either series has zero variance or fewer than 2 points.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;
    let mut covariance = 0.0;
    let mut variance_x = 0.0;
    let mut variance_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        variance_x += dx * dx;
        variance_y += dy * dy;
    }
    if variance_x == 0.0 || variance_y == 0.0 {
        return None;
    }
    Some(covariance / (variance_x * variance_y).sqrt())
}
