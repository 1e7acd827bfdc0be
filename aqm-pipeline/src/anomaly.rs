//! IQR-based anomaly flagging.
//!
//! Flags upper-tail outliers only: the use case is pollution spikes, and
//! an unusually clean hour is not an anomaly worth surfacing.

use crate::stats::{quantile_linear, InsufficientData};
use aqm_core::measurement::Measurement;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;

/// Quartile estimation over fewer points than this is unstable, so
/// flagging is skipped and an empty result returned.
pub const MIN_SAMPLE_SIZE: usize = 4;

/// IQR multiplier for the upper threshold.
pub const IQR_MULTIPLIER: f64 = 1.5;

/// One flagged reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyRecord {
    pub timestamp: NaiveDateTime,
    pub region: String,
    pub variable: String,
    pub value: f64,
}

/// The quartile statistics behind a flagging run, exposed so consumers
/// can show the threshold alongside the flagged points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnomalyThreshold {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub threshold: f64,
}

/// Result of flagging one variable within the filtered population.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AnomalyReport {
    /// Flagged records sorted descending by value (possibly empty).
    Flagged {
        threshold: AnomalyThreshold,
        records: Vec<AnomalyRecord>,
    },
    /// Too few points for stable quartile estimation; nothing flagged.
    InsufficientData(InsufficientData),
}

impl AnomalyReport {
    pub fn records(&self) -> &[AnomalyRecord] {
        match self {
            AnomalyReport::Flagged { records, .. } => records,
            AnomalyReport::InsufficientData(_) => &[],
        }
    }
}

/// Flag values above `Q3 + 1.5 * IQR` for one variable, computed over the
/// currently filtered population. Quartiles use linear interpolation
/// (see [`quantile_linear`]).
pub fn detect_anomalies(records: &[Measurement], variable: &str) -> AnomalyReport {
    let mut population: Vec<&Measurement> =
        records.iter().filter(|m| m.variable == variable).collect();
    if population.len() < MIN_SAMPLE_SIZE {
        return AnomalyReport::InsufficientData(InsufficientData {
            needed: MIN_SAMPLE_SIZE,
            got: population.len(),
        });
    }

    let mut values: Vec<f64> = population.iter().map(|m| m.value).collect();
    values.sort_by(|a, b| a.total_cmp(b));
    // len >= MIN_SAMPLE_SIZE, so the quantiles exist
    let q1 = quantile_linear(&values, 0.25).unwrap();
    let q3 = quantile_linear(&values, 0.75).unwrap();
    let iqr = q3 - q1;
    let threshold = q3 + IQR_MULTIPLIER * iqr;

    population.retain(|m| m.value > threshold);
    population.sort_by(|a, b| b.value.total_cmp(&a.value));
    AnomalyReport::Flagged {
        threshold: AnomalyThreshold {
            q1,
            q3,
            iqr,
            threshold,
        },
        records: population
            .into_iter()
            .map(|m| AnomalyRecord {
                timestamp: m.timestamp,
                region: m.region.clone(),
                variable: m.variable.clone(),
                value: m.value,
            })
            .collect(),
    }
}

/// Flag every selected variable independently.
pub fn detect_all(records: &[Measurement], variables: &[String]) -> BTreeMap<String, AnomalyReport> {
    variables
        .iter()
        .map(|variable| (variable.clone(), detect_anomalies(records, variable)))
        .collect()
}
