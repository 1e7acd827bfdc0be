//! Wide-form aggregation: one row per timestamp, one column per variable.

use aqm_core::measurement::Measurement;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// One pivoted record, keyed by `(timestamp, date, hour)`.
///
/// `values` holds one entry per canonical variable present in the group;
/// a variable with no measurement at this timestamp is simply absent,
/// never stored as 0, so missing data propagates as "no data" through
/// every downstream mean.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WideRow {
    pub timestamp: NaiveDateTime,
    pub date: NaiveDate,
    /// Hour of day, 0-23.
    pub hour: u32,
    pub values: BTreeMap<String, f64>,
}

impl WideRow {
    pub fn value(&self, variable: &str) -> Option<f64> {
        self.values.get(variable).copied()
    }
}

/// Pivot long-form measurements to wide form.
///
/// Groups by `(timestamp, date, hour)` and averages duplicate readings of
/// the same variable within a group (multiple sensors reporting the same
/// variable at the same instant for the same region). Empty input yields
/// an empty output. Output is sorted by timestamp.
pub fn pivot(records: &[Measurement]) -> Vec<WideRow> {
    let mut groups: BTreeMap<NaiveDateTime, BTreeMap<String, (f64, usize)>> = BTreeMap::new();
    for m in records {
        let cell = groups
            .entry(m.timestamp)
            .or_default()
            .entry(m.variable.clone())
            .or_insert((0.0, 0));
        cell.0 += m.value;
        cell.1 += 1;
    }
    groups
        .into_iter()
        .map(|(timestamp, cells)| WideRow {
            timestamp,
            date: timestamp.date(),
            hour: chrono::Timelike::hour(&timestamp),
            values: cells
                .into_iter()
                .map(|(variable, (sum, count))| (variable, sum / count as f64))
                .collect(),
        })
        .collect()
}

/// The variables actually present in a pivoted set, sorted.
///
/// The dashboards only chart variables that survived the pivot, which can
/// be a subset of the selection when a variable has no data in the
/// filtered window.
pub fn available_variables(rows: &[WideRow]) -> Vec<String> {
    let set: BTreeSet<String> = rows
        .iter()
        .flat_map(|row| row.values.keys().cloned())
        .collect();
    set.into_iter().collect()
}
