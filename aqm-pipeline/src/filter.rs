//! Narrowing the dataset by region, month, and variable selection.

use aqm_core::measurement::Measurement;

/// One user filter selection.
///
/// `region: None` and `month: None` mean no restriction. An empty
/// `variables` list means the user has not selected anything yet; by
/// design the filtered set is then empty and the UI surfaces a
/// "select at least one variable" state instead of defaulting to all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterParams {
    pub region: Option<String>,
    pub month: Option<u32>,
    pub variables: Vec<String>,
}

impl FilterParams {
    /// True when no variable has been selected (the awaiting-input state).
    pub fn awaiting_variables(&self) -> bool {
        self.variables.is_empty()
    }
}

/// Apply a filter selection, yielding the matching subset.
///
/// Never fails; an empty result is a valid state that every downstream
/// stage handles.
pub fn apply(records: &[Measurement], params: &FilterParams) -> Vec<Measurement> {
    if params.awaiting_variables() {
        return Vec::new();
    }
    records
        .iter()
        .filter(|m| match &params.region {
            Some(region) => m.region == *region,
            None => true,
        })
        .filter(|m| match params.month {
            Some(month) => m.time.month == month,
            None => true,
        })
        .filter(|m| params.variables.iter().any(|v| *v == m.variable))
        .cloned()
        .collect()
}
