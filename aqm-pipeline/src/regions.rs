//! Cross-region comparison rollup.
//!
//! Deliberately independent of the region and month selectors: it is
//! computed over the variable-filtered, region-unfiltered full dataset so
//! all regions stay comparable side by side.

use aqm_core::measurement::Measurement;
use serde::Serialize;
use std::collections::BTreeMap;

/// Mean value for one `(region, variable)` pair, plus representative
/// coordinates for map rendering when the region's sensors report them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionMean {
    pub region: String,
    pub variable: String,
    pub mean: f64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// Mean of `value` grouped by `(region, variable)` over the full dataset,
/// restricted only by the variable selection. Sorted by region, then
/// variable. The geographic boundary join happens downstream; this only
/// emits the `(region, mean)` pairs it needs.
pub fn region_variable_means(records: &[Measurement], variables: &[String]) -> Vec<RegionMean> {
    let mut sums: BTreeMap<(String, String), (f64, usize, Option<(f64, f64)>)> = BTreeMap::new();
    for m in records {
        if !variables.iter().any(|v| *v == m.variable) {
            continue;
        }
        let cell = sums
            .entry((m.region.clone(), m.variable.clone()))
            .or_insert((0.0, 0, None));
        cell.0 += m.value;
        cell.1 += 1;
        if cell.2.is_none() {
            if let (Some(lat), Some(lon)) = (m.lat, m.lon) {
                cell.2 = Some((lat, lon));
            }
        }
    }
    sums.into_iter()
        .map(|((region, variable), (sum, count, coords))| RegionMean {
            region,
            variable,
            mean: sum / count as f64,
            lat: coords.map(|c| c.0),
            lon: coords.map(|c| c.1),
        })
        .collect()
}
