//! Loading the sensor CSV into an immutable in-memory dataset.
//!
//! Expected format (with headers): `timestamp,region,value_type,value` plus
//! optional `lat,lon` columns, located by name. Rows with an unparseable
//! timestamp or value, or an empty region or variable, are dropped silently;
//! only the aggregate drop count is logged and reported.

use crate::measurement::{CsvSchema, Measurement};
use anyhow::Context;
use csv::ReaderBuilder;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

/// Aggregate row accounting from one CSV load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub rows_loaded: usize,
    pub rows_dropped: usize,
}

impl LoadReport {
    pub fn rows_in_input(&self) -> usize {
        self.rows_loaded + self.rows_dropped
    }
}

/// An immutable snapshot of the loaded sensor data.
///
/// Loaded once at startup and shared read-only; every filter selection
/// derives fresh artifacts from it and nothing mutates it in place.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Vec<Measurement>,
    pub report: LoadReport,
}

impl Dataset {
    /// Load a dataset from a CSV file on disk.
    ///
    /// A missing or unreadable file is the one fatal error path in the
    /// pipeline and aborts startup with a clear diagnostic.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Dataset> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read sensor CSV {}", path.display()))?;
        Dataset::from_csv_str(&data)
            .with_context(|| format!("failed to parse sensor CSV {}", path.display()))
    }

    /// Load a dataset from CSV text.
    pub fn from_csv_str(csv_data: &str) -> anyhow::Result<Dataset> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_data.as_bytes());
        let schema = CsvSchema::from_headers(rdr.headers()?)?;

        let mut records = Vec::new();
        let mut dropped = 0usize;
        for result in rdr.records() {
            let record = match result {
                Ok(r) => r,
                Err(_) => {
                    dropped += 1;
                    continue;
                }
            };
            match Measurement::parse_row(&schema, &record) {
                Some(m) => records.push(m),
                None => dropped += 1,
            }
        }

        let report = LoadReport {
            rows_loaded: records.len(),
            rows_dropped: dropped,
        };
        log::info!(
            "loaded {} measurements, dropped {} malformed rows",
            report.rows_loaded,
            report.rows_dropped
        );
        Ok(Dataset { records, report })
    }

    /// Distinct canonical regions, sorted. Populates the region selector.
    pub fn regions(&self) -> Vec<String> {
        self.distinct(|m| m.region.clone())
    }

    /// Distinct canonical variables, sorted. Populates the variable checkboxes.
    pub fn variables(&self) -> Vec<String> {
        self.distinct(|m| m.variable.clone())
    }

    /// Distinct months (1-12) present in the data, sorted.
    pub fn months(&self) -> Vec<u32> {
        let set: BTreeSet<u32> = self.records.iter().map(|m| m.time.month).collect();
        set.into_iter().collect()
    }

    fn distinct<F: Fn(&Measurement) -> String>(&self, key: F) -> Vec<String> {
        let set: BTreeSet<String> = self.records.iter().map(key).collect();
        set.into_iter().collect()
    }
}
