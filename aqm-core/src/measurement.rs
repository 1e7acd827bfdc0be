use crate::normalize;
use crate::time_features::TimeFeatures;
use chrono::NaiveDateTime;
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Naive timestamp formats accepted by the tolerant parser, tried in
/// order after RFC 3339. These cover hand-edited and re-exported files;
/// the sensor network itself exports RFC 3339 with a UTC offset.
pub const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Required CSV column names.
pub const COLUMN_TIMESTAMP: &str = "timestamp";
pub const COLUMN_REGION: &str = "region";
pub const COLUMN_VALUE_TYPE: &str = "value_type";
pub const COLUMN_VALUE: &str = "value";

/// Optional CSV column names.
pub const COLUMN_LAT: &str = "lat";
pub const COLUMN_LON: &str = "lon";

/// Error raised when the CSV header row is missing a required column.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MissingColumn(pub String);

impl fmt::Display for MissingColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "input CSV is missing required column '{}'", self.0)
    }
}

impl std::error::Error for MissingColumn {}

/// Column positions resolved from the CSV header row.
///
/// Columns are located by name, never by position, so extra columns and
/// reordered exports parse the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvSchema {
    pub timestamp: usize,
    pub region: usize,
    pub value_type: usize,
    pub value: usize,
    pub lat: Option<usize>,
    pub lon: Option<usize>,
}

impl CsvSchema {
    /// Resolve column indices from a header record.
    pub fn from_headers(headers: &StringRecord) -> Result<CsvSchema, MissingColumn> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let required = |name: &str| find(name).ok_or_else(|| MissingColumn(name.to_string()));
        Ok(CsvSchema {
            timestamp: required(COLUMN_TIMESTAMP)?,
            region: required(COLUMN_REGION)?,
            value_type: required(COLUMN_VALUE_TYPE)?,
            value: required(COLUMN_VALUE)?,
            lat: find(COLUMN_LAT),
            lon: find(COLUMN_LON),
        })
    }
}

/// A single sensor reading, canonicalized and with time features derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub timestamp: NaiveDateTime,
    pub region: String,
    pub variable: String,
    pub value: f64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub time: TimeFeatures,
}

impl Measurement {
    /// Parse one CSV record into a Measurement.
    ///
    /// Returns None when the timestamp, value, region, or variable is
    /// missing or unparseable; callers count the drops in aggregate.
    pub fn parse_row(schema: &CsvSchema, record: &StringRecord) -> Option<Measurement> {
        let timestamp = parse_timestamp(record.get(schema.timestamp)?.trim())?;
        let value: f64 = record.get(schema.value)?.trim().parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        let region_raw = record.get(schema.region)?.trim();
        let variable_raw = record.get(schema.value_type)?.trim();
        if region_raw.is_empty() || variable_raw.is_empty() {
            return None;
        }
        let opt_float = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .and_then(|s| s.trim().parse::<f64>().ok())
        };
        Some(Measurement {
            timestamp,
            region: normalize::canonical_region(region_raw).to_string(),
            variable: normalize::canonical_variable(variable_raw).to_string(),
            value,
            lat: opt_float(schema.lat),
            lon: opt_float(schema.lon),
            time: TimeFeatures::from_timestamp(&timestamp),
        })
    }
}

/// Tolerant timestamp parser.
///
/// Accepts RFC 3339 strings (the offset is dropped, keeping the clock
/// reading as written; no timezone conversion happens anywhere in the
/// pipeline) and the naive formats in [`TIMESTAMP_FORMATS`].
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for format in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    None
}
