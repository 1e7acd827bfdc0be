//! Renderer-agnostic tabular handoff for chart components.
//!
//! Every builder turns a pipeline artifact into a plain [`DataTable`]
//! (named columns, rows of JSON-serializable cells) that any charting
//! component can consume. Nothing here depends on a renderer's API, and
//! an empty table is a valid result the consumer renders as "no data".

use aqm_core::measurement::Measurement;
use aqm_pipeline::anomaly::AnomalyReport;
use aqm_pipeline::correlate::CorrelationMatrix;
use aqm_pipeline::regions::RegionMean;
use aqm_pipeline::rollup::{DailyMean, DayHourGrid, HourlyMean};
use aqm_utils::dates::format_date;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// A plain table: named columns plus rows of JSON cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl DataTable {
    pub fn new(columns: Vec<String>) -> DataTable {
        DataTable {
            columns,
            rows: Vec::new(),
        }
    }

    /// True when there is nothing to chart; consumers show "no data".
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn value_or_null(values: &BTreeMap<String, f64>, variable: &str) -> Value {
    match values.get(variable) {
        Some(v) => json!(v),
        None => Value::Null,
    }
}

/// Line series over dates: x = date, one y column per variable.
/// Also used for the rolling trend (same shape, smoothed values).
pub fn daily_line_table(daily: &[DailyMean], variables: &[String]) -> DataTable {
    let mut columns = strings(&["date"]);
    columns.extend(variables.iter().cloned());
    let rows = daily
        .iter()
        .map(|day| {
            let mut row = vec![json!(format_date(&day.date))];
            row.extend(variables.iter().map(|v| value_or_null(&day.values, v)));
            row
        })
        .collect();
    DataTable { columns, rows }
}

/// Line series over hours of day: x = hour, one y column per variable.
pub fn hourly_line_table(hourly: &[HourlyMean], variables: &[String]) -> DataTable {
    let mut columns = strings(&["hour"]);
    columns.extend(variables.iter().cloned());
    let rows = hourly
        .iter()
        .map(|h| {
            let mut row = vec![json!(h.hour)];
            row.extend(variables.iter().map(|v| value_or_null(&h.values, v)));
            row
        })
        .collect();
    DataTable { columns, rows }
}

/// Box plot input: one row per variable with the raw value array.
pub fn box_plot_table(records: &[Measurement], variables: &[String]) -> DataTable {
    let mut table = DataTable::new(strings(&["variable", "values"]));
    for variable in variables {
        let values: Vec<f64> = records
            .iter()
            .filter(|m| m.variable == *variable)
            .map(|m| m.value)
            .collect();
        if values.is_empty() {
            continue;
        }
        table.rows.push(vec![json!(variable), json!(values)]);
    }
    table
}

/// Grouped bar input for the cross-region comparison:
/// category = region, series = variable.
pub fn region_bar_table(means: &[RegionMean]) -> DataTable {
    let mut table = DataTable::new(strings(&["region", "variable", "mean"]));
    for m in means {
        table
            .rows
            .push(vec![json!(m.region), json!(m.variable), json!(m.mean)]);
    }
    table
}

/// Heatmap matrix: one row per weekday (Monday first), one column per
/// hour of day, cell = mean or null.
pub fn heatmap_table(grid: &DayHourGrid) -> DataTable {
    let mut columns = strings(&["weekday"]);
    columns.extend((0..24).map(|h| h.to_string()));
    let rows = grid
        .weekdays
        .iter()
        .zip(&grid.cells)
        .map(|(weekday, cells)| {
            let mut row = vec![json!(weekday)];
            row.extend(cells.iter().map(|cell| match cell {
                Some(v) => json!(v),
                None => Value::Null,
            }));
            row
        })
        .collect();
    DataTable { columns, rows }
}

/// Correlation heatmap: square matrix with variable labels on both axes.
pub fn correlation_table(matrix: &CorrelationMatrix) -> DataTable {
    let mut columns = strings(&["variable"]);
    columns.extend(matrix.variables.iter().cloned());
    let rows = matrix
        .variables
        .iter()
        .zip(&matrix.matrix)
        .map(|(variable, coefficients)| {
            let mut row = vec![json!(variable)];
            row.extend(coefficients.iter().map(|c| match c {
                Some(v) => json!(v),
                None => Value::Null,
            }));
            row
        })
        .collect();
    DataTable { columns, rows }
}

/// Point/marker map input: one row per region with coordinates, magnitude
/// = the region's mean for its variable. Regions without coordinates are
/// left out; the geographic boundary join is someone else's job.
pub fn map_points_table(means: &[RegionMean]) -> DataTable {
    let mut table = DataTable::new(strings(&["region", "variable", "lat", "lon", "magnitude"]));
    for m in means {
        if let (Some(lat), Some(lon)) = (m.lat, m.lon) {
            table.rows.push(vec![
                json!(m.region),
                json!(m.variable),
                json!(lat),
                json!(lon),
                json!(m.mean),
            ]);
        }
    }
    table
}

/// Flagged anomalies, one row per record, sorted as flagged (value
/// descending). Insufficient data yields an empty table.
pub fn anomaly_table(report: &AnomalyReport) -> DataTable {
    let mut table = DataTable::new(strings(&["timestamp", "region", "variable", "value"]));
    for r in report.records() {
        table.rows.push(vec![
            json!(r.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()),
            json!(r.region),
            json!(r.variable),
            json!(r.value),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use aqm_core::dataset::Dataset;
    use aqm_pipeline::{anomaly, correlate, pivot, regions, rollup};
    use serde_json::json;

    const SENSOR_CSV: &str = "\
timestamp,region,value_type,value,lat,lon
2024-03-01 05:00:00,Meru,P2,10.0,0.05,37.65
2024-03-01 05:00:00,Meru,temperature,20.0,0.05,37.65
2024-03-01 06:00:00,Meru,P2,30.0,0.05,37.65
2024-03-02 05:00:00,Nairobi,P2,50.0,,
";

    fn vars(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_daily_line_table_nulls_for_missing() {
        let records = Dataset::from_csv_str(SENSOR_CSV).unwrap().records;
        let rows = pivot::pivot(&records);
        let variables = vars(&["PM2.5", "Temperature"]);
        let daily = rollup::daily_mean(&rows, &variables);
        let table = daily_line_table(&daily, &variables);
        assert_eq!(table.columns, vec!["date", "PM2.5", "Temperature"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][0], json!("2024-03-01"));
        assert_eq!(table.rows[0][1], json!(20.0));
        // No temperature on day 2
        assert_eq!(table.rows[1][2], serde_json::Value::Null);
    }

    #[test]
    fn test_hourly_line_table() {
        let records = Dataset::from_csv_str(SENSOR_CSV).unwrap().records;
        let rows = pivot::pivot(&records);
        let variables = vars(&["PM2.5"]);
        let hourly = rollup::hourly_mean(&rows, &variables);
        let table = hourly_line_table(&hourly, &variables);
        assert_eq!(table.columns, vec!["hour", "PM2.5"]);
        assert_eq!(table.rows[0][0], json!(5));
        assert_eq!(table.rows[0][1], json!(30.0));
    }

    #[test]
    fn test_box_plot_table_skips_absent_variables() {
        let records = Dataset::from_csv_str(SENSOR_CSV).unwrap().records;
        let table = box_plot_table(&records, &vars(&["PM2.5", "Humidity"]));
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][0], json!("PM2.5"));
        assert_eq!(table.rows[0][1], json!(vec![10.0, 30.0, 50.0]));
    }

    #[test]
    fn test_region_bar_and_map_points() {
        let records = Dataset::from_csv_str(SENSOR_CSV).unwrap().records;
        let means = regions::region_variable_means(&records, &vars(&["PM2.5"]));
        let bars = region_bar_table(&means);
        assert_eq!(bars.rows.len(), 2);

        let points = map_points_table(&means);
        // Nairobi has no coordinates and is left out
        assert_eq!(points.rows.len(), 1);
        assert_eq!(points.rows[0][0], json!("Meru"));
        assert_eq!(points.rows[0][4], json!(20.0));
    }

    #[test]
    fn test_heatmap_table_shape() {
        let records = Dataset::from_csv_str(SENSOR_CSV).unwrap().records;
        let rows = pivot::pivot(&records);
        let grid = rollup::day_hour_mean(&rows, "PM2.5");
        let table = heatmap_table(&grid);
        assert_eq!(table.columns.len(), 25);
        assert_eq!(table.rows.len(), 7);
        assert_eq!(table.rows[0][0], json!("Monday"));
        // Friday 05:00
        assert_eq!(table.rows[4][6], json!(10.0));
    }

    #[test]
    fn test_correlation_table() {
        let records = Dataset::from_csv_str(SENSOR_CSV).unwrap().records;
        let rows = pivot::pivot(&records);
        // Only one complete row for this pair -> insufficient data, and
        // the boundary has nothing to hand off
        assert!(correlate::correlation_matrix(&rows, &vars(&["PM2.5", "Temperature"])).is_err());

        let csv = "\
timestamp,region,value_type,value
2024-03-01 05:00:00,A,P2,10.0
2024-03-01 05:00:00,A,temperature,20.0
2024-03-01 06:00:00,A,P2,20.0
2024-03-01 06:00:00,A,temperature,30.0
";
        let rows = pivot::pivot(&Dataset::from_csv_str(csv).unwrap().records);
        let matrix = correlate::correlation_matrix(&rows, &vars(&["PM2.5", "Temperature"])).unwrap();
        let table = correlation_table(&matrix);
        assert_eq!(table.columns, vec!["variable", "PM2.5", "Temperature"]);
        assert_eq!(table.rows[0][1], json!(1.0));
        assert_eq!(table.rows[0][2], table.rows[1][1]);
    }

    #[test]
    fn test_anomaly_table_empty_on_insufficient_data() {
        let records = Dataset::from_csv_str(SENSOR_CSV).unwrap().records;
        let report = anomaly::detect_anomalies(&records, "Temperature");
        let table = anomaly_table(&report);
        assert!(table.is_empty());
    }

    #[test]
    fn test_empty_tables_are_valid() {
        let table = daily_line_table(&[], &vars(&["PM2.5"]));
        assert!(table.is_empty());
        assert_eq!(table.columns, vec!["date", "PM2.5"]);
        assert!(!table.to_json().is_empty());
    }
}
