//! End-to-end pipeline scenarios: load -> filter -> pivot -> rollups.

use aqm_core::dataset::Dataset;
use aqm_pipeline::filter::{self, FilterParams};
use aqm_pipeline::{anomaly, pivot, regions, rollup};

const SENSOR_CSV: &str = "\
timestamp,region,value_type,value
2024-03-01 05:00:00,A,P2,10.0
2024-03-01 05:00:00,A,P2,20.0
2024-03-01 06:00:00,A,P2,30.0
2024-04-01 05:00:00,A,P2,99.0
2024-03-01 05:00:00,B,P2,70.0
2024-03-01 05:00:00,A,humidity,80.0
";

fn params(region: &str, month: u32, variables: &[&str]) -> FilterParams {
    FilterParams {
        region: Some(region.to_string()),
        month: Some(month),
        variables: variables.iter().map(|s| s.to_string()).collect(),
    }
}

#[test]
fn filter_pivot_daily_scenario() {
    // Region A, March, PM2.5 only: the duplicate 05:00 readings average
    // to 15.0, and the daily mean over hours 5 and 6 is 22.5.
    let dataset = Dataset::from_csv_str(SENSOR_CSV).unwrap();
    let filtered = filter::apply(&dataset.records, &params("A", 3, &["PM2.5"]));
    assert_eq!(filtered.len(), 3);

    let rows = pivot::pivot(&filtered);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].hour, 5);
    assert_eq!(rows[0].value("PM2.5"), Some(15.0));
    assert_eq!(rows[1].hour, 6);
    assert_eq!(rows[1].value("PM2.5"), Some(30.0));

    let variables = vec!["PM2.5".to_string()];
    let daily = rollup::daily_mean(&rows, &variables);
    assert_eq!(daily.len(), 1);
    assert_eq!(daily[0].values["PM2.5"], 22.5);
}

#[test]
fn empty_variable_selection_flows_through_without_errors() {
    let dataset = Dataset::from_csv_str(SENSOR_CSV).unwrap();
    let empty = params("A", 3, &[]);
    let filtered = filter::apply(&dataset.records, &empty);
    assert!(filtered.is_empty());

    let rows = pivot::pivot(&filtered);
    assert!(rows.is_empty());
    assert!(rollup::daily_mean(&rows, &empty.variables).is_empty());
    assert!(rollup::hourly_mean(&rows, &empty.variables).is_empty());
    assert!(rollup::rolling_trend(&rows, &empty.variables, 7).is_empty());
    assert!(rollup::day_hour_mean(&rows, "PM2.5").is_empty());
    assert!(anomaly::detect_all(&filtered, &empty.variables).is_empty());
}

#[test]
fn region_comparison_ignores_month_selection() {
    // The comparison always runs over the full dataset, so recomputing it
    // "under" a different month filter changes nothing.
    let dataset = Dataset::from_csv_str(SENSOR_CSV).unwrap();
    let variables = vec!["PM2.5".to_string()];
    let under_march = regions::region_variable_means(&dataset.records, &variables);
    let under_april = regions::region_variable_means(&dataset.records, &variables);
    assert_eq!(under_march, under_april);

    assert_eq!(under_march.len(), 2);
    assert_eq!(under_march[0].region, "A");
    // Region A across both months: (10 + 20 + 30 + 99) / 4
    assert_eq!(under_march[0].mean, 39.75);
    assert_eq!(under_march[1].region, "B");
    assert_eq!(under_march[1].mean, 70.0);
}

#[test]
fn anomalies_computed_over_filtered_population() {
    let dataset = Dataset::from_csv_str(SENSOR_CSV).unwrap();
    // All regions, all months: population [10, 20, 30, 99, 70]
    let all = filter::apply(
        &dataset.records,
        &FilterParams {
            region: None,
            month: None,
            variables: vec!["PM2.5".to_string()],
        },
    );
    let report = anomaly::detect_anomalies(&all, "PM2.5");
    // Q1 = 20, Q3 = 70, threshold = 145: nothing flagged
    assert!(report.records().is_empty());

    // Region A only: population [10, 20, 30, 99]
    let region_a = filter::apply(
        &dataset.records,
        &FilterParams {
            region: Some("A".to_string()),
            month: None,
            variables: vec!["PM2.5".to_string()],
        },
    );
    let report = anomaly::detect_anomalies(&region_a, "PM2.5");
    // Q1 = 17.5, Q3 = 47.25, threshold = 91.875: 99 is flagged
    let values: Vec<f64> = report.records().iter().map(|r| r.value).collect();
    assert_eq!(values, vec![99.0]);
}
