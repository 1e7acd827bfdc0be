//! Per-subcommand report generation.
//!
//! Each `run_*` function is one full pipeline pass: load, filter, derive,
//! emit. An empty or awaiting-input selection is a valid state and prints
//! an explanation; the only fatal path is a missing or corrupt input file.

use crate::render::{self, AWAITING_VARIABLES};
use crate::SelectArgs;
use aqm_chart_data as chart;
use aqm_core::dataset::Dataset;
use aqm_core::normalize;
use aqm_pipeline::anomaly::{self, AnomalyReport};
use aqm_pipeline::correlate;
use aqm_pipeline::filter::{self, FilterParams};
use aqm_pipeline::pivot::{self, WideRow};
use aqm_pipeline::regions;
use aqm_pipeline::rollup;
use serde_json::json;

fn load(select: &SelectArgs) -> anyhow::Result<(Dataset, FilterParams)> {
    let dataset = Dataset::from_csv_path(&select.input)?;
    let month = match &select.month {
        Some(m) => Some(aqm_utils::dates::parse_month(m)?),
        None => None,
    };
    // Accept raw variable codes and alias region labels on the command
    // line as a convenience; the data itself is already canonical
    let variables: Vec<String> = select
        .variables
        .iter()
        .map(|v| normalize::canonical_variable(v).to_string())
        .collect();
    let region = select
        .region
        .as_deref()
        .map(|r| normalize::canonical_region(r).to_string());
    let params = FilterParams {
        region,
        month,
        variables,
    };
    Ok((dataset, params))
}

fn pivoted(select: &SelectArgs) -> anyhow::Result<Option<(FilterParams, Vec<WideRow>)>> {
    let (dataset, params) = load(select)?;
    if params.awaiting_variables() {
        println!("{AWAITING_VARIABLES}");
        return Ok(None);
    }
    let filtered = filter::apply(&dataset.records, &params);
    log::info!(
        "{} of {} measurements match the selection",
        filtered.len(),
        dataset.records.len()
    );
    Ok(Some((params, pivot::pivot(&filtered))))
}

pub fn run_info(select: &SelectArgs) -> anyhow::Result<()> {
    let (dataset, _) = load(select)?;
    if select.json {
        let info = json!({
            "rows_loaded": dataset.report.rows_loaded,
            "rows_dropped": dataset.report.rows_dropped,
            "regions": dataset.regions(),
            "months": dataset.months(),
            "variables": dataset.variables(),
        });
        println!("{info}");
    } else {
        println!(
            "loaded {} rows ({} malformed rows dropped)",
            dataset.report.rows_loaded, dataset.report.rows_dropped
        );
        println!("regions:   {}", dataset.regions().join(", "));
        let months: Vec<String> = dataset
            .months()
            .iter()
            .map(|m| aqm_core::time_features::month_name(*m).to_string())
            .collect();
        println!("months:    {}", months.join(", "));
        println!("variables: {}", dataset.variables().join(", "));
    }
    Ok(())
}

pub fn run_daily(select: &SelectArgs) -> anyhow::Result<()> {
    if let Some((params, rows)) = pivoted(select)? {
        let daily = rollup::daily_mean(&rows, &params.variables);
        render::emit(&chart::daily_line_table(&daily, &params.variables), select.json);
    }
    Ok(())
}

pub fn run_hourly(select: &SelectArgs, date: Option<&str>) -> anyhow::Result<()> {
    if let Some((params, rows)) = pivoted(select)? {
        let hourly = match date {
            Some(d) => {
                let date = aqm_utils::dates::parse_date(d)?;
                rollup::hourly_mean_for_date(&rows, date, &params.variables)
            }
            None => rollup::hourly_mean(&rows, &params.variables),
        };
        render::emit(&chart::hourly_line_table(&hourly, &params.variables), select.json);
    }
    Ok(())
}

pub fn run_heatmap(select: &SelectArgs, variable: Option<&str>) -> anyhow::Result<()> {
    if let Some((params, rows)) = pivoted(select)? {
        let variable = match variable {
            Some(v) => normalize::canonical_variable(v).to_string(),
            // pivoted() returned Some, so at least one variable is selected
            None => params.variables[0].clone(),
        };
        let grid = rollup::day_hour_mean(&rows, &variable);
        if grid.is_empty() {
            println!("{}", render::NO_DATA);
        } else {
            render::emit(&chart::heatmap_table(&grid), select.json);
        }
    }
    Ok(())
}

pub fn run_rolling(select: &SelectArgs, window: usize) -> anyhow::Result<()> {
    anyhow::ensure!(window >= 1, "rolling window must be at least 1 day");
    if let Some((params, rows)) = pivoted(select)? {
        let trend = rollup::rolling_trend(&rows, &params.variables, window);
        render::emit(&chart::daily_line_table(&trend, &params.variables), select.json);
    }
    Ok(())
}

pub fn run_box(select: &SelectArgs) -> anyhow::Result<()> {
    let (dataset, params) = load(select)?;
    if params.awaiting_variables() {
        println!("{AWAITING_VARIABLES}");
        return Ok(());
    }
    let filtered = filter::apply(&dataset.records, &params);
    render::emit(&chart::box_plot_table(&filtered, &params.variables), select.json);
    Ok(())
}

pub fn run_anomalies(select: &SelectArgs) -> anyhow::Result<()> {
    let (dataset, params) = load(select)?;
    if params.awaiting_variables() {
        println!("{AWAITING_VARIABLES}");
        return Ok(());
    }
    let filtered = filter::apply(&dataset.records, &params);
    let reports = anomaly::detect_all(&filtered, &params.variables);
    if select.json {
        println!("{}", serde_json::to_string(&reports)?);
        return Ok(());
    }
    for (variable, report) in &reports {
        match report {
            AnomalyReport::Flagged { threshold, .. } => {
                println!(
                    "{variable}: threshold {:.2} (Q1 {:.2}, Q3 {:.2}, IQR {:.2})",
                    threshold.threshold, threshold.q1, threshold.q3, threshold.iqr
                );
                println!("{}", render::table_to_text(&chart::anomaly_table(report)));
            }
            AnomalyReport::InsufficientData(err) => {
                println!("{variable}: {err}");
            }
        }
    }
    Ok(())
}

pub fn run_regions(select: &SelectArgs) -> anyhow::Result<()> {
    let (dataset, params) = load(select)?;
    if params.awaiting_variables() {
        println!("{AWAITING_VARIABLES}");
        return Ok(());
    }
    // Region comparison ignores the region/month selection on purpose:
    // it always runs over the full dataset.
    let means = regions::region_variable_means(&dataset.records, &params.variables);
    render::emit(&chart::region_bar_table(&means), select.json);
    Ok(())
}

pub fn run_correlation(select: &SelectArgs) -> anyhow::Result<()> {
    if let Some((params, rows)) = pivoted(select)? {
        match correlate::correlation_matrix(&rows, &params.variables) {
            Ok(matrix) => render::emit(&chart::correlation_table(&matrix), select.json),
            Err(err) => {
                if select.json {
                    println!("{}", json!({ "insufficient_data": err.to_string() }));
                } else {
                    println!("{err}");
                }
            }
        }
    }
    Ok(())
}

pub fn run_map_points(select: &SelectArgs) -> anyhow::Result<()> {
    let (dataset, params) = load(select)?;
    if params.awaiting_variables() {
        println!("{AWAITING_VARIABLES}");
        return Ok(());
    }
    let means = regions::region_variable_means(&dataset.records, &params.variables);
    render::emit(&chart::map_points_table(&means), select.json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{load, run_box};
    use crate::SelectArgs;
    use aqm_chart_data::box_plot_table;
    use aqm_pipeline::filter;
    use serde_json::json;
    use std::path::PathBuf;

    const SENSOR_CSV: &str = "\
timestamp,region,value_type,value
2024-03-01 05:00:00,Meru mobile sensor,P2,10.0
2024-03-01 06:00:00,Meru,P2,30.0
2024-03-01 06:00:00,Meru,humidity,80.0
2024-04-01 05:00:00,Nairobi,P2,50.0
";

    fn write_fixture(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, SENSOR_CSV).unwrap();
        path
    }

    fn select(path: &PathBuf, region: Option<&str>, variables: &[&str]) -> SelectArgs {
        SelectArgs {
            input: path.to_string_lossy().into_owned(),
            region: region.map(|r| r.to_string()),
            month: None,
            variables: variables.iter().map(|v| v.to_string()).collect(),
            json: true,
        }
    }

    #[test]
    fn test_region_argument_is_canonicalized() {
        let path = write_fixture("aqm_report_region_alias.csv");
        // The alias label from the sensor network resolves to the same
        // canonical region the data was normalized to at ingest
        let args = select(&path, Some("Meru mobile sensor"), &["P2"]);
        let (dataset, params) = load(&args).unwrap();
        assert_eq!(params.region.as_deref(), Some("Meru"));
        let filtered = filter::apply(&dataset.records, &params);
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_box_command_emits_filtered_distributions() {
        let path = write_fixture("aqm_report_box.csv");
        let args = select(&path, Some("Meru"), &["P2", "humidity"]);

        // The command runs end to end over the fixture
        run_box(&args).unwrap();

        // And the table it emits carries one value array per variable,
        // restricted to the selection
        let (dataset, params) = load(&args).unwrap();
        let filtered = filter::apply(&dataset.records, &params);
        let table = box_plot_table(&filtered, &params.variables);
        assert_eq!(table.columns, vec!["variable", "values"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][0], json!("PM2.5"));
        assert_eq!(table.rows[0][1], json!(vec![10.0, 30.0]));
        assert_eq!(table.rows[1][0], json!("Humidity"));
        assert_eq!(table.rows[1][1], json!(vec![80.0]));
    }

    #[test]
    fn test_box_command_awaiting_variables_is_valid() {
        let path = write_fixture("aqm_report_box_empty.csv");
        let args = select(&path, Some("Meru"), &[]);
        run_box(&args).unwrap();
    }
}
