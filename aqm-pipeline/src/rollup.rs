//! Multi-granularity mean rollups over pivoted data.
//!
//! Every rollup consumes `WideRow`s and a set of variables, skips missing
//! values (a row without a variable contributes nothing to that variable's
//! mean), and returns empty output for empty input. Rollups are recomputed
//! fully on every filter change; nothing is cached or updated in place.

use crate::pivot::WideRow;
use aqm_core::time_features::{weekday_name, WEEKDAY_ORDER};
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Mean per variable for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyMean {
    pub date: NaiveDate,
    pub values: BTreeMap<String, f64>,
}

/// Mean per variable for one hour of day, collapsed across all days
/// in the filtered window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyMean {
    /// Hour of day, 0-23.
    pub hour: u32,
    pub values: BTreeMap<String, f64>,
}

/// Day-by-hour mean matrix for one variable (the heatmap source).
///
/// Rows are weekdays in fixed Monday-through-Sunday calendar order;
/// columns are hours 0-23. A cell with no data is `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayHourGrid {
    pub variable: String,
    /// Full English day names, Monday through Sunday.
    pub weekdays: Vec<&'static str>,
    /// `cells[weekday][hour]`, aligned with `weekdays`.
    pub cells: Vec<Vec<Option<f64>>>,
}

impl DayHourGrid {
    /// True when no cell holds a value.
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_none()))
    }
}

fn mean_by_key<K: Ord + Copy>(
    rows: &[WideRow],
    variables: &[String],
    key: impl Fn(&WideRow) -> K,
) -> BTreeMap<K, BTreeMap<String, f64>> {
    let mut sums: BTreeMap<K, BTreeMap<String, (f64, usize)>> = BTreeMap::new();
    for row in rows {
        let bucket = sums.entry(key(row)).or_default();
        for variable in variables {
            if let Some(value) = row.value(variable) {
                let cell = bucket.entry(variable.clone()).or_insert((0.0, 0));
                cell.0 += value;
                cell.1 += 1;
            }
        }
    }
    sums.into_iter()
        .map(|(key, cells)| {
            let means = cells
                .into_iter()
                .map(|(variable, (sum, count))| (variable, sum / count as f64))
                .collect();
            (key, means)
        })
        .collect()
}

/// Group by calendar date, mean per variable. Sorted by date.
pub fn daily_mean(rows: &[WideRow], variables: &[String]) -> Vec<DailyMean> {
    mean_by_key(rows, variables, |row| row.date)
        .into_iter()
        .map(|(date, values)| DailyMean { date, values })
        .collect()
}

/// Group by hour of day, mean per variable. Sorted by hour.
pub fn hourly_mean(rows: &[WideRow], variables: &[String]) -> Vec<HourlyMean> {
    mean_by_key(rows, variables, |row| row.hour)
        .into_iter()
        .map(|(hour, values)| HourlyMean { hour, values })
        .collect()
}

/// Hourly means restricted to a single date (the dashboard's
/// "hourly trends for a selected date" chart).
pub fn hourly_mean_for_date(
    rows: &[WideRow],
    date: NaiveDate,
    variables: &[String],
) -> Vec<HourlyMean> {
    let day_rows: Vec<WideRow> = rows.iter().filter(|r| r.date == date).cloned().collect();
    hourly_mean(&day_rows, variables)
}

/// Group by `(weekday, hour)` for one variable, producing the heatmap
/// matrix. Row order is always Monday through Sunday regardless of input
/// order.
pub fn day_hour_mean(rows: &[WideRow], variable: &str) -> DayHourGrid {
    let mut sums: BTreeMap<(usize, u32), (f64, usize)> = BTreeMap::new();
    for row in rows {
        if let Some(value) = row.value(variable) {
            let weekday_index = row.date.weekday().num_days_from_monday() as usize;
            let cell = sums.entry((weekday_index, row.hour)).or_insert((0.0, 0));
            cell.0 += value;
            cell.1 += 1;
        }
    }
    let cells = (0..WEEKDAY_ORDER.len())
        .map(|weekday_index| {
            (0..24)
                .map(|hour| {
                    sums.get(&(weekday_index, hour))
                        .map(|(sum, count)| sum / *count as f64)
                })
                .collect()
        })
        .collect();
    DayHourGrid {
        variable: variable.to_string(),
        weekdays: WEEKDAY_ORDER.iter().map(|w| weekday_name(*w)).collect(),
        cells,
    }
}

/// Trailing moving average over a daily resample.
///
/// First resamples to one mean per calendar day over the continuous date
/// range of the input (days without data stay gaps), then averages each
/// day's trailing `window` with a minimum-periods policy of 1: the first
/// `window - 1` points use a shorter effective window, and a day only has
/// no value when the entire trailing window is empty.
///
/// Dashboards use a window of 3 or 7.
pub fn rolling_trend(rows: &[WideRow], variables: &[String], window: usize) -> Vec<DailyMean> {
    if rows.is_empty() || window == 0 {
        return Vec::new();
    }
    let daily = daily_mean(rows, variables);
    let by_date: BTreeMap<NaiveDate, &BTreeMap<String, f64>> =
        daily.iter().map(|d| (d.date, &d.values)).collect();
    let first = daily.first().map(|d| d.date).unwrap();
    let last = daily.last().map(|d| d.date).unwrap();

    let mut out = Vec::new();
    let mut date = first;
    while date <= last {
        let mut values = BTreeMap::new();
        for variable in variables {
            let mut window_values = Vec::with_capacity(window);
            for back in 0..window as i64 {
                let day = date - Duration::days(back);
                if day < first {
                    break;
                }
                if let Some(day_values) = by_date.get(&day) {
                    if let Some(v) = day_values.get(variable) {
                        window_values.push(*v);
                    }
                }
            }
            if let Some(mean) = crate::stats::mean(&window_values) {
                values.insert(variable.clone(), mean);
            }
        }
        out.push(DailyMean { date, values });
        date += Duration::days(1);
    }
    out
}
