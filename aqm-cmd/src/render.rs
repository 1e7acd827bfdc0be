//! Text rendering of data tables.

use aqm_chart_data::DataTable;
use serde_json::Value;

/// Message printed when a valid selection matches nothing.
pub const NO_DATA: &str = "no data for this selection";

/// Message printed while no variable has been selected.
pub const AWAITING_VARIABLES: &str = "select at least one variable (--variables)";

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render a table as aligned plain text; empty tables become the
/// "no data" indication.
pub fn table_to_text(table: &DataTable) -> String {
    if table.is_empty() {
        return NO_DATA.to_string();
    }
    let mut widths: Vec<usize> = table.columns.iter().map(|c| c.len()).collect();
    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }
    let mut out = String::new();
    let format_row = |cells: Vec<String>| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{:<width$}", c, width = widths.get(i).copied().unwrap_or(0)))
            .collect::<Vec<String>>()
            .join("  ")
            .trim_end()
            .to_string()
    };
    out.push_str(&format_row(table.columns.clone()));
    for row in rows {
        out.push('\n');
        out.push_str(&format_row(row));
    }
    out
}

/// Print a table as JSON or aligned text.
pub fn emit(table: &DataTable, json: bool) {
    if json {
        println!("{}", table.to_json());
    } else {
        println!("{}", table_to_text(table));
    }
}
