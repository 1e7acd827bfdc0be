//! Pearson correlation between selected variables.
//!
//! Only wide rows that are complete for every selected variable enter the
//! computation; a row missing any variable is dropped first, matching how
//! the dashboards prepared their correlation heatmaps.

use crate::pivot::WideRow;
use crate::stats::{pearson, InsufficientData};
use serde::Serialize;

/// Fewest complete rows for a correlation to be meaningful.
pub const MIN_COMPLETE_ROWS: usize = 2;

/// A symmetric correlation matrix with unit diagonal.
///
/// `matrix[i][j]` is the coefficient between `variables[i]` and
/// `variables[j]`; a pair where one series has zero variance is `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub variables: Vec<String>,
    pub matrix: Vec<Vec<Option<f64>>>,
    /// Number of complete rows the coefficients were computed over.
    pub sample_size: usize,
}

/// Compute the correlation matrix over complete rows.
///
/// Requires at least two variables and [`MIN_COMPLETE_ROWS`] rows that
/// carry a value for every selected variable; anything less is reported
/// as insufficient data rather than producing NaN output.
pub fn correlation_matrix(
    rows: &[WideRow],
    variables: &[String],
) -> Result<CorrelationMatrix, InsufficientData> {
    if variables.len() < 2 {
        return Err(InsufficientData {
            needed: 2,
            got: variables.len(),
        });
    }
    let complete: Vec<&WideRow> = rows
        .iter()
        .filter(|row| variables.iter().all(|v| row.values.contains_key(v)))
        .collect();
    if complete.len() < MIN_COMPLETE_ROWS {
        return Err(InsufficientData {
            needed: MIN_COMPLETE_ROWS,
            got: complete.len(),
        });
    }

    let series: Vec<Vec<f64>> = variables
        .iter()
        .map(|variable| {
            complete
                .iter()
                .map(|row| row.values[variable])
                .collect::<Vec<f64>>()
        })
        .collect();

    let matrix = (0..variables.len())
        .map(|i| {
            (0..variables.len())
                .map(|j| {
                    if i == j {
                        Some(1.0)
                    } else {
                        pearson(&series[i], &series[j])
                    }
                })
                .collect()
        })
        .collect();

    Ok(CorrelationMatrix {
        variables: variables.to_vec(),
        matrix,
        sample_size: complete.len(),
    })
}
