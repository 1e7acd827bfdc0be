//! Command implementations for the AQM CLI.
//!
//! The CLI is the thin presentation layer over the pipeline: every
//! subcommand loads the dataset, applies the selection, runs one pipeline
//! stage, and emits the resulting table as JSON or aligned text.

use clap::{Args, Subcommand};

pub mod render;
pub mod report;

/// Dataset and filter selection shared by every subcommand.
#[derive(Args, Debug)]
pub struct SelectArgs {
    /// Path to the sensor readings CSV
    #[arg(short, long)]
    pub input: String,

    /// Canonical region to filter on (omit for all regions)
    #[arg(short, long)]
    pub region: Option<String>,

    /// Month to filter on: a number (1-12) or an English month name
    #[arg(short, long)]
    pub month: Option<String>,

    /// Selected variables (canonical names, comma separated).
    /// An empty selection yields empty results by design.
    #[arg(short, long, value_delimiter = ',')]
    pub variables: Vec<String>,

    /// Emit JSON instead of an aligned text table
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show load accounting and the selector values present in the data
    Info,

    /// Daily mean per selected variable (line chart source)
    Daily,

    /// Hourly mean per selected variable, optionally for one date
    Hourly {
        /// Restrict to a single date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Day-by-hour mean matrix for one variable (heatmap source)
    Heatmap {
        /// Variable to chart; defaults to the first selected variable
        #[arg(long)]
        variable: Option<String>,
    },

    /// Trailing moving average of the daily means
    Rolling {
        /// Trailing window in days
        #[arg(short, long, default_value_t = 7)]
        window: usize,
    },

    /// Raw value distributions per selected variable (box plot source)
    Box,

    /// IQR-based upper-tail anomaly flagging per selected variable
    Anomalies,

    /// Per-region means over the full dataset (bar chart source)
    Regions,

    /// Pearson correlation matrix between selected variables
    Correlation,

    /// Marker map input: per-region coordinates and magnitudes
    MapPoints,
}

/// Run one subcommand against the selection.
pub fn run(select: SelectArgs, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Info => report::run_info(&select),
        Command::Daily => report::run_daily(&select),
        Command::Hourly { date } => report::run_hourly(&select, date.as_deref()),
        Command::Heatmap { variable } => report::run_heatmap(&select, variable.as_deref()),
        Command::Rolling { window } => report::run_rolling(&select, window),
        Command::Box => report::run_box(&select),
        Command::Anomalies => report::run_anomalies(&select),
        Command::Regions => report::run_regions(&select),
        Command::Correlation => report::run_correlation(&select),
        Command::MapPoints => report::run_map_points(&select),
    }
}
