//! The data preparation and aggregation pipeline.
//!
//! Every stage is a pure function from `(dataset snapshot, filter
//! parameters)` to derived tables; nothing here holds state and nothing
//! mutates its input. Stages flow strictly downstream:
//!
//! filter -> pivot -> rollups / anomalies / correlation
//!
//! Empty input is a valid state at every stage and yields empty output,
//! never an error; consumers render "no data" instead of failing.

pub mod anomaly;
pub mod correlate;
pub mod filter;
pub mod pivot;
pub mod regions;
pub mod rollup;
pub mod stats;
