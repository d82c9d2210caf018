//! Aggregation of uploaded measurement tables
//!
//! [`table`] turns raw CSV bytes into a [`MeasurementTable`] with explicit
//! present/absent columns, [`aggregate`] reduces it to a full-precision
//! [`Summary`], and [`precision`] holds the display rounding applied only
//! when a summary or history record leaves the process.

pub mod aggregate;
pub mod precision;
pub mod table;

pub use aggregate::{summarize, ColumnAverages, Summary, TypeDistribution};
pub use precision::{round2, round_to};
pub use table::{MeasurementColumn, MeasurementTable};
