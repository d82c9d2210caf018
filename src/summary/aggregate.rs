//! Column aggregation and categorical distribution

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::precision::round2;
use super::table::{MeasurementColumn, MeasurementTable};

/// Occurrence count per `Type` value, most frequent first, ties in order of first appearance
pub type TypeDistribution = IndexMap<String, u64>;

/// Arithmetic means of the three numeric columns
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ColumnAverages {
    pub pressure: f64,
    pub temperature: f64,
    pub flowrate: f64,
}

impl ColumnAverages {
    /// Display precision. Stored values are never rounded; call this on the way out.
    pub fn rounded(&self) -> Self {
        Self {
            pressure: round2(self.pressure),
            temperature: round2(self.temperature),
            flowrate: round2(self.flowrate),
        }
    }
}

/// Full-precision result of aggregating one upload
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Summary {
    pub total_count: u64,
    pub averages: ColumnAverages,
    pub type_distribution: TypeDistribution,
}

pub fn summarize(table: &MeasurementTable) -> Summary {
    Summary {
        total_count: table.row_count() as u64,
        averages: ColumnAverages {
            pressure: column_mean(table.numeric_column(MeasurementColumn::Pressure)),
            temperature: column_mean(table.numeric_column(MeasurementColumn::Temperature)),
            flowrate: column_mean(table.numeric_column(MeasurementColumn::Flowrate)),
        },
        type_distribution: type_distribution(table.type_column()),
    }
}

/// Mean over the non-missing cells. Absent column, or no values at all, is 0.0.
fn column_mean(cells: Option<&[Option<f64>]>) -> f64 {
    let Some(cells) = cells else {
        return 0.0;
    };

    let (sum, count) = cells
        .iter()
        .flatten()
        .fold((0.0_f64, 0_usize), |(sum, count), value| (sum + value, count + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn type_distribution(cells: Option<&[Option<String>]>) -> TypeDistribution {
    let mut counts = TypeDistribution::new();
    for label in cells.unwrap_or_default().iter().flatten() {
        *counts.entry(label.clone()).or_insert(0) += 1;
    }
    // stable: equal counts keep first-appearance order
    counts.sort_by(|_, a, _, b| b.cmp(a));
    counts
}
