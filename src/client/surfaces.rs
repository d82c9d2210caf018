//! Rendering surfaces the dashboard draws onto.
//!
//! Implementations redraw fully on every call; the dashboard never asks a
//! surface to patch what it drew before.

use super::history_table::HistoryRow;
use super::metrics::MetricCards;

/// Bar colours, assigned to categories in order and cycled past the seventh
pub const BAR_PALETTE: [&str; 7] = [
    "#3b82f6", "#ef4444", "#8b5cf6", "#f59e0b", "#10b981", "#06b6d4", "#ec4899",
];

/// Single colour of the line-with-fill chart
pub const LINE_COLOR: &str = "#4f46e5";

pub trait ChartSurface: Send + Sync {
    /// Called once when a run starts, with the values the run will end on
    fn begin(&self, _categories: &[String], _targets: &[f64]) {}

    fn draw(&self, categories: &[String], values: &[f64], palette: &[&'static str]);
}

pub trait TableSurface: Send + Sync {
    /// Replace the whole table with `rows`
    fn replace_rows(&self, rows: &[HistoryRow]);
}

pub trait MetricSurface: Send + Sync {
    fn show_metrics(&self, cards: &MetricCards);
}

/// One palette entry per category
pub fn bar_palette(categories: usize) -> Vec<&'static str> {
    BAR_PALETTE.iter().copied().cycle().take(categories).collect()
}
