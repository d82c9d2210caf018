//! Terminal rendering of the dashboard.
//!
//! Both charts share one [`ConsoleCanvas`]. Each draw replaces that chart's
//! block and repaints the canvas in place by moving the cursor back up over
//! the previous paint.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use colored::Colorize;

use super::history_table::{HistoryRow, TABLE_HEADERS};
use super::metrics::{HealthIndex, MetricCards};
use super::surfaces::{ChartSurface, MetricSurface, TableSurface};

const BAR_WIDTH: usize = 40;
const LABEL_WIDTH: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartSlot {
    Bar,
    Line,
}

#[derive(Default)]
struct CanvasState {
    bar: Vec<String>,
    line: Vec<String>,
    scale: f64,
    painted_lines: usize,
}

#[derive(Default)]
pub struct ConsoleCanvas {
    state: Mutex<CanvasState>,
}

impl ConsoleCanvas {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn chart(self: &Arc<Self>, slot: ChartSlot) -> ConsoleChart {
        ConsoleChart {
            canvas: self.clone(),
            slot,
        }
    }

    fn begin(&self, targets: &[f64]) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.scale = targets.iter().copied().fold(0.0, f64::max);
        state.bar.clear();
        state.line.clear();
        state.painted_lines = 0;
    }

    fn update(&self, slot: ChartSlot, categories: &[String], values: &[f64], palette: &[&str]) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let block = render_chart(slot, categories, values, palette, state.scale);
        match slot {
            ChartSlot::Bar => state.bar = block,
            ChartSlot::Line => state.line = block,
        }

        let mut out = io::stdout().lock();
        let mut frame = String::new();
        if state.painted_lines > 0 {
            frame.push_str(&format!("\x1b[{}A", state.painted_lines));
        }
        for line in state.bar.iter().chain(state.line.iter()) {
            frame.push_str("\x1b[2K");
            frame.push_str(line);
            frame.push('\n');
        }
        // a failed terminal write only loses one frame
        let _ = out.write_all(frame.as_bytes()).and_then(|_| out.flush());
        state.painted_lines = state.bar.len() + state.line.len();
    }
}

/// One chart drawn onto a shared [`ConsoleCanvas`]
pub struct ConsoleChart {
    canvas: Arc<ConsoleCanvas>,
    slot: ChartSlot,
}

impl ChartSurface for ConsoleChart {
    fn begin(&self, _categories: &[String], targets: &[f64]) {
        // the bar chart resets the canvas for both slots
        if self.slot == ChartSlot::Bar {
            self.canvas.begin(targets);
        }
    }

    fn draw(&self, categories: &[String], values: &[f64], palette: &[&'static str]) {
        self.canvas.update(self.slot, categories, values, palette);
    }
}

pub struct ConsoleMetrics;

impl MetricSurface for ConsoleMetrics {
    fn show_metrics(&self, cards: &MetricCards) {
        println!();
        for (title, value) in cards.cards() {
            let value = if title == "HEALTH INDEX" {
                match cards.health {
                    HealthIndex::Nominal => value.green().bold(),
                    HealthIndex::Elevated => value.yellow().bold(),
                }
            } else {
                value.bold()
            };
            println!("  {:<16} {}", title.dimmed(), value);
        }
        println!();
    }
}

pub struct ConsoleTable;

impl TableSurface for ConsoleTable {
    fn replace_rows(&self, rows: &[HistoryRow]) {
        println!();
        for line in render_table(rows) {
            println!("{line}");
        }
    }
}

/// Fixed-width lines, header first
pub fn render_table(rows: &[HistoryRow]) -> Vec<String> {
    let widths: [usize; 6] = [8, 24, 16, 12, 14, 12];
    let format_row = |cells: [&str; 6]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join(" ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_row(TABLE_HEADERS)];
    lines.extend(rows.iter().map(|row| format_row(row.cells())));
    lines
}

fn render_chart(
    slot: ChartSlot,
    categories: &[String],
    values: &[f64],
    palette: &[&str],
    scale: f64,
) -> Vec<String> {
    let title = match slot {
        ChartSlot::Bar => "Type distribution",
        ChartSlot::Line => "Distribution trend",
    };
    let mut lines = vec![title.bold().to_string()];

    for (index, (category, value)) in categories.iter().zip(values).enumerate() {
        let color = palette
            .get(index % palette.len().max(1))
            .and_then(|hex| parse_hex(hex))
            .unwrap_or((255, 255, 255));
        let cells = cell_count(*value, scale);
        let body = match slot {
            ChartSlot::Bar => "█".repeat(cells),
            ChartSlot::Line if cells == 0 => "●".to_string(),
            ChartSlot::Line => format!("{}●", "░".repeat(cells - 1)),
        };
        let label: String = category.chars().take(LABEL_WIDTH).collect();
        lines.push(format!(
            "  {:<width$} {} {:.1}",
            label,
            body.truecolor(color.0, color.1, color.2),
            value,
            width = LABEL_WIDTH
        ));
    }
    lines
}

fn cell_count(value: f64, scale: f64) -> usize {
    if scale <= 0.0 || !value.is_finite() {
        return 0;
    }
    ((value / scale) * BAR_WIDTH as f64).round().clamp(0.0, BAR_WIDTH as f64) as usize
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#3b82f6"), Some((0x3b, 0x82, 0xf6)));
        assert_eq!(parse_hex("3b82f6"), None);
        assert_eq!(parse_hex("#zzzzzz"), None);
    }

    #[test]
    fn test_cell_count_scales_to_target() {
        assert_eq!(cell_count(20.0, 20.0), BAR_WIDTH);
        assert_eq!(cell_count(10.0, 20.0), BAR_WIDTH / 2);
        assert_eq!(cell_count(5.0, 0.0), 0);
        assert_eq!(cell_count(f64::NAN, 20.0), 0);
    }

    #[test]
    fn test_render_table_header_and_rows() {
        let row = HistoryRow {
            batch_id: "#B-001".to_string(),
            filename: "plant.csv".to_string(),
            timestamp: "2026-02-03 10:15".to_string(),
            avg_pressure: "15.0 psi".to_string(),
            avg_flowrate: "10.0 m³/h".to_string(),
            avg_temperature: "120.0 °C".to_string(),
        };
        let lines = render_table(&[row]);

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Batch ID"));
        assert!(lines[1].starts_with("#B-001"));
        assert!(lines[1].contains("plant.csv"));
        assert!(lines[1].ends_with("120.0 °C"));
    }

    #[test]
    fn test_render_chart_one_line_per_category() {
        colored::control::set_override(false);
        let categories = vec!["X".to_string(), "Y".to_string()];
        let lines = render_chart(ChartSlot::Bar, &categories, &[1.0, 2.0], &["#3b82f6"], 2.0);

        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("X"));
        assert!(lines[2].ends_with("2.0"));
    }
}
