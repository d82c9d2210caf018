//! Audit-trail rows built from the payload's history window

use crate::history::HISTORY_WINDOW;
use crate::payload::HistoryEntry;

pub const TABLE_HEADERS: [&str; 6] = [
    "Batch ID",
    "Filename",
    "Date & Time",
    "Avg Press",
    "Avg Flow",
    "Avg Temp",
];

const UNKNOWN_FILENAME: &str = "Unknown";
const UNKNOWN_TIMESTAMP: &str = "2026-02-03";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub batch_id: String,
    pub filename: String,
    pub timestamp: String,
    pub avg_pressure: String,
    pub avg_flowrate: String,
    pub avg_temperature: String,
}

impl HistoryRow {
    pub fn cells(&self) -> [&str; 6] {
        [
            &self.batch_id,
            &self.filename,
            &self.timestamp,
            &self.avg_pressure,
            &self.avg_flowrate,
            &self.avg_temperature,
        ]
    }
}

/// At most the first five entries (already newest first), one row each
pub fn build_history_rows(history: &[HistoryEntry]) -> Vec<HistoryRow> {
    history
        .iter()
        .take(HISTORY_WINDOW)
        .enumerate()
        .map(|(index, entry)| HistoryRow {
            batch_id: format!("#B-00{}", index + 1),
            filename: entry
                .filename
                .clone()
                .unwrap_or_else(|| UNKNOWN_FILENAME.to_string()),
            timestamp: format_timestamp(entry.uploaded_at.as_deref().unwrap_or(UNKNOWN_TIMESTAMP)),
            avg_pressure: format!("{:.1} psi", entry.avg_pressure),
            avg_flowrate: format!("{:.1} m³/h", entry.avg_flowrate),
            avg_temperature: format!("{:.1} °C", entry.avg_temp),
        })
        .collect()
}

/// First 16 characters with the date/time separator turned into a space
fn format_timestamp(raw: &str) -> String {
    raw.chars().take(16).collect::<String>().replace('T', " ")
}
