//! Wire schema shared by the ingestion endpoint and the dashboard client.
//!
//! Every average in these types is already rounded to two decimals; the
//! full-precision values live only in [`crate::history::UploadRecord`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[cfg(feature = "server")]
use utoipa::ToSchema;

use crate::history::UploadRecord;
use crate::summary::Summary;

/// Response of a successful ingestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct SummaryPayload {
    pub total_count: u64,
    pub avg_pressure: f64,
    #[serde(alias = "avg_temp")]
    pub avg_temperature: f64,
    pub avg_flowrate: f64,
    #[serde(default)]
    #[cfg_attr(feature = "server", schema(value_type = Object))]
    pub type_distribution: IndexMap<String, u64>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl SummaryPayload {
    /// Build the outward payload from a full-precision summary and the
    /// history window (newest first).
    pub fn compose(summary: &Summary, recent: &[UploadRecord]) -> Self {
        let averages = summary.averages.rounded();
        Self {
            total_count: summary.total_count,
            avg_pressure: averages.pressure,
            avg_temperature: averages.temperature,
            avg_flowrate: averages.flowrate,
            type_distribution: summary.type_distribution.clone(),
            history: recent.iter().map(UploadRecord::to_history_entry).collect(),
        }
    }
}

/// Display projection of one stored upload
///
/// `filename` and `uploaded_at` are optional so the client can fall back to
/// placeholders when talking to an older backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct HistoryEntry {
    #[serde(default)]
    pub filename: Option<String>,
    /// ISO-8601 timestamp
    #[serde(default, alias = "upload_date")]
    pub uploaded_at: Option<String>,
    #[serde(default)]
    pub avg_pressure: f64,
    #[serde(default)]
    pub avg_flowrate: f64,
    #[serde(default)]
    pub avg_temp: f64,
}

/// Error object returned for every failed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(ToSchema))]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::RecordId;
    use crate::summary::ColumnAverages;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn record(id: i64, filename: &str, pressure: f64) -> UploadRecord {
        UploadRecord {
            id: RecordId(id),
            filename: filename.to_string(),
            uploaded_at: Utc.with_ymd_and_hms(2026, 2, 3, 10, 15, 30).unwrap(),
            total_count: 4,
            averages: ColumnAverages {
                pressure,
                temperature: 101.006,
                flowrate: 7.0 / 3.0,
            },
        }
    }

    #[test]
    fn test_compose_rounds_top_level_and_history() {
        let mut summary = Summary::default();
        summary.total_count = 3;
        summary.averages = ColumnAverages {
            pressure: 10.0 / 3.0,
            temperature: 119.999,
            flowrate: 0.125,
        };
        summary.type_distribution.insert("Pump".to_string(), 3);

        let payload = SummaryPayload::compose(&summary, &[record(1, "a.csv", 5.555)]);

        assert_eq!(payload.total_count, 3);
        assert_eq!(payload.avg_pressure, 3.33);
        assert_eq!(payload.avg_temperature, 120.0);
        assert_eq!(payload.avg_flowrate, 0.13);
        assert_eq!(payload.history.len(), 1);
        assert_eq!(payload.history[0].avg_temp, 101.01);
        assert_eq!(payload.history[0].avg_flowrate, 2.33);
        assert_eq!(payload.history[0].filename.as_deref(), Some("a.csv"));
    }

    #[test]
    fn test_serialized_shape() {
        let mut summary = Summary::default();
        summary.type_distribution.insert("X".to_string(), 1);
        let payload = SummaryPayload::compose(&summary, &[record(1, "a.csv", 1.0)]);

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["total_count"], 0);
        assert_eq!(value["avg_temperature"], 0.0);
        assert_eq!(value["type_distribution"], json!({"X": 1}));
        let entry = &value["history"][0];
        assert_eq!(entry["filename"], "a.csv");
        assert!(entry["uploaded_at"].as_str().unwrap().starts_with("2026-02-03T10:15:30"));
        assert!(entry.get("avg_temp").is_some());
    }

    #[test]
    fn test_deserialize_accepts_legacy_keys() {
        let body = r#"{
            "total_count": 2,
            "avg_pressure": 15.0,
            "avg_temp": 120.0,
            "avg_flowrate": 10.0,
            "type_distribution": {"Y": 1, "X": 1},
            "history": [{"filename": "b.csv", "upload_date": "2026-02-03T10:15:30+00:00"}]
        }"#;
        let payload: SummaryPayload = serde_json::from_str(body).unwrap();

        assert_eq!(payload.avg_temperature, 120.0);
        let keys: Vec<&str> = payload.type_distribution.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Y", "X"]);
        assert_eq!(
            payload.history[0].uploaded_at.as_deref(),
            Some("2026-02-03T10:15:30+00:00")
        );
        assert_eq!(payload.history[0].avg_pressure, 0.0);
    }
}
