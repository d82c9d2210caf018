//! Append-only history of completed ingestions.
//!
//! Records are written once and never updated. There are two read paths
//! over the same [`UploadRecord`]:
//!
//! - [`HistoryStore::most_recent`] returns full-precision records, newest first
//! - [`UploadRecord::to_history_entry`] projects a record for display, rounding
//!   the averages on the way out
//!
//! Stores assign `uploaded_at` themselves and never let it go backwards, so
//! ordering by timestamp and then by id is the same as insertion order.

pub mod memory;
#[cfg(feature = "server")]
pub mod sqlite;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::StoreResult;
use crate::payload::HistoryEntry;
use crate::summary::{ColumnAverages, Summary};

pub use memory::InMemoryHistoryStore;
#[cfg(feature = "server")]
pub use sqlite::SqliteHistoryStore;

/// Size of the history window returned with every ingestion
pub const HISTORY_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub i64);

impl RecordId {
    pub fn value(&self) -> i64 {
        self.0
    }
}

/// A record about to be appended. The store assigns id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUploadRecord {
    pub filename: String,
    pub total_count: u64,
    pub averages: ColumnAverages,
}

impl NewUploadRecord {
    pub fn from_summary(filename: impl Into<String>, summary: &Summary) -> Self {
        Self {
            filename: filename.into(),
            total_count: summary.total_count,
            averages: summary.averages,
        }
    }
}

/// A stored ingestion, at full precision
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRecord {
    pub id: RecordId,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub total_count: u64,
    pub averages: ColumnAverages,
}

impl UploadRecord {
    /// Display projection with two-decimal averages
    pub fn to_history_entry(&self) -> HistoryEntry {
        let averages = self.averages.rounded();
        HistoryEntry {
            filename: Some(self.filename.clone()),
            uploaded_at: Some(self.uploaded_at.to_rfc3339_opts(SecondsFormat::Micros, false)),
            avg_pressure: averages.pressure,
            avg_flowrate: averages.flowrate,
            avg_temp: averages.temperature,
        }
    }
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Append one immutable record and return its id
    async fn append(&self, record: NewUploadRecord) -> StoreResult<RecordId>;

    /// At most `limit` records ordered by `uploaded_at` descending, ties last-written-first
    async fn most_recent(&self, limit: usize) -> StoreResult<Vec<UploadRecord>>;
}

/// Timestamp for the next record: now, but never earlier than the latest stored one
pub(crate) fn next_timestamp(latest: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    match latest {
        Some(latest) if latest > now => latest,
        _ => now,
    }
}
