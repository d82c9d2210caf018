use std::sync::Arc;

use tracing::{debug, error, info};

use crate::errors::{IngestError, IngestResult};
use crate::history::{HistoryStore, NewUploadRecord, HISTORY_WINDOW};
use crate::payload::{HistoryEntry, SummaryPayload};
use crate::summary::{summarize, MeasurementTable};

/// One uploaded file as received from the transport
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

/// Turns an upload into a stored history record and a composed summary payload
#[derive(Clone)]
pub struct IngestService {
    store: Arc<dyn HistoryStore>,
}

impl IngestService {
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self { store }
    }

    /// Parse, aggregate, append exactly one record, then read the history window.
    ///
    /// Nothing is written unless parsing and aggregation succeed.
    pub async fn ingest(&self, upload: Option<UploadedFile>) -> IngestResult<SummaryPayload> {
        let upload = upload.ok_or(IngestError::MissingInput)?;
        info!("Ingesting {} ({} bytes)", upload.filename, upload.bytes.len());

        let table = MeasurementTable::from_csv_bytes(&upload.bytes).map_err(|e| {
            error!("Ingestion of {} failed: {}", upload.filename, e);
            e
        })?;
        let summary = summarize(&table);
        debug!(
            "Summary for {}: rows={} types={}",
            upload.filename,
            summary.total_count,
            summary.type_distribution.len()
        );

        let record_id = self
            .store
            .append(NewUploadRecord::from_summary(upload.filename, &summary))
            .await?;
        debug!("Stored upload record {}", record_id.value());

        let recent = self.store.most_recent(HISTORY_WINDOW).await?;
        Ok(SummaryPayload::compose(&summary, &recent))
    }

    /// Display projection of the newest `limit` records, capped at the history window
    pub async fn history(&self, limit: usize) -> IngestResult<Vec<HistoryEntry>> {
        let limit = limit.clamp(1, HISTORY_WINDOW);
        let recent = self.store.most_recent(limit).await?;
        Ok(recent.iter().map(|r| r.to_history_entry()).collect())
    }
}
