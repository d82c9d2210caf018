use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{next_timestamp, HistoryStore, NewUploadRecord, RecordId, UploadRecord};
use crate::errors::StoreResult;

/// Process-local history store, kept in insertion order
#[derive(Debug, Default)]
pub struct InMemoryHistoryStore {
    records: RwLock<Vec<UploadRecord>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn append(&self, record: NewUploadRecord) -> StoreResult<RecordId> {
        let mut records = self.records.write().await;
        let id = RecordId(records.len() as i64 + 1);
        let uploaded_at = next_timestamp(records.last().map(|r| r.uploaded_at));

        records.push(UploadRecord {
            id,
            filename: record.filename,
            uploaded_at,
            total_count: record.total_count,
            averages: record.averages,
        });

        Ok(id)
    }

    async fn most_recent(&self, limit: usize) -> StoreResult<Vec<UploadRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().rev().take(limit).cloned().collect())
    }
}
