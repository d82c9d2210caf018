use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, QuerySelect, Set};
use tokio::sync::Mutex;
use tracing::debug;

use super::{next_timestamp, HistoryStore, NewUploadRecord, RecordId, UploadRecord};
use crate::database::entities::{upload_history, UploadHistory};
use crate::errors::{StoreError, StoreResult};
use crate::summary::ColumnAverages;

/// History store backed by the `upload_history` table
///
/// Appends go through one lock so that id order and `uploaded_at` order agree
/// even when the pool hands out several connections. Clones share the lock.
#[derive(Clone)]
pub struct SqliteHistoryStore {
    db: DatabaseConnection,
    append_lock: Arc<Mutex<()>>,
}

impl SqliteHistoryStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            append_lock: Arc::new(Mutex::new(())),
        }
    }

    fn newest_first() -> sea_orm::Select<UploadHistory> {
        UploadHistory::find()
            .order_by_desc(upload_history::Column::UploadedAt)
            .order_by_desc(upload_history::Column::Id)
    }
}

#[async_trait]
impl HistoryStore for SqliteHistoryStore {
    async fn append(&self, record: NewUploadRecord) -> StoreResult<RecordId> {
        let total_count = i64::try_from(record.total_count).map_err(|_| {
            StoreError::InvalidRecord(format!("total_count {} out of range", record.total_count))
        })?;

        let _append = self.append_lock.lock().await;
        let latest = Self::newest_first().one(&self.db).await?;
        let uploaded_at = next_timestamp(latest.map(|m| m.uploaded_at));

        let model = upload_history::ActiveModel {
            filename: Set(record.filename),
            uploaded_at: Set(uploaded_at),
            total_count: Set(total_count),
            avg_pressure: Set(record.averages.pressure),
            avg_temperature: Set(record.averages.temperature),
            avg_flowrate: Set(record.averages.flowrate),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        debug!("Appended upload record {} ({})", model.id, model.filename);
        Ok(RecordId(i64::from(model.id)))
    }

    async fn most_recent(&self, limit: usize) -> StoreResult<Vec<UploadRecord>> {
        let models = Self::newest_first()
            .limit(limit as u64)
            .all(&self.db)
            .await?;

        models.into_iter().map(UploadRecord::try_from).collect()
    }
}

impl TryFrom<upload_history::Model> for UploadRecord {
    type Error = StoreError;

    fn try_from(model: upload_history::Model) -> Result<Self, Self::Error> {
        let total_count = u64::try_from(model.total_count).map_err(|_| {
            StoreError::InvalidRecord(format!(
                "record {} has negative total_count {}",
                model.id, model.total_count
            ))
        })?;

        Ok(UploadRecord {
            id: RecordId(i64::from(model.id)),
            filename: model.filename,
            uploaded_at: model.uploaded_at,
            total_count,
            averages: ColumnAverages {
                pressure: model.avg_pressure,
                temperature: model.avg_temperature,
                flowrate: model.avg_flowrate,
            },
        })
    }
}
