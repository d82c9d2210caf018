use axum::{
    extract::{multipart::MultipartRejection, Multipart, Query, State},
    response::Json,
};
use serde::Deserialize;
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

use crate::errors::IngestError;
use crate::history::HISTORY_WINDOW;
use crate::payload::{ErrorBody, HistoryEntry, SummaryPayload};
use crate::server::app::AppState;
use crate::services::UploadedFile;

/// Name of the multipart field carrying the table
pub const FILE_FIELD: &str = "file";

/// Multipart body of the ingestion endpoint
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Number of records, 1 to 5
    pub limit: Option<usize>,
}

#[utoipa::path(
    post,
    path = "/api/summary/",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Upload summarised and recorded", body = SummaryPayload),
        (status = 400, description = "No file supplied", body = ErrorBody),
        (status = 500, description = "Table could not be ingested", body = ErrorBody)
    )
)]
pub async fn upload_summary(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SummaryPayload>, IngestError> {
    let upload = match multipart {
        Ok(multipart) => read_file_field(multipart).await?,
        Err(rejection) => {
            debug!("Request is not a multipart upload: {}", rejection);
            None
        }
    };

    let payload = state.ingest.ingest(upload).await?;
    Ok(Json(payload))
}

#[utoipa::path(
    get,
    path = "/api/summary/history",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Most recent uploads, newest first", body = [HistoryEntry])
    )
)]
pub async fn list_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<HistoryEntry>>, IngestError> {
    let history = state
        .ingest
        .history(query.limit.unwrap_or(HISTORY_WINDOW))
        .await?;
    Ok(Json(history))
}

/// First `file` part that actually carries a file; plain form fields and
/// empty file inputs are ignored
async fn read_file_field(mut multipart: Multipart) -> Result<Option<UploadedFile>, IngestError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| IngestError::IngestionFailure(format!("Unreadable upload: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        // browsers send an empty filename when no file was chosen
        let Some(filename) = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
        else {
            continue;
        };

        let bytes = field
            .bytes()
            .await
            .map_err(|e| IngestError::IngestionFailure(format!("Unreadable upload: {}", e)))?;
        return Ok(Some(UploadedFile::new(filename, bytes.to_vec())));
    }

    Ok(None)
}
