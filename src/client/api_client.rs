use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, warn};

use crate::errors::{ClientError, ClientResult};
use crate::payload::{ErrorBody, SummaryPayload};

/// Multipart field the aggregator reads the upload from
pub const FILE_FIELD: &str = "file";

/// HTTP client for the aggregator's ingestion endpoint
#[derive(Debug, Clone)]
pub struct SummaryClient {
    client: Client,
    endpoint: String,
}

impl SummaryClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Read `path` and upload it under its own file name
    pub async fn upload_file(&self, path: &Path) -> ClientResult<SummaryPayload> {
        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.csv".to_string());
        self.upload_bytes(filename, bytes).await
    }

    /// Single multipart POST; the response is either a summary payload or an error object
    pub async fn upload_bytes(
        &self,
        filename: impl Into<String>,
        bytes: Vec<u8>,
    ) -> ClientResult<SummaryPayload> {
        let filename = filename.into();
        debug!("Uploading {} ({} bytes) to {}", filename, bytes.len(), self.endpoint);

        let part = Part::bytes(bytes)
            .file_name(filename)
            .mime_str("text/csv")
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        let form = Form::new().part(FILE_FIELD, part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClientError::TransportUnavailable(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::TransportUnavailable(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
            warn!("Upload rejected with status {}: {}", status, message);
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}
