//! Ingestion error types
//!
//! Failures of the upload → aggregate → persist → compose pipeline. Every
//! variant except `Store` is raised before the history record is written, so
//! a failed ingestion never leaves a partial record behind.
//!
//! # Examples
//!
//! ```rust
//! use equipviz::errors::IngestError;
//!
//! let err = IngestError::IngestionFailure("row 3: column 'Pressure' is not numeric".to_string());
//! assert!(err.is_server_error());
//! assert_eq!(err.error_code(), "INGESTION_FAILURE");
//! ```

use thiserror::Error;

use super::StoreError;

/// Ingestion errors
#[derive(Error, Debug)]
pub enum IngestError {
    /// No file was supplied with the request
    #[error("No file")]
    MissingInput,

    /// The table could not be parsed or aggregated; the message is shown verbatim
    #[error("{0}")]
    IngestionFailure(String),

    /// The history store failed
    #[error("History store error: {0}")]
    Store(#[from] StoreError),
}

impl IngestError {
    /// Check if this is a client error (400-series)
    pub fn is_client_error(&self) -> bool {
        matches!(self, IngestError::MissingInput)
    }

    /// Check if this is a server error (500-series)
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }

    /// Get error code for logs and API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            IngestError::MissingInput => "MISSING_INPUT",
            IngestError::IngestionFailure(_) => "INGESTION_FAILURE",
            IngestError::Store(inner) => inner.error_code(),
        }
    }
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        IngestError::IngestionFailure(err.to_string())
    }
}
