pub mod ingest_service;

pub use ingest_service::{IngestService, UploadedFile};
