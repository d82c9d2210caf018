//! Domain-specific error types for equipviz
//!
//! Each side of the upload cycle has its own error enum so callers can
//! classify failures without string matching.
//!
//! # Error Categories
//!
//! - **IngestError**: server-side ingestion (missing upload, unparseable table, store failure)
//! - **StoreError**: history store reads and writes
//! - **ClientError**: client-side upload and response decoding
//!
//! # Examples
//!
//! ```rust
//! use equipviz::errors::{ClientError, IngestError};
//!
//! let err = IngestError::MissingInput;
//! assert!(err.is_client_error());
//!
//! let err = ClientError::TransportUnavailable("connection refused".to_string());
//! assert!(err.is_transport_error());
//! ```

pub mod client;
pub mod ingest;
pub mod store;

pub use client::ClientError;
pub use ingest::IngestError;
pub use store::StoreError;

/// Result type alias for ingestion operations
pub type IngestResult<T> = Result<T, IngestError>;

/// Result type alias for history store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
