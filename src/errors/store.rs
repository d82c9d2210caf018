//! History store error types

use thiserror::Error;

/// History store operation errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database operation failed
    #[cfg(feature = "server")]
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A record could not be converted to or from its stored form
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

impl StoreError {
    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            #[cfg(feature = "server")]
            StoreError::Database(_) => "DATABASE_ERROR",
            StoreError::InvalidRecord(_) => "INVALID_RECORD",
        }
    }
}
