//! Client-side error types
//!
//! Every variant is terminal for the current upload cycle: the dashboard
//! reports it once and stays on the pre-upload view.

use thiserror::Error;

/// Upload client errors
#[derive(Error, Debug)]
pub enum ClientError {
    /// The aggregator could not be reached
    #[error("Backend unavailable: {0}")]
    TransportUnavailable(String),

    /// The aggregator answered with an error object
    #[error("Upload rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The aggregator answered with something that is not a summary payload
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The local file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Check if the backend was unreachable
    pub fn is_transport_error(&self) -> bool {
        matches!(self, ClientError::TransportUnavailable(_))
    }

    /// HTTP status reported by the backend, if it answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_display() {
        let err = ClientError::Rejected {
            status: 400,
            message: "No file".to_string(),
        };
        assert_eq!(err.to_string(), "Upload rejected (400): No file");
        assert_eq!(err.status(), Some(400));
        assert!(!err.is_transport_error());
    }

    #[test]
    fn test_transport_unavailable() {
        let err = ClientError::TransportUnavailable("connection refused".to_string());
        assert!(err.is_transport_error());
        assert_eq!(err.status(), None);
    }
}
