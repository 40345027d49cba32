//! Error types for ferry-core

use crate::StatusCode;
use thiserror::Error;

/// Result type alias for ferry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the ferry HTTP server
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid HTTP method
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// Invalid path or file name
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Invalid header
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Too many header lines
    #[error("Too many headers: more than {limit}")]
    TooManyHeaders { limit: usize },

    /// Request head too large
    #[error("Request head exceeds limit of {limit} bytes")]
    HeadTooLarge { limit: usize },

    /// Body too large
    #[error("Body too large: {size} bytes exceeds limit of {limit} bytes")]
    BodyTooLarge { size: usize, limit: usize },

    /// Peer closed before the declared body arrived
    #[error("Incomplete body: expected {expected} bytes, got {received}")]
    IncompleteBody { expected: usize, received: usize },

    /// Peer closed before a complete request head arrived
    #[error("Connection closed before a complete request was received")]
    ConnectionClosed,

    /// Request read did not complete in time
    #[error("Timed out reading request")]
    Timeout,

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// File routes used without a configured directory
    #[error("No file directory configured")]
    DirectoryNotConfigured,

    /// Startup configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Status to answer the client with, or `None` when the connection
    /// is unusable and should just be dropped
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::InvalidMethod(_)
            | Error::InvalidPath(_)
            | Error::InvalidHeader(_)
            | Error::TooManyHeaders { .. }
            | Error::IncompleteBody { .. }
            | Error::Parse(_) => Some(StatusCode::BAD_REQUEST),
            Error::HeadTooLarge { .. } => Some(StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE),
            Error::BodyTooLarge { .. } => Some(StatusCode::PAYLOAD_TOO_LARGE),
            Error::DirectoryNotConfigured | Error::Config(_) | Error::Io(_) => {
                Some(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Error::ConnectionClosed | Error::Timeout => None,
        }
    }

    /// Whether the client is at fault
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| s.is_client_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_input_is_bad_request() {
        assert_eq!(
            Error::InvalidMethod("DELETE".into()).status(),
            Some(StatusCode::BAD_REQUEST)
        );
        assert_eq!(
            Error::IncompleteBody { expected: 10, received: 3 }.status(),
            Some(StatusCode::BAD_REQUEST)
        );
        assert!(Error::Parse("x".into()).is_client_error());
    }

    #[test]
    fn test_local_faults_are_server_errors() {
        let io = Error::from(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        assert_eq!(io.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(
            Error::DirectoryNotConfigured.status(),
            Some(StatusCode::INTERNAL_SERVER_ERROR)
        );
        assert!(!io.is_client_error());
    }

    #[test]
    fn test_limits() {
        assert_eq!(
            Error::HeadTooLarge { limit: 8 }.status(),
            Some(StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE)
        );
        assert_eq!(
            Error::BodyTooLarge { size: 9, limit: 8 }.status(),
            Some(StatusCode::PAYLOAD_TOO_LARGE)
        );
    }

    #[test]
    fn test_dead_connection_has_no_response() {
        assert_eq!(Error::ConnectionClosed.status(), None);
        assert_eq!(Error::Timeout.status(), None);
    }
}
