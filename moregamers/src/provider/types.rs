//! Transport error types

use std::fmt;

/// Errors that can occur while talking to the ad server.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    /// HTTP request failed (connect, timeout, non-2xx status, body read)
    HttpError(String),
    /// The HTTP client could not be constructed
    ClientBuild(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::HttpError(msg) => write!(f, "HTTP error: {}", msg),
            TransportError::ClientBuild(msg) => {
                write!(f, "Failed to create HTTP client: {}", msg)
            }
        }
    }
}

impl std::error::Error for TransportError {}
