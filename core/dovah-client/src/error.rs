//! Network client error types.

use std::fmt;
use thiserror::Error;

/// Result type for API calls.
pub type ClientResult<T> = Result<T, ClientError>;

/// Body of a non-2xx response.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    /// The server answered with JSON, normally `{"error": "..."}`.
    Json(serde_json::Value),
    /// Any other content type.
    Text(String),
    Empty,
}

impl ErrorBody {
    /// The human-readable message carried by the body, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            ErrorBody::Json(value) => value.get("error").and_then(|v| v.as_str()),
            ErrorBody::Text(text) if !text.trim().is_empty() => Some(text.trim()),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorBody::Json(value) => match self.message() {
                Some(msg) => f.write_str(msg),
                None => write!(f, "{value}"),
            },
            ErrorBody::Text(text) => f.write_str(text.trim()),
            ErrorBody::Empty => f.write_str("<empty body>"),
        }
    }
}

/// Errors produced by the network client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure: connection refused, timeout, TLS, body read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: ErrorBody },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// HTTP status for server rejections.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The server-provided error message, if the response carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Status { body, .. } => body.message(),
            _ => None,
        }
    }

    /// Returns true for 401 responses.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}
