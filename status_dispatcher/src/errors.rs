//! Error types for the status dispatcher

use std::fmt;

pub type Result<T> = std::result::Result<T, DispatchError>;

#[derive(Debug)]
pub enum DispatchError {
    /// HTTP request failed
    Http(reqwest::Error),

    /// JSON serialization/deserialization failed
    Json(serde_json::Error),

    /// Configuration error
    Config(String),

    /// Host page could not be obtained or is malformed
    Host(String),

    /// No service at this row
    UnknownService(usize),

    /// A check is already in flight for the target
    Busy(String),

    /// Caller lacks the privilege for this command
    NotPermitted(String),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::Http(err) => write!(f, "HTTP error: {}", err),
            DispatchError::Json(err) => write!(f, "JSON error: {}", err),
            DispatchError::Config(msg) => write!(f, "Configuration error: {}", msg),
            DispatchError::Host(msg) => write!(f, "Host error: {}", msg),
            DispatchError::UnknownService(row) => write!(f, "No service at row {}", row),
            DispatchError::Busy(what) => write!(f, "Check already running for {}", what),
            DispatchError::NotPermitted(what) => write!(f, "Not permitted: {}", what),
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DispatchError::Http(err) => Some(err),
            DispatchError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for DispatchError {
    fn from(err: reqwest::Error) -> Self {
        DispatchError::Http(err)
    }
}

impl From<serde_json::Error> for DispatchError {
    fn from(err: serde_json::Error) -> Self {
        DispatchError::Json(err)
    }
}
