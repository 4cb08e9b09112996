//! Error types for the status check API

use actix_web::http::StatusCode;
use std::fmt;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Ways a status check can end without a reachable verdict.
///
/// `Auth` and `Validation` reject the request itself and no probe is
/// attempted. `Network` and `UpstreamHttp` are completed probes reporting a
/// negative result, so they travel back with a 200 and a failure envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// Anti-forgery token missing or not valid for the scope
    Auth,

    /// Missing or malformed request parameter
    Validation(String),

    /// DNS, connect or timeout failure while probing
    Network(String),

    /// Upstream answered with a status other than 200
    UpstreamHttp(u16),
}

impl ProbeError {
    pub fn missing_parameter() -> Self {
        ProbeError::Validation("missing parameter".to_string())
    }

    pub fn invalid_url() -> Self {
        ProbeError::Validation("invalid url".to_string())
    }

    pub fn unknown_action() -> Self {
        ProbeError::Validation("unknown action".to_string())
    }

    /// HTTP status the endpoint answers with for this outcome
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProbeError::Auth => StatusCode::FORBIDDEN,
            ProbeError::Validation(_) => StatusCode::BAD_REQUEST,
            ProbeError::Network(_) | ProbeError::UpstreamHttp(_) => StatusCode::OK,
        }
    }

    /// True when the request was refused before any probe ran
    pub fn is_rejection(&self) -> bool {
        matches!(self, ProbeError::Auth | ProbeError::Validation(_))
    }
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::Auth => write!(f, "invalid token"),
            ProbeError::Validation(msg) => write!(f, "{}", msg),
            ProbeError::Network(msg) => write!(f, "{}", msg),
            ProbeError::UpstreamHttp(code) => write!(f, "HTTP status: {}", code),
        }
    }
}

impl std::error::Error for ProbeError {}

/// Start-up and wiring failures of the API process
#[derive(Debug)]
pub enum ApiError {
    /// IO operation failed
    Io(std::io::Error),

    /// HTTP client could not be built
    Http(reqwest::Error),

    /// Configuration error
    Config(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Io(err) => write!(f, "IO error: {}", err),
            ApiError::Http(err) => write!(f, "HTTP error: {}", err),
            ApiError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Io(err) => Some(err),
            ApiError::Http(err) => Some(err),
            ApiError::Config(_) => None,
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Io(err)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Http(err)
    }
}
