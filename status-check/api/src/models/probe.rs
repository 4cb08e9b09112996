use serde::{Deserialize, Serialize};

use crate::errors::ProbeError;

pub const SUCCESS_ICON: &str = "✅";
pub const FAILURE_ICON: &str = "❌";
pub const REACHABLE_MESSAGE: &str = "server-side reachable";

/// Classification of a single outbound probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    Success,
    HttpError(u16),
    NetworkError(String),
}

impl ProbeResult {
    /// Only an exact 200 counts as reachable
    pub fn from_status(code: u16) -> Self {
        if code == 200 {
            ProbeResult::Success
        } else {
            ProbeResult::HttpError(code)
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProbeResult::Success)
    }

    pub fn into_result(self) -> Result<(), ProbeError> {
        match self {
            ProbeResult::Success => Ok(()),
            ProbeResult::HttpError(code) => Err(ProbeError::UpstreamHttp(code)),
            ProbeResult::NetworkError(message) => Err(ProbeError::Network(message)),
        }
    }
}

// Response envelope of the status check endpoint
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Envelope {
    pub success: bool,
    pub data: EnvelopeData,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum EnvelopeData {
    Reachable { status: String, message: String },
    Unreachable { status: String, error_message: String },
}

impl Envelope {
    pub fn reachable() -> Self {
        Self {
            success: true,
            data: EnvelopeData::Reachable {
                status: SUCCESS_ICON.to_string(),
                message: REACHABLE_MESSAGE.to_string(),
            },
        }
    }

    pub fn failure(error_message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: EnvelopeData::Unreachable {
                status: FAILURE_ICON.to_string(),
                error_message: error_message.into(),
            },
        }
    }

    pub fn status(&self) -> &str {
        match &self.data {
            EnvelopeData::Reachable { status, .. } => status,
            EnvelopeData::Unreachable { status, .. } => status,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.data {
            EnvelopeData::Reachable { .. } => None,
            EnvelopeData::Unreachable { error_message, .. } => Some(error_message),
        }
    }
}

impl From<&ProbeError> for Envelope {
    fn from(err: &ProbeError) -> Self {
        Envelope::failure(err.to_string())
    }
}
