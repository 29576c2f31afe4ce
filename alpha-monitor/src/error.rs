use serde::{Deserialize, Serialize};
use thiserror::Error;

/// All errors generated in `alpha-monitor`.
///
/// Cloneable so the most recent poll failure can live in [`MonitorState`](crate::state::MonitorState)
/// and be rendered by any consumer.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Deserialize, Serialize, Error)]
pub enum MonitorError {
    #[error("failed to reach token list endpoint: {0}")]
    Transport(String),

    #[error("token list endpoint responded {status} {reason}")]
    HttpStatus { status: u16, reason: String },

    #[error("failed to decode token list response: {0}")]
    Decode(String),

    #[error("token list response missing data (code: {code}, message: {})", .message.as_deref().unwrap_or("none"))]
    MissingData {
        code: String,
        message: Option<String>,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Coarse classification of a [`MonitorError`] used to decide how it is surfaced.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub enum ErrorKind {
    /// Endpoint unreachable or responded with a non-success status.
    Transport,
    /// Body could not be decoded, or decoded without a token list.
    Envelope,
    /// Startup configuration rejected.
    Config,
}

impl MonitorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MonitorError::Transport(_) | MonitorError::HttpStatus { .. } => ErrorKind::Transport,
            MonitorError::Decode(_) | MonitorError::MissingData { .. } => ErrorKind::Envelope,
            MonitorError::Config(_) => ErrorKind::Config,
        }
    }

    /// Short hint displayed next to the error banner.
    pub fn hint(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Transport => "check network connectivity, retrying on next refresh",
            ErrorKind::Envelope => "unexpected response from the token list, retrying on next refresh",
            ErrorKind::Config => "fix the environment configuration and restart",
        }
    }
}

impl From<reqwest::Error> for MonitorError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Transport(error.to_string())
        }
    }
}

impl From<serde_json::Error> for MonitorError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error.to_string())
    }
}
