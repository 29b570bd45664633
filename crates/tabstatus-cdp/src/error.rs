use tabstatus_core::{HostError, ProbeError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CdpError {
    #[error("invalid DevTools endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("DevTools HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("DevTools WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("failed to decode DevTools message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{method} failed ({code}): {message}")]
    Protocol {
        method: String,
        code: i64,
        message: String,
    },

    #[error("{0} timed out")]
    Timeout(String),

    #[error("DevTools connection closed before {0} replied")]
    Closed(String),

    #[error("page script threw: {0}")]
    Evaluation(String),
}

impl From<CdpError> for HostError {
    fn from(e: CdpError) -> Self {
        HostError::new(e.to_string())
    }
}

impl From<CdpError> for ProbeError {
    fn from(e: CdpError) -> Self {
        ProbeError::Rejected(e.to_string())
    }
}
