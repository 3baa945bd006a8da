//! WebSocket error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WsError {
    #[error("Connection closed: code={code}, reason={reason}")]
    ConnectionClosed { code: u16, reason: String },

    #[error("No ticker within {deadline_ms}ms for: {pending}")]
    DeadlineElapsed { deadline_ms: u64, pending: String },

    #[error("Feed error: {0}")]
    Feed(String),

    #[error("Message parse error: {0}")]
    ParseError(String),

    #[error("Tungstenite error: {0}")]
    Tungstenite(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WsError {
    /// True when the failure came from the payload rather than the transport.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::ParseError(_) | Self::Json(_))
    }
}

pub type WsResult<T> = Result<T, WsError>;
