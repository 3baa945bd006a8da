//! Source error types.

use pricefeed_core::CoreError;
use pricefeed_ws::WsError;
use thiserror::Error;

/// Failure of one source. Never escalated past a consensus step.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Transport failure, non-success status, or no data in time.
    #[error("Network error: {0}")]
    Network(String),

    /// Body or value could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Decoded fine but the expected field is missing or reports an error.
    #[error("Schema error: {0}")]
    Schema(String),
}

impl SourceError {
    /// Short label used for logs and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Parse(_) => "parse",
            Self::Schema(_) => "schema",
        }
    }
}

impl From<CoreError> for SourceError {
    fn from(e: CoreError) -> Self {
        Self::Parse(e.to_string())
    }
}

impl From<WsError> for SourceError {
    fn from(e: WsError) -> Self {
        if e.is_parse() {
            return Self::Parse(e.to_string());
        }
        match e {
            WsError::Feed(msg) => Self::Schema(msg),
            other => Self::Network(other.to_string()),
        }
    }
}

pub type SourceResult<T> = Result<T, SourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ws_deadline_is_network_error() {
        let err: SourceError = WsError::DeadlineElapsed {
            deadline_ms: 100,
            pending: "ETH-USD".to_string(),
        }
        .into();
        assert_eq!(err.kind(), "network");
    }

    #[test]
    fn test_ws_feed_rejection_is_schema_error() {
        let err: SourceError = WsError::Feed("bad product".to_string()).into();
        assert_eq!(err.kind(), "schema");
    }

    #[test]
    fn test_core_parse_failure_is_parse_error() {
        let err: SourceError = "abc".parse::<pricefeed_core::Price>().unwrap_err().into();
        assert_eq!(err.kind(), "parse");
    }
}
