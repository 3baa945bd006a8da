//! Application error types.
//!
//! Messages are printed to stderr as-is, so the wrapped domain errors are
//! transparent.

use pricefeed_consensus::ConsensusError;
use pricefeed_core::CoreError;
use pricefeed_sources::SourceError;
use pricefeed_telemetry::TelemetryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unsupported symbols and misaligned output.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// No quorum or a negative peg rate.
    #[error(transparent)]
    Consensus(#[from] ConsensusError),

    /// The primary source failed. Never absorbed.
    #[error("Primary source {name} failed: {error}")]
    Primary { name: String, error: SourceError },

    /// A converted price that cannot be emitted.
    #[error("{reason} for {symbol}")]
    InvalidResult { symbol: String, reason: String },

    #[error("HTTP client error: {0}")]
    Client(String),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
}

impl AppError {
    /// Label for the resolve outcome metric.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Config(_) | Self::Client(_) | Self::Telemetry(_) => "setup_error",
            Self::Core(CoreError::UnsupportedSymbol(_)) => "unsupported_symbol",
            Self::Core(CoreError::OutputLengthMismatch { .. }) => "length_mismatch",
            Self::Core(_) => "parse_error",
            Self::Consensus(ConsensusError::NoQuorum { .. }) => "no_quorum",
            Self::Consensus(ConsensusError::InvalidResult(_)) | Self::InvalidResult { .. } => {
                "invalid_result"
            }
            Self::Consensus(ConsensusError::UnknownSource(_)) => "setup_error",
            Self::Primary { .. } => "primary_failed",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
