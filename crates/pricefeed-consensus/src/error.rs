//! Consensus error types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsensusError {
    /// Not a single source produced a quote.
    #[error("No quorum: 0 of {configured} sources answered ({failed} failed, {timed_out} timed out)")]
    NoQuorum {
        configured: usize,
        failed: usize,
        timed_out: usize,
    },

    #[error("Invalid result: {0}")]
    InvalidResult(String),

    #[error("Unknown source: {0}")]
    UnknownSource(String),
}

pub type ConsensusResult<T> = Result<T, ConsensusError>;
