//! Error types for pricefeed-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Contains Unsupported Symbols: {0}")]
    UnsupportedSymbol(String),

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Input Length Not Equivalent to Output Length: expected {expected}, got {actual}")]
    OutputLengthMismatch { expected: usize, actual: usize },

    #[error("Decimal parse error: {0}")]
    DecimalParse(#[from] rust_decimal::Error),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
