//! Prometheus metrics and structured logging for pricefeed.
//!
//! - Structured logging with tracing, always on stderr so stdout carries
//!   only the price line
//! - Prometheus metrics for source fetches, consensus and resolution

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::Metrics;
