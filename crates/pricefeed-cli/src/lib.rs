//! Command-line price resolver.
//!
//! Resolves a list of asset symbols to USD prices through one primary
//! exchange, converting pegged quotes with a multi-source consensus rate,
//! and renders them as one comma-separated line.

pub mod config;
pub mod error;
pub mod resolver;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use resolver::PriceResolver;

use pricefeed_telemetry::Metrics;

/// Resolve `symbols` and render the output line.
pub async fn run_once(config: &AppConfig, symbols: &[String]) -> AppResult<String> {
    let result = resolve_line(config, symbols).await;
    Metrics::resolve(match &result {
        Ok(_) => "ok",
        Err(e) => e.outcome(),
    });
    result
}

async fn resolve_line(config: &AppConfig, symbols: &[String]) -> AppResult<String> {
    config.validate()?;
    let resolver = PriceResolver::from_config(config)?;
    let prices = resolver.resolve(symbols).await?;
    Ok(prices.render_line(symbols))
}
