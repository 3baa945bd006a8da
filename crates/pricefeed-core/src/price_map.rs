//! Final per-symbol output.

use crate::error::{CoreError, Result};
use std::collections::HashMap;

/// Rendered for any symbol without a resolved price.
pub const UNRESOLVED_PRICE: &str = "-";

/// Requested symbol to formatted price string.
///
/// Built once per resolution and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceMap {
    prices: HashMap<String, String>,
}

impl PriceMap {
    pub fn new(prices: HashMap<String, String>) -> Self {
        Self { prices }
    }

    /// Build from one output per requested symbol, `None` for unresolved.
    ///
    /// Fails when `outputs` does not line up with `symbols`.
    pub fn from_aligned(symbols: &[String], outputs: Vec<Option<String>>) -> Result<Self> {
        ensure_aligned(symbols.len(), outputs.len())?;
        let prices = symbols
            .iter()
            .zip(outputs)
            .filter_map(|(symbol, price)| price.map(|p| (symbol.clone(), p)))
            .collect();
        Ok(Self { prices })
    }

    /// Formatted price, or [`UNRESOLVED_PRICE`].
    pub fn get(&self, symbol: &str) -> &str {
        self.prices
            .get(symbol)
            .map(String::as_str)
            .unwrap_or(UNRESOLVED_PRICE)
    }

    pub fn is_resolved(&self, symbol: &str) -> bool {
        self.prices.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Prices for `symbols`, positionally aligned.
    pub fn ordered(&self, symbols: &[String]) -> Vec<String> {
        symbols.iter().map(|s| self.get(s).to_string()).collect()
    }

    /// Comma-joined output line for `symbols`.
    pub fn render_line(&self, symbols: &[String]) -> String {
        self.ordered(symbols).join(",")
    }
}

/// Guard against emitting misaligned output.
pub fn ensure_aligned(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(CoreError::OutputLengthMismatch { expected, actual });
    }
    Ok(())
}
