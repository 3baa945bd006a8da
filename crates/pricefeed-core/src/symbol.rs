//! Requested symbol to source pair mapping.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placeholder substituted by [`SymbolTable::with_template`].
const SYMBOL_PLACEHOLDER: &str = "{symbol}";

/// Unit a primary source quotes its prices in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteUnit {
    /// Already in the target fiat unit; no conversion.
    Usd,
    /// A stable asset pegged to the target unit (e.g. "USDT").
    /// Prices must be multiplied by the consensus peg rate.
    Pegged(String),
}

impl QuoteUnit {
    pub fn pegged_asset(&self) -> Option<&str> {
        match self {
            Self::Usd => None,
            Self::Pegged(asset) => Some(asset),
        }
    }
}

/// Maps requested asset symbols to source-specific pair identifiers.
///
/// Lookups are case-sensitive. Explicit entries win over the template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolTable {
    #[serde(default)]
    entries: BTreeMap<String, String>,
    /// Pair pattern for symbols without an explicit entry, e.g. `{symbol}USDT`.
    #[serde(default)]
    template: Option<String>,
}

impl SymbolTable {
    /// Build a fixed table from `(symbol, pair)` entries.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            template: None,
        }
    }

    /// Build an open table where every symbol maps through `template`.
    pub fn with_template(template: impl Into<String>) -> Self {
        Self {
            entries: BTreeMap::new(),
            template: Some(template.into()),
        }
    }

    /// Apply configured overrides on top of the built-in entries.
    pub fn merge(&mut self, overrides: &BTreeMap<String, String>) {
        for (symbol, pair) in overrides {
            self.entries.insert(symbol.clone(), pair.clone());
        }
    }

    pub fn pair_for(&self, symbol: &str) -> Option<String> {
        if let Some(pair) = self.entries.get(symbol) {
            return Some(pair.clone());
        }
        self.template
            .as_ref()
            .map(|t| t.replace(SYMBOL_PLACEHOLDER, symbol))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.template.is_none()
    }

    /// Resolve every requested symbol, preserving input order.
    ///
    /// Fails before any lookup result is used if at least one symbol has no
    /// mapping; the error lists every unsupported symbol once.
    pub fn resolve(&self, symbols: &[String]) -> Result<Vec<String>> {
        let mut unsupported: Vec<&str> = Vec::new();
        let mut pairs = Vec::with_capacity(symbols.len());

        for symbol in symbols {
            match self.pair_for(symbol) {
                Some(pair) => pairs.push(pair),
                None => {
                    if !unsupported.contains(&symbol.as_str()) {
                        unsupported.push(symbol);
                    }
                }
            }
        }

        if !unsupported.is_empty() {
            return Err(CoreError::UnsupportedSymbol(unsupported.join(",")));
        }
        Ok(pairs)
    }
}
