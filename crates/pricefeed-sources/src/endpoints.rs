//! Base URLs for every source. All overridable from configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub binance: String,
    pub okx: String,
    pub kraken: String,
    pub bittrex: String,
    /// Coinbase Exchange REST API (peg-rate stats).
    pub coinbase: String,
    /// Coinbase Exchange WebSocket feed (primary ticker source).
    pub coinbase_ws: String,
    pub coingecko: String,
    pub cryptocompare: String,
    pub bitfinex: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            binance: "https://data-api.binance.vision".to_string(),
            okx: "https://www.okx.com".to_string(),
            kraken: "https://api.kraken.com".to_string(),
            bittrex: "https://api.bittrex.com".to_string(),
            coinbase: "https://api.exchange.coinbase.com".to_string(),
            coinbase_ws: "wss://ws-feed.exchange.coinbase.com".to_string(),
            coingecko: "https://api.coingecko.com".to_string(),
            cryptocompare: "https://min-api.cryptocompare.com".to_string(),
            bitfinex: "https://api-pub.bitfinex.com".to_string(),
        }
    }
}

impl Endpoints {
    /// Point every REST endpoint at one base URL. Used by tests.
    pub fn all_rest(base: &str) -> Self {
        Self {
            binance: base.to_string(),
            okx: base.to_string(),
            kraken: base.to_string(),
            bittrex: base.to_string(),
            coinbase: base.to_string(),
            coingecko: base.to_string(),
            cryptocompare: base.to_string(),
            bitfinex: base.to_string(),
            ..Self::default()
        }
    }
}
