//! Coinbase Exchange 24h stats.
//!
//! `GET /products/USDT-USD/stats` → `{"open":"1.0001","last":"1.0002",...}`

use super::JsonQuoteAdapter;

pub const NAME: &str = "coinbase";

pub fn adapter(base_url: &str) -> JsonQuoteAdapter {
    JsonQuoteAdapter::new(NAME, format!("{base_url}/products/USDT-USD/stats"), "/last")
}
