//! CryptoCompare single price.
//!
//! `GET /data/price?fsym=USDT&tsyms=USD` → `{"USD":1.0}`

use super::JsonQuoteAdapter;

pub const NAME: &str = "cryptocompare";

pub fn adapter(base_url: &str) -> JsonQuoteAdapter {
    JsonQuoteAdapter::new(NAME, format!("{base_url}/data/price"), "/USD")
        .with_query(&[("fsym", "USDT"), ("tsyms", "USD")])
}
