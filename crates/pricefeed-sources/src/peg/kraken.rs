//! Kraken USDT/USD ticker.
//!
//! `GET /0/public/Ticker?pair=USDTZUSD` → `{"error":[],"result":{"USDTZUSD":{"c":["1.0002","5"]}}}`
//! `c[0]` is the last trade price.

use super::JsonQuoteAdapter;
use crate::primary::kraken::check_errors;

pub const NAME: &str = "kraken";

pub fn adapter(base_url: &str) -> JsonQuoteAdapter {
    JsonQuoteAdapter::new(
        NAME,
        format!("{base_url}/0/public/Ticker"),
        "/result/USDTZUSD/c/0",
    )
    .with_query(&[("pair", "USDTZUSD")])
    .with_check(check_errors)
}
