//! CoinGecko simple price.
//!
//! `GET /api/v3/simple/price?ids=tether&vs_currencies=usd` → `{"tether":{"usd":1.001}}`

use super::JsonQuoteAdapter;

pub const NAME: &str = "coingecko";

pub fn adapter(base_url: &str) -> JsonQuoteAdapter {
    JsonQuoteAdapter::new(NAME, format!("{base_url}/api/v3/simple/price"), "/tether/usd")
        .with_query(&[("ids", "tether"), ("vs_currencies", "usd")])
}
