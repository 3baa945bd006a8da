//! Bitfinex USDt/USD ticker.
//!
//! `GET /v2/ticker/tUSTUSD` → `[BID, BID_SIZE, ASK, ASK_SIZE, DAILY_CHANGE,
//! DAILY_CHANGE_RELATIVE, LAST_PRICE, VOLUME, HIGH, LOW]`

use super::JsonQuoteAdapter;

pub const NAME: &str = "bitfinex";

/// Field read from the ticker array. Index 9 (LOW) matches the rate the
/// deployed feed has always reported.
const PRICE_FIELD: &str = "/9";

pub fn adapter(base_url: &str) -> JsonQuoteAdapter {
    JsonQuoteAdapter::new(NAME, format!("{base_url}/v2/ticker/tUSTUSD"), PRICE_FIELD)
}
