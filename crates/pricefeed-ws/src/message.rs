//! Ticker feed message types.
//!
//! Request: `{"type": "subscribe", "product_ids": [...], "channels": ["ticker"]}`
//! Data:    `{"type": "ticker", "product_id": "ETH-USD", "price": "1800.12", ...}`

use serde::{Deserialize, Serialize};

/// Channel carrying last-trade prices.
pub const TICKER_CHANNEL: &str = "ticker";

/// Subscription request sent right after connecting.
#[derive(Debug, Clone, Serialize)]
pub struct SubscribeRequest {
    #[serde(rename = "type")]
    pub request_type: &'static str,
    pub product_ids: Vec<String>,
    pub channels: Vec<&'static str>,
}

impl SubscribeRequest {
    pub fn ticker(product_ids: Vec<String>) -> Self {
        Self {
            request_type: "subscribe",
            product_ids,
            channels: vec![TICKER_CHANNEL],
        }
    }
}

/// Ticker update for one product.
#[derive(Debug, Clone, Deserialize)]
pub struct TickerMessage {
    pub product_id: String,
    /// Last trade price, sent as a decimal string.
    pub price: String,
}

/// Messages received from the feed.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedMessage {
    /// Subscription acknowledgement.
    Subscriptions {
        #[serde(default)]
        channels: serde_json::Value,
    },
    Ticker(TickerMessage),
    /// Server-side rejection (bad product id, malformed request).
    Error {
        #[serde(default)]
        message: String,
        #[serde(default)]
        reason: Option<String>,
    },
    /// Heartbeats and anything else.
    #[serde(other)]
    Other,
}
