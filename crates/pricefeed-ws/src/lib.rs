//! WebSocket client for streaming price sources.
//!
//! Provides a one-shot ticker subscription:
//! - Subscribe to the `ticker` channel for a set of products
//! - Accumulate one price per product in state private to the call
//! - Hand the prices off once every product is covered, or fail on deadline

pub mod collector;
pub mod error;
pub mod message;

pub use collector::{CollectorConfig, TickerCollector};
pub use error::{WsError, WsResult};
pub use message::{FeedMessage, SubscribeRequest, TickerMessage};

use std::sync::Once;

static INIT_CRYPTO: Once = Once::new();

/// Initialize the TLS crypto provider.
/// Must be called before any WebSocket connections are made.
pub fn init_crypto() {
    INIT_CRYPTO.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}
