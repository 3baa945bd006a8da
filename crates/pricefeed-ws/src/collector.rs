//! One-shot ticker collection.
//!
//! Connects, subscribes to the ticker channel, and reads until every
//! requested product has a price. The partially filled book lives only
//! inside one `collect` call and is handed off by value at the end.

use crate::error::{WsError, WsResult};
use crate::message::{FeedMessage, SubscribeRequest};
use futures_util::{SinkExt, StreamExt};
use pricefeed_core::Price;
use std::collections::HashMap;
use std::time::Duration;
use tokio_tungstenite::{connect_async_tls_with_config, tungstenite::Message};
use tracing::{debug, info, warn};

/// Collector configuration.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// WebSocket URL.
    pub url: String,
    /// Upper bound for connect + subscribe + all tickers.
    pub deadline_ms: u64,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            url: "wss://ws-feed.exchange.coinbase.com".to_string(),
            deadline_ms: 5000,
        }
    }
}

/// Per-call accumulation of ticker prices.
#[derive(Debug)]
struct TickerBook {
    prices: HashMap<String, Option<Price>>,
}

impl TickerBook {
    fn new(products: &[String]) -> Self {
        Self {
            prices: products.iter().map(|p| (p.clone(), None)).collect(),
        }
    }

    fn products(&self) -> Vec<String> {
        let mut products: Vec<String> = self.prices.keys().cloned().collect();
        products.sort();
        products
    }

    fn wants(&self, product: &str) -> bool {
        self.prices.contains_key(product)
    }

    /// Record a price. Later tickers overwrite earlier ones until complete.
    /// Products that were never requested are ignored.
    fn record(&mut self, product: &str, price: Price) -> bool {
        match self.prices.get_mut(product) {
            Some(slot) => {
                *slot = Some(price);
                true
            }
            None => false,
        }
    }

    fn is_complete(&self) -> bool {
        self.prices.values().all(Option::is_some)
    }

    fn pending(&self) -> Vec<String> {
        let mut pending: Vec<String> = self
            .prices
            .iter()
            .filter(|(_, p)| p.is_none())
            .map(|(k, _)| k.clone())
            .collect();
        pending.sort();
        pending
    }

    fn into_prices(self) -> HashMap<String, Price> {
        self.prices
            .into_iter()
            .filter_map(|(k, p)| p.map(|p| (k, p)))
            .collect()
    }
}

/// Streams tickers until every requested product has a price.
pub struct TickerCollector {
    config: CollectorConfig,
}

impl TickerCollector {
    pub fn new(config: CollectorConfig) -> Self {
        Self { config }
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Collect one price per product.
    ///
    /// Duplicate product ids are collapsed. Running out of time is an error
    /// even if some products already have prices.
    pub async fn collect(&self, products: &[String]) -> WsResult<HashMap<String, Price>> {
        let mut book = TickerBook::new(products);
        if book.prices.is_empty() {
            return Ok(HashMap::new());
        }

        let deadline = Duration::from_millis(self.config.deadline_ms);
        let outcome = tokio::time::timeout(deadline, self.run(&mut book)).await;
        match outcome {
            Ok(Ok(())) => Ok(book.into_prices()),
            Ok(Err(e)) => Err(e),
            Err(_) => {
                let pending = book.pending().join(",");
                warn!(url = %self.config.url, %pending, "Ticker deadline elapsed");
                Err(WsError::DeadlineElapsed {
                    deadline_ms: self.config.deadline_ms,
                    pending,
                })
            }
        }
    }

    async fn run(&self, book: &mut TickerBook) -> WsResult<()> {
        info!(url = %self.config.url, "Connecting to ticker feed");

        let (ws_stream, _response) =
            connect_async_tls_with_config(&self.config.url, None, true, None).await?;
        let (mut write, mut read) = ws_stream.split();

        let request = SubscribeRequest::ticker(book.products());
        write
            .send(Message::Text(serde_json::to_string(&request)?))
            .await?;
        debug!(products = ?request.product_ids, "Ticker subscription sent");

        while let Some(msg) = read.next().await {
            match msg? {
                Message::Text(text) => {
                    self.handle_text_message(&text, book)?;
                    if book.is_complete() {
                        debug!("All tickers received");
                        if let Err(e) = write.send(Message::Close(None)).await {
                            debug!(?e, "Failed to send Close frame");
                        }
                        return Ok(());
                    }
                }
                Message::Ping(data) => {
                    write.send(Message::Pong(data)).await?;
                }
                Message::Close(frame) => {
                    let (code, reason) = frame
                        .map(|f| (f.code.into(), f.reason.to_string()))
                        .unwrap_or((1000, "Normal close".to_string()));
                    warn!(code, %reason, "Ticker feed closed by server");
                    return Err(WsError::ConnectionClosed { code, reason });
                }
                _ => {}
            }
        }

        Err(WsError::ConnectionClosed {
            code: 1006,
            reason: "Stream ended before all tickers arrived".to_string(),
        })
    }

    fn handle_text_message(&self, text: &str, book: &mut TickerBook) -> WsResult<()> {
        match serde_json::from_str::<FeedMessage>(text)? {
            FeedMessage::Ticker(ticker) => {
                // The feed may carry products from other subscriptions.
                if !book.wants(&ticker.product_id) {
                    return Ok(());
                }
                let price: Price = ticker.price.parse().map_err(|e| {
                    WsError::ParseError(format!(
                        "bad price '{}' for {}: {e}",
                        ticker.price, ticker.product_id
                    ))
                })?;
                if book.record(&ticker.product_id, price) {
                    debug!(product = %ticker.product_id, %price, "Ticker recorded");
                }
            }
            FeedMessage::Error { message, reason } => {
                let reason = reason.unwrap_or_default();
                return Err(WsError::Feed(format!("{message} {reason}").trim().to_string()));
            }
            FeedMessage::Subscriptions { .. } => {
                debug!("Ticker subscription acknowledged");
            }
            FeedMessage::Other => {}
        }
        Ok(())
    }
}
