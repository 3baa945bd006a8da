//! Coinbase Exchange ticker feed, quoted in USD.
//!
//! Prices come from the WebSocket `ticker` channel rather than REST: one
//! subscription, one price per product, then disconnect.

use super::PrimarySource;
use crate::adapter::FetchContext;
use crate::error::SourceResult;
use async_trait::async_trait;
use pricefeed_core::{Price, PriceFormat, QuoteUnit, SymbolTable};
use pricefeed_ws::{CollectorConfig, TickerCollector};
use std::collections::HashMap;

pub const NAME: &str = "coinbase";

pub fn symbol_table() -> SymbolTable {
    SymbolTable::from_pairs([
        ("ATOM", "ATOM-USD"),
        ("AVAX", "AVAX-USD"),
        ("DAI", "DAI-USD"),
        ("DOT", "DOT-USD"),
        ("ETH", "ETH-USD"),
        ("SOL", "SOL-USD"),
        ("USDT", "USDT-USD"),
    ])
}

pub struct CoinbaseSource {
    collector: TickerCollector,
    table: SymbolTable,
}

impl CoinbaseSource {
    pub fn new(ws_url: &str, deadline_ms: u64, table: SymbolTable) -> Self {
        let config = CollectorConfig {
            url: ws_url.to_string(),
            deadline_ms,
        };
        Self {
            collector: TickerCollector::new(config),
            table,
        }
    }
}

#[async_trait]
impl PrimarySource for CoinbaseSource {
    fn name(&self) -> &str {
        NAME
    }

    fn quote_unit(&self) -> QuoteUnit {
        QuoteUnit::Usd
    }

    fn price_format(&self) -> PriceFormat {
        PriceFormat::Exact
    }

    fn symbol_table(&self) -> &SymbolTable {
        &self.table
    }

    async fn fetch_prices(
        &self,
        _ctx: &FetchContext,
        pairs: &[String],
    ) -> SourceResult<HashMap<String, Price>> {
        Ok(self.collector.collect(pairs).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_symbol_table() {
        let table = symbol_table();
        assert_eq!(table.pair_for("ATOM").as_deref(), Some("ATOM-USD"));
        assert!(table.pair_for("USDC").is_none());
    }

    #[tokio::test]
    async fn test_unreachable_feed_is_network_error() {
        let source = CoinbaseSource::new("ws://127.0.0.1:1", 500, symbol_table());
        let ctx = FetchContext::new(Duration::from_secs(1)).unwrap();
        let err = source
            .fetch_prices(&ctx, &["ETH-USD".to_string()])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "network");
    }
}
