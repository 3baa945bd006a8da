//! Peg-rate sources: USDT priced in USD.
//!
//! Every source here is a single REST GET whose JSON body carries one price
//! at a known location, so they share one adapter type configured per
//! source.

pub mod bitfinex;
pub mod coinbase;
pub mod coingecko;
pub mod cryptocompare;
pub mod kraken;

use crate::adapter::{FetchContext, SourceAdapter};
use crate::endpoints::Endpoints;
use crate::error::SourceResult;
use crate::http::{get_json, price_at};
use async_trait::async_trait;
use pricefeed_core::{Price, Quote, SourceId};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Asset every peg source prices.
pub const PEG_ASSET: &str = "USDT";

/// All peg sources, in default registration order.
pub const PEG_SOURCES: [&str; 5] = [
    coingecko::NAME,
    cryptocompare::NAME,
    kraken::NAME,
    bitfinex::NAME,
    coinbase::NAME,
];

/// Body-level error check run before the price is extracted.
pub type BodyCheck = fn(&Value) -> SourceResult<()>;

/// REST source returning one price at a fixed JSON pointer.
#[derive(Debug, Clone)]
pub struct JsonQuoteAdapter {
    id: SourceId,
    url: String,
    query: Vec<(&'static str, &'static str)>,
    pointer: &'static str,
    check: Option<BodyCheck>,
}

impl JsonQuoteAdapter {
    pub fn new(id: &str, url: String, pointer: &'static str) -> Self {
        Self {
            id: SourceId::new(id),
            url,
            query: Vec::new(),
            pointer,
            check: None,
        }
    }

    pub fn with_query(mut self, query: &[(&'static str, &'static str)]) -> Self {
        self.query = query.to_vec();
        self
    }

    pub fn with_check(mut self, check: BodyCheck) -> Self {
        self.check = Some(check);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Extract the price from a decoded body.
    pub fn parse(&self, body: &Value) -> SourceResult<Price> {
        if let Some(check) = self.check {
            check(body)?;
        }
        price_at(body, self.pointer)
    }
}

#[async_trait]
impl SourceAdapter for JsonQuoteAdapter {
    fn id(&self) -> &SourceId {
        &self.id
    }

    async fn fetch(&self, ctx: &FetchContext) -> SourceResult<Quote> {
        let body = get_json(ctx, &self.url, &self.query).await?;
        let price = self.parse(&body)?;
        debug!(source = %self.id, %price, "Peg quote received");
        Ok(Quote::new(self.id.clone(), price))
    }
}

/// Build a registered peg source by name.
pub fn peg_adapter(name: &str, endpoints: &Endpoints) -> Option<Arc<dyn SourceAdapter>> {
    let adapter = match name {
        coingecko::NAME => coingecko::adapter(&endpoints.coingecko),
        cryptocompare::NAME => cryptocompare::adapter(&endpoints.cryptocompare),
        kraken::NAME => kraken::adapter(&endpoints.kraken),
        bitfinex::NAME => bitfinex::adapter(&endpoints.bitfinex),
        coinbase::NAME => coinbase::adapter(&endpoints.coinbase),
        _ => return None,
    };
    Some(Arc::new(adapter))
}
