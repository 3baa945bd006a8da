//! Bittrex market tickers, quoted in USD.
//!
//! `GET /v3/markets/tickers` → `[{"symbol":"ETH-USD","lastTradeRate":"1800.1",...}]`

use super::{retain_requested, PrimarySource};
use crate::adapter::FetchContext;
use crate::error::{SourceError, SourceResult};
use crate::http::{get_json, price_at, str_at};
use async_trait::async_trait;
use pricefeed_core::{Price, PriceFormat, QuoteUnit, SymbolTable};
use serde_json::Value;
use std::collections::HashMap;

pub const NAME: &str = "bittrex";

pub fn symbol_table() -> SymbolTable {
    SymbolTable::from_pairs([("ETH", "ETH-USD"), ("USDT", "USDT-USD")])
}

pub struct BittrexSource {
    base_url: String,
    table: SymbolTable,
}

impl BittrexSource {
    pub fn new(base_url: &str, table: SymbolTable) -> Self {
        Self {
            base_url: base_url.to_string(),
            table,
        }
    }

    fn parse(body: &Value) -> SourceResult<HashMap<String, Price>> {
        body.as_array()
            .ok_or_else(|| SourceError::Schema("ticker response is not an array".to_string()))?
            .iter()
            .map(|t| -> SourceResult<(String, Price)> {
                Ok((
                    str_at(t, "/symbol")?.to_string(),
                    price_at(t, "/lastTradeRate")?,
                ))
            })
            .collect()
    }
}

#[async_trait]
impl PrimarySource for BittrexSource {
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
        ctx: &FetchContext,
        pairs: &[String],
    ) -> SourceResult<HashMap<String, Price>> {
        let body = get_json(ctx, &format!("{}/v3/markets/tickers", self.base_url), &[]).await?;
        Ok(retain_requested(Self::parse(&body)?, pairs))
    }
}
