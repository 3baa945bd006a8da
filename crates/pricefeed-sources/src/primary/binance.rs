//! Binance spot, quoted in USDT.
//!
//! Two calls: `exchangeInfo` to learn which requested pairs are spot
//! tradable against USDT, then `ticker/price` for exactly those pairs.

use super::PrimarySource;
use crate::adapter::FetchContext;
use crate::error::{SourceError, SourceResult};
use crate::http::{array_at, get_json, price_at, str_at};
use async_trait::async_trait;
use pricefeed_core::{Price, PriceFormat, QuoteUnit, SymbolTable};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

pub const NAME: &str = "binance";

const QUOTE_ASSET: &str = "USDT";

/// Any base asset maps to `<SYMBOL>USDT`.
pub fn symbol_table() -> SymbolTable {
    SymbolTable::with_template("{symbol}USDT")
}

pub struct BinanceSource {
    base_url: String,
    table: SymbolTable,
}

impl BinanceSource {
    pub fn new(base_url: &str, table: SymbolTable) -> Self {
        Self {
            base_url: base_url.to_string(),
            table,
        }
    }

    /// Requested pairs that are spot tradable against USDT.
    fn tradable_pairs(info: &Value, pairs: &[String]) -> SourceResult<Vec<String>> {
        let mut tradable = Vec::new();
        for entry in array_at(info, "/symbols")? {
            let symbol = str_at(entry, "/symbol")?;
            if !pairs.iter().any(|p| p == symbol) {
                continue;
            }
            let spot = entry
                .get("isSpotTradingAllowed")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            if spot && str_at(entry, "/quoteAsset")? == QUOTE_ASSET {
                tradable.push(symbol.to_string());
            }
        }
        Ok(tradable)
    }

    fn parse_tickers(body: &Value) -> SourceResult<HashMap<String, Price>> {
        let tickers = body
            .as_array()
            .ok_or_else(|| SourceError::Schema("ticker response is not an array".to_string()))?;
        tickers
            .iter()
            .map(|t| -> SourceResult<(String, Price)> {
                Ok((str_at(t, "/symbol")?.to_string(), price_at(t, "/price")?))
            })
            .collect()
    }
}

#[async_trait]
impl PrimarySource for BinanceSource {
    fn name(&self) -> &str {
        NAME
    }

    fn quote_unit(&self) -> QuoteUnit {
        QuoteUnit::Pegged(QUOTE_ASSET.to_string())
    }

    fn price_format(&self) -> PriceFormat {
        PriceFormat::default()
    }

    fn symbol_table(&self) -> &SymbolTable {
        &self.table
    }

    async fn fetch_prices(
        &self,
        ctx: &FetchContext,
        pairs: &[String],
    ) -> SourceResult<HashMap<String, Price>> {
        if pairs.is_empty() {
            return Ok(HashMap::new());
        }

        let info = get_json(ctx, &format!("{}/api/v3/exchangeInfo", self.base_url), &[]).await?;
        let tradable = Self::tradable_pairs(&info, pairs)?;
        debug!(requested = pairs.len(), tradable = tradable.len(), "Binance pairs filtered");
        if tradable.is_empty() {
            return Ok(HashMap::new());
        }

        let symbols = serde_json::to_string(&tradable)
            .map_err(|e| SourceError::Parse(format!("Failed to encode symbols: {e}")))?;
        let body = get_json(
            ctx,
            &format!("{}/api/v3/ticker/price", self.base_url),
            &[("symbols", symbols.as_str())],
        )
        .await?;
        Self::parse_tickers(&body)
    }
}
