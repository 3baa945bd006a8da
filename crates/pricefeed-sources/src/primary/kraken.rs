//! Kraken public ticker, quoted in USD.
//!
//! `GET /0/public/Ticker` with no pair filter returns every pair:
//! `{"error":[],"result":{"XETHZUSD":{"c":["1800.1","0.5"],...}}}`

use super::{retain_requested, PrimarySource};
use crate::adapter::FetchContext;
use crate::error::{SourceError, SourceResult};
use crate::http::{field, get_json, price_at};
use async_trait::async_trait;
use pricefeed_core::{Price, PriceFormat, QuoteUnit, SymbolTable};
use serde_json::Value;
use std::collections::HashMap;

pub const NAME: &str = "kraken";

pub fn symbol_table() -> SymbolTable {
    SymbolTable::from_pairs([
        ("AVAX", "AVAXUSD"),
        ("DAI", "DAIUSD"),
        ("DOT", "DOTUSD"),
        ("ETH", "XETHZUSD"),
        ("SOL", "SOLUSD"),
        ("USDC", "USDCUSD"),
        ("USDT", "USDTZUSD"),
    ])
}

/// Kraken reports API errors in a top-level `error` array, with status 200.
pub fn check_errors(body: &Value) -> SourceResult<()> {
    let errors: Vec<&str> = body
        .get("error")
        .and_then(Value::as_array)
        .map(|errs| errs.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(SourceError::Schema(errors.join("; ")))
    }
}

pub struct KrakenSource {
    base_url: String,
    table: SymbolTable,
}

impl KrakenSource {
    pub fn new(base_url: &str, table: SymbolTable) -> Self {
        Self {
            base_url: base_url.to_string(),
            table,
        }
    }

    fn parse(body: &Value) -> SourceResult<HashMap<String, Price>> {
        check_errors(body)?;
        let result = field(body, "/result")?
            .as_object()
            .ok_or_else(|| SourceError::Schema("field /result is not an object".to_string()))?;
        result
            .iter()
            .map(|(pair, ticker)| -> SourceResult<(String, Price)> {
                Ok((pair.clone(), price_at(ticker, "/c/0")?))
            })
            .collect()
    }
}

#[async_trait]
impl PrimarySource for KrakenSource {
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
        let body = get_json(ctx, &format!("{}/0/public/Ticker", self.base_url), &[]).await?;
        Ok(retain_requested(Self::parse(&body)?, pairs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_parse_all_pairs() {
        let body = json!({"error": [], "result": {
            "XETHZUSD": {"a": ["1800.2", "1", "1.000"], "c": ["1800.10000", "0.5"]},
            "USDTZUSD": {"c": ["1.00010000", "100"]}
        }});
        let prices = KrakenSource::parse(&body).unwrap();
        assert_eq!(prices["XETHZUSD"].inner(), dec!(1800.1));
        assert_eq!(prices["USDTZUSD"].inner(), dec!(1.0001));
    }

    #[test]
    fn test_error_array_wins_over_result() {
        let body = json!({"error": ["EService:Unavailable"], "result": {}});
        let err = KrakenSource::parse(&body).unwrap_err();
        assert_eq!(err.kind(), "schema");
        assert_eq!(err.to_string(), "Schema error: EService:Unavailable");
    }

    #[test]
    fn test_check_errors_tolerates_missing_array() {
        assert!(check_errors(&json!({"result": {}})).is_ok());
    }

    #[test]
    fn test_usd_quoted() {
        let source = KrakenSource::new("", symbol_table());
        assert_eq!(source.quote_unit(), QuoteUnit::Usd);
        assert_eq!(source.symbol_table().pair_for("ETH").as_deref(), Some("XETHZUSD"));
    }
}
