//! OKX spot tickers, quoted in USDT.
//!
//! `GET /api/v5/market/tickers?instType=SPOT` → `{"code":"0","data":[{"instId":"ETH-USDT","last":"1800"}]}`

use super::{retain_requested, PrimarySource};
use crate::adapter::FetchContext;
use crate::error::{SourceError, SourceResult};
use crate::http::{array_at, get_json, price_at, str_at};
use async_trait::async_trait;
use pricefeed_core::{Price, PriceFormat, QuoteUnit, SymbolTable};
use serde_json::Value;
use std::collections::HashMap;

pub const NAME: &str = "okx";

pub fn symbol_table() -> SymbolTable {
    SymbolTable::from_pairs([
        ("ASTR", "ASTR-USDT"),
        ("AVAX", "AVAX-USDT"),
        ("DOT", "DOT-USDT"),
        ("ETH", "ETH-USDT"),
        ("FTM", "FTM-USDT"),
        ("SOL", "SOL-USDT"),
        ("USDC", "USDC-USDT"),
    ])
}

pub struct OkxSource {
    base_url: String,
    table: SymbolTable,
}

impl OkxSource {
    pub fn new(base_url: &str, table: SymbolTable) -> Self {
        Self {
            base_url: base_url.to_string(),
            table,
        }
    }

    fn parse(body: &Value) -> SourceResult<HashMap<String, Price>> {
        match body.get("code").and_then(Value::as_str) {
            Some("0") | None => {}
            Some(code) => {
                let msg = body.get("msg").and_then(Value::as_str).unwrap_or_default();
                return Err(SourceError::Schema(format!("OKX error {code}: {msg}")));
            }
        }
        array_at(body, "/data")?
            .iter()
            .map(|t| -> SourceResult<(String, Price)> {
                Ok((str_at(t, "/instId")?.to_string(), price_at(t, "/last")?))
            })
            .collect()
    }
}

#[async_trait]
impl PrimarySource for OkxSource {
    fn name(&self) -> &str {
        NAME
    }

    fn quote_unit(&self) -> QuoteUnit {
        QuoteUnit::Pegged("USDT".to_string())
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
        let body = get_json(
            ctx,
            &format!("{}/api/v5/market/tickers", self.base_url),
            &[("instType", "SPOT")],
        )
        .await?;
        Ok(retain_requested(Self::parse(&body)?, pairs))
    }
}
