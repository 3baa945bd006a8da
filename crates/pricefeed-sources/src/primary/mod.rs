//! Primary sources: the exchange whose prices are reported.
//!
//! A primary source answers for many pairs in one round trip. Its failure
//! is not absorbed by any consensus step and fails the whole resolution.

pub mod binance;
pub mod bittrex;
pub mod coinbase;
pub mod kraken;
pub mod okx;

use crate::adapter::FetchContext;
use crate::endpoints::Endpoints;
use crate::error::SourceResult;
use async_trait::async_trait;
use pricefeed_core::{Price, PriceFormat, QuoteUnit, SymbolTable};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// All primary sources, selectable by name.
pub const PRIMARY_SOURCES: [&str; 5] = [
    binance::NAME,
    okx::NAME,
    kraken::NAME,
    bittrex::NAME,
    coinbase::NAME,
];

/// Exchange providing native prices for many pairs at once.
#[async_trait]
pub trait PrimarySource: Send + Sync {
    fn name(&self) -> &str;

    /// Unit the native prices are quoted in.
    fn quote_unit(&self) -> QuoteUnit;

    /// Output convention used when the run does not override it.
    fn price_format(&self) -> PriceFormat;

    fn symbol_table(&self) -> &SymbolTable;

    /// Native prices keyed by pair identifier.
    ///
    /// Pairs the exchange does not list are absent from the map rather than
    /// an error.
    async fn fetch_prices(
        &self,
        ctx: &FetchContext,
        pairs: &[String],
    ) -> SourceResult<HashMap<String, Price>>;
}

/// Build a primary source by name.
///
/// `symbol_overrides` are merged over the built-in symbol table.
/// `ws_deadline_ms` bounds streaming sources only.
pub fn primary_source(
    name: &str,
    endpoints: &Endpoints,
    symbol_overrides: &BTreeMap<String, String>,
    ws_deadline_ms: u64,
) -> Option<Arc<dyn PrimarySource>> {
    let source: Arc<dyn PrimarySource> = match name {
        binance::NAME => {
            let mut table = binance::symbol_table();
            table.merge(symbol_overrides);
            Arc::new(binance::BinanceSource::new(&endpoints.binance, table))
        }
        okx::NAME => {
            let mut table = okx::symbol_table();
            table.merge(symbol_overrides);
            Arc::new(okx::OkxSource::new(&endpoints.okx, table))
        }
        kraken::NAME => {
            let mut table = kraken::symbol_table();
            table.merge(symbol_overrides);
            Arc::new(kraken::KrakenSource::new(&endpoints.kraken, table))
        }
        bittrex::NAME => {
            let mut table = bittrex::symbol_table();
            table.merge(symbol_overrides);
            Arc::new(bittrex::BittrexSource::new(&endpoints.bittrex, table))
        }
        coinbase::NAME => {
            let mut table = coinbase::symbol_table();
            table.merge(symbol_overrides);
            Arc::new(coinbase::CoinbaseSource::new(
                &endpoints.coinbase_ws,
                ws_deadline_ms,
                table,
            ))
        }
        _ => return None,
    };
    Some(source)
}

/// Keep only the requested pairs from a full ticker dump.
pub(crate) fn retain_requested(
    mut prices: HashMap<String, Price>,
    pairs: &[String],
) -> HashMap<String, Price> {
    prices.retain(|pair, _| pairs.contains(pair));
    prices
}
