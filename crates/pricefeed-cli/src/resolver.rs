//! Top-level price resolution.
//!
//! Symbols → pairs through the primary's table, then the primary fetch and
//! the peg-rate consensus run side by side. Native prices are converted,
//! formatted with one convention for the whole run, and keyed by requested
//! symbol.

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use pricefeed_consensus::PegRateOracle;
use pricefeed_core::{Price, PriceFormat, PriceMap};
use pricefeed_sources::{primary_source, FetchContext, PrimarySource};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

pub struct PriceResolver {
    primary: Arc<dyn PrimarySource>,
    oracle: PegRateOracle,
    format: PriceFormat,
    ctx: FetchContext,
}

impl PriceResolver {
    /// `format` overrides the primary source's own convention.
    pub fn new(
        primary: Arc<dyn PrimarySource>,
        oracle: PegRateOracle,
        format: Option<PriceFormat>,
        ctx: FetchContext,
    ) -> Self {
        let format = format.unwrap_or_else(|| primary.price_format());
        Self {
            primary,
            oracle,
            format,
            ctx,
        }
    }

    /// Wire up the primary source and the peg oracle from a validated config.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let primary = primary_source(
            &config.primary,
            &config.endpoints,
            &config.symbol_overrides(),
            config.http.timeout_ms,
        )
        .ok_or_else(|| AppError::Config(format!("unknown primary source '{}'", config.primary)))?;

        let oracle =
            PegRateOracle::from_names(&config.peg.sources, &config.endpoints, config.peg_deadline())?;

        let ctx = FetchContext::new(config.http_timeout())
            .map_err(|e| AppError::Client(e.to_string()))?;

        Ok(Self::new(primary, oracle, config.price_format()?, ctx))
    }

    /// Resolve every requested symbol.
    ///
    /// Unsupported symbols fail before any network call. Symbols whose pair
    /// the primary did not return are left unresolved.
    pub async fn resolve(&self, symbols: &[String]) -> AppResult<PriceMap> {
        let unit = self.primary.quote_unit();
        let pegged = unit.pegged_asset();

        // The pegged asset is worth one unit of itself on every source.
        let listed: Vec<String> = symbols
            .iter()
            .filter(|s| Some(s.as_str()) != pegged)
            .cloned()
            .collect();
        let pairs = self.primary.symbol_table().resolve(&listed)?;
        let pair_of: HashMap<&str, &str> = listed
            .iter()
            .map(String::as_str)
            .zip(pairs.iter().map(String::as_str))
            .collect();

        let mut unique_pairs: Vec<String> = Vec::new();
        for pair in &pairs {
            if !unique_pairs.contains(pair) {
                unique_pairs.push(pair.clone());
            }
        }

        let native = async {
            if unique_pairs.is_empty() {
                return Ok::<_, AppError>(HashMap::new());
            }
            self.primary
                .fetch_prices(&self.ctx, &unique_pairs)
                .await
                .map_err(|error| AppError::Primary {
                    name: self.primary.name().to_string(),
                    error,
                })
        };
        let rate = async {
            match pegged {
                Some(_) if !symbols.is_empty() => self.oracle.rate(&self.ctx).await.map(Some),
                _ => Ok(None),
            }
        };
        let (native, rate) = tokio::join!(native, rate);
        let native = native?;
        let rate = rate?;
        debug!(
            source = self.primary.name(),
            pairs = unique_pairs.len(),
            returned = native.len(),
            "Primary prices fetched"
        );

        let mut outputs = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let native_price = if Some(symbol.as_str()) == pegged {
                Some(Price::ONE)
            } else {
                pair_of
                    .get(symbol.as_str())
                    .and_then(|pair| native.get(*pair))
                    .copied()
            };
            let Some(native_price) = native_price else {
                debug!(%symbol, "No price from primary source");
                outputs.push(None);
                continue;
            };

            let value = match &rate {
                Some(consensus) => native_price
                    .checked_mul(consensus.price().inner())
                    .ok_or_else(|| AppError::InvalidResult {
                        symbol: symbol.clone(),
                        reason: format!(
                            "Overflow converting {native_price} at rate {}",
                            consensus.price()
                        ),
                    })?,
                None => native_price,
            };
            if value.is_negative() {
                return Err(AppError::InvalidResult {
                    symbol: symbol.clone(),
                    reason: "Negative number returned".to_string(),
                });
            }
            outputs.push(Some(value.format(self.format)));
        }

        let prices = PriceMap::from_aligned(symbols, outputs)?;
        info!(
            source = self.primary.name(),
            requested = symbols.len(),
            resolved = prices.len(),
            "Prices resolved"
        );
        Ok(prices)
    }
}
