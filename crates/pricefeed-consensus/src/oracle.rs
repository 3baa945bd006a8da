//! Peg-rate oracle: fan-out plus median over the configured peg sources.

use crate::error::{ConsensusError, ConsensusResult};
use crate::fanout::aggregate;
use crate::reducer::reduce;
use pricefeed_core::ConsensusPrice;
use pricefeed_sources::{peg_adapter, Endpoints, FetchContext, SourceAdapter};
use pricefeed_telemetry::Metrics;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Consensus rate of a pegged asset in USD.
pub struct PegRateOracle {
    adapters: Vec<Arc<dyn SourceAdapter>>,
    deadline: Duration,
}

impl PegRateOracle {
    pub fn new(adapters: Vec<Arc<dyn SourceAdapter>>, deadline: Duration) -> Self {
        Self { adapters, deadline }
    }

    /// Build from registered peg source names, in the given order.
    pub fn from_names<S: AsRef<str>>(
        names: &[S],
        endpoints: &Endpoints,
        deadline: Duration,
    ) -> ConsensusResult<Self> {
        let adapters = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                peg_adapter(name, endpoints)
                    .ok_or_else(|| ConsensusError::UnknownSource(name.to_string()))
            })
            .collect::<ConsensusResult<Vec<_>>>()?;
        Ok(Self::new(adapters, deadline))
    }

    /// One fan-out, one median.
    pub async fn rate(&self, ctx: &FetchContext) -> ConsensusResult<ConsensusPrice> {
        let results = aggregate(&self.adapters, ctx, self.deadline).await;
        let consensus = reduce(&results)?;

        Metrics::consensus_sources(consensus.sources());
        info!(
            rate = %consensus.price(),
            sources = consensus.sources(),
            configured = self.adapters.len(),
            "Peg rate agreed"
        );
        Ok(consensus)
    }
}
