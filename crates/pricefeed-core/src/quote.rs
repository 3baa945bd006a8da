//! Quotes, per-source outcomes, and the reduced consensus value.

use crate::Price;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one external price source (e.g. "coingecko").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(String);

impl SourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// One price reading from one source.
///
/// Immutable once created; fields are only reachable through getters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    source: SourceId,
    price: Price,
    received_at: DateTime<Utc>,
}

impl Quote {
    /// Create a quote stamped with the current time.
    pub fn new(source: SourceId, price: Price) -> Self {
        Self {
            source,
            price,
            received_at: Utc::now(),
        }
    }

    pub fn source(&self) -> &SourceId {
        &self.source
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }
}

/// Outcome of one source in one fan-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteResult {
    /// The source answered with a price.
    Quote(Quote),
    /// The source answered with an error, or its task died.
    Failure { source: SourceId, reason: String },
    /// The source had not answered when the deadline elapsed.
    Timeout { source: SourceId },
}

impl QuoteResult {
    pub fn source(&self) -> &SourceId {
        match self {
            Self::Quote(q) => q.source(),
            Self::Failure { source, .. } | Self::Timeout { source } => source,
        }
    }

    pub fn as_quote(&self) -> Option<&Quote> {
        match self {
            Self::Quote(q) => Some(q),
            _ => None,
        }
    }

    pub fn is_quote(&self) -> bool {
        matches!(self, Self::Quote(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Short label used for logs and metric labels.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Quote(_) => "ok",
            Self::Failure { .. } => "failure",
            Self::Timeout { .. } => "timeout",
        }
    }
}

/// Median of the surviving quotes.
///
/// Only constructible with at least one contributing source and a
/// non-negative price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsensusPrice {
    price: Price,
    sources: usize,
}

impl ConsensusPrice {
    /// Returns `None` when `sources == 0` or `price` is negative.
    pub fn new(price: Price, sources: usize) -> Option<Self> {
        if sources == 0 || price.is_negative() {
            return None;
        }
        Some(Self { price, sources })
    }

    pub fn price(&self) -> Price {
        self.price
    }

    /// Number of quotes that fed the median.
    pub fn sources(&self) -> usize {
        self.sources
    }
}
