//! Price source adapters.
//!
//! Two kinds of sources live here:
//! - `SourceAdapter`: one request, one price. Used for peg-rate consensus
//!   (CoinGecko, CryptoCompare, Kraken, Bitfinex, Coinbase).
//! - `PrimarySource`: one request, many pairs. The exchange whose prices are
//!   reported (Binance, OKX, Kraken, Bittrex, Coinbase ticker feed).
//!
//! Adapters never retry; a failed source simply contributes nothing.

pub mod adapter;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod peg;
pub mod primary;

pub use adapter::{FetchContext, SourceAdapter};
pub use endpoints::Endpoints;
pub use error::{SourceError, SourceResult};
pub use peg::{peg_adapter, JsonQuoteAdapter, PEG_SOURCES};
pub use primary::{primary_source, PrimarySource, PRIMARY_SOURCES};
