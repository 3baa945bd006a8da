//! Core domain types for the pricefeed oracle aggregator.
//!
//! This crate provides the values handed between pipeline stages:
//! - `Price`: precision-safe decimal price with canonical formatting
//! - `Quote`, `QuoteResult`: one source's reading and its outcome
//! - `ConsensusPrice`: the reduced value with its contributor count
//! - `SymbolTable`: requested symbol to source pair mapping
//! - `PriceMap`: final per-symbol output with the "-" sentinel

pub mod decimal;
pub mod error;
pub mod price_map;
pub mod quote;
pub mod symbol;

pub use decimal::{Price, PriceFormat};
pub use error::{CoreError, Result};
pub use price_map::{ensure_aligned, PriceMap, UNRESOLVED_PRICE};
pub use quote::{ConsensusPrice, Quote, QuoteResult, SourceId};
pub use symbol::{QuoteUnit, SymbolTable};
