//! Peg-rate consensus.
//!
//! Fans one request out to every configured source under a single deadline,
//! then reduces whatever came back to a median. Individual source failures
//! are absorbed here; only "nobody answered" and "the answer is negative"
//! escape.

pub mod error;
pub mod fanout;
pub mod oracle;
pub mod reducer;

pub use error::{ConsensusError, ConsensusResult};
pub use fanout::aggregate;
pub use oracle::PegRateOracle;
pub use reducer::{median, reduce};
