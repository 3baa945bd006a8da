//! Median reduction of fan-out results.

use crate::error::{ConsensusError, ConsensusResult};
use pricefeed_core::{ConsensusPrice, Price, QuoteResult};
use rust_decimal::Decimal;

/// Median of `values`, `None` when empty. Even counts average the two
/// middle values exactly; a sum outside the `Decimal` range is an error.
pub fn median(values: &mut [Decimal]) -> ConsensusResult<Option<Decimal>> {
    if values.is_empty() {
        return Ok(None);
    }
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        return Ok(Some(values[mid]));
    }
    let (low, high) = (values[mid - 1], values[mid]);
    let sum = low.checked_add(high).ok_or_else(|| {
        ConsensusError::InvalidResult(format!("Median overflow averaging {low} and {high}"))
    })?;
    Ok(Some(sum / Decimal::TWO))
}

/// Reduce fan-out results to one consensus price.
///
/// Failures and timeouts are ignored. Fails when nothing is left or the
/// median is negative.
pub fn reduce(results: &[QuoteResult]) -> ConsensusResult<ConsensusPrice> {
    let mut prices: Vec<Decimal> = results
        .iter()
        .filter_map(QuoteResult::as_quote)
        .map(|q| q.price().inner())
        .collect();
    let contributors = prices.len();

    let Some(value) = median(&mut prices)? else {
        return Err(ConsensusError::NoQuorum {
            configured: results.len(),
            failed: results.iter().filter(|r| r.is_failure()).count(),
            timed_out: results.iter().filter(|r| r.is_timeout()).count(),
        });
    };

    ConsensusPrice::new(Price::new(value), contributors).ok_or_else(|| {
        ConsensusError::InvalidResult(format!("Negative number returned: {value}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricefeed_core::{Quote, SourceId};
    use rust_decimal_macros::dec;
    use tokio_test::assert_ok;

    fn quote(source: &str, price: Decimal) -> QuoteResult {
        QuoteResult::Quote(Quote::new(SourceId::new(source), Price::new(price)))
    }

    fn failure(source: &str) -> QuoteResult {
        QuoteResult::Failure {
            source: SourceId::new(source),
            reason: "Network error: connection refused".to_string(),
        }
    }

    fn timeout(source: &str) -> QuoteResult {
        QuoteResult::Timeout {
            source: SourceId::new(source),
        }
    }

    #[test]
    fn test_median_odd() {
        assert_eq!(median(&mut [dec!(30), dec!(10), dec!(20)]).unwrap(), Some(dec!(20)));
    }

    #[test]
    fn test_median_even_is_exact_average() {
        assert_eq!(median(&mut [dec!(20), dec!(10)]).unwrap(), Some(dec!(15)));
        assert_eq!(
            median(&mut [dec!(1.0001), dec!(1.0002)]).unwrap(),
            Some(dec!(1.00015))
        );
    }

    #[test]
    fn test_median_empty() {
        assert_eq!(median(&mut []).unwrap(), None);
    }

    #[test]
    fn test_median_of_extreme_values_is_invalid_not_a_panic() {
        let err = median(&mut [Decimal::MAX, Decimal::MAX]).unwrap_err();
        assert!(matches!(err, ConsensusError::InvalidResult(_)));

        let err = reduce(&[quote("a", Decimal::MAX), quote("b", Decimal::MAX)]).unwrap_err();
        assert!(matches!(err, ConsensusError::InvalidResult(_)));
    }

    #[test]
    fn test_median_of_opposite_extremes_is_zero() {
        assert_eq!(median(&mut [Decimal::MAX, Decimal::MIN]).unwrap(), Some(Decimal::ZERO));
    }

    #[test]
    fn test_reduce_ignores_failures_and_timeouts() {
        let results = vec![
            quote("a", dec!(1.001)),
            failure("b"),
            quote("c", dec!(0.999)),
            timeout("d"),
            quote("e", dec!(1.0)),
        ];
        let consensus = assert_ok!(reduce(&results));
        assert_eq!(consensus.price().inner(), dec!(1.0));
        assert_eq!(consensus.sources(), 3);
    }

    #[test]
    fn test_single_survivor_is_the_consensus() {
        let consensus = reduce(&[failure("a"), quote("b", dec!(1.001))]).unwrap();
        assert_eq!(consensus.price().inner(), dec!(1.001));
        assert_eq!(consensus.sources(), 1);
    }

    #[test]
    fn test_no_quorum_counts_outcomes() {
        let err = reduce(&[failure("a"), timeout("b"), failure("c")]).unwrap_err();
        assert_eq!(
            err,
            ConsensusError::NoQuorum {
                configured: 3,
                failed: 2,
                timed_out: 1,
            }
        );
    }

    #[test]
    fn test_no_sources_configured() {
        let err = reduce(&[]).unwrap_err();
        assert!(matches!(err, ConsensusError::NoQuorum { configured: 0, .. }));
    }

    #[test]
    fn test_negative_median_is_invalid() {
        let err = reduce(&[quote("a", dec!(-1)), quote("b", dec!(-2)), quote("c", dec!(3))])
            .unwrap_err();
        assert!(matches!(err, ConsensusError::InvalidResult(_)));
    }
}
