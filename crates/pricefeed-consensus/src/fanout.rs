//! Deadline-bounded fan-out.
//!
//! Every adapter runs as its own task and hands exactly one result back over
//! its own oneshot channel. The coordinator is the only writer of the result
//! slots. When the deadline fires, outstanding tasks are cancelled and their
//! receivers dropped, so a late answer has nowhere to land.

use futures_util::future::FutureExt;
use futures_util::stream::{FuturesUnordered, StreamExt};
use pricefeed_core::{Quote, QuoteResult, SourceId};
use pricefeed_sources::{FetchContext, SourceAdapter, SourceResult};
use pricefeed_telemetry::Metrics;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

type UnitOutput = (SourceResult<Quote>, Duration);

/// Run every adapter concurrently and collect one result per adapter.
///
/// Results come back in adapter order. Adapters still running when
/// `deadline` elapses are recorded as [`QuoteResult::Timeout`]; errors and
/// panics as [`QuoteResult::Failure`]. A zero deadline polls each adapter
/// exactly once.
pub async fn aggregate(
    adapters: &[Arc<dyn SourceAdapter>],
    ctx: &FetchContext,
    deadline: Duration,
) -> Vec<QuoteResult> {
    let results = if deadline.is_zero() {
        poll_once(adapters, ctx)
    } else {
        run_until(adapters, ctx, deadline).await
    };

    for result in &results {
        Metrics::source_fetch(result.source().as_str(), result.outcome());
    }
    results
}

async fn run_until(
    adapters: &[Arc<dyn SourceAdapter>],
    ctx: &FetchContext,
    deadline: Duration,
) -> Vec<QuoteResult> {
    let cancel = CancellationToken::new();
    let mut slots: Vec<Option<QuoteResult>> = vec![None; adapters.len()];
    let mut pending = FuturesUnordered::new();

    for (idx, adapter) in adapters.iter().enumerate() {
        let (tx, rx) = oneshot::channel::<UnitOutput>();
        let adapter = Arc::clone(adapter);
        let ctx = ctx.clone();
        let token = cancel.child_token();

        tokio::spawn(async move {
            let started = Instant::now();
            let outcome = tokio::select! {
                _ = token.cancelled() => return,
                res = adapter.fetch(&ctx) => res,
            };
            // Receiver is gone once the coordinator stopped waiting.
            let _ = tx.send((outcome, started.elapsed()));
        });

        pending.push(async move { (idx, rx.await) });
    }

    let timer = tokio::time::sleep(deadline);
    tokio::pin!(timer);

    loop {
        tokio::select! {
            next = pending.next() => match next {
                Some((idx, received)) => {
                    let source = adapters[idx].id().clone();
                    slots[idx] = Some(match received {
                        Ok((outcome, elapsed)) => settle(source, outcome, elapsed),
                        Err(_) => task_died(source),
                    });
                }
                None => break,
            },
            _ = &mut timer => {
                debug!(
                    deadline_ms = deadline.as_millis() as u64,
                    outstanding = pending.len(),
                    "Fan-out deadline elapsed"
                );
                break;
            }
        }
    }

    cancel.cancel();
    drop(pending);

    slots
        .into_iter()
        .zip(adapters)
        .map(|(slot, adapter)| {
            slot.unwrap_or_else(|| QuoteResult::Timeout {
                source: adapter.id().clone(),
            })
        })
        .collect()
}

/// Zero deadline: whatever completes on the first poll counts.
fn poll_once(adapters: &[Arc<dyn SourceAdapter>], ctx: &FetchContext) -> Vec<QuoteResult> {
    adapters
        .iter()
        .map(|adapter| {
            let source = adapter.id().clone();
            let started = Instant::now();
            let polled = std::panic::catch_unwind(AssertUnwindSafe(|| {
                adapter.fetch(ctx).now_or_never()
            }));
            match polled {
                Ok(Some(outcome)) => settle(source, outcome, started.elapsed()),
                Ok(None) => QuoteResult::Timeout { source },
                Err(_) => task_died(source),
            }
        })
        .collect()
}

fn settle(source: SourceId, outcome: SourceResult<Quote>, elapsed: Duration) -> QuoteResult {
    Metrics::source_latency(source.as_str(), elapsed.as_secs_f64() * 1000.0);
    match outcome {
        Ok(quote) => {
            debug!(
                %source,
                price = %quote.price(),
                received_at = %quote.received_at(),
                "Source answered"
            );
            QuoteResult::Quote(quote)
        }
        Err(e) => {
            warn!(%source, kind = e.kind(), error = %e, "Source failed");
            QuoteResult::Failure {
                source,
                reason: e.to_string(),
            }
        }
    }
}

fn task_died(source: SourceId) -> QuoteResult {
    warn!(%source, "Source task terminated without a result");
    QuoteResult::Failure {
        source,
        reason: "task terminated without a result".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pricefeed_core::Price;
    use pricefeed_sources::SourceError;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicBool, Ordering};

    enum Behavior {
        Price(Decimal),
        Fail,
        Delayed(Duration, Decimal),
        Panic,
    }

    struct FakeSource {
        id: SourceId,
        behavior: Behavior,
        finished: Arc<AtomicBool>,
    }

    impl FakeSource {
        fn boxed(id: &str, behavior: Behavior) -> Arc<dyn SourceAdapter> {
            Arc::new(Self {
                id: SourceId::new(id),
                behavior,
                finished: Arc::new(AtomicBool::new(false)),
            })
        }
    }

    #[async_trait]
    impl SourceAdapter for FakeSource {
        fn id(&self) -> &SourceId {
            &self.id
        }

        async fn fetch(&self, _ctx: &FetchContext) -> SourceResult<Quote> {
            let price = match self.behavior {
                Behavior::Price(p) => p,
                Behavior::Fail => return Err(SourceError::Network("HTTP 503".to_string())),
                Behavior::Delayed(delay, p) => {
                    tokio::time::sleep(delay).await;
                    p
                }
                Behavior::Panic => panic!("adapter bug"),
            };
            self.finished.store(true, Ordering::SeqCst);
            Ok(Quote::new(self.id.clone(), Price::new(price)))
        }
    }

    fn ctx() -> FetchContext {
        FetchContext::new(Duration::from_secs(1)).unwrap()
    }

    #[tokio::test]
    async fn test_failures_do_not_abort_other_units() {
        let adapters = vec![
            FakeSource::boxed("a", Behavior::Price(dec!(1.001))),
            FakeSource::boxed("b", Behavior::Fail),
            FakeSource::boxed("c", Behavior::Price(dec!(1.0))),
            FakeSource::boxed("d", Behavior::Fail),
            FakeSource::boxed("e", Behavior::Price(dec!(0.999))),
        ];
        let results = aggregate(&adapters, &ctx(), Duration::from_secs(2)).await;

        assert_eq!(results.len(), 5);
        let outcomes: Vec<&str> = results.iter().map(QuoteResult::outcome).collect();
        assert_eq!(outcomes, vec!["ok", "failure", "ok", "failure", "ok"]);
        let sources: Vec<&str> = results.iter().map(|r| r.source().as_str()).collect();
        assert_eq!(sources, vec!["a", "b", "c", "d", "e"]);
    }

    #[tokio::test]
    async fn test_slow_source_times_out_within_deadline() {
        let adapters = vec![
            FakeSource::boxed("fast", Behavior::Price(dec!(1))),
            FakeSource::boxed("slow", Behavior::Delayed(Duration::from_secs(10), dec!(1))),
        ];
        let started = Instant::now();
        let results = aggregate(&adapters, &ctx(), Duration::from_millis(100)).await;
        let elapsed = started.elapsed();

        assert!(elapsed >= Duration::from_millis(100));
        assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");
        assert!(results[0].is_quote());
        assert!(results[1].is_timeout());
    }

    #[tokio::test]
    async fn test_deadline_shorter_than_every_source() {
        let adapters: Vec<_> = ["a", "b", "c"]
            .into_iter()
            .map(|id| FakeSource::boxed(id, Behavior::Delayed(Duration::from_secs(5), dec!(1))))
            .collect();
        let started = Instant::now();
        let results = aggregate(&adapters, &ctx(), Duration::from_millis(50)).await;

        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(QuoteResult::is_timeout));
    }

    #[tokio::test]
    async fn test_returns_early_when_all_answer() {
        let adapters = vec![
            FakeSource::boxed("a", Behavior::Price(dec!(1))),
            FakeSource::boxed("b", Behavior::Delayed(Duration::from_millis(20), dec!(1))),
        ];
        let started = Instant::now();
        let results = aggregate(&adapters, &ctx(), Duration::from_secs(30)).await;

        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(results.iter().all(QuoteResult::is_quote));
    }

    #[tokio::test]
    async fn test_abandoned_unit_is_cancelled() {
        let finished = Arc::new(AtomicBool::new(false));
        let slow: Arc<dyn SourceAdapter> = Arc::new(FakeSource {
            id: SourceId::new("slow"),
            behavior: Behavior::Delayed(Duration::from_millis(300), dec!(1)),
            finished: Arc::clone(&finished),
        });

        let results = aggregate(&[slow], &ctx(), Duration::from_millis(50)).await;
        assert!(results[0].is_timeout());

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(!finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_panicking_unit_is_a_failure() {
        let adapters = vec![
            FakeSource::boxed("buggy", Behavior::Panic),
            FakeSource::boxed("ok", Behavior::Price(dec!(1))),
        ];
        let results = aggregate(&adapters, &ctx(), Duration::from_secs(2)).await;

        assert!(results[0].is_failure());
        assert!(results[1].is_quote());
    }

    #[tokio::test]
    async fn test_zero_deadline_polls_each_unit_once() {
        let adapters = vec![
            FakeSource::boxed("ready", Behavior::Price(dec!(1.0001))),
            FakeSource::boxed("slow", Behavior::Delayed(Duration::from_millis(50), dec!(1))),
            FakeSource::boxed("broken", Behavior::Fail),
            FakeSource::boxed("buggy", Behavior::Panic),
        ];
        let results = aggregate(&adapters, &ctx(), Duration::ZERO).await;

        let outcomes: Vec<&str> = results.iter().map(QuoteResult::outcome).collect();
        assert_eq!(outcomes, vec!["ok", "timeout", "failure", "failure"]);
    }

    #[tokio::test]
    async fn test_no_adapters() {
        let results = aggregate(&[], &ctx(), Duration::from_millis(10)).await;
        assert!(results.is_empty());
    }
}
