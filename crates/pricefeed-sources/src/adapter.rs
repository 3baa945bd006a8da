//! Source adapter interface.

use crate::error::{SourceError, SourceResult};
use async_trait::async_trait;
use pricefeed_core::{Quote, SourceId};
use reqwest::Client;
use std::time::Duration;

/// Shared per-invocation resources handed to every adapter.
///
/// Cheap to clone; the HTTP client pools connections internally.
#[derive(Debug, Clone)]
pub struct FetchContext {
    client: Client,
}

impl FetchContext {
    /// Build a context whose HTTP client gives up after `timeout`.
    pub fn new(timeout: Duration) -> SourceResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Network(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// One external source that yields a single price per call.
///
/// Implementations perform exactly one outbound call and must not retry.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn id(&self) -> &SourceId;

    async fn fetch(&self, ctx: &FetchContext) -> SourceResult<Quote>;
}
