//! Shared HTTP/JSON helpers for REST sources.

use crate::adapter::FetchContext;
use crate::error::{SourceError, SourceResult};
use pricefeed_core::Price;
use serde_json::Value;
use tracing::debug;

/// GET `url` with `query` and decode the body as JSON.
///
/// Transport failures and non-success statuses are network errors; a body
/// that is not JSON is a parse error.
pub async fn get_json(ctx: &FetchContext, url: &str, query: &[(&str, &str)]) -> SourceResult<Value> {
    debug!(%url, ?query, "GET");

    let response = ctx
        .client()
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|e| SourceError::Network(format!("HTTP request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SourceError::Network(format!("HTTP {status}: {body}")));
    }

    let body = response
        .text()
        .await
        .map_err(|e| SourceError::Network(format!("Failed to read response: {e}")))?;

    serde_json::from_str(&body)
        .map_err(|e| SourceError::Parse(format!("Failed to parse response: {e}")))
}

/// Look up a JSON pointer (e.g. `/result/USDTZUSD/c/0`).
pub fn field<'a>(value: &'a Value, pointer: &str) -> SourceResult<&'a Value> {
    value
        .pointer(pointer)
        .ok_or_else(|| SourceError::Schema(format!("missing field {pointer}")))
}

/// Look up a JSON pointer and parse it as a price.
pub fn price_at(value: &Value, pointer: &str) -> SourceResult<Price> {
    let raw = field(value, pointer)?;
    Price::from_json(raw)
        .map_err(|e| SourceError::Parse(format!("field {pointer}: {e}")))
}

/// Field as a string, for identifiers in list responses.
pub fn str_at<'a>(value: &'a Value, pointer: &str) -> SourceResult<&'a str> {
    field(value, pointer)?
        .as_str()
        .ok_or_else(|| SourceError::Schema(format!("field {pointer} is not a string")))
}

/// Top-level array of a list response.
pub fn array_at<'a>(value: &'a Value, pointer: &str) -> SourceResult<&'a Vec<Value>> {
    field(value, pointer)?
        .as_array()
        .ok_or_else(|| SourceError::Schema(format!("field {pointer} is not an array")))
}
