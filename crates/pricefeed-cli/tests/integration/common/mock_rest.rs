//! Mock REST exchanges on one wiremock server.

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub async fn mount_json(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// All five peg sources; the median of their answers is 1.001.
pub async fn mount_peg_sources(server: &MockServer) {
    mount_json(server, "/api/v3/simple/price", json!({"tether": {"usd": 1.001}})).await;
    mount_json(server, "/data/price", json!({"USD": 1.001})).await;
    mount_json(
        server,
        "/0/public/Ticker",
        json!({"error": [], "result": {"USDTZUSD": {"c": ["1.00000000", "10"]}}}),
    )
    .await;
    mount_json(
        server,
        "/v2/ticker/tUSTUSD",
        json!([1, 1, 1, 1, 0, 0, 1, 1, 1.003, 1.002]),
    )
    .await;
    mount_json(server, "/products/USDT-USD/stats", json!({"last": "1.001"})).await;
}

/// Peg routes that fail the test if hit.
pub async fn forbid_peg_sources(server: &MockServer) {
    for route in [
        "/api/v3/simple/price",
        "/data/price",
        "/v2/ticker/tUSTUSD",
        "/products/USDT-USD/stats",
    ] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(server)
            .await;
    }
}

pub async fn mount_binance(server: &MockServer) {
    mount_json(
        server,
        "/api/v3/exchangeInfo",
        json!({"symbols": [
            {"symbol": "ETHUSDT", "baseAsset": "ETH", "quoteAsset": "USDT", "isSpotTradingAllowed": true},
            {"symbol": "SOLUSDT", "baseAsset": "SOL", "quoteAsset": "USDT", "isSpotTradingAllowed": true},
            {"symbol": "LUNAUSDT", "baseAsset": "LUNA", "quoteAsset": "USDT", "isSpotTradingAllowed": false}
        ]}),
    )
    .await;
    mount_json(
        server,
        "/api/v3/ticker/price",
        json!([
            {"symbol": "ETHUSDT", "price": "1800.00000000"},
            {"symbol": "SOLUSDT", "price": "150.33333333"}
        ]),
    )
    .await;
}
