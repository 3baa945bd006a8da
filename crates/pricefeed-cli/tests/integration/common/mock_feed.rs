//! Mock ticker feed.
//!
//! Acknowledges a ticker subscription and pushes one ticker per subscribed
//! product it has a price for.

use futures_util::{SinkExt, StreamExt};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{accept_async, tungstenite::Message};

pub struct MockFeedServer {
    addr: SocketAddr,
}

impl MockFeedServer {
    pub async fn start(prices: HashMap<String, String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let prices = Arc::new(prices);

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(handle_connection(stream, Arc::clone(&prices)));
            }
        });

        Self { addr }
    }

    pub fn url(&self) -> String {
        format!("ws://{}", self.addr)
    }
}

async fn handle_connection(stream: TcpStream, prices: Arc<HashMap<String, String>>) {
    let Ok(ws_stream) = accept_async(stream).await else {
        return;
    };
    let (mut write, mut read) = ws_stream.split();

    while let Some(Ok(msg)) = read.next().await {
        let Message::Text(text) = msg else {
            continue;
        };
        let Ok(request) = serde_json::from_str::<serde_json::Value>(&text) else {
            continue;
        };
        let products: Vec<String> = request["product_ids"]
            .as_array()
            .map(|a| a.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
            .unwrap_or_default();

        let ack = serde_json::json!({
            "type": "subscriptions",
            "channels": [{"name": "ticker", "product_ids": products}]
        });
        let _ = write.send(Message::Text(ack.to_string())).await;

        for product in &products {
            if let Some(price) = prices.get(product) {
                let ticker = serde_json::json!({
                    "type": "ticker",
                    "product_id": product,
                    "price": price
                });
                let _ = write.send(Message::Text(ticker.to_string())).await;
            }
        }
    }
}
