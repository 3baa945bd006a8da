//! Mock ticker feed for integration tests.
//!
//! Provides a simple WebSocket server that can:
//! - Accept connections
//! - Acknowledge a ticker subscription
//! - Push scripted ticker messages for the subscribed products
//! - Record received messages

use futures_util::{SinkExt, StreamExt};
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::{accept_async, tungstenite::Message};

/// How the mock behaves after a subscription arrives.
#[derive(Debug, Clone)]
pub enum FeedScript {
    /// Send a ticker for each subscribed product that has a price here.
    Tickers(HashMap<String, String>),
    /// Reply with an error message.
    Reject(String),
    /// Acknowledge, then stay silent.
    Silent,
    /// Close the connection right after the acknowledgement.
    Close,
}

/// A mock ticker feed server.
pub struct MockFeedServer {
    addr: SocketAddr,
    shutdown_tx: mpsc::Sender<()>,
    messages: Arc<Mutex<VecDeque<String>>>,
}

impl MockFeedServer {
    /// Start a new mock server on an available port.
    pub async fn start(script: FeedScript) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let messages: Arc<Mutex<VecDeque<String>>> = Arc::new(Mutex::new(VecDeque::new()));
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let messages_clone = messages.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    Ok((stream, _)) = listener.accept() => {
                        let messages = messages_clone.clone();
                        tokio::spawn(handle_connection(stream, messages, script.clone()));
                    }
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }
            }
        });

        Self {
            addr,
            shutdown_tx,
            messages,
        }
    }

    /// Get the server's WebSocket URL.
    pub fn url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    /// Get all received messages.
    pub async fn received_messages(&self) -> Vec<String> {
        self.messages.lock().await.iter().cloned().collect()
    }

    /// Shutdown the server.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

async fn handle_connection(
    stream: TcpStream,
    messages: Arc<Mutex<VecDeque<String>>>,
    script: FeedScript,
) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            eprintln!("WebSocket handshake failed: {}", e);
            return;
        }
    };

    let (mut write, mut read) = ws_stream.split();

    while let Some(msg) = read.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                {
                    let mut msgs = messages.lock().await;
                    msgs.push_back(text.clone());
                }

                let Ok(parsed) = serde_json::from_str::<serde_json::Value>(&text) else {
                    continue;
                };
                if parsed.get("type") != Some(&serde_json::json!("subscribe")) {
                    continue;
                }
                let products: Vec<String> = parsed["product_ids"]
                    .as_array()
                    .map(|a| {
                        a.iter()
                            .filter_map(|v| v.as_str().map(str::to_string))
                            .collect()
                    })
                    .unwrap_or_default();

                let ack = serde_json::json!({
                    "type": "subscriptions",
                    "channels": [{"name": "ticker", "product_ids": products}]
                });
                let _ = write.send(Message::Text(ack.to_string())).await;

                match &script {
                    FeedScript::Tickers(prices) => {
                        let heartbeat = serde_json::json!({"type": "heartbeat", "sequence": 1});
                        let _ = write.send(Message::Text(heartbeat.to_string())).await;
                        for product in &products {
                            if let Some(price) = prices.get(product) {
                                let ticker = serde_json::json!({
                                    "type": "ticker",
                                    "product_id": product,
                                    "price": price,
                                    "side": "buy"
                                });
                                let _ = write.send(Message::Text(ticker.to_string())).await;
                            }
                        }
                    }
                    FeedScript::Reject(reason) => {
                        let error = serde_json::json!({
                            "type": "error",
                            "message": "Failed to subscribe",
                            "reason": reason
                        });
                        let _ = write.send(Message::Text(error.to_string())).await;
                    }
                    FeedScript::Silent => {}
                    FeedScript::Close => {
                        let _ = write.send(Message::Close(None)).await;
                        break;
                    }
                }
            }
            Ok(Message::Ping(data)) => {
                let _ = write.send(Message::Pong(data)).await;
            }
            Ok(Message::Close(_)) => break,
            Err(_) => break,
            _ => {}
        }
    }
}
