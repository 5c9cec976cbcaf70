//! Common test utilities for telemetry socket integration tests

use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

/// Macro for verbose test output (controlled by TEST_VERBOSE env var)
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if std::env::var("TEST_VERBOSE").is_ok() {
            println!($($arg)*);
        }
    };
}

/// A one-shot WebSocket server
///
/// Accepts a single connection, waits for `expect_frames` client frames,
/// replies with the scripted frames in order, then closes the socket.
pub struct ScriptedServer {
    pub addr: SocketAddr,
    received: Arc<Mutex<Vec<String>>>,
}

impl ScriptedServer {
    pub async fn start(expect_frames: usize, script: Vec<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let received = Arc::new(Mutex::new(Vec::new()));
        let received_clone = Arc::clone(&received);

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();

            while received_clone.lock().await.len() < expect_frames {
                match ws.next().await {
                    Some(Ok(Message::Text(text))) => received_clone.lock().await.push(text),
                    Some(Ok(_)) => continue,
                    _ => return,
                }
            }

            for frame in script {
                if ws.send(Message::Text(frame)).await.is_err() {
                    return;
                }
            }
            let _ = ws.close(None).await;
        });

        Self { addr, received }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    pub async fn received(&self) -> Vec<String> {
        self.received.lock().await.clone()
    }
}

/// Address that refuses connections
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("ws://{}", addr)
}
