//! Common test utilities for session rating integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{json, Value};
use session_rating::domain::expected::{ExpectedValues, ExpectedValuesTable};
use session_rating::{OverlayFrame, Presenter, ReferenceError, ReferenceSource};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
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

// =============================================================================
// Battle results server
// =============================================================================

/// Battle results server that plays a fixed script
///
/// Accepts one connection, waits for `expect_frames` client frames, sends the
/// script in order and closes.
pub struct FeedServer {
    pub addr: SocketAddr,
    received: Arc<tokio::sync::Mutex<Vec<String>>>,
}

impl FeedServer {
    pub async fn start(expect_frames: usize, script: Vec<Value>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let received = Arc::new(tokio::sync::Mutex::new(Vec::new()));
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
                if ws.send(Message::Text(frame.to_string())).await.is_err() {
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

// =============================================================================
// Presenter
// =============================================================================

/// Presenter that keeps every frame
#[derive(Clone, Default)]
pub struct RecordingPresenter {
    frames: Arc<Mutex<Vec<OverlayFrame>>>,
}

impl RecordingPresenter {
    pub fn frames(&self) -> Vec<OverlayFrame> {
        self.frames.lock().clone()
    }

    pub fn last(&self) -> Option<OverlayFrame> {
        self.frames.lock().last().cloned()
    }

    /// Poll until a frame shows the disconnected flag
    pub async fn wait_for_disconnect(&self) {
        for _ in 0..300 {
            if self.last().map_or(false, |f| f.disconnected) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("overlay never showed the disconnect");
    }
}

impl Presenter for RecordingPresenter {
    fn present(&mut self, frame: &OverlayFrame) {
        verbose_println!("frame: {} {:?}", frame.title(), frame.hints());
        self.frames.lock().push(frame.clone());
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub const TANK: u32 = 5137;

/// A random battle in `TANK` with stats equal to its expected values
pub fn battle(won: bool) -> Value {
    battle_in_mode(1, won)
}

pub fn battle_in_mode(bonus_type: u32, won: bool) -> Value {
    json!({
        "arenaUniqueID": 1,
        "common": {"bonusType": bonus_type, "winnerTeam": 1},
        "personal": {
            "avatar": {"team": if won { 1 } else { 2 }},
            "5137": {
                "damageDealt": 1000,
                "spotted": 1.5,
                "kills": 1,
                "droppedCapturePoints": 0.8
            }
        }
    })
}

pub fn subscription(record: Value) -> Value {
    json!({"jsonrpc": "2.0", "method": "subscription", "params": {"battleResult": record}})
}

pub fn replay(records: Vec<Value>) -> Value {
    json!([
        {"jsonrpc": "2.0", "id": 1, "result": {"battleResults": records}},
        {"jsonrpc": "2.0", "id": 2, "result": null}
    ])
}

pub fn expected_table() -> ExpectedValuesTable {
    ExpectedValuesTable::from_entries(vec![ExpectedValues {
        vehicle_id: TANK,
        exp_damage: 1000.0,
        exp_spot: 1.5,
        exp_frag: 1.0,
        exp_def: 0.8,
        exp_win_rate: 50.0,
    }])
}

pub fn expected_document() -> String {
    json!({
        "header": {"version": "test"},
        "data": [{
            "IDNum": TANK,
            "expDamage": 1000.0,
            "expSpot": 1.5,
            "expFrag": 1.0,
            "expDef": 0.8,
            "expWinRate": 50.0
        }]
    })
    .to_string()
}

// =============================================================================
// Reference sources
// =============================================================================

/// Counts fetches and resolves after a delay
pub struct CountingSource {
    pub calls: Arc<AtomicUsize>,
    delay: Duration,
    result: Result<ExpectedValuesTable, ReferenceError>,
}

impl CountingSource {
    pub fn new(delay: Duration, result: Result<ExpectedValuesTable, ReferenceError>) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            delay,
            result,
        }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl ReferenceSource for CountingSource {
    async fn fetch(&self) -> Result<ExpectedValuesTable, ReferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.result.clone()
    }
}

/// Minimal HTTP server answering one request with a fixed status and body
pub async fn serve_http_once(status: u16, body: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = stream.read(&mut buf).await;

        let response = format!(
            "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let _ = stream.write_all(response.as_bytes()).await;
        let _ = stream.shutdown().await;
    });

    format!("http://{}/wn8exp.json", addr)
}

/// Address that refuses connections
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("ws://{}", addr)
}
