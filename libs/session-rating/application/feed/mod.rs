//! Battle results feed: wire dialects, router and session handler

pub mod envelope;
pub mod handler;
pub mod json_rpc;

use crate::infrastructure::config::FeedProtocol;
use async_trait::async_trait;
use serde_json::Value;
use telemetry_socket::{MessageRouter, SocketError, WsMessage};

pub use handler::SessionFeedHandler;

/// A decoded feed item, in the order it arrived
#[derive(Debug, Clone, PartialEq)]
pub enum FeedMessage {
    /// One raw battle result, live or replayed
    BattleResult(Value),
    /// The server reported an error
    ServerError(Value),
    /// Acknowledgement with no payload of interest
    Acknowledged,
    /// Unrecognised element of an otherwise readable batch
    Invalid(String),
}

/// Router for battle results frames
pub struct BattleFeedRouter {
    protocol: FeedProtocol,
}

impl BattleFeedRouter {
    pub fn new(protocol: FeedProtocol) -> Self {
        Self { protocol }
    }

    pub fn protocol(&self) -> FeedProtocol {
        self.protocol
    }

    /// Frames to send once the connection opens
    pub fn handshake(&self) -> Vec<WsMessage> {
        match self.protocol {
            FeedProtocol::JsonRpc => json_rpc::handshake(),
            FeedProtocol::Envelope => envelope::handshake(),
        }
    }

    pub fn decode(&self, text: &str) -> Result<Vec<FeedMessage>, String> {
        let frame: Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
        match self.protocol {
            FeedProtocol::JsonRpc => json_rpc::decode(frame),
            FeedProtocol::Envelope => envelope::decode(frame),
        }
    }
}

impl Default for BattleFeedRouter {
    fn default() -> Self {
        Self::new(FeedProtocol::default())
    }
}

#[async_trait]
impl MessageRouter for BattleFeedRouter {
    type Message = FeedMessage;

    async fn parse(&self, message: WsMessage) -> telemetry_socket::Result<Vec<FeedMessage>> {
        let text = message
            .as_text()
            .ok_or_else(|| SocketError::ParseError("binary frame".to_string()))?;

        self.decode(text).map_err(|e| {
            SocketError::ParseError(format!("{} in frame {}", e, truncate(text, 200)))
        })
    }
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
