use crate::traits::*;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Configuration for a WebSocketClient
///
/// Assembled by the type-state builder and shared with the I/O task.
pub struct ClientConfig<R>
where
    R: MessageRouter,
{
    /// WebSocket URL (ws:// or wss://)
    pub(crate) url: String,

    /// Decodes frames into messages
    pub(crate) router: Arc<R>,

    /// Frames sent once, right after the connection opens
    pub(crate) handshake: Vec<WsMessage>,

    /// When false the I/O task closes the socket and exits
    pub(crate) shutdown_flag: Arc<AtomicBool>,
}
