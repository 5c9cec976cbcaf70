//! Message Routing
//!
//! ```text
//! WebSocket → Router::parse (inline, arrival order) → channel → Handler thread
//!                     ↓                                            ↑
//!              0..n messages per frame            connection events (same channel)
//! ```
//!
//! # Ordering Guarantees
//!
//! - Frames are decoded one at a time in the order the transport delivers them
//! - Messages decoded from one frame keep their order inside the frame
//! - Connection events share the message channel, so a disconnect is handled
//!   after every message that arrived before it

use crate::core::client::ClientEvent;
use crate::{Result, WsMessage};
use async_trait::async_trait;
use std::fmt::Debug;

/// Decodes raw frames into typed messages
///
/// A single frame may carry one message (a push notification) or a batch
/// (a response to a batched request), so `parse` returns a list.
///
/// # Example
///
/// ```ignore
/// struct LineRouter;
///
/// #[async_trait]
/// impl MessageRouter for LineRouter {
///     type Message = String;
///
///     async fn parse(&self, message: WsMessage) -> Result<Vec<String>> {
///         let text = message.as_text().unwrap_or_default();
///         Ok(text.lines().map(str::to_string).collect())
///     }
/// }
/// ```
#[async_trait]
pub trait MessageRouter: Send + Sync + 'static {
    /// The decoded message type
    type Message: Send + Debug + 'static;

    /// Decode a frame
    ///
    /// Returning `Err` marks the frame as a protocol error: it is logged and
    /// dropped, the connection stays open.
    async fn parse(&self, message: WsMessage) -> Result<Vec<Self::Message>>;
}

/// Consumes decoded messages on a dedicated OS thread
///
/// The handler is the only owner of whatever state it mutates, so no locking
/// is needed inside `handle`. Blocking work (waiting on a runtime handle, for
/// example) is allowed; later messages queue behind it in order.
pub trait MessageHandler<M>: Send + 'static
where
    M: Send + Debug + 'static,
{
    /// Handle one decoded message
    ///
    /// # Errors
    /// Errors are logged; the handler keeps receiving subsequent messages.
    fn handle(&mut self, message: M) -> Result<()>;

    /// Observe a connection state change
    fn handle_connection_change(&mut self, _event: &ClientEvent) -> Result<()> {
        Ok(())
    }
}
