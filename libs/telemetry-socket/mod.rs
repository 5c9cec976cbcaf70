//! # Telemetry Socket
//!
//! A small WebSocket client for long-lived local telemetry feeds.
//!
//! ## Features
//!
//! - **Type-state builder**: Compile-time guarantees for URL, router and handler
//! - **Ordered delivery**: Frames are parsed inline and every decoded message is
//!   handed to a single handler thread in arrival order
//! - **Handshake frames**: Requests sent once, right after the connection opens
//! - **Sticky disconnect**: One connection attempt per client; once the socket
//!   closes the client stays disconnected

pub mod core;
pub mod traits;

// Re-export all traits
pub use traits::*;

// Re-export core client functionality
pub use crate::core::{
    builder,
    builder::{states, WebSocketClientBuilder},
    client::{ClientEvent, WebSocketClient},
    config::ClientConfig,
    connection_state::{AtomicConnectionState, ConnectionState},
};

/// Type alias for Result with SocketError
pub type Result<T> = std::result::Result<T, traits::SocketError>;
