//! Client internals: builder, configuration, connection state and the I/O task.
//!
//! ## Example
//!
//! ```rust,ignore
//! use telemetry_socket::*;
//!
//! let client = telemetry_socket::builder()
//!     .url("ws://localhost:15455")
//!     .router(MyRouter, MyHandler::new())
//!     .handshake(WsMessage::Text(r#"{"method":"subscribe"}"#.into()))
//!     .build()
//!     .await?;
//!
//! while let Ok(event) = client.recv_event() {
//!     println!("Event: {:?}", event);
//! }
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod connection_state;

pub use builder::{states, WebSocketClientBuilder};
pub use client::{ClientEvent, WebSocketClient};
pub use config::ClientConfig;
pub use connection_state::{AtomicConnectionState, ConnectionState};

pub use crate::traits::*;

/// Create a new WebSocket client builder
pub fn builder() -> WebSocketClientBuilder<builder::states::NoUrl, builder::states::NoRouter> {
    WebSocketClientBuilder::new()
}
