//! Core traits and types for the telemetry socket client.
//!
//! - **MessageRouter**: Decode one incoming frame into zero or more messages
//! - **MessageHandler**: Consume decoded messages and connection changes in order

pub mod error;
pub mod parser;
pub mod router;

pub use error::{Result, SocketError};
pub use parser::WsMessage;
pub use router::{MessageHandler, MessageRouter};
