use thiserror::Error;

/// Main error type for the telemetry socket
#[derive(Error, Debug)]
pub enum SocketError {
    /// WebSocket transport error
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Connection closed by the peer
    #[error("Connection closed: {0}")]
    ConnectionClosed(String),

    /// Frame could not be decoded
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Channel send error
    #[error("Channel send error: {0}")]
    ChannelSend(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type for telemetry socket operations
pub type Result<T> = std::result::Result<T, SocketError>;
