pub mod states;

use crate::core::client::{Delivery, WebSocketClient};
use crate::core::config::ClientConfig;
use crate::traits::*;
use states::*;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Type-state builder for WebSocketClient
///
/// URL and router/handler must both be supplied before `build()` becomes
/// available; everything else is optional.
pub struct WebSocketClientBuilder<U, Ro>
where
    U: UrlState,
    Ro: RouterState,
{
    url: U,
    routing: Ro,
    handshake: Vec<WsMessage>,
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl WebSocketClientBuilder<NoUrl, NoRouter> {
    /// Create a new builder instance
    pub fn new() -> Self {
        Self {
            url: NoUrl,
            routing: NoRouter,
            handshake: Vec::new(),
            shutdown_flag: None,
        }
    }
}

impl Default for WebSocketClientBuilder<NoUrl, NoRouter> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ro> WebSocketClientBuilder<NoUrl, Ro>
where
    Ro: RouterState,
{
    pub fn url(self, url: impl Into<String>) -> WebSocketClientBuilder<HasUrl, Ro> {
        WebSocketClientBuilder {
            url: HasUrl(url.into()),
            routing: self.routing,
            handshake: self.handshake,
            shutdown_flag: self.shutdown_flag,
        }
    }
}

impl<U> WebSocketClientBuilder<U, NoRouter>
where
    U: UrlState,
{
    /// Set the router and the single handler that receives its messages
    pub fn router<R, H>(self, router: R, handler: H) -> WebSocketClientBuilder<U, HasRouter<R, H>>
    where
        R: MessageRouter,
        H: MessageHandler<R::Message>,
    {
        WebSocketClientBuilder {
            url: self.url,
            routing: HasRouter { router, handler },
            handshake: self.handshake,
            shutdown_flag: self.shutdown_flag,
        }
    }
}

// Optional configuration methods
impl<U, Ro> WebSocketClientBuilder<U, Ro>
where
    U: UrlState,
    Ro: RouterState,
{
    /// Queue a frame to send as soon as the connection opens
    pub fn handshake(mut self, message: WsMessage) -> Self {
        self.handshake.push(message);
        self
    }

    pub fn handshakes(mut self, messages: Vec<WsMessage>) -> Self {
        self.handshake.extend(messages);
        self
    }

    /// Use an external shutdown flag
    ///
    /// Setting the flag to `false` makes the I/O task close the socket on its
    /// next loop iteration.
    pub fn shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }
}

// Build method - only available when all required fields are set
impl<R, H> WebSocketClientBuilder<HasUrl, HasRouter<R, H>>
where
    R: MessageRouter,
    H: MessageHandler<R::Message>,
{
    /// Spawn the handler thread and the I/O task
    ///
    /// Must be called from within a tokio runtime.
    pub async fn build(self) -> Result<WebSocketClient> {
        let HasUrl(url) = self.url;
        if !(url.starts_with("ws://") || url.starts_with("wss://")) {
            return Err(SocketError::Configuration(format!(
                "unsupported WebSocket URL: {}",
                url
            )));
        }

        let HasRouter { router, handler } = self.routing;
        let shutdown_flag = self
            .shutdown_flag
            .unwrap_or_else(|| Arc::new(AtomicBool::new(true)));

        let (delivery_tx, delivery_rx) = crossbeam_channel::unbounded::<Delivery<R::Message>>();
        let handler_handle = spawn_handler_thread(handler, delivery_rx)?;

        let config = ClientConfig {
            url,
            router: Arc::new(router),
            handshake: self.handshake,
            shutdown_flag,
        };

        Ok(WebSocketClient::spawn(config, delivery_tx, handler_handle))
    }
}

/// Run the handler on its own OS thread until the delivery channel closes
fn spawn_handler_thread<M, H>(
    handler: H,
    receiver: crossbeam_channel::Receiver<Delivery<M>>,
) -> Result<std::thread::JoinHandle<()>>
where
    M: Send + std::fmt::Debug + 'static,
    H: MessageHandler<M>,
{
    std::thread::Builder::new()
        .name("telemetry-handler".to_string())
        .spawn(move || {
            let mut handler = handler;
            for delivery in receiver.iter() {
                let result = match delivery {
                    Delivery::Message(message) => handler.handle(message),
                    Delivery::Event(event) => handler.handle_connection_change(&event),
                };
                if let Err(e) = result {
                    tracing::error!("Handler error: {}", e);
                }
            }
            tracing::debug!("Delivery channel closed, handler thread exiting");
        })
        .map_err(|e| SocketError::Configuration(format!("failed to spawn handler thread: {}", e)))
}
