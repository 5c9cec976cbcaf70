use crate::core::config::ClientConfig;
use crate::core::connection_state::{AtomicConnectionState, ConnectionState};
use crate::traits::*;
use crossbeam_channel::{unbounded, Receiver, Sender};
use futures::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// Internal command messages for client control
#[derive(Debug)]
enum ClientCommand {
    /// Close the connection
    Shutdown,
}

/// Connection lifecycle events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Connected to the server
    Connected,
    /// Connection closed or failed; never followed by another `Connected`
    Disconnected(String),
    /// A frame could not be decoded and was dropped
    ProtocolError(String),
}

/// What travels to the handler thread, in arrival order
#[derive(Debug)]
pub(crate) enum Delivery<M> {
    Message(M),
    Event(ClientEvent),
}

/// WebSocket client for a single long-lived feed connection
///
/// - One connection attempt, no reconnection
/// - Frames decoded inline by the router, strictly in arrival order
/// - A single handler thread consumes messages and connection events
pub struct WebSocketClient {
    /// Atomic connection state
    state: Arc<AtomicConnectionState>,
    /// Command channel sender
    command_tx: mpsc::UnboundedSender<ClientCommand>,
    /// Event channel receiver
    event_rx: Receiver<ClientEvent>,
    /// Main task handle (tokio task for async I/O)
    task_handle: Option<tokio::task::JoinHandle<()>>,
    /// Handler thread handle
    handler_handle: Option<std::thread::JoinHandle<()>>,
    shutdown_flag: Arc<AtomicBool>,
}

impl WebSocketClient {
    /// Spawn the I/O task. Called by the builder's `build()` method.
    pub(crate) fn spawn<R>(
        config: ClientConfig<R>,
        delivery_tx: Sender<Delivery<R::Message>>,
        handler_handle: std::thread::JoinHandle<()>,
    ) -> Self
    where
        R: MessageRouter,
    {
        let config = Arc::new(config);
        let state = Arc::new(AtomicConnectionState::new(ConnectionState::Connecting));
        let shutdown_flag = Arc::clone(&config.shutdown_flag);

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = unbounded();

        let task_handle = {
            let state = Arc::clone(&state);
            tokio::spawn(async move {
                run_client(config, state, command_rx, event_tx, delivery_tx).await;
            })
        };

        Self {
            state,
            command_tx,
            event_rx,
            task_handle: Some(task_handle),
            handler_handle: Some(handler_handle),
            shutdown_flag,
        }
    }

    #[inline]
    pub fn connection_state(&self) -> ConnectionState {
        self.state.get()
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Try to receive an event (non-blocking)
    pub fn try_recv_event(&self) -> Option<ClientEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Receive an event (blocking)
    pub fn recv_event(&self) -> std::result::Result<ClientEvent, crossbeam_channel::RecvError> {
        self.event_rx.recv()
    }

    /// Receive an event, giving up after `timeout`
    pub fn recv_event_timeout(&self, timeout: Duration) -> Option<ClientEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    pub fn shutdown_flag(&self) -> &Arc<AtomicBool> {
        &self.shutdown_flag
    }

    /// Close the connection and wait for the handler to drain
    pub async fn shutdown(mut self) -> Result<()> {
        info!("Shutting down WebSocket client");

        self.shutdown_flag.store(false, Ordering::Release);
        let _ = self.command_tx.send(ClientCommand::Shutdown);

        // The I/O task owns the delivery sender; once it exits the handler
        // thread sees a closed channel after draining what is queued.
        if let Some(handle) = self.task_handle.take() {
            let _ = handle.await;
        }

        if let Some(handle) = self.handler_handle.take() {
            let joined = tokio::task::spawn_blocking(move || handle.join()).await;
            if !matches!(joined, Ok(Ok(()))) {
                warn!("Handler thread did not exit cleanly");
            }
        }

        info!("WebSocket client shut down");
        Ok(())
    }
}

/// Main client task: one connection attempt, then a sticky disconnect
async fn run_client<R>(
    config: Arc<ClientConfig<R>>,
    state: Arc<AtomicConnectionState>,
    mut command_rx: mpsc::UnboundedReceiver<ClientCommand>,
    event_tx: Sender<ClientEvent>,
    delivery_tx: Sender<Delivery<R::Message>>,
) where
    R: MessageRouter,
{
    let reason = match connect_async(config.url.as_str()).await {
        Ok((ws_stream, _)) => {
            info!("Connected to {}", config.url);
            if state.mark_open() {
                publish(&event_tx, &delivery_tx, ClientEvent::Connected);
            }

            match handle_connection(ws_stream, &config, &mut command_rx, &event_tx, &delivery_tx)
                .await
            {
                Ok(()) => "closed by client".to_string(),
                Err(e) => {
                    error!("Connection error: {}", e);
                    e.to_string()
                }
            }
        }
        Err(e) => {
            error!("Failed to connect to {}: {}", config.url, e);
            format!("failed to connect: {}", e)
        }
    };

    if state.mark_disconnected() {
        publish(&event_tx, &delivery_tx, ClientEvent::Disconnected(reason));
    }

    info!("Client task exiting");
}

/// Report an event to observers and, in order with messages, to the handler
fn publish<M>(event_tx: &Sender<ClientEvent>, delivery_tx: &Sender<Delivery<M>>, event: ClientEvent) {
    let _ = delivery_tx.send(Delivery::Event(event.clone()));
    let _ = event_tx.send(event);
}

/// Send the handshake, then pump frames until the socket or the client closes
async fn handle_connection<R>(
    ws_stream: WsStream,
    config: &ClientConfig<R>,
    command_rx: &mut mpsc::UnboundedReceiver<ClientCommand>,
    event_tx: &Sender<ClientEvent>,
    delivery_tx: &Sender<Delivery<R::Message>>,
) -> Result<()>
where
    R: MessageRouter,
{
    let (mut write, mut read) = ws_stream.split();

    for frame in &config.handshake {
        write
            .send(ws_message_to_tungstenite(frame))
            .await
            .map_err(|e| SocketError::WebSocket(format!("Failed to send handshake: {}", e)))?;
        debug!("Sent handshake frame");
    }

    loop {
        if !config.shutdown_flag.load(Ordering::Acquire) {
            debug!("Shutdown flag detected in message loop, closing connection");
            let _ = write.close().await;
            return Ok(());
        }

        tokio::select! {
            msg = read.next() => {
                match msg {
                    Some(Ok(msg)) => {
                        let Some(ws_msg) = tungstenite_to_ws_message(msg) else {
                            continue;
                        };

                        // Decoded inline so frame order is the delivery order.
                        match config.router.parse(ws_msg).await {
                            Ok(messages) => {
                                for message in messages {
                                    delivery_tx
                                        .send(Delivery::Message(message))
                                        .map_err(|e| SocketError::ChannelSend(e.to_string()))?;
                                }
                            }
                            Err(e) => {
                                warn!("Dropping undecodable frame: {}", e);
                                publish(event_tx, delivery_tx, ClientEvent::ProtocolError(e.to_string()));
                            }
                        }
                    }
                    Some(Err(e)) => {
                        return Err(SocketError::WebSocket(e.to_string()));
                    }
                    None => {
                        warn!("WebSocket stream closed");
                        return Err(SocketError::ConnectionClosed("Stream ended".into()));
                    }
                }
            }

            // Shutdown command, or the client was dropped
            _ = command_rx.recv() => {
                info!("Received shutdown command");
                let _ = write.close().await;
                return Ok(());
            }
        }
    }
}

fn ws_message_to_tungstenite(msg: &WsMessage) -> Message {
    match msg {
        WsMessage::Text(text) => Message::Text(text.clone()),
        WsMessage::Binary(data) => Message::Binary(data.clone()),
    }
}

fn tungstenite_to_ws_message(msg: Message) -> Option<WsMessage> {
    match msg {
        Message::Text(text) => Some(WsMessage::Text(text)),
        Message::Binary(data) => Some(WsMessage::Binary(data)),
        Message::Ping(_) | Message::Pong(_) | Message::Close(_) | Message::Frame(_) => None,
    }
}
