//! Overlay runner: wires config, feed client and session together

use super::feed::{BattleFeedRouter, SessionFeedHandler};
use super::presenter::Presenter;
use super::session::{ReferenceHandle, Session};
use crate::domain::battle::BattleNormalizer;
use crate::infrastructure::config::OverlayConfig;
use crate::infrastructure::reference::ExpectedValuesProvider;
use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use telemetry_socket::{ClientEvent, WebSocketClient};
use tokio::time::sleep;
use tracing::{info, warn};

/// Build the session described by `config`
///
/// WN8 sessions get an expected-values provider; win-rate sessions never
/// construct one. Must be called from within a tokio runtime.
pub fn build_session(config: &OverlayConfig, presenter: Box<dyn Presenter>) -> Session {
    let metric = config.scoring.metric;
    let normalizer = BattleNormalizer::new(config.scoring.ranked_modes.iter().copied());
    let session = Session::new(metric, normalizer, presenter);

    if metric.needs_reference() {
        let provider = Arc::new(ExpectedValuesProvider::http(config.reference.url.clone()));
        session.with_reference(ReferenceHandle::new(
            provider,
            tokio::runtime::Handle::current(),
        ))
    } else {
        session
    }
}

/// Connect the session to the battle results feed
///
/// The client gets its own shutdown flag because `shutdown()` clears it.
pub async fn connect_feed(config: &OverlayConfig, mut session: Session) -> Result<WebSocketClient> {
    session.present_initial();

    let router = BattleFeedRouter::new(config.feed.protocol);
    let handshake = router.handshake();

    let client = telemetry_socket::builder()
        .url(config.feed.url.clone())
        .router(router, SessionFeedHandler::new(session))
        .handshakes(handshake)
        .shutdown_flag(Arc::new(AtomicBool::new(true)))
        .build()
        .await?;

    Ok(client)
}

/// Handle a WebSocket client event
fn handle_client_event(event: ClientEvent) {
    match event {
        ClientEvent::Connected => info!("[Feed] WebSocket connected"),
        ClientEvent::Disconnected(reason) => {
            warn!("[Feed] WebSocket disconnected ({}); restart the overlay to reconnect", reason)
        }
        ClientEvent::ProtocolError(err) => warn!("[Feed] Protocol error: {}", err),
    }
}

/// Run the overlay until the shutdown flag is cleared
///
/// A feed disconnect does not stop the overlay; the last score stays on
/// display together with the disconnected hint.
pub async fn run_overlay(
    config: &OverlayConfig,
    presenter: Box<dyn Presenter>,
    shutdown_flag: Arc<AtomicBool>,
) -> Result<()> {
    info!("════════════════════════════════════════════════════════════════");
    info!("  STARTING SESSION OVERLAY");
    info!("════════════════════════════════════════════════════════════════");
    info!("  Feed: {}", config.feed.url);
    info!("  Metric: {}", config.scoring.metric);
    info!("════════════════════════════════════════════════════════════════");

    let session = build_session(config, presenter);
    let client = connect_feed(config, session).await?;

    loop {
        if !shutdown_flag.load(Ordering::Acquire) {
            info!("[Feed] Shutdown signal received");
            break;
        }

        match client.try_recv_event() {
            Some(event) => handle_client_event(event),
            None => sleep(Duration::from_millis(50)).await,
        }
    }

    info!("[Feed] Closing connection");
    if let Err(e) = client.shutdown().await {
        warn!("[Feed] Error during shutdown: {}", e);
    }
    info!("[Feed] Overlay stopped");
    Ok(())
}
