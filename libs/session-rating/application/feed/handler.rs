use super::FeedMessage;
use crate::application::session::{Session, TickOutcome};
use telemetry_socket::{ClientEvent, MessageHandler};
use tracing::{debug, info, warn};

/// Feeds decoded messages and connection changes into the session
pub struct SessionFeedHandler {
    session: Session,
}

impl SessionFeedHandler {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

impl MessageHandler<FeedMessage> for SessionFeedHandler {
    fn handle(&mut self, message: FeedMessage) -> telemetry_socket::Result<()> {
        match message {
            FeedMessage::BattleResult(raw) => {
                if let TickOutcome::Scored(score) = self.session.on_battle_result(&raw) {
                    debug!("[Feed] Score now {:?}", score);
                }
            }
            FeedMessage::ServerError(error) => self.session.on_server_error(&error),
            FeedMessage::Acknowledged => debug!("[Feed] Request acknowledged"),
            FeedMessage::Invalid(e) => warn!("[Feed] Dropped batch element: {}", e),
        }
        Ok(())
    }

    fn handle_connection_change(&mut self, event: &ClientEvent) -> telemetry_socket::Result<()> {
        match event {
            ClientEvent::Connected => info!("[Feed] Connected, waiting for battle results"),
            ClientEvent::Disconnected(reason) => self.session.on_disconnected(reason),
            ClientEvent::ProtocolError(e) => warn!("[Feed] Dropped frame: {}", e),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::presenter::{OverlayFrame, Presenter};
    use crate::domain::battle::BattleNormalizer;
    use crate::domain::score::Metric;
    use serde_json::json;

    struct Discard;

    impl Presenter for Discard {
        fn present(&mut self, _frame: &OverlayFrame) {}
    }

    #[test]
    fn test_routes_messages_and_events() {
        let session = Session::new(Metric::WinRate, BattleNormalizer::default(), Box::new(Discard));
        let mut handler = SessionFeedHandler::new(session);

        let battle = json!({
            "common": {"bonusType": 1, "winnerTeam": 1},
            "personal": {
                "avatar": {"team": 1},
                "1": {"damageDealt": 0, "spotted": 0, "kills": 0, "droppedCapturePoints": 0}
            }
        });

        handler.handle_connection_change(&ClientEvent::Connected).unwrap();
        handler.handle(FeedMessage::BattleResult(battle.clone())).unwrap();
        handler.handle(FeedMessage::ServerError(json!("oops"))).unwrap();
        handler.handle(FeedMessage::Acknowledged).unwrap();
        handler.handle(FeedMessage::Invalid("42".into())).unwrap();
        handler
            .handle_connection_change(&ClientEvent::ProtocolError("bad".into()))
            .unwrap();
        assert_eq!(handler.session().totals().battles, 1);
        assert!(!handler.session().is_disconnected());

        handler
            .handle_connection_change(&ClientEvent::Disconnected("closed".into()))
            .unwrap();
        handler.handle(FeedMessage::BattleResult(battle)).unwrap();
        assert!(handler.session().is_disconnected());
        assert_eq!(handler.session().totals().battles, 1);
    }
}
