//! Application layer - feed handling, session state, presentation

pub mod feed;
pub mod overlay;
pub mod presenter;
pub mod session;

pub use feed::{BattleFeedRouter, FeedMessage, SessionFeedHandler};
pub use overlay::{build_session, connect_feed, run_overlay};
pub use presenter::{render_hints, render_title, LogPresenter, OverlayFrame, Presenter};
pub use session::{ReferenceHandle, Session, TickOutcome};
