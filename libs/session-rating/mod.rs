//! Session rating
//!
//! Turns a live feed of battle results into a running session score
//! (win rate or WN8) and hands every refresh to a presenter.
//!
//! - `domain`: battle records, expected values, totals, scores, colours
//! - `infrastructure`: configuration, logging, expected-values fetching
//! - `application`: feed dialects, the session accumulator, the overlay runner
//! - `utils`: process lifecycle helpers

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod utils;

pub use application::{
    run_overlay, BattleFeedRouter, FeedMessage, LogPresenter, OverlayFrame, Presenter, Session,
    SessionFeedHandler, TickOutcome,
};
pub use domain::{
    BattleError, BattleNormalizer, BattleRecord, ExpectedValuesTable, Metric, NormalizedBattle,
    Score, SessionTotals, StatSet,
};
pub use infrastructure::{
    init_tracing, ExpectedValuesProvider, FeedProtocol, OverlayConfig, ProviderState,
    ReferenceError, ReferenceSource,
};
pub use utils::ShutdownManager;
