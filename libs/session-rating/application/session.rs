//! Session state: the single writer of the running totals

use super::presenter::{OverlayFrame, Presenter};
use crate::domain::battle::{BattleError, BattleNormalizer, BattleRecord};
use crate::domain::expected::ExpectedValuesTable;
use crate::domain::score::{Metric, Score};
use crate::domain::totals::SessionTotals;
use crate::infrastructure::reference::ExpectedValuesProvider;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Expected-values provider plus the runtime used to wait on it from the
/// handler thread
#[derive(Clone)]
pub struct ReferenceHandle {
    provider: Arc<ExpectedValuesProvider>,
    runtime_handle: tokio::runtime::Handle,
}

impl ReferenceHandle {
    pub fn new(provider: Arc<ExpectedValuesProvider>, runtime_handle: tokio::runtime::Handle) -> Self {
        Self {
            provider,
            runtime_handle,
        }
    }
}

/// What happened to one incoming battle result
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Folded into the totals; carries the new score
    Scored(Score),
    /// Not a ranked battle, or the feed is already disconnected
    Ignored,
    /// Malformed record or unknown vehicle
    Skipped(BattleError),
    /// Expected values could not be loaded
    ReferenceUnavailable,
}

/// Session accumulator
///
/// Owned by exactly one thread. Every scored battle folds into the totals,
/// recomputes the score and presents a frame, in that order.
pub struct Session {
    metric: Metric,
    normalizer: BattleNormalizer,
    totals: SessionTotals,
    disconnected: bool,
    reference_fetch_failed: bool,
    reference: Option<ReferenceHandle>,
    presenter: Box<dyn Presenter>,
}

impl Session {
    pub fn new(metric: Metric, normalizer: BattleNormalizer, presenter: Box<dyn Presenter>) -> Self {
        Self {
            metric,
            normalizer,
            totals: SessionTotals::new(),
            disconnected: false,
            reference_fetch_failed: false,
            reference: None,
            presenter,
        }
    }

    pub fn with_reference(mut self, reference: ReferenceHandle) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn totals(&self) -> &SessionTotals {
        &self.totals
    }

    pub fn score(&self) -> Score {
        self.metric.score(&self.totals)
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    pub fn reference_fetch_failed(&self) -> bool {
        self.reference_fetch_failed
    }

    pub fn current_frame(&self) -> OverlayFrame {
        OverlayFrame {
            metric: self.metric,
            score: self.score(),
            disconnected: self.disconnected,
            reference_fetch_failed: self.reference_fetch_failed,
            battles: self.totals.battles,
            updated_at: Utc::now(),
        }
    }

    /// Show the empty score before any battle arrives
    pub fn present_initial(&mut self) {
        self.present();
    }

    pub fn on_battle_result(&mut self, raw: &Value) -> TickOutcome {
        if self.disconnected {
            debug!("[Session] Ignoring battle result after disconnect");
            return TickOutcome::Ignored;
        }

        let record = match BattleRecord::from_value(raw) {
            Ok(record) => record,
            Err(e) => {
                warn!("[Session] Skipping battle: {}", e);
                return TickOutcome::Skipped(e);
            }
        };

        if !self.normalizer.counts_toward_scoring(&record) {
            debug!(bonus_type = ?record.bonus_type(), "[Session] Ignoring unranked battle");
            return TickOutcome::Ignored;
        }

        let reference = if self.metric.needs_reference() {
            match self.resolve_reference() {
                Some(table) => Some(table),
                None => return TickOutcome::ReferenceUnavailable,
            }
        } else {
            None
        };

        let battle = match self.normalizer.normalize(&record, reference.as_deref()) {
            Ok(battle) => battle,
            Err(e) => {
                warn!("[Session] Skipping battle: {}", e);
                return TickOutcome::Skipped(e);
            }
        };

        self.totals.fold(&battle);
        let score = self.score();
        info!(
            vehicle_id = battle.vehicle_id,
            victory = battle.is_victory,
            battles = self.totals.battles,
            "[Session] Battle scored"
        );
        self.present();
        TickOutcome::Scored(score)
    }

    pub fn on_server_error(&self, error: &Value) {
        error!("[Session] Battle results server error: {}", error);
    }

    /// Latch the disconnected flag; only the first call presents
    pub fn on_disconnected(&mut self, reason: &str) {
        if self.disconnected {
            return;
        }
        warn!("[Session] Feed disconnected: {}", reason);
        self.disconnected = true;
        self.present();
    }

    fn resolve_reference(&mut self) -> Option<Arc<ExpectedValuesTable>> {
        if self.reference_fetch_failed {
            return None;
        }

        let result = match &self.reference {
            Some(handle) => {
                let provider = Arc::clone(&handle.provider);
                handle
                    .runtime_handle
                    .block_on(async move { provider.fetch_cached().await })
                    .map_err(|e| e.to_string())
            }
            None => Err("no expected values source configured".to_string()),
        };

        match result {
            Ok(table) => Some(table),
            Err(e) => {
                error!("[Session] Cannot score WN8: {}", e);
                self.reference_fetch_failed = true;
                self.present();
                None
            }
        }
    }

    fn present(&mut self) {
        let frame = self.current_frame();
        self.presenter.present(&frame);
    }
}
