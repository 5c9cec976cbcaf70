//! Presentation boundary

use crate::domain::brackets::{color_for, Rgb};
use crate::domain::score::{Metric, Score};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

pub const DISCONNECTED_HINT: &str = "Disconnected. Could not connect to the battle results server. \
Make sure that WoT is running and that the battle results server mod is installed correctly. \
Restart the overlay to reconnect.";

pub const REFERENCE_FAILED_HINT: &str =
    "Could not fetch the expected values. WN8 is not updated until the overlay is restarted.";

/// Everything a display needs for one refresh
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayFrame {
    pub metric: Metric,
    pub score: Score,
    pub disconnected: bool,
    pub reference_fetch_failed: bool,
    pub battles: u32,
    pub updated_at: DateTime<Utc>,
}

impl OverlayFrame {
    pub fn title(&self) -> String {
        render_title(self.metric, self.score)
    }

    pub fn hints(&self) -> Vec<&'static str> {
        render_hints(self)
    }

    pub fn color(&self) -> Rgb {
        color_for(self.metric, self.score)
    }
}

/// Receives a frame on every tick
pub trait Presenter: Send + 'static {
    fn present(&mut self, frame: &OverlayFrame);
}

/// "Win rate: 52%", "WN8: 1565", or "N/A" in place of the number
pub fn render_title(metric: Metric, score: Score) -> String {
    format!("{}: {}", metric.label(), render_score(metric, score))
}

pub fn render_score(metric: Metric, score: Score) -> String {
    match (metric, score) {
        (_, Score::Unavailable) => "N/A".to_string(),
        (Metric::WinRate, Score::Value(v)) => format!("{:.0}%", v * 100.0),
        (Metric::Wn8, Score::Value(v)) => format!("{:.0}", v),
    }
}

pub fn render_hints(frame: &OverlayFrame) -> Vec<&'static str> {
    let mut hints = Vec::new();
    if frame.disconnected {
        hints.push(DISCONNECTED_HINT);
    }
    if frame.reference_fetch_failed {
        hints.push(REFERENCE_FAILED_HINT);
    }
    hints
}

/// Writes every frame to the log
#[derive(Debug, Default)]
pub struct LogPresenter {
    shown_hints: Vec<&'static str>,
}

impl LogPresenter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Presenter for LogPresenter {
    fn present(&mut self, frame: &OverlayFrame) {
        info!(
            battles = frame.battles,
            color = %frame.color(),
            "[Overlay] {}",
            frame.title()
        );

        for hint in frame.hints() {
            if !self.shown_hints.contains(&hint) {
                warn!("[Overlay] {}", hint);
                self.shown_hints.push(hint);
            }
        }
    }
}
