//! Session scores computed from the running totals

use super::totals::SessionTotals;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which score the overlay shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    WinRate,
    Wn8,
}

impl Metric {
    pub fn label(&self) -> &'static str {
        match self {
            Metric::WinRate => "Win rate",
            Metric::Wn8 => "WN8",
        }
    }

    /// WN8 compares against per-vehicle expected values; win rate does not
    pub fn needs_reference(&self) -> bool {
        matches!(self, Metric::Wn8)
    }

    pub fn score(&self, totals: &SessionTotals) -> Score {
        match self {
            Metric::WinRate => win_rate(totals),
            Metric::Wn8 => wn8(totals),
        }
    }
}

impl Default for Metric {
    fn default() -> Self {
        Metric::Wn8
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A score, or the explicit absence of one
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Score {
    Value(f64),
    Unavailable,
}

impl Score {
    pub fn value(&self) -> Option<f64> {
        match self {
            Score::Value(v) => Some(*v),
            Score::Unavailable => None,
        }
    }

    fn from_finite(v: f64) -> Self {
        if v.is_finite() {
            Score::Value(v)
        } else {
            Score::Unavailable
        }
    }
}

/// Fraction of counted battles that were won; draws are not wins
pub fn win_rate(totals: &SessionTotals) -> Score {
    if totals.battles == 0 {
        return Score::Unavailable;
    }
    Score::from_finite(f64::from(totals.victories) / f64::from(totals.battles))
}

/// Clamped WN8 ratios, exposed for diagnostics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wn8Components {
    pub r_damage_c: f64,
    pub r_spot_c: f64,
    pub r_frag_c: f64,
    pub r_def_c: f64,
    pub r_win_c: f64,
}

impl Wn8Components {
    /// None if any expected quantity is zero
    pub fn from_totals(totals: &SessionTotals) -> Option<Self> {
        let r_damage = ratio(totals.actual.damage_dealt, totals.expected.damage_dealt)?;
        let r_spot = ratio(totals.actual.spots, totals.expected.spots)?;
        let r_frag = ratio(totals.actual.frags, totals.expected.frags)?;
        let r_def = ratio(totals.actual.defence_points, totals.expected.defence_points)?;
        let r_win = ratio(f64::from(totals.victories), totals.expected_victories)?;

        let r_win_c = normalize(r_win, 0.71).max(0.0);
        let r_damage_c = normalize(r_damage, 0.22).max(0.0);
        let r_frag_c = (r_damage_c + 0.20).min(normalize(r_frag, 0.12)).max(0.0);
        let r_spot_c = (r_damage_c + 0.10).min(normalize(r_spot, 0.38)).max(0.0);
        let r_def_c = (r_damage_c + 0.10).min(normalize(r_def, 0.10)).max(0.0);

        Some(Self {
            r_damage_c,
            r_spot_c,
            r_frag_c,
            r_def_c,
            r_win_c,
        })
    }

    pub fn value(&self) -> f64 {
        980.0 * self.r_damage_c
            + 210.0 * self.r_damage_c * self.r_frag_c
            + 155.0 * self.r_frag_c * self.r_spot_c
            + 75.0 * self.r_def_c * self.r_frag_c
            + 145.0 * self.r_win_c.min(1.8)
    }
}

pub fn wn8(totals: &SessionTotals) -> Score {
    match Wn8Components::from_totals(totals) {
        Some(components) => Score::from_finite(components.value()),
        None => Score::Unavailable,
    }
}

fn ratio(actual: f64, expected: f64) -> Option<f64> {
    if expected == 0.0 {
        None
    } else {
        Some(actual / expected)
    }
}

fn normalize(r: f64, k: f64) -> f64 {
    (r - k) / (1.0 - k)
}
