//! Domain layer: battles, expected values, totals and scores

pub mod battle;
pub mod brackets;
pub mod expected;
pub mod score;
pub mod totals;

pub use battle::{
    BattleError, BattleNormalizer, BattleRecord, NormalizedBattle, StatSet, AVATAR_KEY,
    RANDOM_BATTLE,
};
pub use brackets::{color_for, Bracket, Rgb};
pub use expected::{ExpectedValues, ExpectedValuesDocument, ExpectedValuesTable, VehicleId};
pub use score::{win_rate, wn8, Metric, Score, Wn8Components};
pub use totals::SessionTotals;
