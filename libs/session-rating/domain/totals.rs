use super::battle::{NormalizedBattle, StatSet};

/// Running sums over every battle that counted in this session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionTotals {
    pub actual: StatSet,
    pub expected: StatSet,
    pub victories: u32,
    pub battles: u32,
    pub expected_victories: f64,
}

impl SessionTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one battle; returns false (and changes nothing) for battles that
    /// do not count toward scoring
    pub fn fold(&mut self, battle: &NormalizedBattle) -> bool {
        if !battle.counts_toward_scoring {
            return false;
        }

        self.actual += battle.actual;
        self.expected += battle.expected;
        self.battles += 1;
        if battle.is_victory {
            self.victories += 1;
        }
        self.expected_victories += battle.expected_victories;
        true
    }

    pub fn is_empty(&self) -> bool {
        self.battles == 0
    }
}
