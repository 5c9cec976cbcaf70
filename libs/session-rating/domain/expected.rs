//! Per-vehicle expected performance values

use super::battle::StatSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type VehicleId = u32;

/// One row of the published expected-values document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedValues {
    #[serde(rename = "IDNum")]
    pub vehicle_id: VehicleId,
    #[serde(rename = "expDamage")]
    pub exp_damage: f64,
    #[serde(rename = "expSpot")]
    pub exp_spot: f64,
    #[serde(rename = "expFrag")]
    pub exp_frag: f64,
    #[serde(rename = "expDef")]
    pub exp_def: f64,
    /// Percentage, e.g. 52.3
    #[serde(rename = "expWinRate")]
    pub exp_win_rate: f64,
}

impl ExpectedValues {
    pub fn stat_set(&self) -> StatSet {
        StatSet {
            damage_dealt: self.exp_damage,
            spots: self.exp_spot,
            frags: self.exp_frag,
            defence_points: self.exp_def,
        }
    }

    /// Expected win rate as a fraction of one battle
    pub fn expected_victories(&self) -> f64 {
        self.exp_win_rate / 100.0
    }
}

/// Top-level shape of the expected-values document
#[derive(Debug, Clone, Deserialize)]
pub struct ExpectedValuesDocument {
    pub data: Vec<ExpectedValues>,
}

/// Expected values keyed by vehicle id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpectedValuesTable {
    by_vehicle: HashMap<VehicleId, ExpectedValues>,
}

impl ExpectedValuesTable {
    /// Later rows win when an id repeats
    pub fn from_entries(entries: impl IntoIterator<Item = ExpectedValues>) -> Self {
        Self {
            by_vehicle: entries
                .into_iter()
                .map(|values| (values.vehicle_id, values))
                .collect(),
        }
    }

    pub fn get(&self, vehicle_id: VehicleId) -> Option<&ExpectedValues> {
        self.by_vehicle.get(&vehicle_id)
    }

    pub fn len(&self) -> usize {
        self.by_vehicle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_vehicle.is_empty()
    }
}

impl From<ExpectedValuesDocument> for ExpectedValuesTable {
    fn from(document: ExpectedValuesDocument) -> Self {
        Self::from_entries(document.data)
    }
}
