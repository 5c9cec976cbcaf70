//! Battle results as delivered by the feed, and their canonical per-battle form.

use super::expected::{ExpectedValuesTable, VehicleId};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::ops::AddAssign;
use thiserror::Error;

/// Key under `personal` that carries avatar metadata rather than a vehicle
pub const AVATAR_KEY: &str = "avatar";

/// Battle-mode code of a standard random battle
pub const RANDOM_BATTLE: u32 = 1;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BattleError {
    #[error("Malformed battle record: {0}")]
    Malformed(String),

    #[error("Unknown vehicle: {0}")]
    UnknownVehicle(VehicleId),
}

pub type Result<T> = std::result::Result<T, BattleError>;

/// The four per-battle quantities WN8 compares against expectations
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatSet {
    pub damage_dealt: f64,
    pub spots: f64,
    pub frags: f64,
    pub defence_points: f64,
}

impl AddAssign for StatSet {
    fn add_assign(&mut self, other: Self) {
        self.damage_dealt += other.damage_dealt;
        self.spots += other.spots;
        self.frags += other.frags;
        self.defence_points += other.defence_points;
    }
}

#[derive(Debug, Deserialize)]
struct RawBattleResult {
    #[serde(default)]
    common: RawCommon,
    #[serde(default)]
    personal: HashMap<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCommon {
    bonus_type: Option<u32>,
    winner_team: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVehicleStats {
    damage_dealt: f64,
    spotted: f64,
    kills: f64,
    dropped_capture_points: f64,
}

/// A battle result decoded just far enough to filter and normalize it
#[derive(Debug, Clone)]
pub struct BattleRecord {
    bonus_type: Option<u32>,
    winner_team: Option<u64>,
    team: Option<u64>,
    personal: HashMap<String, Value>,
}

impl BattleRecord {
    pub fn from_value(raw: &Value) -> Result<Self> {
        let raw = RawBattleResult::deserialize(raw)
            .map_err(|e| BattleError::Malformed(e.to_string()))?;

        let team = raw
            .personal
            .get(AVATAR_KEY)
            .and_then(|avatar| avatar.get("team"))
            .and_then(Value::as_u64);

        Ok(Self {
            bonus_type: raw.common.bonus_type,
            winner_team: raw.common.winner_team.as_ref().and_then(Value::as_u64),
            team,
            personal: raw.personal,
        })
    }

    pub fn bonus_type(&self) -> Option<u32> {
        self.bonus_type
    }

    /// Player's team equals the winner team; a missing side is never a win
    pub fn is_victory(&self) -> bool {
        match (self.team, self.winner_team) {
            (Some(team), Some(winner)) => team == winner,
            _ => false,
        }
    }

    /// The single participating vehicle and its raw stats
    pub fn vehicle(&self) -> Result<(VehicleId, StatSet)> {
        let mut keys = self.personal.keys().filter(|key| key.as_str() != AVATAR_KEY);

        let key = keys
            .next()
            .ok_or_else(|| BattleError::Malformed("no vehicle entry".to_string()))?;
        if keys.next().is_some() {
            return Err(BattleError::Malformed(
                "more than one vehicle entry".to_string(),
            ));
        }

        let vehicle_id = key
            .parse::<VehicleId>()
            .map_err(|_| BattleError::Malformed(format!("vehicle id {:?} is not numeric", key)))?;

        let stats = self
            .personal
            .get(key)
            .map(RawVehicleStats::deserialize)
            .transpose()
            .map_err(|e| BattleError::Malformed(format!("vehicle {}: {}", vehicle_id, e)))?
            .ok_or_else(|| BattleError::Malformed("no vehicle entry".to_string()))?;

        Ok((
            vehicle_id,
            StatSet {
                damage_dealt: stats.damage_dealt,
                spots: stats.spotted,
                frags: stats.kills,
                defence_points: stats.dropped_capture_points,
            },
        ))
    }
}

/// Canonical battle ready to be folded into the session totals
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedBattle {
    pub counts_toward_scoring: bool,
    pub is_victory: bool,
    pub vehicle_id: VehicleId,
    pub actual: StatSet,
    /// Zero when scoring without a reference table
    pub expected: StatSet,
    pub expected_victories: f64,
}

/// Battle-mode filter plus field extraction
#[derive(Debug, Clone)]
pub struct BattleNormalizer {
    ranked_modes: BTreeSet<u32>,
}

impl BattleNormalizer {
    pub fn new(ranked_modes: impl IntoIterator<Item = u32>) -> Self {
        Self {
            ranked_modes: ranked_modes.into_iter().collect(),
        }
    }

    pub fn counts_toward_scoring(&self, record: &BattleRecord) -> bool {
        record
            .bonus_type()
            .map_or(false, |mode| self.ranked_modes.contains(&mode))
    }

    /// Extract the canonical battle
    ///
    /// With a reference table the vehicle must be listed in it; an unlisted
    /// vehicle is `UnknownVehicle`, never a zero-filled contribution.
    pub fn normalize(
        &self,
        record: &BattleRecord,
        reference: Option<&ExpectedValuesTable>,
    ) -> Result<NormalizedBattle> {
        let (vehicle_id, actual) = record.vehicle()?;

        let (expected, expected_victories) = match reference {
            Some(table) => {
                let values = table
                    .get(vehicle_id)
                    .ok_or(BattleError::UnknownVehicle(vehicle_id))?;
                (values.stat_set(), values.expected_victories())
            }
            None => (StatSet::default(), 0.0),
        };

        Ok(NormalizedBattle {
            counts_toward_scoring: self.counts_toward_scoring(record),
            is_victory: record.is_victory(),
            vehicle_id,
            actual,
            expected,
            expected_victories,
        })
    }
}

impl Default for BattleNormalizer {
    fn default() -> Self {
        Self::new([RANDOM_BATTLE])
    }
}
