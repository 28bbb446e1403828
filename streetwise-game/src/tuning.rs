//! Mode-keyed tuning tables.
//!
//! Each [`GameMode`] maps onto one immutable [`TuningTable`]. The canonical rows
//! are compiled in; a [`ModeTuning`] may also be loaded from JSON for balance
//! experiments, in which case it is validated before use.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{RESOURCE_MAX, RESOURCE_MIN};
use crate::state::GameMode;

/// Per-mode pacing and risk constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TuningTable {
    pub actions_per_day: u32,
    pub daily_hunger_decay_min: i32,
    pub daily_hunger_decay_max: i32,
    /// Probability of a second, forced event after a day advance.
    pub extra_event_chance: f64,
    /// Flat bias added to every mood-derived bad-luck roll.
    pub bad_luck_boost: f64,
    pub low_hunger_threshold: i32,
    /// Health regained per day while well fed.
    pub health_regen: i32,
}

impl TuningTable {
    /// Canonical Normal-mode row.
    #[must_use]
    pub const fn normal() -> Self {
        Self {
            actions_per_day: 3,
            daily_hunger_decay_min: 12,
            daily_hunger_decay_max: 18,
            extra_event_chance: 0.12,
            bad_luck_boost: 0.0,
            low_hunger_threshold: 20,
            health_regen: 3,
        }
    }

    /// Canonical Chaos-mode row.
    #[must_use]
    pub const fn chaos() -> Self {
        Self {
            actions_per_day: 4,
            daily_hunger_decay_min: 16,
            daily_hunger_decay_max: 24,
            extra_event_chance: 0.35,
            bad_luck_boost: 0.10,
            low_hunger_threshold: 25,
            health_regen: 2,
        }
    }

    /// Check the row's internal consistency.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self, mode: GameMode) -> Result<(), TuningError> {
        if self.actions_per_day == 0 {
            return Err(TuningError::NoActions { mode });
        }
        if self.daily_hunger_decay_min < 0
            || self.daily_hunger_decay_min > self.daily_hunger_decay_max
        {
            return Err(TuningError::DecayRange {
                mode,
                min: self.daily_hunger_decay_min,
                max: self.daily_hunger_decay_max,
            });
        }
        for (field, value) in [
            ("extraEventChance", self.extra_event_chance),
            ("badLuckBoost", self.bad_luck_boost),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::Probability { mode, field, value });
            }
        }
        if !(RESOURCE_MIN..=RESOURCE_MAX).contains(&self.low_hunger_threshold) {
            return Err(TuningError::Threshold {
                mode,
                value: self.low_hunger_threshold,
            });
        }
        if self.health_regen < 0 {
            return Err(TuningError::NegativeRegen {
                mode,
                value: self.health_regen,
            });
        }
        Ok(())
    }
}

/// Errors raised when a tuning table violates its invariants.
#[derive(Debug, Error, PartialEq)]
pub enum TuningError {
    #[error("{mode} mode must allow at least one action per day")]
    NoActions { mode: GameMode },
    #[error("{mode} hunger decay range invalid (min {min} > max {max} or negative)")]
    DecayRange { mode: GameMode, min: i32, max: i32 },
    #[error("{mode} {field} must be between 0 and 1 (got {value:.3})")]
    Probability {
        mode: GameMode,
        field: &'static str,
        value: f64,
    },
    #[error("{mode} low hunger threshold must be within 0..=100 (got {value})")]
    Threshold { mode: GameMode, value: i32 },
    #[error("{mode} health regen cannot be negative (got {value})")]
    NegativeRegen { mode: GameMode, value: i32 },
    #[error("tuning JSON invalid: {0}")]
    Json(String),
}

/// The full two-row tuning table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeTuning {
    #[serde(default = "TuningTable::normal")]
    pub normal: TuningTable,
    #[serde(default = "TuningTable::chaos")]
    pub chaos: TuningTable,
}

impl Default for ModeTuning {
    fn default() -> Self {
        Self {
            normal: TuningTable::normal(),
            chaos: TuningTable::chaos(),
        }
    }
}

impl ModeTuning {
    /// Parse and validate a tuning override. Missing rows fall back to the
    /// canonical tables.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a row is inconsistent.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self =
            serde_json::from_str(json).map_err(|err| TuningError::Json(err.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Validate both rows.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> Result<(), TuningError> {
        self.normal.validate(GameMode::Normal)?;
        self.chaos.validate(GameMode::Chaos)
    }

    #[must_use]
    pub const fn table(&self, mode: GameMode) -> &TuningTable {
        match mode {
            GameMode::Normal => &self.normal,
            GameMode::Chaos => &self.chaos,
        }
    }
}

/// Canonical table lookup.
#[must_use]
pub const fn tuning_for(mode: GameMode) -> TuningTable {
    match mode {
        GameMode::Normal => TuningTable::normal(),
        GameMode::Chaos => TuningTable::chaos(),
    }
}
