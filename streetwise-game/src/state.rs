use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    RESOURCE_MAX, RESOURCE_MIN, START_DAY, START_HEALTH, START_HUNGER, START_LAST_EVENT_DAY,
    START_MONEY, START_MOOD, SUBSIDY_NEVER_CLAIMED,
};
use crate::numbers::round_f64_to_i64;
use crate::tuning::{ModeTuning, TuningTable};

/// Difficulty profile selecting the tuning row and event pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Normal,
    /// Older saves spell this mode `fentanyl`.
    #[serde(alias = "fentanyl")]
    Chaos,
}

impl GameMode {
    pub const ALL: [Self; 2] = [Self::Normal, Self::Chaos];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Chaos => "chaos",
        }
    }

    #[must_use]
    pub const fn is_chaos(self) -> bool {
        matches!(self, Self::Chaos)
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "chaos" | "fentanyl" => Ok(Self::Chaos),
            _ => Err(()),
        }
    }
}

impl From<GameMode> for String {
    fn from(value: GameMode) -> Self {
        value.as_str().to_string()
    }
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollapseCause {
    /// Hunger reached zero.
    Starvation,
    /// Health reached zero.
    Exhaustion,
}

impl CollapseCause {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Starvation => "starvation",
            Self::Exhaustion => "exhaustion",
        }
    }
}

/// Clamp a resource value into `0..=100`.
#[must_use]
pub const fn clamp_resource(value: i32) -> i32 {
    if value < RESOURCE_MIN {
        RESOURCE_MIN
    } else if value > RESOURCE_MAX {
        RESOURCE_MAX
    } else {
        value
    }
}

/// The whole mutable simulation aggregate. This is also the snapshot schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationState {
    pub day: u32,
    pub money: i64,
    pub hunger: i32,
    pub health: i32,
    pub mood: i32,
    pub mode: GameMode,
    pub actions_per_day: u32,
    pub actions_left: u32,
    pub alive: bool,
    pub last_event_day: i64,
    pub last_subsidy_day: i64,
}

impl Default for SimulationState {
    fn default() -> Self {
        let tuning = TuningTable::normal();
        Self {
            day: START_DAY,
            money: START_MONEY,
            hunger: START_HUNGER,
            health: START_HEALTH,
            mood: START_MOOD,
            mode: GameMode::Normal,
            actions_per_day: tuning.actions_per_day,
            actions_left: tuning.actions_per_day,
            alive: true,
            last_event_day: START_LAST_EVENT_DAY,
            last_subsidy_day: SUBSIDY_NEVER_CLAIMED,
        }
    }
}

impl SimulationState {
    /// Default state with the Normal budget taken from `tuning`.
    #[must_use]
    pub fn fresh(tuning: &ModeTuning) -> Self {
        let actions = tuning.table(GameMode::Normal).actions_per_day;
        Self {
            actions_per_day: actions,
            actions_left: actions,
            ..Self::default()
        }
    }

    /// Clamp hunger, health and mood into range.
    pub fn clamp_resources(&mut self) {
        self.hunger = clamp_resource(self.hunger);
        self.health = clamp_resource(self.health);
        self.mood = clamp_resource(self.mood);
    }

    /// Switch mode, re-deriving the action budget. The remaining budget is
    /// clamped to the new ceiling and never grows.
    pub fn apply_mode(&mut self, mode: GameMode, tuning: &ModeTuning) {
        self.mode = mode;
        self.actions_per_day = tuning.table(mode).actions_per_day;
        self.actions_left = self.actions_left.min(self.actions_per_day);
    }

    /// Spend action points, saturating at zero.
    pub fn spend_actions(&mut self, cost: u32) {
        self.actions_left = self
            .actions_left
            .saturating_sub(cost)
            .min(self.actions_per_day);
    }

    #[must_use]
    pub fn days_since_subsidy(&self) -> i64 {
        i64::from(self.day).saturating_sub(self.last_subsidy_day)
    }

    /// Whether hunger or health has run out.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.health <= RESOURCE_MIN || self.hunger <= RESOURCE_MIN
    }

    /// Cause of the collapse, if the run has ended. Starvation wins ties.
    #[must_use]
    pub const fn collapse_cause(&self) -> Option<CollapseCause> {
        if self.alive {
            return None;
        }
        if self.hunger <= RESOURCE_MIN {
            Some(CollapseCause::Starvation)
        } else if self.health <= RESOURCE_MIN {
            Some(CollapseCause::Exhaustion)
        } else {
            None
        }
    }
}

/// Merge a possibly incomplete restored snapshot over the default state.
///
/// Never fails: anything missing or malformed falls back to its default,
/// resources are clamped, the action budget is re-derived from the mode and
/// `alive` follows JSON truthiness.
#[must_use]
pub fn apply_defaults(raw: &Value, tuning: &ModeTuning) -> SimulationState {
    let mut state = SimulationState::fresh(tuning);
    let Some(fields) = raw.as_object() else {
        return state;
    };

    if let Some(day) = read_int(fields, "day") {
        state.day = u32::try_from(day.max(1)).unwrap_or(u32::MAX);
    }
    if let Some(money) = read_int(fields, "money") {
        state.money = money;
    }
    if let Some(hunger) = read_resource(fields, "hunger") {
        state.hunger = hunger;
    }
    if let Some(health) = read_resource(fields, "health") {
        state.health = health;
    }
    if let Some(mood) = read_resource(fields, "mood") {
        state.mood = mood;
    }
    let mode = fields
        .get("mode")
        .and_then(Value::as_str)
        .and_then(|raw_mode| raw_mode.parse().ok())
        .unwrap_or_default();
    if let Some(left) = read_int(fields, "actionsLeft") {
        state.actions_left = u32::try_from(left.max(0)).unwrap_or(u32::MAX);
    }
    // A stored actionsPerDay is ignored; the mode decides it.
    state.apply_mode(mode, tuning);
    if let Some(alive) = fields.get("alive") {
        state.alive = truthy(alive);
    }
    if let Some(day) = read_int(fields, "lastEventDay") {
        state.last_event_day = day;
    }
    if let Some(day) = read_int(fields, "lastSubsidyDay") {
        state.last_subsidy_day = day;
    }
    state.clamp_resources();
    state
}

fn read_int(fields: &Map<String, Value>, key: &str) -> Option<i64> {
    match fields.get(key)? {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(round_f64_to_i64)),
        Value::String(text) => text.trim().parse::<f64>().ok().and_then(round_f64_to_i64),
        _ => None,
    }
}

fn read_resource(fields: &Map<String, Value>, key: &str) -> Option<i32> {
    read_int(fields, key).map(|value| {
        let bounded = value.clamp(i64::from(RESOURCE_MIN), i64::from(RESOURCE_MAX));
        i32::try_from(bounded).unwrap_or(RESOURCE_MIN)
    })
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn clamp_resource_bounds() {
        assert_eq!(clamp_resource(-5), 0);
        assert_eq!(clamp_resource(55), 55);
        assert_eq!(clamp_resource(140), 100);
    }

    #[test]
    fn defaults_match_fresh_run() {
        let state = SimulationState::default();
        assert_eq!(state.day, 1);
        assert_eq!(state.money, 0);
        assert_eq!((state.hunger, state.health, state.mood), (100, 100, 50));
        assert_eq!(state.mode, GameMode::Normal);
        assert_eq!((state.actions_left, state.actions_per_day), (3, 3));
        assert!(state.alive);
        assert_eq!(state.last_event_day, 0);
        assert_eq!(state.last_subsidy_day, -999);
    }

    #[test]
    fn mode_switch_never_grows_budget() {
        let tuning = ModeTuning::default();
        let mut state = SimulationState::default();
        state.apply_mode(GameMode::Chaos, &tuning);
        assert_eq!(state.actions_per_day, 4);
        assert_eq!(state.actions_left, 3);

        state.actions_left = 4;
        state.apply_mode(GameMode::Normal, &tuning);
        assert_eq!(state.actions_per_day, 3);
        assert_eq!(state.actions_left, 3);
    }

    #[test]
    fn apply_defaults_fills_missing_and_clamps() {
        let tuning = ModeTuning::default();
        let raw = json!({
            "day": 9,
            "hunger": 140,
            "health": -3,
            "mode": "fentanyl",
            "actionsLeft": 11,
            "alive": 1
        });
        let state = apply_defaults(&raw, &tuning);
        assert_eq!(state.day, 9);
        assert_eq!(state.money, 0);
        assert_eq!(state.hunger, 100);
        assert_eq!(state.health, 0);
        assert_eq!(state.mood, 50);
        assert_eq!(state.mode, GameMode::Chaos);
        assert_eq!(state.actions_per_day, 4);
        assert_eq!(state.actions_left, 4);
        assert!(state.alive);
        assert_eq!(state.last_subsidy_day, -999);
    }

    #[test]
    fn apply_defaults_tolerates_garbage() {
        let tuning = ModeTuning::default();
        let raw = json!({
            "day": "soon",
            "money": 12.6,
            "mood": null,
            "mode": 42,
            "actionsPerDay": 99,
            "alive": "",
            "lastEventDay": [1, 2]
        });
        let state = apply_defaults(&raw, &tuning);
        assert_eq!(state.day, 1);
        assert_eq!(state.money, 13);
        assert_eq!(state.mood, 50);
        assert_eq!(state.mode, GameMode::Normal);
        assert_eq!(state.actions_per_day, 3);
        assert_eq!(state.actions_left, 3);
        assert!(!state.alive);
        assert_eq!(state.last_event_day, 0);

        let from_array = apply_defaults(&json!([1, 2, 3]), &tuning);
        assert_eq!(from_array, SimulationState::default());
    }

    #[test]
    fn snapshot_uses_camel_case_keys() {
        let value = serde_json::to_value(SimulationState::default()).unwrap();
        assert_eq!(value["actionsPerDay"], 3);
        assert_eq!(value["lastSubsidyDay"], -999);
        assert_eq!(value["mode"], "normal");
    }

    #[test]
    fn collapse_cause_prefers_starvation() {
        let mut state = SimulationState {
            alive: false,
            hunger: 0,
            health: 0,
            ..SimulationState::default()
        };
        assert_eq!(state.collapse_cause(), Some(CollapseCause::Starvation));
        state.hunger = 40;
        assert_eq!(state.collapse_cause(), Some(CollapseCause::Exhaustion));
        state.alive = true;
        assert_eq!(state.collapse_cause(), None);
    }
}
