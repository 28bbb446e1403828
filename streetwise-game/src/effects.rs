//! Effect resolution, passive decay and the death check.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::constants::{
    BAD_LUCK_MOOD_CAP, BAD_LUCK_MOOD_DIVISOR, BAD_LUCK_MOOD_PIVOT, RESOURCE_MAX,
    STARVING_MILD_DAMAGE, STARVING_MODERATE_DAMAGE, STARVING_MODERATE_HUNGER,
    STARVING_SEVERE_DAMAGE, STARVING_SEVERE_HUNGER, WELL_FED_HUNGER,
};
use crate::context::SimContext;
use crate::events::{EventDescriptor, EventPhase};
use crate::journal::LogTone;
use crate::state::{CollapseCause, SimulationState};
use crate::tuning::TuningTable;

/// Optional resource deltas applied together under one log message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectBundle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub money: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hunger: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<i32>,
}

impl EffectBundle {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            money: None,
            hunger: None,
            health: None,
            mood: None,
        }
    }

    #[must_use]
    pub const fn money(mut self, delta: i64) -> Self {
        self.money = Some(delta);
        self
    }

    #[must_use]
    pub const fn hunger(mut self, delta: i32) -> Self {
        self.hunger = Some(delta);
        self
    }

    #[must_use]
    pub const fn health(mut self, delta: i32) -> Self {
        self.health = Some(delta);
        self
    }

    #[must_use]
    pub const fn mood(mut self, delta: i32) -> Self {
        self.mood = Some(delta);
        self
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.money.is_none() && self.hunger.is_none() && self.health.is_none() && self.mood.is_none()
    }

    /// Add the present deltas to `state` and clamp the bounded resources.
    pub fn apply_to(&self, state: &mut SimulationState) {
        if let Some(delta) = self.money {
            state.money = state.money.saturating_add(delta);
        }
        if let Some(delta) = self.hunger {
            state.hunger = state.hunger.saturating_add(delta);
        }
        if let Some(delta) = self.health {
            state.health = state.health.saturating_add(delta);
        }
        if let Some(delta) = self.mood {
            state.mood = state.mood.saturating_add(delta);
        }
        state.clamp_resources();
    }
}

/// Render a delta with an explicit sign, e.g. `+3` or `-2`.
#[must_use]
pub fn signed(delta: i64) -> String {
    if delta >= 0 {
        format!("+{delta}")
    } else {
        delta.to_string()
    }
}

/// Apply `bundle` and log `message` at info tone.
///
/// Returns `false` without touching anything once the run has ended.
pub fn apply_effects(ctx: &mut SimContext, bundle: EffectBundle, message: &str) -> bool {
    apply_effects_with_tone(ctx, bundle, LogTone::Info, message)
}

/// Apply `bundle`, log `message` at `tone`, then run the death check.
pub fn apply_effects_with_tone(
    ctx: &mut SimContext,
    bundle: EffectBundle,
    tone: LogTone,
    message: &str,
) -> bool {
    if !ctx.state.alive {
        return false;
    }
    bundle.apply_to(&mut ctx.state);
    ctx.log(tone, message);
    check_status(ctx);
    true
}

/// Mood-derived risk bias plus the mode's flat boost, in `[0, 0.28]` for the
/// canonical tables.
#[must_use]
pub fn mood_bad_luck_boost(state: &SimulationState, table: &TuningTable) -> f64 {
    let missing = BAD_LUCK_MOOD_PIVOT - f64::from(state.mood);
    (missing / BAD_LUCK_MOOD_DIVISOR).clamp(0.0, BAD_LUCK_MOOD_CAP) + table.bad_luck_boost
}

/// Starvation damage for the given hunger level, if any.
#[must_use]
pub const fn starvation_damage(hunger: i32, threshold: i32) -> Option<i32> {
    if hunger > threshold {
        None
    } else if hunger <= STARVING_SEVERE_HUNGER {
        Some(STARVING_SEVERE_DAMAGE)
    } else if hunger <= STARVING_MODERATE_HUNGER {
        Some(STARVING_MODERATE_DAMAGE)
    } else {
        Some(STARVING_MILD_DAMAGE)
    }
}

/// Starvation damage when hungry, slow healing when well fed.
pub fn passive_decay(ctx: &mut SimContext) {
    if !ctx.state.alive {
        return;
    }
    let table = *ctx.table();
    if let Some(damage) = starvation_damage(ctx.state.hunger, table.low_hunger_threshold) {
        ctx.state.health = (ctx.state.health - damage).max(0);
        ctx.log(
            LogTone::Warning,
            format!("Hunger is wearing your body down (health -{damage})."),
        );
    }

    if ctx.state.hunger >= WELL_FED_HUNGER && ctx.state.health < RESOURCE_MAX {
        ctx.state.health = (ctx.state.health + table.health_regen).min(RESOURCE_MAX);
    }
}

/// End the run if hunger or health has run out. Returns `true` only on the
/// call that actually ends it.
pub fn check_status(ctx: &mut SimContext) -> bool {
    if !ctx.state.alive || !ctx.state.is_depleted() {
        return false;
    }
    ctx.state.alive = false;
    let cause = ctx
        .state
        .collapse_cause()
        .unwrap_or(CollapseCause::Exhaustion);
    info!("run ended on day {} ({})", ctx.state.day, cause.key());
    let prompt = EventDescriptor::collapse(cause);
    ctx.narrative = prompt.narrative();
    ctx.phase = EventPhase::Pending(prompt);
    ctx.log(LogTone::Critical, "Game over. You didn't make it.");
    debug!("offering restart only");
    true
}
