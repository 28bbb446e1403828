//! Read-only projection for a presentation layer.

use serde::Serialize;

use crate::actions::{Action, ActionBlock, availability};
use crate::context::SimContext;
use crate::events::ChoiceOption;
use crate::journal::LogEntry;
use crate::state::{CollapseCause, GameMode, SimulationState};

/// Render money as currency: `$12`, `-$5`.
#[must_use]
pub fn format_money(amount: i64) -> String {
    if amount < 0 {
        format!("-${}", amount.unsigned_abs())
    } else {
        format!("${amount}")
    }
}

/// One action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ControlState {
    pub action: Action,
    pub label: &'static str,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked: Option<ActionBlock>,
}

/// Everything a screen needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationView<'a> {
    pub day_label: String,
    pub money: String,
    /// Resource bars as percentages.
    pub hunger_pct: i32,
    pub health_pct: i32,
    pub mood_pct: i32,
    pub actions: String,
    pub mode: GameMode,
    pub alive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapse: Option<CollapseCause>,
    pub narrative: &'a str,
    pub choices: &'a [ChoiceOption],
    pub controls: Vec<ControlState>,
    pub advance_day_enabled: bool,
    pub journal: &'a [LogEntry],
}

impl<'a> SimulationView<'a> {
    #[must_use]
    pub fn of(ctx: &'a SimContext) -> Self {
        let state = ctx.state();
        Self {
            day_label: format!("Day {}", state.day),
            money: format_money(state.money),
            hunger_pct: state.hunger,
            health_pct: state.health,
            mood_pct: state.mood,
            actions: format!("{}/{}", state.actions_left, state.actions_per_day),
            mode: state.mode,
            alive: state.alive,
            collapse: state.collapse_cause(),
            narrative: ctx.narrative(),
            choices: ctx.offered_choices(),
            controls: controls(state),
            advance_day_enabled: state.alive,
            journal: ctx.journal().entries(),
        }
    }

    #[must_use]
    pub fn control(&self, action: Action) -> Option<&ControlState> {
        self.controls.iter().find(|control| control.action == action)
    }
}

/// Enabled flags for every action, in display order.
#[must_use]
pub fn controls(state: &SimulationState) -> Vec<ControlState> {
    Action::ALL
        .into_iter()
        .map(|action| {
            let blocked = availability(state, action).err();
            ControlState {
                action,
                label: action.label(),
                enabled: blocked.is_none(),
                blocked,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedSource;

    #[test]
    fn money_formatting() {
        assert_eq!(format_money(12), "$12");
        assert_eq!(format_money(0), "$0");
        assert_eq!(format_money(-5), "-$5");
        assert_eq!(format_money(i64::MIN), "-$9223372036854775808");
    }

    #[test]
    fn controls_follow_budget() {
        let mut state = SimulationState::default();
        state.actions_left = 1;
        let flags = controls(&state);
        let enabled = |action: Action| {
            flags
                .iter()
                .find(|control| control.action == action)
                .is_some_and(|control| control.enabled)
        };
        assert!(enabled(Action::Beg));
        assert!(!enabled(Action::Subsidy));

        state.actions_left = 0;
        let flags = controls(&state);
        assert!(
            flags
                .iter()
                .all(|control| control.enabled == (control.action == Action::Eat))
        );
    }

    #[test]
    fn view_reflects_context() {
        let mut ctx = SimContext::new(ScriptedSource::default());
        ctx.state_mut().money = -5;
        ctx.state_mut().alive = false;
        ctx.state_mut().health = 0;
        let view = SimulationView::of(&ctx);
        assert_eq!(view.day_label, "Day 1");
        assert_eq!(view.money, "-$5");
        assert_eq!(view.actions, "3/3");
        assert!(!view.advance_day_enabled);
        assert_eq!(view.collapse, Some(CollapseCause::Exhaustion));
        assert!(view.controls.iter().all(|control| !control.enabled));
        assert_eq!(
            view.control(Action::Eat).and_then(|control| control.blocked),
            Some(ActionBlock::Dead)
        );

        let json = serde_json::to_value(&view).expect("serialize view");
        assert_eq!(json["hungerPct"], 100);
        assert_eq!(json["money"], "-$5");
    }
}
