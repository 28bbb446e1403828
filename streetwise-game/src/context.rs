//! The explicit simulation context every engine operation runs against.

use log::{debug, info};
use std::fmt;

use crate::actions::{self, Action, ActionOutcome};
use crate::day::{self, DayReport};
use crate::effects::{check_status, mood_bad_luck_boost, passive_decay};
use crate::events::{
    self, ChoiceId, ChoiceOption, ChoiceOutcome, EventDescriptor, EventKind, EventPhase,
};
use crate::journal::{Journal, LogTone};
use crate::rng::{RandomSource, Rolls, SeededSource};
use crate::state::{CollapseCause, GameMode, SimulationState};
use crate::tuning::{ModeTuning, TuningTable};
use crate::view::SimulationView;

pub const OPENING_NARRATIVE: &str =
    "You wake up on a cold, grey morning. No day on the street is simple.";

/// Owns one simulation: state, tuning, randomness, journal and the current
/// prompt. Independent contexts can coexist in one process.
pub struct SimContext {
    pub(crate) state: SimulationState,
    pub(crate) tuning: ModeTuning,
    pub(crate) rng: Box<dyn RandomSource>,
    pub(crate) journal: Journal,
    pub(crate) phase: EventPhase,
    pub(crate) narrative: String,
}

impl fmt::Debug for SimContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimContext")
            .field("state", &self.state)
            .field("phase", &self.phase)
            .field("journal_len", &self.journal.len())
            .finish_non_exhaustive()
    }
}

impl SimContext {
    /// Fresh run with the canonical tuning.
    #[must_use]
    pub fn new(rng: impl RandomSource + 'static) -> Self {
        Self::with_tuning(ModeTuning::default(), rng)
    }

    /// Fresh run driven by a seeded ChaCha20 stream.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(SeededSource::from_user_seed(seed))
    }

    #[must_use]
    pub fn with_tuning(tuning: ModeTuning, rng: impl RandomSource + 'static) -> Self {
        Self::restored(SimulationState::fresh(&tuning), tuning, rng)
    }

    /// Continue from a loaded snapshot. The budget is re-derived from the
    /// snapshot's mode under `tuning`.
    #[must_use]
    pub fn restored(
        mut state: SimulationState,
        tuning: ModeTuning,
        rng: impl RandomSource + 'static,
    ) -> Self {
        state.apply_mode(state.mode, &tuning);
        state.clamp_resources();
        let mut journal = Journal::new();
        journal.record(state.day, LogTone::Info, "Game started!");
        Self {
            state,
            tuning,
            rng: Box::new(rng),
            journal,
            phase: EventPhase::Idle,
            narrative: OPENING_NARRATIVE.to_string(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Direct state access for scenario setup. Invariants are re-checked by
    /// the next engine operation.
    pub const fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    #[must_use]
    pub const fn tuning(&self) -> &ModeTuning {
        &self.tuning
    }

    /// Tuning row for the current mode.
    #[must_use]
    pub const fn table(&self) -> &TuningTable {
        self.tuning.table(self.state.mode)
    }

    #[must_use]
    pub const fn journal(&self) -> &Journal {
        &self.journal
    }

    #[must_use]
    pub const fn phase(&self) -> &EventPhase {
        &self.phase
    }

    #[must_use]
    pub fn narrative(&self) -> &str {
        &self.narrative
    }

    /// Kind of the prompt currently awaiting a choice.
    #[must_use]
    pub fn pending_event(&self) -> Option<EventKind> {
        self.phase.pending().map(|descriptor| descriptor.kind)
    }

    /// Choices currently on offer, in display order.
    #[must_use]
    pub fn offered_choices(&self) -> &[ChoiceOption] {
        match self.phase.pending() {
            Some(descriptor) => descriptor.choices.as_slice(),
            None => &[],
        }
    }

    #[must_use]
    pub fn view(&self) -> SimulationView<'_> {
        SimulationView::of(self)
    }

    /// Current bad-luck bias.
    #[must_use]
    pub fn bad_luck(&self) -> f64 {
        mood_bad_luck_boost(&self.state, self.table())
    }

    pub(crate) fn log(&mut self, tone: LogTone, message: impl Into<String>) {
        self.journal.record(self.state.day, tone, message);
    }

    pub(crate) fn chance(&mut self, p: f64) -> bool {
        self.rng.chance(p)
    }

    pub(crate) fn rand_int(&mut self, min: i64, max: i64) -> i64 {
        self.rng.rand_int(min, max)
    }

    pub(crate) fn rand_small(&mut self, min: i32, max: i32) -> i32 {
        self.rng.rand_small(min, max)
    }

    /// Settle a freshly created or restored run and publish today's event.
    /// A run restored already dead only gets its collapse prompt back.
    pub fn start(&mut self) {
        if !self.state.alive {
            let cause = self
                .state
                .collapse_cause()
                .unwrap_or(CollapseCause::Exhaustion);
            let prompt = EventDescriptor::collapse(cause);
            self.narrative = prompt.narrative();
            self.phase = EventPhase::Pending(prompt);
            return;
        }
        passive_decay(self);
        check_status(self);
        events::trigger_daily_event(self, true);
    }

    /// Back to a fresh Normal run with a new journal.
    pub fn reset(&mut self) {
        self.state = SimulationState::fresh(&self.tuning);
        self.journal.clear();
        self.journal
            .record(self.state.day, LogTone::Info, "Game started!");
        self.narrative = OPENING_NARRATIVE.to_string();
        self.phase = EventPhase::Idle;
        info!("run reset");
        self.log(LogTone::Info, "Restarted. Good luck.");
        events::trigger_daily_event(self, true);
    }

    /// Switch difficulty. The remaining budget never grows.
    pub fn set_mode(&mut self, mode: GameMode) {
        let tuning = self.tuning;
        self.state.apply_mode(mode, &tuning);
        debug!(
            "mode {} ({} actions per day, {} left)",
            mode, self.state.actions_per_day, self.state.actions_left
        );
        let label = match mode {
            GameMode::Normal => "Normal",
            GameMode::Chaos => "Chaos",
        };
        self.log(
            LogTone::Info,
            format!(
                "Mode switched to {label} ({} actions per day).",
                self.state.actions_per_day
            ),
        );
    }

    pub fn perform(&mut self, action: Action) -> ActionOutcome {
        actions::perform(self, action)
    }

    pub fn choose(&mut self, choice: ChoiceId) -> ChoiceOutcome {
        events::resolve_choice(self, choice)
    }

    pub fn advance_day(&mut self) -> Option<DayReport> {
        day::advance_day(self)
    }

    pub fn trigger_daily_event(&mut self, force: bool) -> Option<EventKind> {
        events::trigger_daily_event(self, force)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{ROLL_MISS, ScriptedSource};

    #[test]
    fn new_context_is_idle_with_opening_line() {
        let ctx = SimContext::new(ScriptedSource::default());
        assert_eq!(ctx.narrative(), OPENING_NARRATIVE);
        assert!(ctx.offered_choices().is_empty());
        assert_eq!(ctx.journal().len(), 1);
        assert_eq!(ctx.state(), &SimulationState::default());
    }

    #[test]
    fn start_publishes_an_event() {
        let mut ctx = SimContext::new(ScriptedSource::new([0.4]));
        ctx.start();
        assert_eq!(ctx.pending_event(), Some(EventKind::ColdSnap));
        assert_eq!(ctx.offered_choices().len(), 2);
    }

    #[test]
    fn start_on_a_dead_snapshot_offers_restart() {
        let state = SimulationState {
            hunger: 0,
            ..SimulationState::default()
        };
        let mut ctx = SimContext::restored(state, ModeTuning::default(), ScriptedSource::default());
        ctx.start();
        assert!(!ctx.state().alive);
        assert_eq!(ctx.pending_event(), Some(EventKind::Collapse));
    }

    #[test]
    fn mode_switch_is_logged_and_clamped() {
        let mut ctx = SimContext::new(ScriptedSource::default());
        ctx.set_mode(GameMode::Chaos);
        assert_eq!(ctx.state().actions_left, 3);
        assert_eq!(ctx.state().actions_per_day, 4);
        assert!(ctx.journal().contains("Mode switched to Chaos"));
        ctx.state_mut().actions_left = 4;
        ctx.set_mode(GameMode::Normal);
        assert_eq!(ctx.state().actions_left, 3);
    }

    #[test]
    fn reset_restores_fresh_run() {
        let mut ctx = SimContext::new(ScriptedSource::new([0.0]).with_fallback(ROLL_MISS));
        ctx.set_mode(GameMode::Chaos);
        ctx.state_mut().money = 500;
        ctx.state_mut().day = 9;
        ctx.reset();
        assert_eq!(ctx.state().day, 1);
        assert_eq!(ctx.state().money, 0);
        assert_eq!(ctx.state().mode, GameMode::Normal);
        let messages: Vec<&str> = ctx
            .journal()
            .entries()
            .iter()
            .map(|entry| entry.message.as_str())
            .collect();
        assert_eq!(messages[..2], ["Game started!", "Restarted. Good luck."]);
        assert_eq!(ctx.pending_event(), Some(EventKind::ConvenienceStore));
    }
}
