use log::debug;

use crate::actions::{Action, ActionOutcome};
use crate::context::SimContext;
use crate::day::DayReport;
use crate::events::{ChoiceId, ChoiceOutcome};
use crate::rng::RandomSource;
use crate::state::GameMode;
use crate::storage::{Persistence, SnapshotStore};
use crate::tuning::ModeTuning;
use crate::view::SimulationView;

/// High-level session binding a simulation context to persistent storage.
///
/// Every externally triggered operation saves the snapshot once it has
/// finished; persistence failures never interrupt play.
#[derive(Debug)]
pub struct Session<S: SnapshotStore> {
    ctx: SimContext,
    persistence: Persistence<S>,
}

impl<S: SnapshotStore> Session<S> {
    /// Resume the stored run if there is one, otherwise start fresh.
    #[must_use]
    pub fn open(store: S, tuning: ModeTuning, rng: impl RandomSource + 'static) -> Self {
        let persistence = Persistence::new(store);
        let ctx = match persistence.load(&tuning) {
            Some(state) => {
                debug!("resuming stored run on day {}", state.day);
                SimContext::restored(state, tuning, rng)
            }
            None => SimContext::with_tuning(tuning, rng),
        };
        let mut session = Self { ctx, persistence };
        session.ctx.start();
        session.persist();
        session
    }

    #[must_use]
    pub const fn context(&self) -> &SimContext {
        &self.ctx
    }

    #[must_use]
    pub const fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    #[must_use]
    pub fn view(&self) -> SimulationView<'_> {
        self.ctx.view()
    }

    pub fn perform(&mut self, action: Action) -> ActionOutcome {
        let outcome = self.ctx.perform(action);
        self.persist();
        outcome
    }

    pub fn choose(&mut self, choice: ChoiceId) -> ChoiceOutcome {
        let outcome = self.ctx.choose(choice);
        if outcome == ChoiceOutcome::Restarted {
            self.persistence.clear();
        }
        self.persist();
        outcome
    }

    pub fn advance_day(&mut self) -> Option<DayReport> {
        let report = self.ctx.advance_day();
        self.persist();
        report
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        self.ctx.set_mode(mode);
        self.persist();
    }

    /// Wipe the stored snapshot and begin a fresh run.
    pub fn reset(&mut self) {
        self.persistence.clear();
        self.ctx.reset();
        self.persist();
    }

    #[must_use]
    pub fn into_context(self) -> SimContext {
        self.ctx
    }

    fn persist(&self) {
        self.persistence.save(self.ctx.state());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SAVE_KEY;
    use crate::events::EventKind;
    use crate::rng::{ROLL_MISS, ScriptedSource, roll_selecting};
    use crate::storage::MemoryStore;

    #[test]
    fn operations_persist_snapshots() {
        let store = MemoryStore::new();
        let rolls = [
            0.0,
            roll_selecting(10, 0, 35),
            roll_selecting(1, -3, 4),
            ROLL_MISS,
        ];
        let mut session = Session::open(
            store.clone(),
            ModeTuning::default(),
            ScriptedSource::new(rolls),
        );
        assert!(store.contains(SAVE_KEY));
        session.perform(Action::Beg);

        let reopened = Session::open(
            store.clone(),
            ModeTuning::default(),
            ScriptedSource::default(),
        );
        let state = reopened.context().state();
        assert_eq!(state.money, 10);
        assert_eq!(state.actions_left, 2);
        assert_eq!(state.hunger, 95);
    }

    #[test]
    fn restart_choice_clears_and_reseeds_the_save() {
        let store = MemoryStore::new();
        store
            .write(SAVE_KEY, r#"{"day": 12, "money": 40, "hunger": 0, "alive": true}"#)
            .expect("infallible");
        let mut session = Session::open(
            store.clone(),
            ModeTuning::default(),
            ScriptedSource::default(),
        );
        assert!(!session.context().state().alive);
        assert_eq!(session.choose(ChoiceId::Restart), ChoiceOutcome::Restarted);
        assert!(session.context().state().alive);

        let reopened = Session::open(store, ModeTuning::default(), ScriptedSource::default());
        assert_eq!(reopened.context().state().day, 1);
        assert_eq!(reopened.context().state().money, 0);
    }

    #[test]
    fn dead_snapshot_reopens_on_the_collapse_prompt() {
        let store = MemoryStore::new();
        store
            .write(
                SAVE_KEY,
                r#"{"day": 12, "hunger": 0, "health": 40, "alive": false}"#,
            )
            .expect("infallible");
        let mut session = Session::open(
            store.clone(),
            ModeTuning::default(),
            ScriptedSource::default(),
        );
        let ctx = session.context();
        assert!(!ctx.state().alive);
        assert_eq!(ctx.state().health, 40);
        assert_eq!(ctx.pending_event(), Some(EventKind::Collapse));
        let offered: Vec<ChoiceId> = ctx.offered_choices().iter().map(|option| option.id).collect();
        assert_eq!(offered, vec![ChoiceId::Restart]);

        let again = Session::open(
            store.clone(),
            ModeTuning::default(),
            ScriptedSource::default(),
        );
        assert_eq!(again.context().state().health, 40);

        assert_eq!(session.choose(ChoiceId::Restart), ChoiceOutcome::Restarted);
        assert!(session.context().state().alive);
        let reopened = Session::open(store, ModeTuning::default(), ScriptedSource::default());
        assert_eq!(reopened.context().state().day, 1);
        assert!(reopened.context().state().alive);
    }

    #[test]
    fn mode_changes_survive_reload() {
        let store = MemoryStore::new();
        let mut session = Session::open(
            store.clone(),
            ModeTuning::default(),
            ScriptedSource::default(),
        );
        session.set_mode(GameMode::Chaos);
        let reopened = Session::open(store, ModeTuning::default(), ScriptedSource::default());
        assert_eq!(reopened.context().state().mode, GameMode::Chaos);
        assert_eq!(reopened.context().state().actions_per_day, 4);
        assert_eq!(reopened.context().state().actions_left, 3);
    }
}
