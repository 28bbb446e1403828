//! Streetwise Game Engine
//!
//! Platform-agnostic core logic for Streetwise, a turn-based street survival
//! simulation. A player manages money, hunger, health and mood across days
//! with a limited action budget while random daily events push them around.
//! This crate provides every mechanic without UI or platform dependencies;
//! a presentation layer reads [`SimulationView`] and calls back into
//! [`Session`] or [`SimContext`].

pub mod actions;
pub mod constants;
pub mod context;
pub mod day;
pub mod effects;
pub mod events;
pub mod journal;
pub mod numbers;
pub mod rng;
pub mod session;
pub mod state;
pub mod storage;
pub mod tuning;
pub mod view;

// Re-export commonly used types
pub use actions::{Action, ActionBlock, ActionOrigin, ActionOutcome, availability};
pub use constants::SAVE_KEY;
pub use context::{OPENING_NARRATIVE, SimContext};
pub use day::DayReport;
pub use effects::{EffectBundle, apply_effects, check_status, mood_bad_luck_boost, passive_decay};
pub use events::{
    ChoiceBlock, ChoiceId, ChoiceOption, ChoiceOutcome, EventDescriptor, EventKind, EventPhase,
    PoolSlot, build_pool, select_event,
};
pub use journal::{EntryId, Journal, LogEntry, LogTone};
pub use rng::{CountingRng, RandomSource, Rolls, ScriptedSource, SeededSource};
pub use session::Session;
pub use state::{CollapseCause, GameMode, SimulationState, apply_defaults, clamp_resource};
pub use storage::{FileStore, MemoryStore, Persistence, SnapshotStore, StorageError};
pub use tuning::{ModeTuning, TuningError, TuningTable, tuning_for};
pub use view::{ControlState, SimulationView, controls, format_money};
