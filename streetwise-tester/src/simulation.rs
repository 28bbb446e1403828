use std::collections::BTreeMap;
use std::hash::Hasher;

use anyhow::{Context, Result, bail};
use log::{debug, info};
use serde::Serialize;
use streetwise_game::{
    Action, CollapseCause, EventKind, GameMode, ModeTuning, SeededSource, SimContext,
    SimulationState, numbers::i64_to_f64,
};
use twox_hash::XxHash64;

use crate::policy::{PlayerPolicy, Strategy};

/// Decisions a policy may make within one day before the day is forced to end.
/// Free actions (eating) would otherwise let a policy stall forever.
const MAX_DECISIONS_PER_DAY: usize = 16;

/// Configuration for one automated run.
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub seed: u64,
    pub mode: GameMode,
    pub strategy: Strategy,
    pub max_days: u32,
}

impl SimulationConfig {
    #[must_use]
    pub const fn new(mode: GameMode, strategy: Strategy, seed: u64) -> Self {
        Self {
            seed,
            mode,
            strategy,
            max_days: 60,
        }
    }

    #[must_use]
    pub const fn with_max_days(mut self, max_days: u32) -> Self {
        self.max_days = max_days;
        self
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunOutcome {
    Starvation,
    Exhaustion,
    Survived,
}

impl RunOutcome {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Starvation => "starvation",
            Self::Exhaustion => "exhaustion",
            Self::Survived => "survived",
        }
    }
}

impl From<CollapseCause> for RunOutcome {
    fn from(cause: CollapseCause) -> Self {
        match cause {
            CollapseCause::Starvation => Self::Starvation,
            CollapseCause::Exhaustion => Self::Exhaustion,
        }
    }
}

/// Summary of one finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRecord {
    pub mode: GameMode,
    pub strategy: Strategy,
    pub seed: u64,
    /// Last day played. A run still alive at the cap reports the cap.
    pub days_survived: u32,
    pub outcome: RunOutcome,
    pub final_money: i64,
    pub events_seen: usize,
    pub actions_taken: u32,
    /// xxHash64 of the final snapshot, hex encoded.
    pub fingerprint: String,
}

/// Drives a [`SimContext`] with a [`PlayerPolicy`].
pub struct SimulationSession {
    ctx: SimContext,
    policy: Box<dyn PlayerPolicy>,
    config: SimulationConfig,
    actions_taken: u32,
}

impl SimulationSession {
    #[must_use]
    pub fn new(config: SimulationConfig, tuning: ModeTuning) -> Self {
        let mut ctx = SimContext::with_tuning(tuning, SeededSource::from_user_seed(config.seed));
        if ctx.state().mode != config.mode {
            ctx.set_mode(config.mode);
        }
        ctx.start();
        Self {
            ctx,
            policy: config.strategy.create_policy(config.seed),
            config,
            actions_taken: 0,
        }
    }

    /// Play out the current day. Returns `false` once the run is over.
    pub fn play_day(&mut self) -> bool {
        for _ in 0..MAX_DECISIONS_PER_DAY {
            if !self.ctx.state().alive {
                return false;
            }
            self.resolve_pending_choice();

            let enabled = self.enabled_actions();
            let Some(decision) = self.policy.pick_action(self.ctx.state(), &enabled) else {
                break;
            };
            debug!(
                "[{} seed {}] day {}: {} ({})",
                self.policy.name(),
                self.config.seed,
                self.ctx.state().day,
                decision.pick,
                decision.rationale.as_deref().unwrap_or("-")
            );
            if self.ctx.perform(decision.pick).performed() {
                self.actions_taken += 1;
            } else {
                break;
            }
        }

        if !self.ctx.state().alive || self.ctx.state().day >= self.config.max_days {
            return false;
        }
        self.resolve_pending_choice();
        self.ctx.advance_day().is_some() && self.ctx.state().alive
    }

    fn resolve_pending_choice(&mut self) {
        if matches!(self.ctx.pending_event(), None | Some(EventKind::Collapse)) {
            return;
        }
        let choices = self.ctx.offered_choices().to_vec();
        if choices.is_empty() {
            return;
        }
        let decision = self.policy.pick_choice(self.ctx.state(), &choices);
        debug!(
            "[{} seed {}] choice {:?} ({})",
            self.policy.name(),
            self.config.seed,
            decision.pick,
            decision.rationale.as_deref().unwrap_or("-")
        );
        self.ctx.choose(decision.pick);
    }

    fn enabled_actions(&self) -> Vec<Action> {
        self.ctx
            .view()
            .controls
            .iter()
            .filter(|control| control.enabled)
            .map(|control| control.action)
            .collect()
    }

    /// Consume the session and summarize the run.
    ///
    /// # Errors
    ///
    /// Returns an error if the final snapshot cannot be serialized.
    pub fn finish(self) -> Result<RunRecord> {
        let state = self.ctx.state();
        let outcome = match state.collapse_cause() {
            Some(cause) => cause.into(),
            None if state.alive => RunOutcome::Survived,
            None => RunOutcome::Exhaustion,
        };
        let days_survived = if state.alive {
            state.day
        } else {
            state.day.saturating_sub(1)
        };
        let events_seen = self
            .ctx
            .journal()
            .entries()
            .iter()
            .filter(|entry| entry.message.starts_with("Today's event"))
            .count();
        Ok(RunRecord {
            mode: self.config.mode,
            strategy: self.config.strategy,
            seed: self.config.seed,
            days_survived,
            outcome,
            final_money: state.money,
            events_seen,
            actions_taken: self.actions_taken,
            fingerprint: snapshot_fingerprint(state)?,
        })
    }
}

/// Hex xxHash64 over the JSON snapshot.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be serialized.
pub fn snapshot_fingerprint(state: &SimulationState) -> Result<String> {
    let bytes = serde_json::to_vec(state).context("serializing final snapshot")?;
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(&bytes);
    Ok(format!("{:016x}", hasher.finish()))
}

/// Run one configuration to completion.
///
/// # Errors
///
/// Returns an error if the final snapshot cannot be fingerprinted.
pub fn run_simulation(config: SimulationConfig, tuning: ModeTuning) -> Result<RunRecord> {
    let mut session = SimulationSession::new(config, tuning);
    while session.play_day() {}
    let record = session.finish()?;
    info!(
        "{} / {} seed {}: {} after {} days, {} left",
        record.mode,
        record.strategy,
        record.seed,
        record.outcome.label(),
        record.days_survived,
        record.final_money
    );
    Ok(record)
}

/// Re-run every recorded configuration and compare fingerprints.
///
/// # Errors
///
/// Fails on the first run whose replay does not reproduce its fingerprint.
pub fn verify_determinism(records: &[RunRecord], max_days: u32, tuning: ModeTuning) -> Result<()> {
    for record in records {
        let config =
            SimulationConfig::new(record.mode, record.strategy, record.seed).with_max_days(max_days);
        let replay = run_simulation(config, tuning)?;
        if replay.fingerprint != record.fingerprint {
            bail!(
                "non-deterministic run: {} / {} seed {} produced {} then {}",
                record.mode,
                record.strategy,
                record.seed,
                record.fingerprint,
                replay.fingerprint
            );
        }
    }
    Ok(())
}

/// Per (mode, strategy) statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunAggregate {
    pub mode: GameMode,
    pub strategy: Strategy,
    pub runs: usize,
    pub mean_days: f64,
    pub std_days: f64,
    pub survival_rate: f64,
    pub mean_final_money: f64,
    pub starvations: usize,
    pub exhaustions: usize,
}

#[must_use]
pub fn aggregate_runs(records: &[RunRecord]) -> Vec<RunAggregate> {
    let mut aggregates: BTreeMap<(&'static str, Strategy), AggregateBuilder> = BTreeMap::new();
    for record in records {
        aggregates
            .entry((record.mode.as_str(), record.strategy))
            .or_insert_with(|| AggregateBuilder::new(record))
            .ingest(record);
    }
    aggregates
        .into_values()
        .map(AggregateBuilder::finish)
        .collect()
}

struct AggregateBuilder {
    mode: GameMode,
    strategy: Strategy,
    days: RunningStats,
    money: RunningStats,
    survived: u32,
    starvations: usize,
    exhaustions: usize,
}

impl AggregateBuilder {
    fn new(record: &RunRecord) -> Self {
        Self {
            mode: record.mode,
            strategy: record.strategy,
            days: RunningStats::default(),
            money: RunningStats::default(),
            survived: 0,
            starvations: 0,
            exhaustions: 0,
        }
    }

    fn ingest(&mut self, record: &RunRecord) {
        self.days.add(f64::from(record.days_survived));
        self.money.add(i64_to_f64(record.final_money));
        match record.outcome {
            RunOutcome::Survived => self.survived += 1,
            RunOutcome::Starvation => self.starvations += 1,
            RunOutcome::Exhaustion => self.exhaustions += 1,
        }
    }

    fn finish(self) -> RunAggregate {
        let runs = self.days.count as usize;
        let denom = f64::from(self.days.count.max(1));
        let survival_rate = f64::from(self.survived) / denom;
        RunAggregate {
            mode: self.mode,
            strategy: self.strategy,
            runs,
            mean_days: self.days.mean(),
            std_days: self.days.std_dev(),
            survival_rate,
            mean_final_money: self.money.mean(),
            starvations: self.starvations,
            exhaustions: self.exhaustions,
        }
    }
}

#[derive(Debug, Default, Clone)]
struct RunningStats {
    count: u32,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    fn add(&mut self, value: f64) {
        self.count += 1;
        let count = f64::from(self.count);
        let delta = value - self.mean;
        self.mean += delta / count;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    const fn mean(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.mean }
    }

    fn variance(&self) -> f64 {
        if self.count > 1 {
            self.m2 / f64::from(self.count - 1)
        } else {
            0.0
        }
    }

    fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }
}
