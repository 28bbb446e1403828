//! Daily random events.
//!
//! Each mode has its own pool of slots. Selection happens in two stages:
//! stage one picks a slot uniformly, stage two resolves a gated slot's own
//! chance. In Normal mode this makes the rare vendors share a slot with a
//! common event, so the common event ends up over-represented.

use log::debug;
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};
use std::fmt;
use std::str::FromStr;

use crate::actions::{self, Action};
use crate::constants::{
    CHARITY_GIFT_RANGE, COLD_FIRE_RISK, FLOWER_SLOT_CHANCE, INFLUENCER_REPORT_CHANCE,
    INFLUENCER_REPORT_MOOD_BONUS, INFLUENCER_SHOP_HELP_CHANCE, MAGAZINE_SLOT_CHANCE,
    STEADY_MOOD, STORE_LEFTOVERS_CHANCE,
};
use crate::context::SimContext;
use crate::effects::{EffectBundle, apply_effects, apply_effects_with_tone};
use crate::journal::LogTone;
use crate::rng::{RandomSource, Rolls};
use crate::state::{CollapseCause, GameMode};
use crate::view::format_money;

/// What a prompt is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    ConvenienceStore,
    PasserbyCharity,
    ColdSnap,
    WelfareBooth,
    InfluencerHarassment,
    MagazineVendor,
    FlowerVendor,
    /// Terminal prompt shown after death; never drawn from a pool.
    Collapse,
}

impl EventKind {
    /// Every kind a pool can produce.
    pub const DRAWABLE: [Self; 7] = [
        Self::ConvenienceStore,
        Self::PasserbyCharity,
        Self::ColdSnap,
        Self::WelfareBooth,
        Self::InfluencerHarassment,
        Self::MagazineVendor,
        Self::FlowerVendor,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::ConvenienceStore => "convenience_store",
            Self::PasserbyCharity => "passerby_charity",
            Self::ColdSnap => "cold_snap",
            Self::WelfareBooth => "welfare_booth",
            Self::InfluencerHarassment => "influencer_harassment",
            Self::MagazineVendor => "magazine_vendor",
            Self::FlowerVendor => "flower_vendor",
            Self::Collapse => "collapse",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::ConvenienceStore => "Convenience store doorway",
            Self::PasserbyCharity => "Kind passerby",
            Self::ColdSnap => "Cold snap",
            Self::WelfareBooth => "Welfare booth",
            Self::InfluencerHarassment => "Influencer harassment",
            Self::MagazineVendor => "Magazine stand",
            Self::FlowerVendor => "Magnolia flower stall",
            Self::Collapse => "Collapse",
        }
    }

    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::ConvenienceStore => {
                "You linger outside a convenience store and catch the smell of boxed lunches. The clerk looks impatient."
            }
            Self::PasserbyCharity => {
                "A passerby notices you and seems to be deciding whether to help."
            }
            Self::ColdSnap => {
                "The wind is picking up. Without a heavy coat, tonight is going to be rough."
            }
            Self::WelfareBooth => {
                "A social-services booth is handing out hot drinks, resource leaflets and help with subsidy forms."
            }
            Self::InfluencerHarassment => {
                "A crew of prank streamers is mocking people on the street for views, and the camera is on you."
            }
            Self::MagazineVendor => {
                "Someone offers you magazines on consignment. Every sale pays a cut, but expect a lot of rejection."
            }
            Self::FlowerVendor => {
                "Someone is wholesaling magnolia flowers. Sell them and you earn; keep them and they wilt."
            }
            Self::Collapse => "You collapsed. The street doesn't wait for anyone.",
        }
    }

    /// Choices offered for this kind, in display order.
    #[must_use]
    pub fn choices(self) -> ChoiceList {
        let ids: &[ChoiceId] = match self {
            Self::ConvenienceStore => &[ChoiceId::AskForLeftovers, ChoiceId::LeaveStore],
            Self::PasserbyCharity => &[ChoiceId::ExplainHonestly, ChoiceId::ActFine],
            Self::ColdSnap => &[ChoiceId::FindShelter, ChoiceId::TryToWarmUp],
            Self::WelfareBooth => &[ChoiceId::TakeHotDrink, ChoiceId::AskAboutResources],
            Self::InfluencerHarassment => &[
                ChoiceId::WalkAway,
                ChoiceId::AskShopForHelp,
                ChoiceId::RecordAndReport,
            ],
            Self::MagazineVendor => &[ChoiceId::TryMagazines, ChoiceId::PassOnMagazines],
            Self::FlowerVendor => &[ChoiceId::StockFlowers, ChoiceId::SkipFlowers],
            Self::Collapse => &[ChoiceId::Restart],
        };
        ids.iter().copied().map(ChoiceOption::from).collect()
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for EventKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::DRAWABLE
            .into_iter()
            .chain([Self::Collapse])
            .find(|kind| kind.key() == s)
            .ok_or(())
    }
}

/// Tagged identifier for every choice the engine can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceId {
    AskForLeftovers,
    LeaveStore,
    ExplainHonestly,
    ActFine,
    FindShelter,
    TryToWarmUp,
    TakeHotDrink,
    AskAboutResources,
    WalkAway,
    AskShopForHelp,
    RecordAndReport,
    TryMagazines,
    PassOnMagazines,
    StockFlowers,
    SkipFlowers,
    Restart,
}

impl ChoiceId {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AskForLeftovers => "Ask quietly for expiring food",
            Self::LeaveStore => "Leave, avoid trouble",
            Self::ExplainHonestly => "Explain honestly",
            Self::ActFine => "Act like nothing's wrong",
            Self::FindShelter => "Find shelter from the wind",
            Self::TryToWarmUp => "Try to get warm (risky)",
            Self::TakeHotDrink => "Take a hot drink",
            Self::AskAboutResources => "Ask about resources",
            Self::WalkAway => "Walk away quickly",
            Self::AskShopForHelp => "Ask a shop for help",
            Self::RecordAndReport => "Record and report",
            Self::TryMagazines => "Give it a try",
            Self::PassOnMagazines => "Pass for now",
            Self::StockFlowers => "Stock up and sell",
            Self::SkipFlowers => "Play it safe",
            Self::Restart => "Restart",
        }
    }
}

/// A choice as presented: label plus id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChoiceOption {
    pub id: ChoiceId,
    pub label: &'static str,
}

impl From<ChoiceId> for ChoiceOption {
    fn from(id: ChoiceId) -> Self {
        Self {
            id,
            label: id.label(),
        }
    }
}

pub type ChoiceList = SmallVec<[ChoiceOption; 3]>;

/// Instantiated prompt. Ephemeral, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventDescriptor {
    pub kind: EventKind,
    pub title: &'static str,
    pub text: String,
    pub choices: ChoiceList,
}

impl EventDescriptor {
    #[must_use]
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            title: kind.title(),
            text: kind.text().to_string(),
            choices: kind.choices(),
        }
    }

    /// Restart-only prompt shown once the run ends.
    #[must_use]
    pub fn collapse(cause: CollapseCause) -> Self {
        let detail = match cause {
            CollapseCause::Starvation => "Hunger finally took the last of your strength.",
            CollapseCause::Exhaustion => "Your body gave out.",
        };
        Self {
            text: format!("{} {detail}", EventKind::Collapse.text()),
            ..Self::new(EventKind::Collapse)
        }
    }

    /// Narrative line published while the prompt is up.
    #[must_use]
    pub fn narrative(&self) -> String {
        if self.kind == EventKind::Collapse {
            self.text.clone()
        } else {
            format!("[{}] {}", self.title, self.text)
        }
    }

    #[must_use]
    pub fn offers(&self, id: ChoiceId) -> bool {
        self.choices.iter().any(|choice| choice.id == id)
    }
}

/// Lifecycle of the current prompt.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EventPhase {
    #[default]
    Idle,
    Pending(EventDescriptor),
    Resolved(ChoiceId),
}

impl EventPhase {
    #[must_use]
    pub const fn pending(&self) -> Option<&EventDescriptor> {
        match self {
            Self::Pending(descriptor) => Some(descriptor),
            _ => None,
        }
    }
}

/// One entry of a mode's event pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PoolSlot {
    Fixed(EventKind),
    /// Rolls its own chance only after being picked.
    Gated {
        chance: f64,
        hit: EventKind,
        miss: EventKind,
    },
}

impl PoolSlot {
    /// Stage two: settle the slot into a concrete kind.
    pub fn resolve<R: RandomSource + ?Sized>(self, rng: &mut R) -> EventKind {
        match self {
            Self::Fixed(kind) => kind,
            Self::Gated { chance, hit, miss } => {
                if rng.chance(chance) {
                    hit
                } else {
                    miss
                }
            }
        }
    }
}

pub type EventPool = SmallVec<[PoolSlot; 8]>;

/// Slots for `mode`, in a fixed order.
#[must_use]
pub fn build_pool(mode: GameMode) -> EventPool {
    let mut pool: EventPool = smallvec![
        PoolSlot::Fixed(EventKind::ConvenienceStore),
        PoolSlot::Fixed(EventKind::PasserbyCharity),
        PoolSlot::Fixed(EventKind::ColdSnap),
        PoolSlot::Fixed(EventKind::WelfareBooth),
    ];
    match mode {
        GameMode::Normal => {
            pool.push(PoolSlot::Gated {
                chance: MAGAZINE_SLOT_CHANCE,
                hit: EventKind::MagazineVendor,
                miss: EventKind::WelfareBooth,
            });
            pool.push(PoolSlot::Gated {
                chance: FLOWER_SLOT_CHANCE,
                hit: EventKind::FlowerVendor,
                miss: EventKind::ConvenienceStore,
            });
        }
        GameMode::Chaos => {
            pool.push(PoolSlot::Fixed(EventKind::InfluencerHarassment));
            pool.push(PoolSlot::Fixed(EventKind::MagazineVendor));
            pool.push(PoolSlot::Fixed(EventKind::FlowerVendor));
        }
    }
    pool
}

/// Two-stage draw from the mode's pool.
pub fn select_event<R: RandomSource + ?Sized>(mode: GameMode, rng: &mut R) -> EventKind {
    let pool = build_pool(mode);
    let index = rng.pick_index(pool.len());
    pool.get(index)
        .copied()
        .unwrap_or(PoolSlot::Fixed(EventKind::ConvenienceStore))
        .resolve(rng)
}

/// Publish today's event. Without `force`, at most one event fires per day.
pub fn trigger_daily_event(ctx: &mut SimContext, force: bool) -> Option<EventKind> {
    if !ctx.state.alive {
        return None;
    }
    if !force && ctx.state.last_event_day == i64::from(ctx.state.day) {
        return None;
    }
    ctx.state.last_event_day = i64::from(ctx.state.day);

    let kind = select_event(ctx.state.mode, ctx.rng.as_mut());
    let descriptor = EventDescriptor::new(kind);
    debug!(
        "day {} event {} ({} mode)",
        ctx.state.day, kind, ctx.state.mode
    );
    ctx.narrative = descriptor.narrative();
    ctx.log(LogTone::Info, format!("Today's event: {}", descriptor.title));
    ctx.phase = EventPhase::Pending(descriptor);
    Some(kind)
}

/// With the mode's extra-event chance, force a second event today.
pub fn maybe_extra_chaos_event(ctx: &mut SimContext) -> bool {
    if !ctx.state.alive {
        return false;
    }
    let odds = ctx.table().extra_event_chance;
    if !ctx.chance(odds) {
        return false;
    }
    ctx.log(LogTone::Warning, "Chaos escalates: something else happens today.");
    trigger_daily_event(ctx, true).is_some()
}

/// Why a choice was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceBlock {
    NothingPending,
    NotOffered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceOutcome {
    Resolved(ChoiceId),
    /// The restart choice reset the whole run.
    Restarted,
    Blocked(ChoiceBlock),
}

/// Resolve `id` against the pending prompt.
pub fn resolve_choice(ctx: &mut SimContext, id: ChoiceId) -> ChoiceOutcome {
    let Some(pending) = ctx.phase.pending() else {
        return ChoiceOutcome::Blocked(ChoiceBlock::NothingPending);
    };
    if !pending.offers(id) {
        return ChoiceOutcome::Blocked(ChoiceBlock::NotOffered);
    }
    ctx.phase = EventPhase::Resolved(id);
    debug!("choice {id:?} picked on day {}", ctx.state.day);

    if id == ChoiceId::Restart {
        ctx.reset();
        return ChoiceOutcome::Restarted;
    }
    run_choice(ctx, id);
    ChoiceOutcome::Resolved(id)
}

fn run_choice(ctx: &mut SimContext, id: ChoiceId) {
    match id {
        ChoiceId::AskForLeftovers => {
            if ctx.chance(STORE_LEFTOVERS_CHANCE) {
                apply_effects(
                    ctx,
                    EffectBundle::new().hunger(18).mood(6),
                    "The clerk tosses you an expiring rice ball (hunger +18, mood +6).",
                );
            } else {
                apply_effects_with_tone(
                    ctx,
                    EffectBundle::new().mood(-6),
                    LogTone::Warning,
                    "The clerk tells you to move along (mood -6).",
                );
            }
        }
        ChoiceId::LeaveStore => {
            apply_effects(
                ctx,
                EffectBundle::new().mood(1),
                "You decide not to go looking for trouble (mood +1).",
            );
        }
        ChoiceId::ExplainHonestly => {
            let (min, max) = CHARITY_GIFT_RANGE;
            let gift = ctx.rand_int(min, max);
            apply_effects(
                ctx,
                EffectBundle::new().money(gift).mood(8),
                &format!(
                    "They hand you {} (money +{gift}, mood +8).",
                    format_money(gift)
                ),
            );
        }
        ChoiceId::ActFine => {
            apply_effects(
                ctx,
                EffectBundle::new().mood(-2),
                "You say nothing and they walk on (mood -2).",
            );
        }
        ChoiceId::FindShelter => {
            apply_effects(
                ctx,
                EffectBundle::new().health(2).mood(-2).hunger(-4),
                "You find a sheltered corner (health +2, mood -2, hunger -4).",
            );
        }
        ChoiceId::TryToWarmUp => {
            let risk = COLD_FIRE_RISK + ctx.bad_luck();
            if ctx.chance(risk) {
                apply_effects_with_tone(
                    ctx,
                    EffectBundle::new().health(-12).mood(-8),
                    LogTone::Warning,
                    "It goes badly wrong (health -12, mood -8).",
                );
            } else {
                apply_effects(
                    ctx,
                    EffectBundle::new().health(6).mood(3).hunger(-4),
                    "You make it through the coldest hours (health +6, mood +3, hunger -4).",
                );
            }
        }
        ChoiceId::TakeHotDrink => {
            apply_effects(
                ctx,
                EffectBundle::new().hunger(10).mood(4),
                "The hot drink brings you back a little (hunger +10, mood +4).",
            );
        }
        ChoiceId::AskAboutResources => {
            apply_effects(
                ctx,
                EffectBundle::new().mood(2),
                "You pick up some useful information (mood +2).",
            );
        }
        ChoiceId::WalkAway => {
            apply_effects(
                ctx,
                EffectBundle::new().mood(-6).hunger(-3),
                "You walk away (mood -6, hunger -3).",
            );
        }
        ChoiceId::AskShopForHelp => {
            if ctx.chance(INFLUENCER_SHOP_HELP_CHANCE) {
                apply_effects(
                    ctx,
                    EffectBundle::new().mood(3),
                    "The clerk steps in and the streamers move on (mood +3).",
                );
            } else {
                apply_effects_with_tone(
                    ctx,
                    EffectBundle::new().mood(-4),
                    LogTone::Warning,
                    "The clerk doesn't want trouble and tells you to leave (mood -4).",
                );
            }
        }
        ChoiceId::RecordAndReport => {
            let bonus = if ctx.state.mood >= STEADY_MOOD {
                INFLUENCER_REPORT_MOOD_BONUS
            } else {
                0.0
            };
            if ctx.chance(INFLUENCER_REPORT_CHANCE + bonus) {
                apply_effects(
                    ctx,
                    EffectBundle::new().mood(6),
                    "You hand over the footage and they back off (mood +6).",
                );
            } else {
                apply_effects_with_tone(
                    ctx,
                    EffectBundle::new().mood(-5),
                    LogTone::Warning,
                    "They spot you recording and get even nastier (mood -5).",
                );
            }
        }
        ChoiceId::TryMagazines => {
            actions::perform_from_event(ctx, Action::SellMagazines);
        }
        ChoiceId::PassOnMagazines => {
            apply_effects(
                ctx,
                EffectBundle::new().mood(-1),
                "You pass on the offer for now (mood -1).",
            );
        }
        ChoiceId::StockFlowers => {
            actions::perform_from_event(ctx, Action::SellFlowers);
        }
        ChoiceId::SkipFlowers => {
            apply_effects(
                ctx,
                EffectBundle::new().mood(1),
                "You play it safe (mood +1).",
            );
        }
        ChoiceId::Restart => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{ROLL_HIT, ROLL_MISS, ScriptedSource};

    fn pending_context(kind: EventKind, rolls: Vec<f64>) -> SimContext {
        let mut ctx = SimContext::new(ScriptedSource::new(rolls));
        let descriptor = EventDescriptor::new(kind);
        ctx.narrative = descriptor.narrative();
        ctx.phase = EventPhase::Pending(descriptor);
        ctx
    }

    #[test]
    fn pools_have_expected_shape() {
        let normal = build_pool(GameMode::Normal);
        assert_eq!(normal.len(), 6);
        assert!(matches!(
            normal[4],
            PoolSlot::Gated {
                hit: EventKind::MagazineVendor,
                miss: EventKind::WelfareBooth,
                ..
            }
        ));
        let chaos = build_pool(GameMode::Chaos);
        assert_eq!(chaos.len(), 7);
        assert!(
            chaos
                .iter()
                .all(|slot| matches!(slot, PoolSlot::Fixed(_)))
        );
    }

    #[test]
    fn gated_slot_rolls_after_selection() {
        // Slot 4 of six, then the 25% gate.
        let mut hit = ScriptedSource::new([4.5 / 6.0, ROLL_HIT]);
        assert_eq!(select_event(GameMode::Normal, &mut hit), EventKind::MagazineVendor);
        let mut miss = ScriptedSource::new([4.5 / 6.0, ROLL_MISS]);
        assert_eq!(select_event(GameMode::Normal, &mut miss), EventKind::WelfareBooth);

        let mut fixed = ScriptedSource::new([0.0]);
        assert_eq!(
            select_event(GameMode::Normal, &mut fixed),
            EventKind::ConvenienceStore
        );
        assert_eq!(fixed.consumed(), 1);
    }

    #[test]
    fn daily_trigger_is_idempotent_without_force() {
        let mut ctx = SimContext::new(ScriptedSource::new([0.0, 0.4]));
        assert_eq!(trigger_daily_event(&mut ctx, false), Some(EventKind::ConvenienceStore));
        assert_eq!(trigger_daily_event(&mut ctx, false), None);
        assert_eq!(ctx.state.last_event_day, 1);
        assert!(ctx.narrative().starts_with("[Convenience store doorway]"));
        assert!(ctx.journal().contains("Today's event: Convenience store doorway"));
        assert_eq!(
            trigger_daily_event(&mut ctx, true),
            Some(EventKind::ColdSnap)
        );
    }

    #[test]
    fn choices_require_pending_and_offered() {
        let mut ctx = SimContext::new(ScriptedSource::default());
        assert_eq!(
            resolve_choice(&mut ctx, ChoiceId::TakeHotDrink),
            ChoiceOutcome::Blocked(ChoiceBlock::NothingPending)
        );

        let mut ctx = pending_context(EventKind::WelfareBooth, vec![]);
        assert_eq!(
            resolve_choice(&mut ctx, ChoiceId::WalkAway),
            ChoiceOutcome::Blocked(ChoiceBlock::NotOffered)
        );
        ctx.state.hunger = 80;
        assert_eq!(
            resolve_choice(&mut ctx, ChoiceId::TakeHotDrink),
            ChoiceOutcome::Resolved(ChoiceId::TakeHotDrink)
        );
        assert_eq!((ctx.state.hunger, ctx.state.mood), (90, 54));
        assert_eq!(ctx.phase, EventPhase::Resolved(ChoiceId::TakeHotDrink));
        assert_eq!(
            resolve_choice(&mut ctx, ChoiceId::TakeHotDrink),
            ChoiceOutcome::Blocked(ChoiceBlock::NothingPending)
        );
    }

    #[test]
    fn risky_warmth_uses_bad_luck() {
        let mut ctx = pending_context(EventKind::ColdSnap, vec![0.30]);
        resolve_choice(&mut ctx, ChoiceId::TryToWarmUp);
        assert_eq!((ctx.state.health, ctx.state.mood), (88, 42));

        let mut ctx = pending_context(EventKind::ColdSnap, vec![0.40]);
        let tuning = ctx.tuning;
        ctx.state.apply_mode(GameMode::Chaos, &tuning);
        resolve_choice(&mut ctx, ChoiceId::TryToWarmUp);
        assert_eq!(ctx.state.health, 88);

        let mut ctx = pending_context(EventKind::ColdSnap, vec![0.40]);
        ctx.state.health = 50;
        resolve_choice(&mut ctx, ChoiceId::TryToWarmUp);
        assert_eq!((ctx.state.health, ctx.state.mood, ctx.state.hunger), (56, 53, 96));
    }

    #[test]
    fn charity_gift_is_rolled() {
        let gift_roll = crate::rng::roll_selecting(42, 10, 70);
        let mut ctx = pending_context(EventKind::PasserbyCharity, vec![gift_roll]);
        resolve_choice(&mut ctx, ChoiceId::ExplainHonestly);
        assert_eq!(ctx.state.money, 42);
        assert_eq!(ctx.state.mood, 58);
        assert!(ctx.journal().contains("They hand you $42"));
    }

    #[test]
    fn report_odds_improve_with_steady_mood() {
        let mut ctx = pending_context(EventKind::InfluencerHarassment, vec![0.55]);
        resolve_choice(&mut ctx, ChoiceId::RecordAndReport);
        assert_eq!(ctx.state.mood, 56);

        let mut ctx = pending_context(EventKind::InfluencerHarassment, vec![0.55]);
        ctx.state.mood = 49;
        resolve_choice(&mut ctx, ChoiceId::RecordAndReport);
        assert_eq!(ctx.state.mood, 44);
    }

    #[test]
    fn vendor_choice_runs_free_action() {
        let mut ctx = pending_context(EventKind::MagazineVendor, vec![ROLL_MISS]);
        resolve_choice(&mut ctx, ChoiceId::TryMagazines);
        assert_eq!(ctx.state.actions_left, 3);
        assert_eq!((ctx.state.mood, ctx.state.hunger), (45, 94));
    }

    #[test]
    fn extra_event_follows_mode_chance() {
        let mut ctx = SimContext::new(ScriptedSource::new([0.11, 0.0]));
        assert!(maybe_extra_chaos_event(&mut ctx));
        assert!(ctx.journal().contains("Chaos escalates"));

        let mut ctx = SimContext::new(ScriptedSource::new([0.2]));
        assert!(!maybe_extra_chaos_event(&mut ctx));
        assert!(ctx.phase.pending().is_none());
    }

    #[test]
    fn kinds_parse_from_keys() {
        for kind in EventKind::DRAWABLE {
            assert_eq!(kind.key().parse::<EventKind>(), Ok(kind));
        }
        assert!("nope".parse::<EventKind>().is_err());
    }
}
