//! Player actions.
//!
//! Every action is guarded, spends its cost up front, rolls its outcome in a
//! fixed order and hands one [`EffectBundle`] to the effect resolver. Invalid
//! invocations return [`ActionOutcome::Blocked`] and change nothing.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    BEG_GAIN_RANGE, BEG_HOSTILE_BASE, BEG_HOSTILE_MOOD_PENALTY, BEG_HUNGER_COST, BEG_MOOD_RANGE,
    CHOCOLATE_MOOD_RANGE, CHOCOLATE_PRICE, ERRAND_HUNGER_COST, FLOWER_REVENUE_RANGE,
    FLOWER_SALE_BASE, FLOWER_SALE_FLOOR, FLOWER_STOCK_PRICE, MAGAZINE_COMMISSION_RANGE,
    MAGAZINE_SALE_BASE, MAGAZINE_SALE_MOOD_BONUS, MEAL_HUNGER, MEAL_PRICE, PIGEON_BITE_BASE,
    PIGEON_MOOD_RANGE, SCAVENGE_CASH_RANGE, SCAVENGE_CUT_BASE, SCAVENGE_FOOD_CHANCE,
    SCAVENGE_FOOD_RANGE, SLEEP_DISTURBED_BASE, SLEEP_RESTORE_RANGE, SLEEP_THEFT_RANGE,
    STEADY_MOOD, SUBSIDY_ACTION_COST, SUBSIDY_APPROVAL_CHANCE, SUBSIDY_COOLDOWN_DAYS,
    SUBSIDY_GRANT_RANGE, WORK_GOOD_MOOD, WORK_HIRE_BASE, WORK_HIRE_MOOD_BONUS, WORK_HUNGER_COST,
    WORK_INJURY_BASE, WORK_PAY_RANGE,
};
use crate::context::SimContext;
use crate::effects::{EffectBundle, apply_effects_with_tone, signed};
use crate::events::EventPhase;
use crate::journal::LogTone;
use crate::state::SimulationState;
use crate::view::format_money;

/// The ten things a player can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Beg,
    Work,
    Eat,
    Sleep,
    Scavenge,
    SellMagazines,
    SellFlowers,
    Subsidy,
    RescuePigeon,
    BuyChocolate,
}

impl Action {
    pub const ALL: [Self; 10] = [
        Self::Beg,
        Self::Work,
        Self::Eat,
        Self::Sleep,
        Self::Scavenge,
        Self::SellMagazines,
        Self::SellFlowers,
        Self::Subsidy,
        Self::RescuePigeon,
        Self::BuyChocolate,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Beg => "beg",
            Self::Work => "work",
            Self::Eat => "eat",
            Self::Sleep => "sleep",
            Self::Scavenge => "scavenge",
            Self::SellMagazines => "sell_magazines",
            Self::SellFlowers => "sell_flowers",
            Self::Subsidy => "subsidy",
            Self::RescuePigeon => "rescue_pigeon",
            Self::BuyChocolate => "buy_chocolate",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Beg => "Beg",
            Self::Work => "Look for day work",
            Self::Eat => "Buy a meal ($30)",
            Self::Sleep => "Sleep",
            Self::Scavenge => "Scavenge",
            Self::SellMagazines => "Sell magazines",
            Self::SellFlowers => "Sell flowers",
            Self::Subsidy => "Apply for subsidy",
            Self::RescuePigeon => "Rescue a pigeon",
            Self::BuyChocolate => "Buy chocolate ($15)",
        }
    }

    /// Action points spent when the player takes this action.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Eat => 0,
            Self::Subsidy => SUBSIDY_ACTION_COST,
            _ => 1,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Action {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|action| action.key() == normalized)
            .ok_or(())
    }
}

/// Who triggered the action. Event-origin actions are free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOrigin {
    Player,
    Event,
}

/// Why an action could not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionBlock {
    Dead,
    NoActionsLeft,
    NeedsTwoActions,
    SubsidyCooldown { days_remaining: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Performed(Action),
    Blocked(ActionBlock),
}

impl ActionOutcome {
    #[must_use]
    pub const fn performed(self) -> bool {
        matches!(self, Self::Performed(_))
    }
}

/// Whether the player may take `action` right now.
///
/// # Errors
///
/// Returns the reason the control should be disabled.
pub fn availability(state: &SimulationState, action: Action) -> Result<(), ActionBlock> {
    if !state.alive {
        return Err(ActionBlock::Dead);
    }
    match action {
        Action::Eat => Ok(()),
        Action::Subsidy => {
            if state.actions_left == 0 {
                return Err(ActionBlock::NoActionsLeft);
            }
            if state.actions_left < SUBSIDY_ACTION_COST {
                return Err(ActionBlock::NeedsTwoActions);
            }
            let since = state.days_since_subsidy();
            if since < SUBSIDY_COOLDOWN_DAYS {
                return Err(ActionBlock::SubsidyCooldown {
                    days_remaining: SUBSIDY_COOLDOWN_DAYS.saturating_sub(since),
                });
            }
            Ok(())
        }
        _ if state.actions_left == 0 => Err(ActionBlock::NoActionsLeft),
        _ => Ok(()),
    }
}

/// Take `action` as the player: guarded, spends its cost, dismisses any
/// pending event choices.
pub fn perform(ctx: &mut SimContext, action: Action) -> ActionOutcome {
    if let Err(block) = availability(&ctx.state, action) {
        debug!("{action} blocked: {block:?}");
        return ActionOutcome::Blocked(block);
    }
    ctx.state.spend_actions(action.cost());
    if ctx.phase.pending().is_some() {
        ctx.phase = EventPhase::Idle;
    }
    run(ctx, action, ActionOrigin::Player);
    ActionOutcome::Performed(action)
}

/// Take `action` on behalf of an event choice. Skips the budget guard and
/// spends nothing.
pub fn perform_from_event(ctx: &mut SimContext, action: Action) -> ActionOutcome {
    if !ctx.state.alive {
        return ActionOutcome::Blocked(ActionBlock::Dead);
    }
    run(ctx, action, ActionOrigin::Event);
    ActionOutcome::Performed(action)
}

fn run(ctx: &mut SimContext, action: Action, origin: ActionOrigin) {
    debug!("day {} {action} ({origin:?})", ctx.state.day);
    match action {
        Action::Beg => beg(ctx),
        Action::Work => work(ctx),
        Action::Eat => eat(ctx),
        Action::Sleep => sleep(ctx),
        Action::Scavenge => scavenge(ctx),
        Action::SellMagazines => sell_magazines(ctx),
        Action::SellFlowers => sell_flowers(ctx),
        Action::Subsidy => apply_for_subsidy(ctx),
        Action::RescuePigeon => rescue_pigeon(ctx),
        Action::BuyChocolate => buy_chocolate(ctx),
    }
}

/// Publish the narrative line, then resolve. A collapse triggered by the
/// bundle replaces the narrative afterwards.
fn settle(ctx: &mut SimContext, narrative: &str, bundle: EffectBundle, tone: LogTone, log: &str) {
    ctx.narrative = narrative.to_string();
    apply_effects_with_tone(ctx, bundle, tone, log);
}

fn beg(ctx: &mut SimContext) {
    let gain = ctx.rand_int(BEG_GAIN_RANGE.0, BEG_GAIN_RANGE.1);
    let mood = ctx.rand_small(BEG_MOOD_RANGE.0, BEG_MOOD_RANGE.1);
    let hostile = BEG_HOSTILE_BASE + ctx.bad_luck();
    if ctx.chance(hostile) {
        let mood = mood - BEG_HOSTILE_MOOD_PENALTY;
        settle(
            ctx,
            "Someone sneers at you and you just have to take it.",
            EffectBundle::new()
                .money(0)
                .mood(mood)
                .health(-2)
                .hunger(BEG_HUNGER_COST),
            LogTone::Warning,
            &format!(
                "Someone hostile shows up while you beg (mood {}, health -2, hunger {BEG_HUNGER_COST}).",
                signed(i64::from(mood))
            ),
        );
    } else {
        settle(
            ctx,
            "You wait at the edge of the crowd for the next bit of kindness.",
            EffectBundle::new()
                .money(gain)
                .mood(mood)
                .hunger(BEG_HUNGER_COST),
            LogTone::Info,
            &format!(
                "Begging brings in {} (money +{gain}, mood {}, hunger {BEG_HUNGER_COST}).",
                format_money(gain),
                signed(i64::from(mood))
            ),
        );
    }
}

fn work(ctx: &mut SimContext) {
    let bonus = if ctx.state.mood >= WORK_GOOD_MOOD {
        WORK_HIRE_MOOD_BONUS
    } else {
        0.0
    };
    if !ctx.chance(WORK_HIRE_BASE + bonus) {
        settle(
            ctx,
            "Nobody at the labour corner needs an extra pair of hands today.",
            EffectBundle::new().hunger(ERRAND_HUNGER_COST).mood(-4),
            LogTone::Warning,
            &format!("No one hires you (hunger {ERRAND_HUNGER_COST}, mood -4)."),
        );
        return;
    }
    let pay = ctx.rand_int(WORK_PAY_RANGE.0, WORK_PAY_RANGE.1);
    let injury = WORK_INJURY_BASE + ctx.bad_luck();
    if ctx.chance(injury) {
        let wage = pay / 2;
        settle(
            ctx,
            "You get hurt hauling boxes and the foreman docks your pay.",
            EffectBundle::new()
                .money(wage)
                .health(-10)
                .hunger(WORK_HUNGER_COST)
                .mood(-3),
            LogTone::Warning,
            &format!(
                "Injured on the job, paid only {} (money +{wage}, health -10, hunger {WORK_HUNGER_COST}, mood -3).",
                format_money(wage)
            ),
        );
    } else {
        settle(
            ctx,
            "A full day of hard labour, paid in cash.",
            EffectBundle::new()
                .money(pay)
                .hunger(WORK_HUNGER_COST)
                .health(-2)
                .mood(2),
            LogTone::Info,
            &format!(
                "You earn {} from day work (money +{pay}, hunger {WORK_HUNGER_COST}, health -2, mood +2).",
                format_money(pay)
            ),
        );
    }
}

fn eat(ctx: &mut SimContext) {
    if ctx.state.money < MEAL_PRICE {
        settle(
            ctx,
            "You count your coins. Not enough for a meal.",
            EffectBundle::new().mood(-1),
            LogTone::Warning,
            &format!("You can't afford a {} meal (mood -1).", format_money(MEAL_PRICE)),
        );
        return;
    }
    settle(
        ctx,
        "A hot meal. For a moment, things feel manageable.",
        EffectBundle::new()
            .money(-MEAL_PRICE)
            .hunger(MEAL_HUNGER)
            .mood(2),
        LogTone::Info,
        &format!("You buy a meal (money -{MEAL_PRICE}, hunger +{MEAL_HUNGER}, mood +2)."),
    );
}

fn sleep(ctx: &mut SimContext) {
    let restore = ctx.rand_small(SLEEP_RESTORE_RANGE.0, SLEEP_RESTORE_RANGE.1);
    let disturbed = SLEEP_DISTURBED_BASE + ctx.bad_luck();
    if ctx.chance(disturbed) {
        let roll = ctx.rand_int(SLEEP_THEFT_RANGE.0, SLEEP_THEFT_RANGE.1);
        let loss = roll.min(ctx.state.money.max(0));
        settle(
            ctx,
            "Someone went through your bag while you slept.",
            EffectBundle::new()
                .money(-loss)
                .health(2)
                .mood(-6)
                .hunger(ERRAND_HUNGER_COST),
            LogTone::Warning,
            &format!(
                "Your sleep is disturbed and you lose {} (money -{loss}, health +2, mood -6, hunger {ERRAND_HUNGER_COST}).",
                format_money(loss)
            ),
        );
    } else {
        settle(
            ctx,
            "You find a quiet doorway and actually sleep.",
            EffectBundle::new()
                .health(restore)
                .mood(3)
                .hunger(ERRAND_HUNGER_COST),
            LogTone::Info,
            &format!("You rest (health +{restore}, mood +3, hunger {ERRAND_HUNGER_COST})."),
        );
    }
}

fn scavenge(ctx: &mut SimContext) {
    let cut = SCAVENGE_CUT_BASE + ctx.bad_luck();
    if ctx.chance(cut) {
        settle(
            ctx,
            "Broken glass at the bottom of the bin.",
            EffectBundle::new()
                .health(-6)
                .mood(-3)
                .hunger(ERRAND_HUNGER_COST),
            LogTone::Warning,
            &format!("You cut your hand scavenging (health -6, mood -3, hunger {ERRAND_HUNGER_COST})."),
        );
        return;
    }
    if ctx.chance(SCAVENGE_FOOD_CHANCE) {
        let food = ctx.rand_small(SCAVENGE_FOOD_RANGE.0, SCAVENGE_FOOD_RANGE.1);
        settle(
            ctx,
            "Behind the market you find something still edible.",
            EffectBundle::new().hunger(food).mood(1),
            LogTone::Info,
            &format!("You scavenge some food (hunger +{food}, mood +1)."),
        );
    } else {
        let cash = ctx.rand_int(SCAVENGE_CASH_RANGE.0, SCAVENGE_CASH_RANGE.1);
        settle(
            ctx,
            "Bottles and cans add up to a little change.",
            EffectBundle::new().money(cash).hunger(ERRAND_HUNGER_COST),
            LogTone::Info,
            &format!(
                "You turn in recyclables for {} (money +{cash}, hunger {ERRAND_HUNGER_COST}).",
                format_money(cash)
            ),
        );
    }
}

fn sell_magazines(ctx: &mut SimContext) {
    let bonus = if ctx.state.mood >= STEADY_MOOD {
        MAGAZINE_SALE_MOOD_BONUS
    } else {
        0.0
    };
    if ctx.chance(MAGAZINE_SALE_BASE + bonus) {
        let commission = ctx.rand_int(MAGAZINE_COMMISSION_RANGE.0, MAGAZINE_COMMISSION_RANGE.1);
        settle(
            ctx,
            "A few people stop, and a few copies sell.",
            EffectBundle::new()
                .money(commission)
                .mood(5)
                .hunger(ERRAND_HUNGER_COST),
            LogTone::Info,
            &format!(
                "Magazine sales earn you {} (money +{commission}, mood +5, hunger {ERRAND_HUNGER_COST}).",
                format_money(commission)
            ),
        );
    } else {
        settle(
            ctx,
            "People walk past the stack of magazines without looking.",
            EffectBundle::new().mood(-5).hunger(ERRAND_HUNGER_COST),
            LogTone::Warning,
            &format!("No magazines sell (mood -5, hunger {ERRAND_HUNGER_COST})."),
        );
    }
}

fn sell_flowers(ctx: &mut SimContext) {
    if ctx.state.money < FLOWER_STOCK_PRICE {
        settle(
            ctx,
            "The flower seller wants cash up front.",
            EffectBundle::new().mood(-2).hunger(-3),
            LogTone::Warning,
            &format!(
                "You couldn't afford {} of stock (mood -2, hunger -3).",
                format_money(FLOWER_STOCK_PRICE)
            ),
        );
        return;
    }
    let odds = (FLOWER_SALE_BASE - ctx.bad_luck()).max(FLOWER_SALE_FLOOR);
    if ctx.chance(odds) {
        let revenue = ctx.rand_int(FLOWER_REVENUE_RANGE.0, FLOWER_REVENUE_RANGE.1);
        let profit = revenue - FLOWER_STOCK_PRICE;
        settle(
            ctx,
            "Drivers at the red light buy every string of flowers.",
            EffectBundle::new()
                .money(profit)
                .mood(4)
                .hunger(ERRAND_HUNGER_COST),
            LogTone::Info,
            &format!(
                "The flowers sell for {} (money {}, mood +4, hunger {ERRAND_HUNGER_COST}).",
                format_money(revenue),
                signed(profit)
            ),
        );
    } else {
        settle(
            ctx,
            "The flowers wilt before anyone buys them.",
            EffectBundle::new()
                .money(-FLOWER_STOCK_PRICE)
                .mood(-6)
                .hunger(ERRAND_HUNGER_COST),
            LogTone::Warning,
            &format!(
                "The stock goes to waste (money -{FLOWER_STOCK_PRICE}, mood -6, hunger {ERRAND_HUNGER_COST})."
            ),
        );
    }
}

fn apply_for_subsidy(ctx: &mut SimContext) {
    ctx.state.last_subsidy_day = i64::from(ctx.state.day);
    if ctx.chance(SUBSIDY_APPROVAL_CHANCE) {
        let grant = ctx.rand_int(SUBSIDY_GRANT_RANGE.0, SUBSIDY_GRANT_RANGE.1);
        settle(
            ctx,
            "After a long queue and a longer form, the caseworker stamps it.",
            EffectBundle::new().money(grant).mood(8).hunger(-8),
            LogTone::Info,
            &format!(
                "Your subsidy is approved: {} (money +{grant}, mood +8, hunger -8).",
                format_money(grant)
            ),
        );
    } else {
        settle(
            ctx,
            "The caseworker says a document is missing. Come back next week.",
            EffectBundle::new().mood(-6).hunger(-8),
            LogTone::Warning,
            "Your subsidy application is rejected (mood -6, hunger -8).",
        );
    }
}

fn rescue_pigeon(ctx: &mut SimContext) {
    let bite = PIGEON_BITE_BASE + ctx.bad_luck();
    if ctx.chance(bite) {
        settle(
            ctx,
            "The pigeon bites you on its way out of the string.",
            EffectBundle::new().health(-4).mood(2).hunger(-3),
            LogTone::Warning,
            "You free the pigeon but get bitten (health -4, mood +2, hunger -3).",
        );
    } else {
        let lift = ctx.rand_small(PIGEON_MOOD_RANGE.0, PIGEON_MOOD_RANGE.1);
        settle(
            ctx,
            "The pigeon flaps off, free of the string around its foot.",
            EffectBundle::new().mood(lift).hunger(-3),
            LogTone::Info,
            &format!("You rescue a pigeon (mood +{lift}, hunger -3)."),
        );
    }
}

fn buy_chocolate(ctx: &mut SimContext) {
    if ctx.state.money < CHOCOLATE_PRICE {
        settle(
            ctx,
            "You stare at the chocolate through the window.",
            EffectBundle::new().mood(-3),
            LogTone::Warning,
            &format!(
                "You can't afford {} chocolate (mood -3).",
                format_money(CHOCOLATE_PRICE)
            ),
        );
        return;
    }
    let lift = ctx.rand_small(CHOCOLATE_MOOD_RANGE.0, CHOCOLATE_MOOD_RANGE.1);
    settle(
        ctx,
        "A small square of chocolate, all to yourself.",
        EffectBundle::new()
            .money(-CHOCOLATE_PRICE)
            .mood(lift)
            .hunger(5),
        LogTone::Info,
        &format!("You buy chocolate (money -{CHOCOLATE_PRICE}, mood +{lift}, hunger +5)."),
    );
}
