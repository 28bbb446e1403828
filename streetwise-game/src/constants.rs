//! Centralized balance and tuning constants for Streetwise game logic.
//!
//! Mode-dependent values live in [`crate::tuning`]; everything here is shared
//! by both modes. Keeping them together means gameplay can only be adjusted
//! through reviewed code changes.

// Resources ----------------------------------------------------------------
pub(crate) const RESOURCE_MIN: i32 = 0;
pub(crate) const RESOURCE_MAX: i32 = 100;

// Defaults -----------------------------------------------------------------
pub(crate) const START_DAY: u32 = 1;
pub(crate) const START_MONEY: i64 = 0;
pub(crate) const START_HUNGER: i32 = 100;
pub(crate) const START_HEALTH: i32 = 100;
pub(crate) const START_MOOD: i32 = 50;
pub(crate) const START_LAST_EVENT_DAY: i64 = 0;
pub(crate) const SUBSIDY_NEVER_CLAIMED: i64 = -999;

// Persistence --------------------------------------------------------------
pub const SAVE_KEY: &str = "streetwise.save.v2";

// Bad luck -----------------------------------------------------------------
pub(crate) const BAD_LUCK_MOOD_PIVOT: f64 = 50.0;
pub(crate) const BAD_LUCK_MOOD_DIVISOR: f64 = 300.0;
pub(crate) const BAD_LUCK_MOOD_CAP: f64 = 0.18;

// Passive decay ------------------------------------------------------------
pub(crate) const STARVING_SEVERE_HUNGER: i32 = 10;
pub(crate) const STARVING_MODERATE_HUNGER: i32 = 18;
pub(crate) const STARVING_SEVERE_DAMAGE: i32 = 12;
pub(crate) const STARVING_MODERATE_DAMAGE: i32 = 8;
pub(crate) const STARVING_MILD_DAMAGE: i32 = 5;
pub(crate) const WELL_FED_HUNGER: i32 = 80;

// Event tuning -------------------------------------------------------------
pub(crate) const MAGAZINE_SLOT_CHANCE: f64 = 0.25;
pub(crate) const FLOWER_SLOT_CHANCE: f64 = 0.20;
pub(crate) const STORE_LEFTOVERS_CHANCE: f64 = 0.55;
pub(crate) const CHARITY_GIFT_RANGE: (i64, i64) = (10, 70);
pub(crate) const COLD_FIRE_RISK: f64 = 0.35;
pub(crate) const INFLUENCER_SHOP_HELP_CHANCE: f64 = 0.55;
pub(crate) const INFLUENCER_REPORT_CHANCE: f64 = 0.50;
pub(crate) const INFLUENCER_REPORT_MOOD_BONUS: f64 = 0.10;
pub(crate) const STEADY_MOOD: i32 = 50;

// Action tuning ------------------------------------------------------------
pub(crate) const BEG_GAIN_RANGE: (i64, i64) = (0, 35);
pub(crate) const BEG_MOOD_RANGE: (i32, i32) = (-3, 4);
pub(crate) const BEG_HOSTILE_BASE: f64 = 0.12;
pub(crate) const BEG_HOSTILE_MOOD_PENALTY: i32 = 6;
pub(crate) const BEG_HUNGER_COST: i32 = -5;

pub(crate) const WORK_HIRE_BASE: f64 = 0.45;
pub(crate) const WORK_HIRE_MOOD_BONUS: f64 = 0.10;
pub(crate) const WORK_GOOD_MOOD: i32 = 60;
pub(crate) const WORK_PAY_RANGE: (i64, i64) = (40, 90);
pub(crate) const WORK_INJURY_BASE: f64 = 0.08;
pub(crate) const WORK_HUNGER_COST: i32 = -12;

pub(crate) const MEAL_PRICE: i64 = 30;
pub(crate) const MEAL_HUNGER: i32 = 30;

pub(crate) const SLEEP_RESTORE_RANGE: (i32, i32) = (4, 10);
pub(crate) const SLEEP_DISTURBED_BASE: f64 = 0.15;
pub(crate) const SLEEP_THEFT_RANGE: (i64, i64) = (5, 20);

pub(crate) const SCAVENGE_CUT_BASE: f64 = 0.10;
pub(crate) const SCAVENGE_FOOD_CHANCE: f64 = 0.55;
pub(crate) const SCAVENGE_FOOD_RANGE: (i32, i32) = (8, 20);
pub(crate) const SCAVENGE_CASH_RANGE: (i64, i64) = (5, 25);

pub(crate) const MAGAZINE_SALE_BASE: f64 = 0.35;
pub(crate) const MAGAZINE_SALE_MOOD_BONUS: f64 = 0.10;
pub(crate) const MAGAZINE_COMMISSION_RANGE: (i64, i64) = (30, 80);

pub(crate) const FLOWER_STOCK_PRICE: i64 = 20;
pub(crate) const FLOWER_SALE_BASE: f64 = 0.50;
pub(crate) const FLOWER_SALE_FLOOR: f64 = 0.05;
pub(crate) const FLOWER_REVENUE_RANGE: (i64, i64) = (40, 100);

pub(crate) const SUBSIDY_ACTION_COST: u32 = 2;
pub(crate) const SUBSIDY_COOLDOWN_DAYS: i64 = 7;
pub(crate) const SUBSIDY_APPROVAL_CHANCE: f64 = 0.60;
pub(crate) const SUBSIDY_GRANT_RANGE: (i64, i64) = (120, 200);

pub(crate) const PIGEON_BITE_BASE: f64 = 0.20;
pub(crate) const PIGEON_MOOD_RANGE: (i32, i32) = (6, 12);

pub(crate) const CHOCOLATE_PRICE: i64 = 15;
pub(crate) const CHOCOLATE_MOOD_RANGE: (i32, i32) = (10, 16);

pub(crate) const ERRAND_HUNGER_COST: i32 = -6;

#[cfg(test)]
pub(crate) const FLOAT_EPSILON: f64 = 1e-9;
