//! Day cycle controller.

use log::debug;

use crate::context::SimContext;
use crate::effects::{check_status, passive_decay};
use crate::events::{maybe_extra_chaos_event, trigger_daily_event};
use crate::journal::LogTone;

/// What a single night did to the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayReport {
    pub day: u32,
    pub hunger_drain: i32,
    /// Whether the run ended overnight.
    pub collapsed: bool,
    pub events_triggered: u8,
}

/// Move to the next day. Returns `None` once the run has ended.
pub fn advance_day(ctx: &mut SimContext) -> Option<DayReport> {
    if !ctx.state.alive {
        return None;
    }
    let table = *ctx.table();
    ctx.state.day = ctx.state.day.saturating_add(1);
    ctx.state.actions_left = ctx.state.actions_per_day;
    debug!("advancing to day {} ({} mode)", ctx.state.day, ctx.state.mode);

    // Decay looks at the hunger carried into the night, before the drain.
    passive_decay(ctx);

    let drain = ctx.rand_small(table.daily_hunger_decay_min, table.daily_hunger_decay_max);
    ctx.state.hunger = (ctx.state.hunger - drain).max(0);
    ctx.log(
        LogTone::Info,
        format!("A new day begins. Hunger drops by {drain}."),
    );

    let collapsed = check_status(ctx);
    let mut events_triggered = 0;
    if ctx.state.alive {
        if trigger_daily_event(ctx, true).is_some() {
            events_triggered += 1;
        }
        if maybe_extra_chaos_event(ctx) {
            events_triggered += 1;
        }
    }

    Some(DayReport {
        day: ctx.state.day,
        hunger_drain: drain,
        collapsed,
        events_triggered,
    })
}
