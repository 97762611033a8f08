// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Time-driven transitions.
//!
//! The scheduler may tick late, early, or several times within the same
//! minute. These helpers only look at the current state and the clock, so
//! calling them redundantly is harmless: the per-day markers turn repeats
//! into no-ops.

use crate::command::Command;
use crate::state::{PeriodState, SelectionPhase};
use chrono::{DateTime, NaiveDate, Utc};
use roleta_domain::{DrawTrigger, WindowPolicy};

/// Whether the daily reset must run for `today`.
#[must_use]
pub fn reset_required(last_reset: Option<NaiveDate>, today: NaiveDate) -> bool {
    last_reset != Some(today)
}

/// Commands the scheduler should apply to `state` at `now`, in order.
///
/// - The scheduled draw, once per day, between the draw time and the cut
/// - Opening the selection window while it is allowed and a draw is pending
/// - Closing the selection window once the cut has passed
#[must_use]
pub fn due_commands(state: &PeriodState, policy: &WindowPolicy, now: DateTime<Utc>) -> Vec<Command> {
    let period = state.period;
    let today: NaiveDate = policy.today(now);
    let mut due: Vec<Command> = Vec::new();

    let draw_due: bool = policy.is_draw_due(period, now)
        && !policy.is_past_cut(period, now)
        && state.last_scheduled_draw != Some(today);
    if draw_due {
        due.push(Command::RunDraw {
            trigger: DrawTrigger::Scheduled,
        });
    }

    if policy.is_selection_window_allowed(period, now)
        && (draw_due || state.selection.phase == SelectionPhase::Pending)
    {
        due.push(Command::OpenSelectionWindow);
    }

    if policy.is_past_cut(period, now) && state.selection.phase == SelectionPhase::Open {
        due.push(Command::CloseSelectionWindow);
    }

    due
}
