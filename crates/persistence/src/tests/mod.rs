// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod draw_tests;
mod ledger_tests;
mod reset_tests;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use roleta::{
    Command, PeriodState, ScriptedPicker, StoreMutation, TransitionContext, TransitionResult,
    apply,
};
use roleta_domain::{DrawTrigger, EntrantName, OwnerHandle, Period, WindowPolicy};

use crate::{Persistence, RosterStore, StoredRoster};

pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    WindowPolicy::canonical()
        .localize(test_date(), NaiveTime::from_hms_opt(hour, minute, 0).unwrap())
        .unwrap()
}

pub fn name(raw: &str) -> EntrantName {
    EntrantName::parse(raw).unwrap()
}

pub fn handle(token: u64) -> OwnerHandle {
    OwnerHandle::from_token(token)
}

/// Applies a command in memory and mirrors its mutations into the store.
pub fn step(
    store: &mut Persistence,
    state: &PeriodState,
    command: Command,
    now: DateTime<Utc>,
) -> PeriodState {
    let policy: WindowPolicy = WindowPolicy::canonical();
    let mut picker = ScriptedPicker::identity();
    let mut ctx = TransitionContext {
        now,
        policy: &policy,
        picker: &mut picker,
    };
    let result: TransitionResult = apply(state, command, &mut ctx).unwrap();
    for mutation in &result.mutations {
        store.apply(mutation).unwrap();
    }
    result.new_state
}

pub fn add_all(store: &mut Persistence, period: Period, names: &[&str]) -> PeriodState {
    let signup: DateTime<Utc> = match period {
        Period::Morning => at(5, 30),
        Period::Afternoon => at(12, 30),
    };
    names.iter().fold(PeriodState::new(period), |state, raw| {
        step(
            store,
            &state,
            Command::AddEntrant {
                name: name(raw),
                owner: handle(7),
            },
            signup,
        )
    })
}

pub fn draw_time(period: Period) -> DateTime<Utc> {
    match period {
        Period::Morning => at(9, 45),
        Period::Afternoon => at(14, 45),
    }
}

pub fn run_draw(store: &mut Persistence, state: &PeriodState) -> PeriodState {
    step(
        store,
        state,
        Command::RunDraw {
            trigger: DrawTrigger::Scheduled,
        },
        draw_time(state.period),
    )
}

pub fn reload(store: &mut Persistence) -> StoredRoster {
    store.load().unwrap()
}

pub fn reset(store: &mut Persistence) {
    store
        .apply(&StoreMutation::ResetDay { date: test_date() })
        .unwrap();
}
