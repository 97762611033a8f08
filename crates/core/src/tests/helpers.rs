// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Command, CoreError, IndexPicker, PeriodState, ScriptedPicker, TransitionContext,
    TransitionResult, apply,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use roleta_domain::{DrawTrigger, EntrantName, OwnerHandle, Period, WindowPolicy};

pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

/// Local wall-clock time on the test date.
pub fn at(hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    at_on(test_date(), hour, minute, second)
}

pub fn at_on(date: NaiveDate, hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    WindowPolicy::canonical()
        .localize(date, NaiveTime::from_hms_opt(hour, minute, second).unwrap())
        .unwrap()
}

pub fn name(raw: &str) -> EntrantName {
    EntrantName::parse(raw).unwrap()
}

pub fn handle(token: u64) -> OwnerHandle {
    OwnerHandle::from_token(token)
}

pub fn apply_with(
    state: &PeriodState,
    command: Command,
    now: DateTime<Utc>,
    picker: &mut dyn IndexPicker,
) -> Result<TransitionResult, CoreError> {
    let policy: WindowPolicy = WindowPolicy::canonical();
    let mut ctx = TransitionContext {
        now,
        policy: &policy,
        picker,
    };
    apply(state, command, &mut ctx)
}

pub fn apply_at(
    state: &PeriodState,
    command: Command,
    now: DateTime<Utc>,
) -> Result<TransitionResult, CoreError> {
    apply_with(state, command, now, &mut ScriptedPicker::identity())
}

pub fn add(state: &PeriodState, raw: &str, owner: &OwnerHandle) -> PeriodState {
    let signup_time: DateTime<Utc> = match state.period {
        Period::Morning => at(5, 10, 0),
        Period::Afternoon => at(12, 10, 0),
    };
    apply_at(
        state,
        Command::AddEntrant {
            name: name(raw),
            owner: owner.clone(),
        },
        signup_time,
    )
    .unwrap()
    .new_state
}

/// A period whose ledger holds `names`, all added by handle 1.
pub fn with_entrants(period: Period, names: &[&str]) -> PeriodState {
    let owner: OwnerHandle = handle(1);
    names
        .iter()
        .fold(PeriodState::new(period), |state, raw| add(&state, raw, &owner))
}

pub fn draw_time(period: Period) -> DateTime<Utc> {
    match period {
        Period::Morning => at(9, 45, 0),
        Period::Afternoon => at(14, 45, 0),
    }
}

/// A period drawn in ledger order.
pub fn drawn(period: Period, names: &[&str]) -> PeriodState {
    let state: PeriodState = with_entrants(period, names);
    apply_at(
        &state,
        Command::RunDraw {
            trigger: DrawTrigger::Scheduled,
        },
        draw_time(period),
    )
    .unwrap()
    .new_state
}

/// A period drawn in ledger order with the selection window open.
pub fn opened(period: Period, names: &[&str]) -> PeriodState {
    apply_at(
        &drawn(period, names),
        Command::OpenSelectionWindow,
        draw_time(period),
    )
    .unwrap()
    .new_state
}

pub fn drawn_names(state: &PeriodState) -> Vec<String> {
    state
        .draw
        .iter()
        .map(|d| d.name.display().to_string())
        .collect()
}
