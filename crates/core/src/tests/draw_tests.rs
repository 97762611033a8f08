// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    apply_at, apply_with, at, at_on, drawn, drawn_names, opened, test_date, with_entrants,
};
use crate::{
    Command, CoreError, NoopReason, Outcome, PeriodState, ScriptedPicker, SelectionPhase,
    StoreMutation, ThreadRngPicker, TransitionResult,
};
use chrono::Days;
use roleta_domain::{DrawTrigger, Period};

const SCHEDULED: Command = Command::RunDraw {
    trigger: DrawTrigger::Scheduled,
};
const MANUAL: Command = Command::RunDraw {
    trigger: DrawTrigger::Manual,
};

#[test]
fn test_draw_is_a_permutation_of_the_ledger() {
    let state: PeriodState = with_entrants(Period::Morning, &["a", "b", "c"]);

    let result: TransitionResult =
        apply_with(&state, SCHEDULED, at(9, 45, 0), &mut ThreadRngPicker).unwrap();

    let mut names: Vec<String> = drawn_names(&result.new_state);
    names.sort();
    assert_eq!(names, vec!["a", "b", "c"]);
    let positions: Vec<usize> = result.new_state.draw.iter().map(|d| d.position).collect();
    assert_eq!(positions, vec![1, 2, 3]);
}

#[test]
fn test_draw_order_follows_the_picker() {
    let state: PeriodState = with_entrants(Period::Morning, &["a", "b", "c"]);

    let result: TransitionResult =
        apply_with(&state, SCHEDULED, at(9, 45, 0), &mut ScriptedPicker::new([0, 0])).unwrap();

    assert_eq!(drawn_names(&result.new_state), vec!["b", "c", "a"]);
}

#[test]
fn test_draw_resets_selection_to_pending_and_records_mutation() {
    let state: PeriodState = with_entrants(Period::Morning, &["a", "b"]);

    let result: TransitionResult = apply_at(&state, SCHEDULED, at(9, 45, 0)).unwrap();

    assert_eq!(result.new_state.selection.phase, SelectionPhase::Pending);
    assert_eq!(result.new_state.last_scheduled_draw, Some(test_date()));
    assert!(matches!(
        result.mutations.as_slice(),
        [StoreMutation::ReplaceDraw { period: Period::Morning, entries, drawn_on }]
            if entries.len() == 2 && *drawn_on == test_date()
    ));
}

#[test]
fn test_second_scheduled_draw_same_day_is_a_noop() {
    let state: PeriodState = drawn(Period::Morning, &["a", "b", "c"]);

    let result: TransitionResult =
        apply_with(&state, SCHEDULED, at(9, 45, 30), &mut ScriptedPicker::new([0, 0])).unwrap();

    assert_eq!(
        result.outcome,
        Outcome::Unchanged(NoopReason::AlreadyDrawnToday)
    );
    assert!(result.mutations.is_empty());
    assert_eq!(result.new_state, state);
}

#[test]
fn test_scheduled_draw_runs_again_next_day() {
    let state: PeriodState = drawn(Period::Morning, &["a", "b"]);
    let tomorrow = test_date().checked_add_days(Days::new(1)).unwrap();

    let result: TransitionResult =
        apply_at(&state, SCHEDULED, at_on(tomorrow, 9, 45, 0)).unwrap();

    assert_eq!(result.outcome, Outcome::Changed);
    assert_eq!(result.new_state.last_scheduled_draw, Some(tomorrow));
}

#[test]
fn test_manual_draw_always_reexecutes() {
    let state: PeriodState = drawn(Period::Morning, &["a", "b", "c"]);
    assert_eq!(drawn_names(&state), vec!["a", "b", "c"]);

    let result: TransitionResult =
        apply_with(&state, MANUAL, at(9, 50, 0), &mut ScriptedPicker::new([0, 0])).unwrap();

    assert_eq!(result.outcome, Outcome::Changed);
    assert_eq!(drawn_names(&result.new_state), vec!["b", "c", "a"]);
}

#[test]
fn test_manual_draw_consumes_scheduled_slot() {
    let state: PeriodState = with_entrants(Period::Morning, &["a", "b"]);

    let manual: PeriodState = apply_at(&state, MANUAL, at(9, 0, 0)).unwrap().new_state;
    let scheduled: TransitionResult = apply_at(&manual, SCHEDULED, at(9, 45, 0)).unwrap();

    assert_eq!(
        scheduled.outcome,
        Outcome::Unchanged(NoopReason::AlreadyDrawnToday)
    );
}

#[test]
fn test_manual_draw_clears_selection_state() {
    let state: PeriodState = opened(Period::Morning, &["a", "b"]);
    assert_eq!(state.selection.phase, SelectionPhase::Open);

    let result: TransitionResult = apply_at(&state, MANUAL, at(10, 0, 0)).unwrap();

    assert_eq!(result.new_state.selection.phase, SelectionPhase::Pending);
    assert!(result.new_state.selection.selections.is_empty());
    assert!(result.new_state.selection.crossed.is_empty());
}

#[test]
fn test_scheduled_draw_on_empty_ledger_consumes_slot() {
    let state: PeriodState = PeriodState::new(Period::Morning);

    let result: TransitionResult = apply_at(&state, SCHEDULED, at(9, 45, 0)).unwrap();

    assert_eq!(result.outcome, Outcome::Unchanged(NoopReason::EmptyLedger));
    assert!(result.new_state.draw.is_empty());
    assert_eq!(result.new_state.selection.phase, SelectionPhase::NoDraw);
    assert_eq!(result.new_state.last_scheduled_draw, Some(test_date()));
    assert_eq!(
        result.mutations,
        vec![StoreMutation::SetDrawMarker {
            period: Period::Morning,
            date: test_date(),
        }]
    );
}

#[test]
fn test_manual_draw_on_empty_ledger_is_rejected() {
    let state: PeriodState = PeriodState::new(Period::Afternoon);

    let result = apply_at(&state, MANUAL, at(15, 0, 0));

    assert_eq!(
        result.unwrap_err(),
        CoreError::EmptyLedger {
            period: Period::Afternoon
        }
    );
}

#[test]
fn test_scheduled_draw_before_draw_time_is_rejected() {
    let state: PeriodState = with_entrants(Period::Morning, &["a"]);

    let result = apply_at(&state, SCHEDULED, at(9, 44, 59));

    assert!(matches!(result, Err(CoreError::DrawNotDue { .. })));
}

#[test]
fn test_draw_references_only_ledger_names() {
    let state: PeriodState = with_entrants(Period::Afternoon, &["x", "y"]);

    let result: TransitionResult =
        apply_with(&state, SCHEDULED, at(14, 45, 0), &mut ThreadRngPicker).unwrap();

    for entry in &result.new_state.draw {
        assert!(result.new_state.entrant(&entry.name).is_some());
    }
}
