// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{apply_at, at, drawn, handle, name, opened};
use crate::{
    Command, CoreError, NoopReason, Outcome, PeriodState, SelectionPhase, StoreMutation,
    TransitionResult,
};
use roleta_domain::{DrawTrigger, Period};

fn select(state: &PeriodState, raw: &str, selected: bool) -> Result<TransitionResult, CoreError> {
    apply_at(
        state,
        Command::RecordSelection {
            name: name(raw),
            selected,
            owner: Some(handle(9)),
        },
        at(10, 0, 0),
    )
}

fn close(state: &PeriodState) -> Result<TransitionResult, CoreError> {
    apply_at(state, Command::CloseSelectionWindow, at(11, 45, 0))
}

#[test]
fn test_open_initializes_every_drawn_name_unselected() {
    let state: PeriodState = opened(Period::Morning, &["a", "b", "c"]);

    assert_eq!(state.selection.phase, SelectionPhase::Open);
    assert_eq!(state.selection.selections.len(), 3);
    assert!(state.selection.selections.values().all(|selected| !selected));
}

#[test]
fn test_open_over_empty_draw_is_a_noop() {
    let state: PeriodState = PeriodState::new(Period::Morning);

    let result: TransitionResult =
        apply_at(&state, Command::OpenSelectionWindow, at(9, 45, 0)).unwrap();

    assert_eq!(result.outcome, Outcome::Unchanged(NoopReason::NothingDrawn));
    assert_eq!(result.new_state.selection.phase, SelectionPhase::NoDraw);
}

#[test]
fn test_open_twice_is_an_invalid_transition() {
    let state: PeriodState = opened(Period::Morning, &["a"]);

    let result = apply_at(&state, Command::OpenSelectionWindow, at(9, 46, 0));

    assert_eq!(
        result.unwrap_err(),
        CoreError::InvalidTransition {
            period: Period::Morning,
            from: SelectionPhase::Open,
            action: "open",
        }
    );
}

#[test]
fn test_selection_before_open_is_rejected() {
    let state: PeriodState = drawn(Period::Morning, &["a"]);

    let result = select(&state, "a", true);

    assert_eq!(
        result.unwrap_err(),
        CoreError::SelectionClosed {
            period: Period::Morning
        }
    );
}

#[test]
fn test_selection_of_undrawn_name_is_rejected() {
    let state: PeriodState = opened(Period::Morning, &["a"]);

    let result = select(&state, "zed", true);

    assert!(matches!(result, Err(CoreError::NotInDraw { .. })));
}

#[test]
fn test_selection_is_last_write_wins() {
    let state: PeriodState = opened(Period::Morning, &["a", "b"]);

    let state: PeriodState = select(&state, "a", true).unwrap().new_state;
    let state: PeriodState = select(&state, "A", false).unwrap().new_state;
    let state: PeriodState = select(&state, "a", true).unwrap().new_state;

    assert!(state.selection.is_selected(&name("a")));
    assert!(!state.selection.is_selected(&name("b")));
}

#[test]
fn test_selection_mutation_uses_drawn_spelling() {
    let state: PeriodState = opened(Period::Morning, &["Ana"]);

    let result: TransitionResult = select(&state, "ANA", true).unwrap();

    assert_eq!(
        result.mutations,
        vec![StoreMutation::SetSelections {
            period: Period::Morning,
            selections: vec![(name("Ana"), true)],
        }]
    );
    assert_eq!(result.mutations.len(), 1);
}

#[test]
fn test_close_crosses_unconfirmed_names() {
    let state: PeriodState = opened(Period::Morning, &["a", "b", "c"]);
    let state: PeriodState = select(&state, "a", true).unwrap().new_state;

    let result: TransitionResult = close(&state).unwrap();
    let closed: PeriodState = result.new_state;

    assert_eq!(closed.selection.phase, SelectionPhase::Finalized);
    assert!(!closed.selection.is_open());
    assert!(!closed.selection.is_crossed(&name("a")));
    assert!(closed.selection.is_crossed(&name("b")));
    assert!(closed.selection.is_crossed(&name("c")));
    assert_eq!(
        result.mutations,
        vec![StoreMutation::FinalizeSelection {
            period: Period::Morning,
            crossed: vec![name("b"), name("c")],
        }]
    );
}

#[test]
fn test_close_crosses_explicitly_unselected_names() {
    let state: PeriodState = opened(Period::Morning, &["a", "b"]);
    let state: PeriodState = select(&state, "a", true).unwrap().new_state;
    let state: PeriodState = select(&state, "b", false).unwrap().new_state;

    let closed: PeriodState = close(&state).unwrap().new_state;

    assert_eq!(closed.kept_names(), vec![&name("a")]);
}

#[test]
fn test_close_without_open_is_an_invalid_transition() {
    let state: PeriodState = drawn(Period::Morning, &["a"]);

    let result = close(&state);

    assert!(matches!(
        result,
        Err(CoreError::InvalidTransition {
            from: SelectionPhase::Pending,
            ..
        })
    ));
}

#[test]
fn test_finalized_window_cannot_reopen_or_accept_selections() {
    let state: PeriodState = opened(Period::Morning, &["a"]);
    let closed: PeriodState = close(&state).unwrap().new_state;

    assert!(matches!(
        apply_at(&closed, Command::OpenSelectionWindow, at(11, 50, 0)),
        Err(CoreError::InvalidTransition { .. })
    ));
    assert!(matches!(
        select(&closed, "a", true),
        Err(CoreError::SelectionClosed { .. })
    ));
}

#[test]
fn test_only_a_new_draw_clears_crossed_flags() {
    let state: PeriodState = opened(Period::Morning, &["a", "b"]);
    let closed: PeriodState = close(&state).unwrap().new_state;
    assert_eq!(closed.selection.crossed.len(), 2);

    let redrawn: PeriodState = apply_at(
        &closed,
        Command::RunDraw {
            trigger: DrawTrigger::Manual,
        },
        at(11, 50, 0),
    )
    .unwrap()
    .new_state;

    assert!(redrawn.selection.crossed.is_empty());
    assert_eq!(redrawn.selection.phase, SelectionPhase::Pending);
}

#[test]
fn test_kept_names_sets_every_drawn_name() {
    let state: PeriodState = opened(Period::Morning, &["a", "b", "c"]);
    let state: PeriodState = select(&state, "b", true).unwrap().new_state;

    let result: TransitionResult = apply_at(
        &state,
        Command::RecordKeptNames {
            kept: vec![name("a"), name("c")],
        },
        at(10, 30, 0),
    )
    .unwrap();

    let selection = &result.new_state.selection;
    assert!(selection.is_selected(&name("a")));
    assert!(!selection.is_selected(&name("b")));
    assert!(selection.is_selected(&name("c")));
    assert_eq!(
        result.mutations,
        vec![StoreMutation::SetSelections {
            period: Period::Morning,
            selections: vec![(name("a"), true), (name("b"), false), (name("c"), true)],
        }]
    );
}

#[test]
fn test_kept_names_rejects_undrawn_names() {
    let state: PeriodState = opened(Period::Morning, &["a"]);

    let result = apply_at(
        &state,
        Command::RecordKeptNames {
            kept: vec![name("a"), name("b")],
        },
        at(10, 30, 0),
    );

    assert!(matches!(result, Err(CoreError::NotInDraw { .. })));
}

#[test]
fn test_cut_scenario() {
    let state: PeriodState = opened(Period::Morning, &["a", "b", "c"]);
    let state: PeriodState = select(&state, "a", true).unwrap().new_state;
    let closed: PeriodState = close(&state).unwrap().new_state;

    let crossed: Vec<&str> = closed
        .selection
        .crossed
        .iter()
        .map(|n| n.display())
        .collect();
    assert_eq!(crossed, vec!["b", "c"]);
    assert!(!closed.selection.is_open());
}
