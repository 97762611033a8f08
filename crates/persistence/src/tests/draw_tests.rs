// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{add_all, at, reload, run_draw, step, test_date};
use crate::Persistence;
use roleta::{Command, PeriodState, SelectionPhase};
use roleta_domain::{DrawTrigger, Period};

#[test]
fn test_draw_round_trips_as_pending() {
    let mut store = Persistence::new_in_memory().unwrap();
    let state = add_all(&mut store, Period::Morning, &["Ana", "Bia", "Caio"]);
    let state = run_draw(&mut store, &state);

    let loaded = reload(&mut store);
    assert_eq!(loaded.morning, state);
    assert_eq!(loaded.morning.selection.phase, SelectionPhase::Pending);
    assert_eq!(loaded.morning.last_scheduled_draw, Some(test_date()));
    let positions: Vec<usize> = loaded.morning.draw.iter().map(|d| d.position).collect();
    assert_eq!(positions, vec![1, 2, 3]);
}

#[test]
fn test_redraw_replaces_previous_rows() {
    let mut store = Persistence::new_in_memory().unwrap();
    let state = add_all(&mut store, Period::Afternoon, &["Ana", "Bia"]);
    let state = run_draw(&mut store, &state);
    let state = step(
        &mut store,
        &state,
        Command::RunDraw {
            trigger: DrawTrigger::Manual,
        },
        at(15, 0),
    );

    let loaded = reload(&mut store);
    assert_eq!(loaded.afternoon, state);
    assert_eq!(loaded.afternoon.draw.len(), 2);
}

#[test]
fn test_scheduled_draw_on_empty_ledger_stores_only_marker() {
    let mut store = Persistence::new_in_memory().unwrap();
    let state = run_draw(&mut store, &PeriodState::new(Period::Morning));

    let loaded = reload(&mut store);
    assert_eq!(loaded.morning, state);
    assert!(loaded.morning.draw.is_empty());
    assert_eq!(loaded.morning.selection.phase, SelectionPhase::NoDraw);
    assert_eq!(loaded.morning.last_scheduled_draw, Some(test_date()));
}

#[test]
fn test_draw_in_one_period_leaves_other_untouched() {
    let mut store = Persistence::new_in_memory().unwrap();
    let morning = add_all(&mut store, Period::Morning, &["Ana"]);
    let afternoon = add_all(&mut store, Period::Afternoon, &["Bia"]);
    run_draw(&mut store, &morning);

    let loaded = reload(&mut store);
    assert_eq!(loaded.afternoon, afternoon);
    assert_eq!(loaded.afternoon.last_scheduled_draw, None);
}
