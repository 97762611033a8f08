// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{add_all, reload, reset, run_draw, test_date};
use crate::Persistence;
use roleta::{PeriodState, SelectionPhase};
use roleta_domain::Period;

#[test]
fn test_reset_clears_both_periods_and_records_date() {
    let mut store = Persistence::new_in_memory().unwrap();
    let morning = add_all(&mut store, Period::Morning, &["Ana", "Bia"]);
    run_draw(&mut store, &morning);
    add_all(&mut store, Period::Afternoon, &["Caio"]);

    reset(&mut store);

    let loaded = reload(&mut store);
    assert!(loaded.morning.entrants.is_empty());
    assert!(loaded.morning.draw.is_empty());
    assert_eq!(loaded.morning.selection.phase, SelectionPhase::NoDraw);
    assert_eq!(loaded.afternoon, PeriodState::new(Period::Afternoon));
    assert_eq!(loaded.last_reset, Some(test_date()));
}

#[test]
fn test_reset_keeps_scheduled_draw_markers() {
    let mut store = Persistence::new_in_memory().unwrap();
    let morning = add_all(&mut store, Period::Morning, &["Ana"]);
    let drawn = run_draw(&mut store, &morning);

    reset(&mut store);

    let loaded = reload(&mut store);
    assert_eq!(loaded.morning, drawn.cleared());
    assert_eq!(loaded.morning.last_scheduled_draw, Some(test_date()));
}

#[test]
fn test_repeated_reset_is_harmless() {
    let mut store = Persistence::new_in_memory().unwrap();
    reset(&mut store);
    reset(&mut store);

    assert_eq!(reload(&mut store).last_reset, Some(test_date()));
}
