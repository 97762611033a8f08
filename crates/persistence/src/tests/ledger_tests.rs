// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{add_all, at, handle, name, reload, step};
use crate::{Persistence, RosterStore};
use chrono::Utc;
use roleta::{Command, StoreMutation};
use roleta_domain::{Entrant, Period};

#[test]
fn test_entrants_round_trip_in_submission_order() {
    let mut store = Persistence::new_in_memory().unwrap();
    let state = add_all(&mut store, Period::Morning, &["Carla", "ana", "Bruno"]);

    let loaded = reload(&mut store);
    assert_eq!(loaded.morning, state);
    let names: Vec<&str> = loaded
        .morning
        .entrants
        .iter()
        .map(|e| e.name.display())
        .collect();
    assert_eq!(names, vec!["Carla", "ana", "Bruno"]);
    assert!(loaded.afternoon.entrants.is_empty());
}

#[test]
fn test_owner_and_timestamp_are_preserved() {
    let mut store = Persistence::new_in_memory().unwrap();
    add_all(&mut store, Period::Afternoon, &["Ana"]);

    let loaded = reload(&mut store);
    let entrant = &loaded.afternoon.entrants[0];
    assert_eq!(entrant.owner, handle(7));
    assert_eq!(entrant.added_at, at(12, 30));
}

#[test]
fn test_removed_entrant_is_gone_after_reload() {
    let mut store = Persistence::new_in_memory().unwrap();
    let state = add_all(&mut store, Period::Morning, &["Ana", "Bia"]);
    let state = step(
        &mut store,
        &state,
        Command::RemoveEntrant {
            name: name("ANA"),
            owner: handle(7),
        },
        at(6, 0),
    );

    let loaded = reload(&mut store);
    assert_eq!(loaded.morning, state);
    assert_eq!(loaded.morning.entrants.len(), 1);
}

#[test]
fn test_delete_with_foreign_owner_keeps_row() {
    let mut store = Persistence::new_in_memory().unwrap();
    add_all(&mut store, Period::Morning, &["Ana"]);

    store
        .apply(&StoreMutation::DeleteEntrant {
            period: Period::Morning,
            name: name("Ana"),
            owner: handle(99),
        })
        .unwrap();

    assert_eq!(store.count_entrants(Period::Morning).unwrap(), 1);
}

#[test]
fn test_duplicate_insert_is_ignored() {
    let mut store = Persistence::new_in_memory().unwrap();
    add_all(&mut store, Period::Morning, &["Ana"]);

    store
        .apply(&StoreMutation::InsertEntrant {
            period: Period::Morning,
            entrant: Entrant::new(name("ana"), Utc::now(), handle(3)),
        })
        .unwrap();

    let loaded = reload(&mut store);
    assert_eq!(loaded.morning.entrants.len(), 1);
    assert_eq!(loaded.morning.entrants[0].owner, handle(7));
}

#[test]
fn test_same_name_in_both_periods_is_allowed() {
    let mut store = Persistence::new_in_memory().unwrap();
    add_all(&mut store, Period::Morning, &["Ana"]);
    add_all(&mut store, Period::Afternoon, &["Ana"]);

    assert_eq!(store.count_entrants(Period::Morning).unwrap(), 1);
    assert_eq!(store.count_entrants(Period::Afternoon).unwrap(), 1);
}
