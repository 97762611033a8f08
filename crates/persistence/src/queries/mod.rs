// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! Queries never mutate. [`load_roster`] rebuilds the full in-memory state
//! at startup.
//!
//! ## Module Organization
//!
//! - `ledger`: Entrants in submission order
//! - `draw`: Draw rows and scheduled draw markers
//! - `markers`: Selection window phase and the daily reset marker

pub mod draw;
pub mod ledger;
pub mod markers;

use diesel::SqliteConnection;
use roleta::{PeriodState, SelectionPhase, SelectionState};
use roleta_domain::{DrawEntry, EntrantName, Period};
use tracing::debug;

use crate::error::PersistenceError;
use crate::store::StoredRoster;

/// Loads both periods and the reset marker.
///
/// # Errors
///
/// Returns an error if a query fails or a stored row cannot be decoded.
pub fn load_roster(conn: &mut SqliteConnection) -> Result<StoredRoster, PersistenceError> {
    let morning: PeriodState = load_period(conn, Period::Morning)?;
    let afternoon: PeriodState = load_period(conn, Period::Afternoon)?;
    let last_reset = markers::get_last_reset(conn)?;

    debug!(
        morning_entrants = morning.entrants.len(),
        afternoon_entrants = afternoon.entrants.len(),
        last_reset = ?last_reset,
        "Loaded roster"
    );

    Ok(StoredRoster {
        morning,
        afternoon,
        last_reset,
    })
}

/// Loads one period's state.
///
/// A missing selection window row means `NoDraw` for an empty draw and
/// `Pending` otherwise.
///
/// # Errors
///
/// Returns an error if a query fails or a stored row cannot be decoded.
pub fn load_period(
    conn: &mut SqliteConnection,
    period: Period,
) -> Result<PeriodState, PersistenceError> {
    let entrants = ledger::list_entrants(conn, period)?;
    let rows = draw::list_draw(conn, period)?;
    let stored_phase: Option<SelectionPhase> = markers::get_selection_phase(conn, period)?;

    let phase: SelectionPhase = stored_phase.unwrap_or(if rows.is_empty() {
        SelectionPhase::NoDraw
    } else {
        SelectionPhase::Pending
    });
    let confirmations_recorded: bool =
        matches!(phase, SelectionPhase::Open | SelectionPhase::Finalized);

    let mut selection: SelectionState = SelectionState {
        phase,
        ..SelectionState::empty()
    };
    let mut draw: Vec<DrawEntry> = Vec::with_capacity(rows.len());
    for row in rows {
        let name: EntrantName = EntrantName::parse(&row.name).map_err(|e| {
            PersistenceError::ReconstructionError(format!("Stored draw name: {e}"))
        })?;
        let position: usize = usize::try_from(row.position).map_err(|_| {
            PersistenceError::ReconstructionError(format!(
                "Stored draw position {} is negative",
                row.position
            ))
        })?;
        if confirmations_recorded {
            selection.selections.insert(name.clone(), row.selected != 0);
        }
        if row.crossed != 0 {
            selection.crossed.insert(name.clone());
        }
        draw.push(DrawEntry { position, name });
    }

    Ok(PeriodState {
        period,
        entrants,
        draw,
        selection,
        last_scheduled_draw: draw::get_draw_marker(conn, period)?,
    })
}
