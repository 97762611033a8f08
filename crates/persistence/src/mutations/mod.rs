// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! Every [`StoreMutation`] is applied inside its own transaction so storage
//! never observes half of a transition.
//!
//! ## Module Organization
//!
//! - `ledger`: Entrant inserts and owner-scoped deletes
//! - `draw`: Draw replacement and scheduled draw markers
//! - `selection`: Selection window phase, confirmations and the cut
//! - `reset`: The daily clear

pub mod draw;
pub mod ledger;
pub mod reset;
pub mod selection;

use diesel::prelude::*;
use diesel::SqliteConnection;
use roleta::StoreMutation;
use tracing::debug;

use crate::error::PersistenceError;

/// Applies one mutation atomically.
///
/// # Errors
///
/// Returns an error if any statement fails; the transaction is rolled back.
pub fn apply_mutation(
    conn: &mut SqliteConnection,
    mutation: &StoreMutation,
) -> Result<(), PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| match mutation {
        StoreMutation::InsertEntrant { period, entrant } => {
            ledger::insert_entrant(conn, *period, entrant)
        }
        StoreMutation::DeleteEntrant {
            period,
            name,
            owner,
        } => ledger::delete_entrant(conn, *period, name, owner),
        StoreMutation::ReplaceDraw {
            period,
            entries,
            drawn_on,
        } => draw::replace_draw(conn, *period, entries, *drawn_on),
        StoreMutation::SetDrawMarker { period, date } => draw::set_draw_marker(conn, *period, *date),
        StoreMutation::OpenSelection { period } => {
            selection::set_phase(conn, *period, roleta::SelectionPhase::Open)
        }
        StoreMutation::SetSelections { period, selections } => {
            selection::set_selections(conn, *period, selections)
        }
        StoreMutation::FinalizeSelection { period, crossed } => {
            selection::finalize(conn, *period, crossed)
        }
        StoreMutation::ResetDay { date } => reset::reset_day(conn, *date),
    })?;

    debug!(kind = mutation.kind(), "Applied store mutation");
    Ok(())
}
