// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use roleta::SelectionPhase;
use roleta_domain::{EntrantName, Period};
use tracing::debug;

use crate::data_models::encode_flag;
use crate::diesel_schema::{draw_entries, selection_windows};
use crate::error::PersistenceError;

/// Sets the selection window phase of a period.
///
/// # Errors
///
/// Returns an error if the database write fails.
pub fn set_phase(
    conn: &mut SqliteConnection,
    period: Period,
    phase: SelectionPhase,
) -> Result<(), PersistenceError> {
    diesel::replace_into(selection_windows::table)
        .values((
            selection_windows::period.eq(period.as_str()),
            selection_windows::phase.eq(phase.as_str()),
        ))
        .execute(conn)?;
    debug!(period = period.as_str(), phase = phase.as_str(), "Set selection phase");
    Ok(())
}

/// Stores confirmations for drawn names.
///
/// # Errors
///
/// Returns an error if any update fails.
pub fn set_selections(
    conn: &mut SqliteConnection,
    period: Period,
    selections: &[(EntrantName, bool)],
) -> Result<(), PersistenceError> {
    for (name, selected) in selections {
        diesel::update(
            draw_entries::table
                .filter(draw_entries::period.eq(period.as_str()))
                .filter(draw_entries::name_key.eq(name.key())),
        )
        .set(draw_entries::selected.eq(encode_flag(*selected)))
        .execute(conn)?;
    }
    Ok(())
}

/// Marks the cut names crossed and finalizes the window.
///
/// Must run inside a transaction.
///
/// # Errors
///
/// Returns an error if any statement fails.
pub fn finalize(
    conn: &mut SqliteConnection,
    period: Period,
    crossed: &[EntrantName],
) -> Result<(), PersistenceError> {
    let keys: Vec<&str> = crossed.iter().map(EntrantName::key).collect();
    diesel::update(
        draw_entries::table
            .filter(draw_entries::period.eq(period.as_str()))
            .filter(draw_entries::name_key.eq_any(keys)),
    )
    .set(draw_entries::crossed.eq(1))
    .execute(conn)?;

    set_phase(conn, period, SelectionPhase::Finalized)
}
