// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::SqliteConnection;
use roleta::SelectionPhase;
use roleta_domain::Period;

use crate::data_models::DATE_FORMAT;
use crate::diesel_schema::{reset_marker, selection_windows};
use crate::error::PersistenceError;

/// Returns the stored selection window phase of a period, if any.
///
/// # Errors
///
/// Returns an error if the query fails or the stored phase is unknown.
pub fn get_selection_phase(
    conn: &mut SqliteConnection,
    period: Period,
) -> Result<Option<SelectionPhase>, PersistenceError> {
    let stored: Option<String> = selection_windows::table
        .filter(selection_windows::period.eq(period.as_str()))
        .select(selection_windows::phase)
        .first(conn)
        .optional()?;

    stored
        .map(|value| {
            value
                .parse::<SelectionPhase>()
                .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))
        })
        .transpose()
}

/// Returns the date of the last daily reset, if one ever ran.
///
/// # Errors
///
/// Returns an error if the query fails or the stored date is malformed.
pub fn get_last_reset(conn: &mut SqliteConnection) -> Result<Option<NaiveDate>, PersistenceError> {
    let stored: Option<String> = reset_marker::table
        .select(reset_marker::last_reset_date)
        .first(conn)
        .optional()?;

    stored
        .map(|value| {
            NaiveDate::parse_from_str(&value, DATE_FORMAT).map_err(|e| {
                PersistenceError::ReconstructionError(format!("Stored reset date '{value}': {e}"))
            })
        })
        .transpose()
}
