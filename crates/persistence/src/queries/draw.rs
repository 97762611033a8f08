// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::SqliteConnection;
use roleta_domain::Period;

use crate::data_models::{DATE_FORMAT, DrawEntryRow};
use crate::diesel_schema::{draw_entries, draw_markers};
use crate::error::PersistenceError;

/// Lists a period's draw rows ordered by position.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_draw(
    conn: &mut SqliteConnection,
    period: Period,
) -> Result<Vec<DrawEntryRow>, PersistenceError> {
    Ok(draw_entries::table
        .filter(draw_entries::period.eq(period.as_str()))
        .order(draw_entries::position.asc())
        .select(DrawEntryRow::as_select())
        .load(conn)?)
}

/// Returns the last date a scheduled draw slot was consumed.
///
/// # Errors
///
/// Returns an error if the query fails or the stored date is malformed.
pub fn get_draw_marker(
    conn: &mut SqliteConnection,
    period: Period,
) -> Result<Option<NaiveDate>, PersistenceError> {
    let stored: Option<String> = draw_markers::table
        .filter(draw_markers::period.eq(period.as_str()))
        .select(draw_markers::last_scheduled_draw)
        .first(conn)
        .optional()?;

    stored
        .map(|value| {
            NaiveDate::parse_from_str(&value, DATE_FORMAT).map_err(|e| {
                PersistenceError::ReconstructionError(format!("Stored draw marker '{value}': {e}"))
            })
        })
        .transpose()
}
