// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::info;

use crate::data_models::encode_date;
use crate::diesel_schema::{draw_entries, entrants, reset_marker, selection_windows};
use crate::error::PersistenceError;

/// Singleton key of the reset marker row.
const MARKER_ID: i32 = 1;

/// Clears both ledgers, both draws and both selection windows, then records
/// `date` as the last reset.
///
/// Scheduled draw markers are kept.
///
/// # Errors
///
/// Returns an error if any statement fails.
pub fn reset_day(conn: &mut SqliteConnection, date: NaiveDate) -> Result<(), PersistenceError> {
    let entrants_cleared: usize = diesel::delete(entrants::table).execute(conn)?;
    let draws_cleared: usize = diesel::delete(draw_entries::table).execute(conn)?;
    diesel::delete(selection_windows::table).execute(conn)?;

    diesel::replace_into(reset_marker::table)
        .values((
            reset_marker::marker_id.eq(MARKER_ID),
            reset_marker::last_reset_date.eq(encode_date(date)),
        ))
        .execute(conn)?;

    info!(%date, entrants_cleared, draws_cleared, "Daily reset stored");
    Ok(())
}
