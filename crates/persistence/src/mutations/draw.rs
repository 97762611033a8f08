// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::SqliteConnection;
use roleta::SelectionPhase;
use roleta_domain::{DrawEntry, Period};
use tracing::debug;

use crate::data_models::{NewDrawEntryRow, encode_date};
use crate::diesel_schema::{draw_entries, draw_markers};
use crate::error::PersistenceError;
use crate::mutations::selection::set_phase;

/// Replaces the period's draw, resets its window to pending and records the
/// scheduled draw marker.
///
/// Must run inside a transaction.
///
/// # Errors
///
/// Returns an error if any statement fails.
pub fn replace_draw(
    conn: &mut SqliteConnection,
    period: Period,
    entries: &[DrawEntry],
    drawn_on: NaiveDate,
) -> Result<(), PersistenceError> {
    diesel::delete(draw_entries::table.filter(draw_entries::period.eq(period.as_str())))
        .execute(conn)?;

    let mut rows: Vec<NewDrawEntryRow<'_>> = Vec::with_capacity(entries.len());
    for entry in entries {
        let position: i32 = i32::try_from(entry.position).map_err(|_| {
            PersistenceError::QueryFailed(format!("Draw position {} out of range", entry.position))
        })?;
        rows.push(NewDrawEntryRow {
            period: period.as_str(),
            position,
            name: entry.name.display(),
            name_key: entry.name.key(),
            selected: 0,
            crossed: 0,
        });
    }

    if !rows.is_empty() {
        diesel::insert_into(draw_entries::table)
            .values(&rows)
            .execute(conn)?;
    }

    set_phase(conn, period, SelectionPhase::Pending)?;
    set_draw_marker(conn, period, drawn_on)?;

    debug!(period = period.as_str(), count = rows.len(), "Replaced draw");
    Ok(())
}

/// Records the date a scheduled draw slot was consumed.
///
/// # Errors
///
/// Returns an error if the database write fails.
pub fn set_draw_marker(
    conn: &mut SqliteConnection,
    period: Period,
    date: NaiveDate,
) -> Result<(), PersistenceError> {
    diesel::replace_into(draw_markers::table)
        .values((
            draw_markers::period.eq(period.as_str()),
            draw_markers::last_scheduled_draw.eq(encode_date(date)),
        ))
        .execute(conn)?;
    Ok(())
}
