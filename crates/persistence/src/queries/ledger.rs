// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;
use roleta_domain::{Entrant, EntrantName, OwnerHandle, Period};

use crate::data_models::EntrantRow;
use crate::diesel_schema::entrants;
use crate::error::PersistenceError;

/// Lists a period's entrants in submission order.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_entrants(
    conn: &mut SqliteConnection,
    period: Period,
) -> Result<Vec<Entrant>, PersistenceError> {
    let rows: Vec<EntrantRow> = entrants::table
        .filter(entrants::period.eq(period.as_str()))
        .order(entrants::entrant_id.asc())
        .select(EntrantRow::as_select())
        .load(conn)?;

    rows.into_iter().map(decode_entrant).collect()
}

fn decode_entrant(row: EntrantRow) -> Result<Entrant, PersistenceError> {
    let name: EntrantName = EntrantName::parse(&row.name)
        .map_err(|e| PersistenceError::ReconstructionError(format!("Stored entrant name: {e}")))?;
    let added_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&row.added_at)
        .map_err(|e| {
            PersistenceError::ReconstructionError(format!(
                "Stored timestamp '{}': {e}",
                row.added_at
            ))
        })?
        .with_timezone(&Utc);
    Ok(Entrant::new(name, added_at, OwnerHandle::new(row.owner_handle)))
}

/// Counts a period's entrants.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_entrants(conn: &mut SqliteConnection, period: Period) -> Result<i64, PersistenceError> {
    Ok(entrants::table
        .filter(entrants::period.eq(period.as_str()))
        .count()
        .get_result(conn)?)
}
