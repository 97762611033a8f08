// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use roleta_domain::{Entrant, EntrantName, OwnerHandle, Period};
use tracing::{debug, warn};

use crate::data_models::NewEntrantRow;
use crate::diesel_schema::entrants;
use crate::error::PersistenceError;

/// Appends an entrant unless one with the same name already exists.
///
/// # Errors
///
/// Returns an error if the database insert fails.
pub fn insert_entrant(
    conn: &mut SqliteConnection,
    period: Period,
    entrant: &Entrant,
) -> Result<(), PersistenceError> {
    let row: NewEntrantRow<'_> = NewEntrantRow {
        period: period.as_str(),
        name: entrant.name.display(),
        name_key: entrant.name.key(),
        owner_handle: entrant.owner.as_str(),
        added_at: entrant.added_at.to_rfc3339(),
    };

    let inserted: usize = diesel::insert_or_ignore_into(entrants::table)
        .values(&row)
        .execute(conn)?;

    if inserted == 0 {
        warn!(
            period = period.as_str(),
            name = entrant.name.display(),
            "Entrant already stored; insert ignored"
        );
    } else {
        debug!(period = period.as_str(), name = entrant.name.display(), "Stored entrant");
    }
    Ok(())
}

/// Deletes the entrant matching both name and owner.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_entrant(
    conn: &mut SqliteConnection,
    period: Period,
    name: &EntrantName,
    owner: &OwnerHandle,
) -> Result<(), PersistenceError> {
    let deleted: usize = diesel::delete(
        entrants::table
            .filter(entrants::period.eq(period.as_str()))
            .filter(entrants::name_key.eq(name.key()))
            .filter(entrants::owner_handle.eq(owner.as_str())),
    )
    .execute(conn)?;

    debug!(period = period.as_str(), name = name.display(), deleted, "Deleted entrant");
    Ok(())
}
