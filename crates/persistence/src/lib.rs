// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Roleta signup draw.
//!
//! This crate mirrors the in-memory roster into `SQLite` through Diesel.
//! The engine owns the authoritative state; storage only receives
//! [`StoreMutation`]s and is read back once, at startup.
//!
//! ## Backend
//!
//! `SQLite` is the only backend. `libsqlite3-sys` is built bundled, so no
//! system library is needed.
//!
//! - In-memory databases use a shared cache URL with a unique name per
//!   instance, so tests never see each other's rows
//! - File databases run in WAL mode
//!
//! ## Schema
//!
//! Migrations live in `migrations/` and are embedded at compile time.
//! Every mutation runs in its own transaction.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use roleta::StoreMutation;
use roleta_domain::Period;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

mod connection;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod store;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use store::{RosterStore, StoredRoster};

/// Atomic counter for unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// `SQLite` adapter for the roster.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives its own database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:roleta_memdb_{db_id}?mode=memory&cache=shared");

        let conn: SqliteConnection = connection::open(&shared_memory_url)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = connection::open(path_str)?;
        connection::enable_wal(&mut conn)?;

        Ok(Self { conn })
    }

    /// Loads both periods and the reset marker.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails or a stored row cannot be decoded.
    pub fn load_roster(&mut self) -> Result<StoredRoster, PersistenceError> {
        queries::load_roster(&mut self.conn)
    }

    /// Applies one mutation in its own transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails; nothing is applied then.
    pub fn apply_mutation(&mut self, mutation: &StoreMutation) -> Result<(), PersistenceError> {
        mutations::apply_mutation(&mut self.conn, mutation)
    }

    /// Counts the entrants stored for a period.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_entrants(&mut self, period: Period) -> Result<i64, PersistenceError> {
        queries::ledger::count_entrants(&mut self.conn, period)
    }
}

impl RosterStore for Persistence {
    fn load(&mut self) -> Result<StoredRoster, PersistenceError> {
        self.load_roster()
    }

    fn apply(&mut self, mutation: &StoreMutation) -> Result<(), PersistenceError> {
        self.apply_mutation(mutation)
    }
}
