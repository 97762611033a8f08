// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::NaiveDate;
use roleta::{PeriodState, StoreMutation};
use roleta_domain::Period;

use crate::error::PersistenceError;

/// Everything the service restores at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRoster {
    pub morning: PeriodState,
    pub afternoon: PeriodState,
    /// Date of the last daily reset, `None` on a fresh database.
    pub last_reset: Option<NaiveDate>,
}

impl StoredRoster {
    /// An empty roster with no reset recorded.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            morning: PeriodState::new(Period::Morning),
            afternoon: PeriodState::new(Period::Afternoon),
            last_reset: None,
        }
    }
}

/// Durable storage behind the engine.
///
/// Implementations apply each mutation atomically. The engine owns the
/// in-memory state; the store only mirrors it.
pub trait RosterStore: Send {
    /// Loads the stored roster.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read or decoded.
    fn load(&mut self) -> Result<StoredRoster, PersistenceError>;

    /// Applies one mutation.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails. Nothing is applied in that case.
    fn apply(&mut self, mutation: &StoreMutation) -> Result<(), PersistenceError>;
}
