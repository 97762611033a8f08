// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::NaiveDate;
use roleta_domain::{DrawEntry, Entrant, EntrantName, OwnerHandle, Period};

/// A storage write derived from a state transition.
///
/// Mutations are produced by [`crate::apply`] alongside the new in-memory
/// state and must be applied to storage in the order they were produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreMutation {
    /// Append an entrant if no entrant with the same name exists.
    InsertEntrant {
        /// The period ledger.
        period: Period,
        /// The entrant to store.
        entrant: Entrant,
    },
    /// Delete an entrant matching both name and owner.
    DeleteEntrant {
        /// The period ledger.
        period: Period,
        /// The entrant name.
        name: EntrantName,
        /// The owning connection.
        owner: OwnerHandle,
    },
    /// Replace the draw result, reset the selection window to pending and
    /// consume the day's scheduled draw slot.
    ReplaceDraw {
        /// The period drawn.
        period: Period,
        /// The new draw, ordered by position.
        entries: Vec<DrawEntry>,
        /// The date the draw ran.
        drawn_on: NaiveDate,
    },
    /// Consume the day's scheduled draw slot without drawing.
    SetDrawMarker {
        /// The period.
        period: Period,
        /// The date consumed.
        date: NaiveDate,
    },
    /// Open the selection window.
    OpenSelection {
        /// The period.
        period: Period,
    },
    /// Record confirmations for drawn names.
    SetSelections {
        /// The period.
        period: Period,
        /// Name and confirmation pairs.
        selections: Vec<(EntrantName, bool)>,
    },
    /// Mark the given names crossed and finalize the window.
    FinalizeSelection {
        /// The period.
        period: Period,
        /// The names cut.
        crossed: Vec<EntrantName>,
    },
    /// Clear every per-day collection and record the reset date.
    ResetDay {
        /// The date of the reset.
        date: NaiveDate,
    },
}

impl StoreMutation {
    /// Returns the mutation's name for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InsertEntrant { .. } => "insert_entrant",
            Self::DeleteEntrant { .. } => "delete_entrant",
            Self::ReplaceDraw { .. } => "replace_draw",
            Self::SetDrawMarker { .. } => "set_draw_marker",
            Self::OpenSelection { .. } => "open_selection",
            Self::SetSelections { .. } => "set_selections",
            Self::FinalizeSelection { .. } => "finalize_selection",
            Self::ResetDay { .. } => "reset_day",
        }
    }

    /// Returns the period the mutation touches, if it is period-scoped.
    #[must_use]
    pub const fn period(&self) -> Option<Period> {
        match self {
            Self::InsertEntrant { period, .. }
            | Self::DeleteEntrant { period, .. }
            | Self::ReplaceDraw { period, .. }
            | Self::SetDrawMarker { period, .. }
            | Self::OpenSelection { period }
            | Self::SetSelections { period, .. }
            | Self::FinalizeSelection { period, .. } => Some(*period),
            Self::ResetDay { .. } => None,
        }
    }
}
