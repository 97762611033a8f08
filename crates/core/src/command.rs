// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use roleta_domain::{DrawTrigger, EntrantName, OwnerHandle};

/// A command represents user or scheduler intent as data only.
///
/// Commands are the only way to request state changes. Every command is
/// scoped to one period; the period travels with the state it is applied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Sign a name up to the period's ledger.
    AddEntrant {
        /// The name to add.
        name: EntrantName,
        /// The connection adding it.
        owner: OwnerHandle,
    },
    /// Remove a name the caller added.
    RemoveEntrant {
        /// The name to remove.
        name: EntrantName,
        /// The connection asking.
        owner: OwnerHandle,
    },
    /// Shuffle the ledger into a new draw result.
    RunDraw {
        /// What initiated the draw.
        trigger: DrawTrigger,
    },
    /// Start accepting attendance confirmations.
    OpenSelectionWindow,
    /// Record one confirmation.
    RecordSelection {
        /// The drawn name.
        name: EntrantName,
        /// Whether the entrant confirmed.
        selected: bool,
        /// The connection recording it, when known.
        owner: Option<OwnerHandle>,
    },
    /// Replace every confirmation at once: drawn names in `kept` are
    /// selected, all others are not.
    RecordKeptNames {
        /// The names that stay.
        kept: Vec<EntrantName>,
    },
    /// Apply the cut.
    CloseSelectionWindow,
}

impl Command {
    /// Returns the command's name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AddEntrant { .. } => "AddEntrant",
            Self::RemoveEntrant { .. } => "RemoveEntrant",
            Self::RunDraw { .. } => "RunDraw",
            Self::OpenSelectionWindow => "OpenSelectionWindow",
            Self::RecordSelection { .. } => "RecordSelection",
            Self::RecordKeptNames { .. } => "RecordKeptNames",
            Self::CloseSelectionWindow => "CloseSelectionWindow",
        }
    }
}
