// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::state::SelectionPhase;
use roleta_domain::{DomainError, Period};

/// Errors that can occur during state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// The signup window of the period is closed.
    WindowClosed {
        /// The period addressed.
        period: Period,
    },
    /// The name is already in the period's ledger.
    DuplicateName {
        /// The period addressed.
        period: Period,
        /// The rejected name.
        name: String,
    },
    /// The entrant exists but was added by another connection.
    NotOwner {
        /// The period addressed.
        period: Period,
        /// The entrant name.
        name: String,
    },
    /// No entrant with that name exists.
    NotFound {
        /// The period addressed.
        period: Period,
        /// The entrant name.
        name: String,
    },
    /// A draw was requested over an empty ledger.
    EmptyLedger {
        /// The period addressed.
        period: Period,
    },
    /// A scheduled draw was requested before the draw time.
    DrawNotDue {
        /// The period addressed.
        period: Period,
    },
    /// Confirmations are only accepted while the selection window is open.
    SelectionClosed {
        /// The period addressed.
        period: Period,
    },
    /// The name is not part of the current draw.
    NotInDraw {
        /// The period addressed.
        period: Period,
        /// The name that was not drawn.
        name: String,
    },
    /// The selection window cannot move from its current phase.
    InvalidTransition {
        /// The period addressed.
        period: Period,
        /// The phase the window was in.
        from: SelectionPhase,
        /// The attempted action.
        action: &'static str,
    },
    /// A stored selection phase could not be recognised.
    UnknownSelectionPhase(String),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::WindowClosed { period } => {
                write!(f, "The {period} list is not open for changes right now")
            }
            Self::DuplicateName { period, name } => {
                write!(f, "'{name}' is already on the {period} list")
            }
            Self::NotOwner { period, name } => {
                write!(f, "'{name}' on the {period} list belongs to another viewer")
            }
            Self::NotFound { period, name } => {
                write!(f, "'{name}' is not on the {period} list")
            }
            Self::EmptyLedger { period } => {
                write!(f, "The {period} list is empty; nothing to draw")
            }
            Self::DrawNotDue { period } => {
                write!(f, "The scheduled {period} draw is not due yet")
            }
            Self::SelectionClosed { period } => {
                write!(f, "The {period} selection window is not open")
            }
            Self::NotInDraw { period, name } => {
                write!(f, "'{name}' is not in the {period} draw")
            }
            Self::InvalidTransition {
                period,
                from,
                action,
            } => write!(
                f,
                "Cannot {action} the {period} selection window while it is {from}"
            ),
            Self::UnknownSelectionPhase(value) => {
                write!(f, "Unknown selection phase '{value}'")
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
