// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use roleta::{CoreError, SelectionPhase};
use roleta_domain::{DomainError, Period};
use roleta_persistence::PersistenceError;

/// Message shown for both a missing entry and someone else's entry.
pub const REMOVE_OWN_ENTRY_MESSAGE: &str = "You may only remove your own entry.";

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Invalid input was provided.
    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// The period's list is not accepting additions or removals.
    #[error("The {period} list is not open for changes right now")]
    WindowClosed {
        /// The period addressed.
        period: Period,
    },
    /// The name is already signed up.
    #[error("'{name}' is already on the {period} list")]
    DuplicateName {
        /// The period addressed.
        period: Period,
        /// The rejected name.
        name: String,
    },
    /// The entry belongs to another viewer.
    #[error("'{name}' on the {period} list was added by another viewer")]
    NotOwner {
        /// The period addressed.
        period: Period,
        /// The entrant name.
        name: String,
    },
    /// No such entry.
    #[error("'{name}' is not on the {period} list")]
    NotFound {
        /// The period addressed.
        period: Period,
        /// The entrant name.
        name: String,
    },
    /// A draw was requested over an empty list.
    #[error("The {period} list is empty; there is nothing to draw")]
    EmptyLedger {
        /// The period addressed.
        period: Period,
    },
    /// A scheduled draw was requested before its time.
    #[error("The {period} draw is not due yet")]
    DrawNotDue {
        /// The period addressed.
        period: Period,
    },
    /// Confirmations arrived outside the selection window.
    #[error("The {period} selection window is not open")]
    SelectionClosed {
        /// The period addressed.
        period: Period,
    },
    /// The name was not drawn.
    #[error("'{name}' was not drawn for the {period} list")]
    NotInDraw {
        /// The period addressed.
        period: Period,
        /// The name that was not drawn.
        name: String,
    },
    /// A selection window transition was attempted from the wrong phase.
    #[error("Cannot {action} the {period} selection window while it is {from}")]
    InvalidTransition {
        /// The period addressed.
        period: Period,
        /// The phase the window was in.
        from: SelectionPhase,
        /// The attempted action.
        action: &'static str,
    },
    /// Storage could not be read or written.
    #[error("Storage unavailable: {message}")]
    StorageUnavailable {
        /// A description of the storage failure.
        message: String,
    },
    /// An internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// The text shown to the viewer whose intent was rejected.
    ///
    /// `NotOwner` and `NotFound` share one message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotOwner { .. } | Self::NotFound { .. } => REMOVE_OWN_ENTRY_MESSAGE.to_string(),
            Self::StorageUnavailable { .. } | Self::Internal { .. } => {
                String::from("Something went wrong. Please try again.")
            }
            other => other.to_string(),
        }
    }

    /// Whether the error was caused by the request rather than the system.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        !matches!(
            self,
            Self::StorageUnavailable { .. } | Self::Internal { .. }
        )
    }
}

/// Translates a domain error into an API error.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidName(message) => ApiError::InvalidInput {
            field: String::from("name"),
            message,
        },
        DomainError::UnknownPeriod(_) => ApiError::InvalidInput {
            field: String::from("list"),
            message: err.to_string(),
        },
        DomainError::InvalidOwnerHandle(_) => ApiError::InvalidInput {
            field: String::from("token"),
            message: err.to_string(),
        },
        DomainError::InvalidTimezone(_)
        | DomainError::InvalidClockTime { .. }
        | DomainError::InvalidSchedule { .. }
        | DomainError::UnresolvableLocalTime { .. } => ApiError::Internal {
            message: err.to_string(),
        },
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::WindowClosed { period } => ApiError::WindowClosed { period },
        CoreError::DuplicateName { period, name } => ApiError::DuplicateName { period, name },
        CoreError::NotOwner { period, name } => ApiError::NotOwner { period, name },
        CoreError::NotFound { period, name } => ApiError::NotFound { period, name },
        CoreError::EmptyLedger { period } => ApiError::EmptyLedger { period },
        CoreError::DrawNotDue { period } => ApiError::DrawNotDue { period },
        CoreError::SelectionClosed { period } => ApiError::SelectionClosed { period },
        CoreError::NotInDraw { period, name } => ApiError::NotInDraw { period, name },
        CoreError::InvalidTransition {
            period,
            from,
            action,
        } => ApiError::InvalidTransition {
            period,
            from,
            action,
        },
        CoreError::UnknownSelectionPhase(value) => ApiError::Internal {
            message: format!("Unknown selection phase '{value}'"),
        },
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        Self::StorageUnavailable {
            message: err.to_string(),
        }
    }
}
