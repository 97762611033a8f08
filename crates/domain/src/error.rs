// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Entrant name is empty or invalid.
    InvalidName(String),
    /// Period identifier is not one of the known periods.
    UnknownPeriod(String),
    /// Owner handle token is malformed.
    InvalidOwnerHandle(String),
    /// Time zone name could not be resolved.
    InvalidTimezone(String),
    /// A clock time string could not be parsed.
    InvalidClockTime {
        /// The offending value.
        value: String,
        /// The parsing error message.
        error: String,
    },
    /// The window schedule is internally inconsistent.
    InvalidSchedule {
        /// Description of the validation error.
        reason: String,
    },
    /// A local wall-clock time does not map to exactly one instant.
    UnresolvableLocalTime {
        /// The local time that failed to resolve.
        local: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::UnknownPeriod(value) => {
                write!(f, "Unknown period '{value}'. Must be 'morning' or 'afternoon'")
            }
            Self::InvalidOwnerHandle(value) => write!(f, "Invalid owner handle: '{value}'"),
            Self::InvalidTimezone(tz) => write!(f, "Invalid timezone: '{tz}'"),
            Self::InvalidClockTime { value, error } => {
                write!(f, "Invalid clock time '{value}': {error}")
            }
            Self::InvalidSchedule { reason } => write!(f, "Invalid schedule: {reason}"),
            Self::UnresolvableLocalTime { local } => {
                write!(
                    f,
                    "Local time {local} is ambiguous or does not exist in the configured timezone"
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}
