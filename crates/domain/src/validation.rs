// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use chrono::NaiveTime;

/// Maximum number of characters accepted in an entrant name.
pub const MAX_NAME_CHARS: usize = 60;

/// Validates an already-trimmed entrant name.
///
/// # Arguments
///
/// * `name` - The trimmed name
///
/// # Errors
///
/// Returns an error if:
/// - The name is empty
/// - The name is longer than [`MAX_NAME_CHARS`] characters
/// - The name contains control characters
pub fn validate_entrant_name(name: &str) -> Result<(), DomainError> {
    // Rule: name must not be empty
    if name.is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Name cannot be empty",
        )));
    }

    if name.chars().count() > MAX_NAME_CHARS {
        return Err(DomainError::InvalidName(format!(
            "Name cannot be longer than {MAX_NAME_CHARS} characters"
        )));
    }

    if name.chars().any(char::is_control) {
        return Err(DomainError::InvalidName(String::from(
            "Name cannot contain control characters",
        )));
    }

    Ok(())
}

/// Parses a wall-clock time in `HH:MM` form.
///
/// Seconds are not accepted: every window boundary is a whole minute.
///
/// # Errors
///
/// Returns an error if the value is not a valid `HH:MM` time.
pub fn parse_clock_time(value: &str) -> Result<NaiveTime, DomainError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|e| DomainError::InvalidClockTime {
        value: value.to_string(),
        error: e.to_string(),
    })
}
