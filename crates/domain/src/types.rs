// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::validation::validate_entrant_name;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One of the two daily signup cycles.
///
/// Each period owns its own ledger, draw result and selection state.
/// The two never share entrants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    /// The morning cycle.
    Morning,
    /// The afternoon cycle.
    Afternoon,
}

impl Period {
    /// Both periods, in display order.
    pub const ALL: [Self; 2] = [Self::Morning, Self::Afternoon];

    /// Converts this period to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
        }
    }

    /// Resolves the legacy list identifiers (`morning_list`, `afternoon_list`)
    /// used by the HTTP signup form.
    ///
    /// # Errors
    ///
    /// Returns an error if the list identifier is not recognised.
    pub fn from_list_name(list: &str) -> Result<Self, DomainError> {
        match list.trim() {
            "morning_list" => Ok(Self::Morning),
            "afternoon_list" => Ok(Self::Afternoon),
            other => Self::from_str(other),
        }
    }
}

impl FromStr for Period {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "morning" => Ok(Self::Morning),
            "afternoon" => Ok(Self::Afternoon),
            _ => Err(DomainError::UnknownPeriod(s.to_string())),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An entrant name as submitted, plus its comparison key.
///
/// Names are trimmed on construction. Equality, ordering and hashing use the
/// lowercase key, so "Ana" and " ana " are the same entrant.
#[derive(Debug, Clone)]
pub struct EntrantName {
    /// The trimmed name as the user typed it.
    display: String,
    /// The case-folded comparison key.
    key: String,
}

impl EntrantName {
    /// Parses and validates a raw name.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed name is empty or too long.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let display: &str = raw.trim();
        validate_entrant_name(display)?;
        Ok(Self {
            display: display.to_string(),
            key: Self::key_for(display),
        })
    }

    /// Computes the comparison key for a raw name without validating it.
    #[must_use]
    pub fn key_for(raw: &str) -> String {
        raw.trim().to_lowercase()
    }

    /// Returns the display form.
    #[must_use]
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Returns the comparison key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Checks whether a raw, untrimmed name refers to this entrant.
    #[must_use]
    pub fn matches(&self, raw: &str) -> bool {
        self.key == Self::key_for(raw)
    }
}

impl PartialEq for EntrantName {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for EntrantName {}

impl std::hash::Hash for EntrantName {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for EntrantName {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EntrantName {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key.cmp(&other.key)
    }
}

impl std::fmt::Display for EntrantName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display)
    }
}

/// Opaque identifier of the viewer connection that created an entrant.
///
/// Only the handle that created an entrant may remove it. Handles are issued
/// by the server and are never sent to other viewers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerHandle(String);

impl OwnerHandle {
    /// Prefix of every server-issued handle.
    pub const PREFIX: &'static str = "viewer_";

    /// Number of hex digits following the prefix.
    pub const TOKEN_DIGITS: usize = 16;

    /// Creates a handle from a raw value without validation.
    ///
    /// Used for handles restored from storage and for tests.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Builds a handle from a random token.
    #[must_use]
    pub fn from_token(token: u64) -> Self {
        Self(format!("{}{token:016x}", Self::PREFIX))
    }

    /// Parses a handle presented by a reconnecting client.
    ///
    /// # Errors
    ///
    /// Returns an error unless the value has the shape of a server-issued handle.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let well_formed: bool = value.strip_prefix(Self::PREFIX).is_some_and(|digits| {
            digits.len() == Self::TOKEN_DIGITS && digits.chars().all(|c| c.is_ascii_hexdigit())
        });
        if !well_formed {
            return Err(DomainError::InvalidOwnerHandle(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }

    /// Returns the handle value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A name signed up to a period's ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entrant {
    /// The entrant's name.
    pub name: EntrantName,
    /// When the entrant was added.
    pub added_at: DateTime<Utc>,
    /// The connection that added the entrant.
    pub owner: OwnerHandle,
}

impl Entrant {
    /// Creates a new `Entrant`.
    #[must_use]
    pub const fn new(name: EntrantName, added_at: DateTime<Utc>, owner: OwnerHandle) -> Self {
        Self {
            name,
            added_at,
            owner,
        }
    }

    /// Checks whether the given handle owns this entrant.
    #[must_use]
    pub fn is_owned_by(&self, owner: &OwnerHandle) -> bool {
        &self.owner == owner
    }
}

/// One slot of a draw result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawEntry {
    /// 1-based position in the draw.
    pub position: usize,
    /// The drawn name.
    pub name: EntrantName,
}

/// What initiated a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawTrigger {
    /// The scheduler fired at the configured draw time.
    Scheduled,
    /// An operator forced a redraw.
    Manual,
}

impl DrawTrigger {
    /// Converts this trigger to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Manual => "manual",
        }
    }
}

impl std::fmt::Display for DrawTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
