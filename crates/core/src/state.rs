// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::mutation::StoreMutation;
use chrono::NaiveDate;
use roleta_domain::{DrawEntry, Entrant, EntrantName, Period};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

/// Lifecycle of a period's selection window.
///
/// `NoDraw -> Pending -> Open -> Finalized`. A new draw always returns the
/// period to `Pending`; the daily reset returns it to `NoDraw`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPhase {
    /// No draw result exists.
    NoDraw,
    /// A draw exists and the window has not opened yet.
    Pending,
    /// Drawn entrants may confirm attendance.
    Open,
    /// The cut has been applied. Terminal until the next draw.
    Finalized,
}

impl SelectionPhase {
    /// Converts this phase to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NoDraw => "no_draw",
            Self::Pending => "pending",
            Self::Open => "open",
            Self::Finalized => "finalized",
        }
    }
}

impl FromStr for SelectionPhase {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no_draw" => Ok(Self::NoDraw),
            "pending" => Ok(Self::Pending),
            "open" => Ok(Self::Open),
            "finalized" => Ok(Self::Finalized),
            other => Err(CoreError::UnknownSelectionPhase(other.to_string())),
        }
    }
}

impl std::fmt::Display for SelectionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Attendance confirmation state of one period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    /// Where the window stands.
    pub phase: SelectionPhase,
    /// Confirmation per drawn name. Last write wins.
    pub selections: BTreeMap<EntrantName, bool>,
    /// Drawn names cut when the window closed.
    pub crossed: BTreeSet<EntrantName>,
}

impl SelectionState {
    /// Selection state of a period with no draw.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            phase: SelectionPhase::NoDraw,
            selections: BTreeMap::new(),
            crossed: BTreeSet::new(),
        }
    }

    /// Selection state right after a non-empty draw.
    #[must_use]
    pub const fn pending() -> Self {
        Self {
            phase: SelectionPhase::Pending,
            selections: BTreeMap::new(),
            crossed: BTreeSet::new(),
        }
    }

    /// Whether confirmations are currently accepted.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.phase == SelectionPhase::Open
    }

    /// Whether the name confirmed attendance.
    #[must_use]
    pub fn is_selected(&self, name: &EntrantName) -> bool {
        self.selections.get(name).copied().unwrap_or(false)
    }

    /// Whether the name was cut.
    #[must_use]
    pub fn is_crossed(&self, name: &EntrantName) -> bool {
        self.crossed.contains(name)
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::empty()
    }
}

/// Everything the system knows about one period for the current day.
///
/// Owned by exactly one period; the two periods never share entrants or
/// draw state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodState {
    /// The period this state belongs to.
    pub period: Period,
    /// The signup ledger, in submission order.
    pub entrants: Vec<Entrant>,
    /// The current draw result, ordered by position.
    pub draw: Vec<DrawEntry>,
    /// The selection window state.
    pub selection: SelectionState,
    /// The last date a scheduled draw slot was consumed.
    pub last_scheduled_draw: Option<NaiveDate>,
}

impl PeriodState {
    /// Creates an empty state for a period.
    #[must_use]
    pub const fn new(period: Period) -> Self {
        Self {
            period,
            entrants: Vec::new(),
            draw: Vec::new(),
            selection: SelectionState::empty(),
            last_scheduled_draw: None,
        }
    }

    /// Finds an entrant by name.
    #[must_use]
    pub fn entrant(&self, name: &EntrantName) -> Option<&Entrant> {
        self.entrants.iter().find(|e| &e.name == name)
    }

    /// Finds a drawn name, returning the name as it was drawn.
    #[must_use]
    pub fn drawn(&self, name: &EntrantName) -> Option<&EntrantName> {
        self.draw.iter().map(|d| &d.name).find(|n| *n == name)
    }

    /// Names that survived the cut, in draw order.
    ///
    /// Empty until the selection window has been finalized.
    #[must_use]
    pub fn kept_names(&self) -> Vec<&EntrantName> {
        if self.selection.phase != SelectionPhase::Finalized {
            return Vec::new();
        }
        self.draw
            .iter()
            .map(|d| &d.name)
            .filter(|n| !self.selection.is_crossed(n))
            .collect()
    }

    /// Returns this state with every per-day collection cleared.
    ///
    /// The scheduled draw marker survives so a reset never re-enables a draw
    /// that already ran today.
    #[must_use]
    pub const fn cleared(&self) -> Self {
        Self {
            period: self.period,
            entrants: Vec::new(),
            draw: Vec::new(),
            selection: SelectionState::empty(),
            last_scheduled_draw: self.last_scheduled_draw,
        }
    }
}

/// Why a command left the state as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoopReason {
    /// A scheduled draw already ran for this period today.
    AlreadyDrawnToday,
    /// A scheduled draw found no entrants. The day's slot is still consumed.
    EmptyLedger,
    /// The selection window cannot open over an empty draw.
    NothingDrawn,
}

impl NoopReason {
    /// Converts this reason to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AlreadyDrawnToday => "already_drawn_today",
            Self::EmptyLedger => "empty_ledger",
            Self::NothingDrawn => "nothing_drawn",
        }
    }
}

/// Whether a transition changed what viewers see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Viewers must receive a new snapshot.
    Changed,
    /// Nothing visible changed.
    Unchanged(NoopReason),
}

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The new state after the transition.
    pub new_state: PeriodState,
    /// Storage writes that bring the store in line with `new_state`, in order.
    pub mutations: Vec<StoreMutation>,
    /// Whether the transition is visible to viewers.
    pub outcome: Outcome,
}

impl TransitionResult {
    /// Whether the transition requires a broadcast.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.outcome == Outcome::Changed
    }
}
