// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Outbound state.
//!
//! [`build_snapshot`] assembles everything viewers see from both period
//! states. The result still carries owner handles; it is never sent as is.
//! Each viewer receives [`Snapshot::for_viewer`], which replaces handles with
//! a per-recipient `mine` flag.

use crate::state::{PeriodState, SelectionPhase};
use chrono::{DateTime, NaiveDate, Utc};
use roleta_domain::{OwnerHandle, Period, PeriodPhase, WindowPolicy};
use serde::Serialize;

/// Everything needed to build a snapshot.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotInput<'a> {
    /// Morning state.
    pub morning: &'a PeriodState,
    /// Afternoon state.
    pub afternoon: &'a PeriodState,
    /// Date of the last daily reset.
    pub last_reset: Option<NaiveDate>,
    /// The window rules.
    pub policy: &'a WindowPolicy,
    /// The instant the snapshot describes.
    pub now: DateTime<Utc>,
    /// Rules and help copy shown to viewers.
    pub rules: &'a [String],
}

/// A ledger entry as recorded in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrantRecord {
    /// The name as submitted.
    pub name: String,
    /// Local signup time, `HH:MM:SS`.
    pub timestamp: String,
    /// The connection that added it.
    pub owner: OwnerHandle,
}

/// Selection window flags of one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionView {
    /// Where the window stands.
    pub phase: SelectionPhase,
    /// Whether confirmations are accepted right now.
    pub window_open: bool,
    /// Heading shown over the drawn list.
    pub display_label: String,
    /// Whether the cut has been applied.
    pub finalized: bool,
}

/// One drawn name with its confirmation flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawView {
    /// 1-based place in the draw.
    pub position: usize,
    /// The drawn name as submitted.
    pub name: String,
    /// Whether attendance was confirmed.
    pub selected: bool,
    /// Whether the cut removed the name.
    pub crossed: bool,
    /// Whether the name currently stays on the roster.
    pub kept: bool,
}

/// One line of the final roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    /// 1-based, numbered across both periods.
    pub position: usize,
    /// The kept name.
    pub name: String,
    /// The list the name was drawn from.
    pub period: Period,
}

/// State of one period in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodSnapshot {
    /// The period described.
    pub period: Period,
    /// Label from the schedule.
    pub label: String,
    /// Where the clock sits within the period's windows.
    pub phase: PeriodPhase,
    /// Whether names may currently be added or removed.
    pub add_open: bool,
    /// Selection window flags.
    pub selection: SelectionView,
    /// The ledger in signup order.
    pub entrants: Vec<EntrantRecord>,
    /// The draw in position order; empty before the draw.
    pub draw: Vec<DrawView>,
}

/// The full outbound state at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Local date at `generated_at`.
    pub today: NaiveDate,
    /// Date of the last daily reset.
    pub last_reset: Option<NaiveDate>,
    /// The instant the snapshot describes.
    pub generated_at: DateTime<Utc>,
    /// Morning state.
    pub morning: PeriodSnapshot,
    /// Afternoon state.
    pub afternoon: PeriodSnapshot,
    /// Kept names of every finalized period, morning first.
    pub roster: Vec<RosterEntry>,
    /// Rules and help copy.
    pub rules: Vec<String>,
}

/// A ledger entry as one viewer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewerEntrant {
    /// The name as submitted.
    pub name: String,
    /// Local signup time, `HH:MM:SS`.
    pub timestamp: String,
    /// Whether the receiving viewer added this entry.
    pub mine: bool,
}

/// One period as one viewer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewerPeriod {
    /// The period described.
    pub period: Period,
    /// Label from the schedule.
    pub label: String,
    /// Where the clock sits within the period's windows.
    pub phase: PeriodPhase,
    /// Whether names may currently be added or removed.
    pub add_open: bool,
    /// Selection window flags.
    pub selection: SelectionView,
    /// The ledger in signup order, without owner handles.
    pub entrants: Vec<ViewerEntrant>,
    /// The draw in position order.
    pub draw: Vec<DrawView>,
}

/// The snapshot as delivered to one viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewerSnapshot {
    /// Local date, `YYYY-MM-DD`.
    pub today: String,
    /// Date of the last daily reset.
    pub last_reset: Option<String>,
    /// RFC 3339 instant the snapshot was built.
    pub generated_at: String,
    /// Morning state.
    pub morning: ViewerPeriod,
    /// Afternoon state.
    pub afternoon: ViewerPeriod,
    /// Kept names of every finalized period, morning first.
    pub roster: Vec<RosterEntry>,
    /// Rules and help copy.
    pub rules: Vec<String>,
}

impl PeriodSnapshot {
    fn for_viewer(&self, viewer: Option<&OwnerHandle>) -> ViewerPeriod {
        ViewerPeriod {
            period: self.period,
            label: self.label.clone(),
            phase: self.phase,
            add_open: self.add_open,
            selection: self.selection.clone(),
            entrants: self
                .entrants
                .iter()
                .map(|e| ViewerEntrant {
                    name: e.name.clone(),
                    timestamp: e.timestamp.clone(),
                    mine: viewer.is_some_and(|v| v == &e.owner),
                })
                .collect(),
            draw: self.draw.clone(),
        }
    }
}

impl Snapshot {
    /// Returns the period's part of the snapshot.
    #[must_use]
    pub const fn period(&self, period: Period) -> &PeriodSnapshot {
        match period {
            Period::Morning => &self.morning,
            Period::Afternoon => &self.afternoon,
        }
    }

    /// Renders the snapshot for one viewer.
    ///
    /// Owner handles are dropped; entries added by `viewer` are flagged `mine`.
    #[must_use]
    pub fn for_viewer(&self, viewer: Option<&OwnerHandle>) -> ViewerSnapshot {
        ViewerSnapshot {
            today: self.today.format("%Y-%m-%d").to_string(),
            last_reset: self
                .last_reset
                .map(|d| d.format("%Y-%m-%d").to_string()),
            generated_at: self.generated_at.to_rfc3339(),
            morning: self.morning.for_viewer(viewer),
            afternoon: self.afternoon.for_viewer(viewer),
            roster: self.roster.clone(),
            rules: self.rules.clone(),
        }
    }
}

/// Builds a snapshot from both period states.
///
/// Pure: the same input always yields the same snapshot.
#[must_use]
pub fn build_snapshot(input: &SnapshotInput<'_>) -> Snapshot {
    let morning: PeriodSnapshot = period_snapshot(input.morning, input);
    let afternoon: PeriodSnapshot = period_snapshot(input.afternoon, input);

    let roster: Vec<RosterEntry> = [input.morning, input.afternoon]
        .into_iter()
        .flat_map(|state| {
            state
                .kept_names()
                .into_iter()
                .map(move |name| (state.period, name.display().to_string()))
        })
        .enumerate()
        .map(|(i, (period, name))| RosterEntry {
            position: i + 1,
            name,
            period,
        })
        .collect();

    Snapshot {
        today: input.policy.today(input.now),
        last_reset: input.last_reset,
        generated_at: input.now,
        morning,
        afternoon,
        roster,
        rules: input.rules.to_vec(),
    }
}

fn period_snapshot(state: &PeriodState, input: &SnapshotInput<'_>) -> PeriodSnapshot {
    let policy: &WindowPolicy = input.policy;
    let label: String = policy.schedule(state.period).label().to_string();
    let selection = &state.selection;

    let entrants: Vec<EntrantRecord> = state
        .entrants
        .iter()
        .map(|e| EntrantRecord {
            name: e.name.display().to_string(),
            timestamp: policy.local(e.added_at).format("%H:%M:%S").to_string(),
            owner: e.owner.clone(),
        })
        .collect();

    let draw: Vec<DrawView> = state
        .draw
        .iter()
        .map(|entry| {
            let selected: bool = selection.is_selected(&entry.name);
            let crossed: bool = selection.is_crossed(&entry.name);
            let kept: bool = match selection.phase {
                SelectionPhase::Open => selected,
                SelectionPhase::Finalized => !crossed,
                SelectionPhase::NoDraw | SelectionPhase::Pending => true,
            };
            DrawView {
                position: entry.position,
                name: entry.name.display().to_string(),
                selected,
                crossed,
                kept,
            }
        })
        .collect();

    PeriodSnapshot {
        period: state.period,
        phase: policy.phase(state.period, input.now),
        add_open: policy.is_add_remove_allowed(state.period, input.now),
        selection: SelectionView {
            phase: selection.phase,
            window_open: selection.is_open(),
            display_label: format!("{label} cut"),
            finalized: selection.phase == SelectionPhase::Finalized,
        },
        label,
        entrants,
        draw,
    }
}

/// Rules copy derived from the configured schedule.
#[must_use]
pub fn default_rules(policy: &WindowPolicy) -> Vec<String> {
    let mut rules: Vec<String> = Vec::new();
    for period in Period::ALL {
        let schedule = policy.schedule(period);
        rules.push(format!(
            "{} list: sign up from {} to {}.",
            schedule.label(),
            schedule.signup_opens().format("%H:%M"),
            schedule.signup_closes().format("%H:%M"),
        ));
        rules.push(format!(
            "{} draw runs at {}. Drawn names confirm attendance from {} to {}; anyone not confirmed is cut.",
            schedule.label(),
            schedule.draw_at().format("%H:%M"),
            schedule.selection_opens().format("%H:%M"),
            schedule.selection_closes().format("%H:%M"),
        ));
    }
    rules.push(String::from("Each name may appear only once per list."));
    rules.push(String::from("You may only remove names you added yourself."));
    rules.push(String::from("Lists are cleared every day at midnight."));
    rules
}
