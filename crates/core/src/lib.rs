// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod apply;
mod command;
mod error;
mod mutation;
mod scheduling;
mod shuffle;
mod snapshot;
mod state;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use apply::{TransitionContext, apply};
pub use command::Command;
pub use error::CoreError;
pub use mutation::StoreMutation;
pub use scheduling::{due_commands, reset_required};
pub use shuffle::{IndexPicker, ScriptedPicker, ThreadRngPicker, fisher_yates};
pub use snapshot::{
    DrawView, EntrantRecord, PeriodSnapshot, RosterEntry, SelectionView, Snapshot, SnapshotInput,
    ViewerEntrant, ViewerPeriod, ViewerSnapshot, build_snapshot, default_rules,
};
pub use state::{
    NoopReason, Outcome, PeriodState, SelectionPhase, SelectionState, TransitionResult,
};
