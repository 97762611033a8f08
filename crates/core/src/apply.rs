// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::mutation::StoreMutation;
use crate::shuffle::{IndexPicker, fisher_yates};
use crate::state::{
    NoopReason, Outcome, PeriodState, SelectionPhase, SelectionState, TransitionResult,
};
use chrono::{DateTime, NaiveDate, Utc};
use roleta_domain::{DrawEntry, DrawTrigger, Entrant, EntrantName, OwnerHandle, WindowPolicy};

/// Inputs a transition needs besides the state and the command.
pub struct TransitionContext<'a> {
    /// The instant the command is applied at.
    pub now: DateTime<Utc>,
    /// The window rules.
    pub policy: &'a WindowPolicy,
    /// Randomness for the draw.
    pub picker: &'a mut dyn IndexPicker,
}

/// Applies a command to one period's state, producing a new state and the
/// storage writes that mirror it.
///
/// # Arguments
///
/// * `state` - The current state of the period (immutable)
/// * `command` - The command to apply
/// * `ctx` - Clock reading, window policy and shuffle randomness
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new state, its mutations and
///   whether viewers need a new snapshot
/// * `Err(CoreError)` if the command is not allowed
///
/// # Errors
///
/// Returns an error if:
/// - The signup window is closed for an add or remove
/// - The name is already signed up, or is not removable by the caller
/// - A manual draw finds an empty ledger
/// - A selection command arrives outside the open window
/// - A window transition is attempted from the wrong phase
pub fn apply(
    state: &PeriodState,
    command: Command,
    ctx: &mut TransitionContext<'_>,
) -> Result<TransitionResult, CoreError> {
    match command {
        Command::AddEntrant { name, owner } => add_entrant(state, name, owner, ctx),
        Command::RemoveEntrant { name, owner } => remove_entrant(state, &name, &owner, ctx),
        Command::RunDraw { trigger } => run_draw(state, trigger, ctx),
        Command::OpenSelectionWindow => open_selection_window(state),
        Command::RecordSelection { name, selected, .. } => {
            record_selections(state, vec![(name, selected)])
        }
        Command::RecordKeptNames { kept } => {
            let mut selections: Vec<(EntrantName, bool)> = Vec::with_capacity(state.draw.len());
            for name in &kept {
                if state.drawn(name).is_none() {
                    return Err(CoreError::NotInDraw {
                        period: state.period,
                        name: name.display().to_string(),
                    });
                }
            }
            for entry in &state.draw {
                selections.push((entry.name.clone(), kept.contains(&entry.name)));
            }
            record_selections(state, selections)
        }
        Command::CloseSelectionWindow => close_selection_window(state),
    }
}

fn changed(new_state: PeriodState, mutations: Vec<StoreMutation>) -> TransitionResult {
    TransitionResult {
        new_state,
        mutations,
        outcome: Outcome::Changed,
    }
}

fn add_entrant(
    state: &PeriodState,
    name: EntrantName,
    owner: OwnerHandle,
    ctx: &TransitionContext<'_>,
) -> Result<TransitionResult, CoreError> {
    if !ctx.policy.is_add_remove_allowed(state.period, ctx.now) {
        return Err(CoreError::WindowClosed {
            period: state.period,
        });
    }

    if state.entrant(&name).is_some() {
        return Err(CoreError::DuplicateName {
            period: state.period,
            name: name.display().to_string(),
        });
    }

    let entrant: Entrant = Entrant::new(name, ctx.now, owner);
    let mut new_state: PeriodState = state.clone();
    new_state.entrants.push(entrant.clone());

    Ok(changed(
        new_state,
        vec![StoreMutation::InsertEntrant {
            period: state.period,
            entrant,
        }],
    ))
}

fn remove_entrant(
    state: &PeriodState,
    name: &EntrantName,
    owner: &OwnerHandle,
    ctx: &TransitionContext<'_>,
) -> Result<TransitionResult, CoreError> {
    if !ctx.policy.is_add_remove_allowed(state.period, ctx.now) {
        return Err(CoreError::WindowClosed {
            period: state.period,
        });
    }

    let Some(index) = state.entrants.iter().position(|e| &e.name == name) else {
        return Err(CoreError::NotFound {
            period: state.period,
            name: name.display().to_string(),
        });
    };

    let existing: &Entrant = &state.entrants[index];
    if !existing.is_owned_by(owner) {
        return Err(CoreError::NotOwner {
            period: state.period,
            name: existing.name.display().to_string(),
        });
    }

    let mut new_state: PeriodState = state.clone();
    let removed: Entrant = new_state.entrants.remove(index);

    Ok(changed(
        new_state,
        vec![StoreMutation::DeleteEntrant {
            period: state.period,
            name: removed.name,
            owner: removed.owner,
        }],
    ))
}

fn run_draw(
    state: &PeriodState,
    trigger: DrawTrigger,
    ctx: &mut TransitionContext<'_>,
) -> Result<TransitionResult, CoreError> {
    let period = state.period;
    let today: NaiveDate = ctx.policy.today(ctx.now);

    if trigger == DrawTrigger::Scheduled {
        if !ctx.policy.is_draw_due(period, ctx.now) {
            return Err(CoreError::DrawNotDue { period });
        }
        if state.last_scheduled_draw == Some(today) {
            return Ok(TransitionResult {
                new_state: state.clone(),
                mutations: Vec::new(),
                outcome: Outcome::Unchanged(NoopReason::AlreadyDrawnToday),
            });
        }
    }

    if state.entrants.is_empty() {
        return match trigger {
            DrawTrigger::Manual => Err(CoreError::EmptyLedger { period }),
            DrawTrigger::Scheduled => {
                let mut new_state: PeriodState = state.clone();
                new_state.last_scheduled_draw = Some(today);
                Ok(TransitionResult {
                    new_state,
                    mutations: vec![StoreMutation::SetDrawMarker {
                        period,
                        date: today,
                    }],
                    outcome: Outcome::Unchanged(NoopReason::EmptyLedger),
                })
            }
        };
    }

    let mut names: Vec<EntrantName> = state.entrants.iter().map(|e| e.name.clone()).collect();
    fisher_yates(&mut names, ctx.picker);

    let entries: Vec<DrawEntry> = names
        .into_iter()
        .enumerate()
        .map(|(i, name)| DrawEntry { position: i + 1, name })
        .collect();

    let mut new_state: PeriodState = state.clone();
    new_state.draw.clone_from(&entries);
    new_state.selection = SelectionState::pending();
    // A manual draw also consumes the slot so the scheduler cannot overwrite it.
    new_state.last_scheduled_draw = Some(today);

    Ok(changed(
        new_state,
        vec![StoreMutation::ReplaceDraw {
            period,
            entries,
            drawn_on: today,
        }],
    ))
}

fn open_selection_window(state: &PeriodState) -> Result<TransitionResult, CoreError> {
    match state.selection.phase {
        SelectionPhase::Pending if !state.draw.is_empty() => {}
        SelectionPhase::NoDraw | SelectionPhase::Pending => {
            return Ok(TransitionResult {
                new_state: state.clone(),
                mutations: Vec::new(),
                outcome: Outcome::Unchanged(NoopReason::NothingDrawn),
            });
        }
        from @ (SelectionPhase::Open | SelectionPhase::Finalized) => {
            return Err(CoreError::InvalidTransition {
                period: state.period,
                from,
                action: "open",
            });
        }
    }

    let mut new_state: PeriodState = state.clone();
    new_state.selection.phase = SelectionPhase::Open;
    for entry in &state.draw {
        new_state
            .selection
            .selections
            .entry(entry.name.clone())
            .or_insert(false);
    }

    Ok(changed(
        new_state,
        vec![StoreMutation::OpenSelection {
            period: state.period,
        }],
    ))
}

fn record_selections(
    state: &PeriodState,
    selections: Vec<(EntrantName, bool)>,
) -> Result<TransitionResult, CoreError> {
    if !state.selection.is_open() {
        return Err(CoreError::SelectionClosed {
            period: state.period,
        });
    }

    let mut new_state: PeriodState = state.clone();
    let mut recorded: Vec<(EntrantName, bool)> = Vec::with_capacity(selections.len());
    for (name, selected) in selections {
        let Some(drawn) = state.drawn(&name) else {
            return Err(CoreError::NotInDraw {
                period: state.period,
                name: name.display().to_string(),
            });
        };
        new_state.selection.selections.insert(drawn.clone(), selected);
        recorded.push((drawn.clone(), selected));
    }

    Ok(changed(
        new_state,
        vec![StoreMutation::SetSelections {
            period: state.period,
            selections: recorded,
        }],
    ))
}

fn close_selection_window(state: &PeriodState) -> Result<TransitionResult, CoreError> {
    if !state.selection.is_open() {
        return Err(CoreError::InvalidTransition {
            period: state.period,
            from: state.selection.phase,
            action: "close",
        });
    }

    let crossed: Vec<EntrantName> = state
        .draw
        .iter()
        .filter(|entry| !state.selection.is_selected(&entry.name))
        .map(|entry| entry.name.clone())
        .collect();

    let mut new_state: PeriodState = state.clone();
    new_state.selection.phase = SelectionPhase::Finalized;
    new_state.selection.crossed.extend(crossed.iter().cloned());

    Ok(changed(
        new_state,
        vec![StoreMutation::FinalizeSelection {
            period: state.period,
            crossed,
        }],
    ))
}
