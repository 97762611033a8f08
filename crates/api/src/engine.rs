// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The authoritative roster.
//!
//! [`Engine`] holds both period states in memory and is the only place they
//! change. Every entry point follows the same path:
//!
//! 1. Run the daily reset if the local date moved on
//! 2. Lock the period, apply the command, install the new state
//! 3. Queue the storage mutations on the [`StoreWriter`]
//! 4. Publish a fresh snapshot through the [`Gateway`]
//!
//! ## Locking
//!
//! One mutex per period plus one for the reset marker, always acquired in
//! the order reset marker, morning, afternoon. No storage I/O happens under
//! a lock; mutations are only queued.

use chrono::{DateTime, NaiveDate, Utc};
use roleta::{
    Command, IndexPicker, Outcome, PeriodState, Snapshot, SnapshotInput, StoreMutation,
    TransitionContext, TransitionResult, apply, build_snapshot, default_rules, due_commands,
    reset_required,
};
use roleta_domain::{Clock, DrawTrigger, EntrantName, OwnerHandle, Period, WindowPolicy};
use roleta_persistence::{RosterStore, StoredRoster};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::error::{ApiError, translate_core_error, translate_domain_error};
use crate::gateway::Gateway;
use crate::writer::{StoreWriter, WriterConfig};

/// Static configuration of the engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// The window rules.
    pub policy: WindowPolicy,
    /// Rules copy shown to viewers.
    pub rules: Vec<String>,
    /// Retry policy for storage writes.
    pub writer: WriterConfig,
}

impl EngineConfig {
    /// Configuration with the rules copy derived from `policy`.
    #[must_use]
    pub fn new(policy: WindowPolicy) -> Self {
        let rules: Vec<String> = default_rules(&policy);
        Self {
            policy,
            rules,
            writer: WriterConfig::default(),
        }
    }
}

/// Single owner of the in-memory roster.
pub struct Engine {
    policy: WindowPolicy,
    rules: Vec<String>,
    clock: Arc<dyn Clock>,
    gateway: Arc<dyn Gateway>,
    picker: Mutex<Box<dyn IndexPicker>>,
    last_reset: Mutex<Option<NaiveDate>>,
    morning: Mutex<PeriodState>,
    afternoon: Mutex<PeriodState>,
    writer: StoreWriter,
}

impl Engine {
    /// Loads the stored roster and starts the store writer.
    ///
    /// # Arguments
    ///
    /// * `config` - Window policy, rules copy and write retry policy
    /// * `store` - Storage; moved to the writer thread after loading
    /// * `clock` - Time source for every entry point
    /// * `gateway` - Where snapshots are published
    /// * `picker` - Randomness for draws
    ///
    /// # Errors
    ///
    /// Returns an error if the stored roster cannot be loaded or the writer
    /// thread cannot start.
    pub fn initialize(
        config: EngineConfig,
        mut store: Box<dyn RosterStore>,
        clock: Arc<dyn Clock>,
        gateway: Arc<dyn Gateway>,
        picker: Box<dyn IndexPicker>,
    ) -> Result<Self, ApiError> {
        let stored: StoredRoster = store.load()?;
        info!(
            morning_entrants = stored.morning.entrants.len(),
            afternoon_entrants = stored.afternoon.entrants.len(),
            last_reset = ?stored.last_reset,
            "Restored roster"
        );

        let writer: StoreWriter = StoreWriter::spawn(store, config.writer)?;

        Ok(Self {
            policy: config.policy,
            rules: config.rules,
            clock,
            gateway,
            picker: Mutex::new(picker),
            last_reset: Mutex::new(stored.last_reset),
            morning: Mutex::new(stored.morning),
            afternoon: Mutex::new(stored.afternoon),
            writer,
        })
    }

    /// Issues an owner handle for a new connection.
    ///
    /// A well-formed `token` from an earlier connection is handed back so the
    /// viewer keeps removal rights over its entries.
    #[must_use]
    pub fn issue_handle(token: Option<&str>) -> OwnerHandle {
        match token.map(OwnerHandle::parse) {
            Some(Ok(handle)) => handle,
            Some(Err(e)) => {
                debug!(error = %e, "Ignoring malformed resume token");
                OwnerHandle::from_token(rand::random::<u64>())
            }
            None => OwnerHandle::from_token(rand::random::<u64>()),
        }
    }

    /// The window rules in force.
    #[must_use]
    pub const fn policy(&self) -> &WindowPolicy {
        &self.policy
    }

    /// The current instant according to the engine's clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Signs a name up.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or already signed up, or the
    /// signup window is closed.
    pub async fn add_entrant(
        &self,
        period: Period,
        raw_name: &str,
        owner: &OwnerHandle,
    ) -> Result<(), ApiError> {
        let name: EntrantName = parse_name(raw_name)?;
        let command: Command = Command::AddEntrant {
            name,
            owner: owner.clone(),
        };
        self.execute(period, command, self.clock.now()).await?;
        info!(period = %period, name = raw_name.trim(), owner = %owner, "Entrant added");
        Ok(())
    }

    /// Removes a name the caller added.
    ///
    /// # Errors
    ///
    /// Returns an error if the window is closed, or the name is missing or
    /// belongs to another viewer.
    pub async fn remove_entrant(
        &self,
        period: Period,
        raw_name: &str,
        owner: &OwnerHandle,
    ) -> Result<(), ApiError> {
        let name: EntrantName = parse_name(raw_name)?;
        let command: Command = Command::RemoveEntrant {
            name,
            owner: owner.clone(),
        };
        self.execute(period, command, self.clock.now()).await?;
        info!(period = %period, name = raw_name.trim(), owner = %owner, "Entrant removed");
        Ok(())
    }

    /// Shuffles the period's ledger into a new draw.
    ///
    /// # Errors
    ///
    /// Returns an error if a manual draw finds an empty ledger, or a
    /// scheduled draw is requested before its time.
    pub async fn run_draw(&self, period: Period, trigger: DrawTrigger) -> Result<Outcome, ApiError> {
        self.execute(period, Command::RunDraw { trigger }, self.clock.now())
            .await
    }

    /// Opens the selection window over a pending draw.
    ///
    /// # Errors
    ///
    /// Returns an error if the window is already open or finalized.
    pub async fn open_selection_window(&self, period: Period) -> Result<Outcome, ApiError> {
        self.execute(period, Command::OpenSelectionWindow, self.clock.now())
            .await
    }

    /// Records one attendance confirmation.
    ///
    /// # Errors
    ///
    /// Returns an error if the window is not open or the name was not drawn.
    pub async fn record_selection(
        &self,
        period: Period,
        raw_name: &str,
        owner: Option<&OwnerHandle>,
        selected: bool,
    ) -> Result<(), ApiError> {
        let name: EntrantName = parse_name(raw_name)?;
        let command: Command = Command::RecordSelection {
            name,
            selected,
            owner: owner.cloned(),
        };
        self.execute(period, command, self.clock.now()).await?;
        debug!(
            period = %period,
            name = raw_name.trim(),
            selected,
            recorded_by = owner.map(OwnerHandle::as_str),
            "Selection recorded"
        );
        Ok(())
    }

    /// Replaces every confirmation of the period at once.
    ///
    /// # Errors
    ///
    /// Returns an error if the window is not open or a name was not drawn.
    pub async fn record_kept_names(&self, period: Period, kept: &[String]) -> Result<(), ApiError> {
        let kept: Vec<EntrantName> = kept
            .iter()
            .map(|raw| parse_name(raw))
            .collect::<Result<_, _>>()?;
        let count: usize = kept.len();
        self.execute(period, Command::RecordKeptNames { kept }, self.clock.now())
            .await?;
        debug!(period = %period, kept = count, "Kept names recorded");
        Ok(())
    }

    /// Applies the cut and finalizes the window.
    ///
    /// # Errors
    ///
    /// Returns an error if the window is not open.
    pub async fn close_selection_window(&self, period: Period) -> Result<Outcome, ApiError> {
        self.execute(period, Command::CloseSelectionWindow, self.clock.now())
            .await
    }

    /// Clears both periods if the local date at `now` has not been reset yet.
    ///
    /// Returns whether a reset ran.
    pub async fn check_and_reset_if_new_day(&self, now: DateTime<Utc>) -> bool {
        let today: NaiveDate = self.policy.today(now);
        let mut last_reset = self.last_reset.lock().await;
        if !reset_required(*last_reset, today) {
            return false;
        }

        let mut morning = self.morning.lock().await;
        let mut afternoon = self.afternoon.lock().await;
        *morning = morning.cleared();
        *afternoon = afternoon.cleared();
        let previous: Option<NaiveDate> = last_reset.replace(today);
        self.writer.enqueue(StoreMutation::ResetDay { date: today });

        info!(%today, previous = ?previous, "Daily reset");
        self.publish(*last_reset, &morning, &afternoon, now);
        true
    }

    /// Applies every time-driven transition due at `now`.
    ///
    /// Safe to call as often as the scheduler likes; repeats are no-ops.
    pub async fn run_due(&self, now: DateTime<Utc>) {
        self.check_and_reset_if_new_day(now).await;

        for period in Period::ALL {
            let due: Vec<Command> = {
                let state = self.period_state(period).lock().await;
                due_commands(&state, &self.policy, now)
            };
            for command in due {
                let action: &'static str = command.name();
                match self.execute(period, command, now).await {
                    Ok(Outcome::Changed) => {
                        info!(period = %period, action, "Scheduled transition applied");
                    }
                    Ok(Outcome::Unchanged(reason)) => {
                        info!(
                            period = %period,
                            action,
                            reason = reason.as_str(),
                            "Scheduled transition left state unchanged"
                        );
                    }
                    Err(e) => {
                        warn!(period = %period, action, error = %e, "Scheduled transition refused");
                    }
                }
            }
        }
    }

    /// Builds the current snapshot.
    pub async fn snapshot(&self) -> Arc<Snapshot> {
        let now: DateTime<Utc> = self.clock.now();
        let last_reset = self.last_reset.lock().await;
        let morning = self.morning.lock().await;
        let afternoon = self.afternoon.lock().await;
        Arc::new(self.assemble(*last_reset, &morning, &afternoon, now))
    }

    /// Current state of one period.
    pub async fn period(&self, period: Period) -> PeriodState {
        self.period_state(period).lock().await.clone()
    }

    /// Waits until every storage write queued so far has been handled.
    pub async fn flush(&self) {
        self.writer.flush().await;
    }

    const fn period_state(&self, period: Period) -> &Mutex<PeriodState> {
        match period {
            Period::Morning => &self.morning,
            Period::Afternoon => &self.afternoon,
        }
    }

    async fn execute(
        &self,
        period: Period,
        command: Command,
        now: DateTime<Utc>,
    ) -> Result<Outcome, ApiError> {
        self.check_and_reset_if_new_day(now).await;
        let action: &'static str = command.name();

        let outcome: Outcome = {
            let mut state = self.period_state(period).lock().await;
            let mut picker = self.picker.lock().await;
            let mut ctx = TransitionContext {
                now,
                policy: &self.policy,
                picker: &mut **picker,
            };
            let result: TransitionResult = apply(&state, command, &mut ctx)
                .map_err(|e| rejected(period, action, translate_core_error(e)))?;
            for mutation in result.mutations {
                self.writer.enqueue(mutation);
            }
            *state = result.new_state;
            result.outcome
        };

        match outcome {
            Outcome::Changed => {
                debug!(period = %period, action, "Transition applied");
                self.broadcast(now).await;
            }
            Outcome::Unchanged(reason) => {
                debug!(period = %period, action, reason = reason.as_str(), "Transition was a no-op");
            }
        }
        Ok(outcome)
    }

    async fn broadcast(&self, now: DateTime<Utc>) {
        let last_reset = self.last_reset.lock().await;
        let morning = self.morning.lock().await;
        let afternoon = self.afternoon.lock().await;
        self.publish(*last_reset, &morning, &afternoon, now);
    }

    /// Publishes while the caller still holds every lock, so snapshots reach
    /// the gateway in the order the state changed.
    fn publish(
        &self,
        last_reset: Option<NaiveDate>,
        morning: &PeriodState,
        afternoon: &PeriodState,
        now: DateTime<Utc>,
    ) {
        let snapshot: Snapshot = self.assemble(last_reset, morning, afternoon, now);
        self.gateway.publish(Arc::new(snapshot));
    }

    fn assemble(
        &self,
        last_reset: Option<NaiveDate>,
        morning: &PeriodState,
        afternoon: &PeriodState,
        now: DateTime<Utc>,
    ) -> Snapshot {
        build_snapshot(&SnapshotInput {
            morning,
            afternoon,
            last_reset,
            policy: &self.policy,
            now,
            rules: &self.rules,
        })
    }
}

fn parse_name(raw: &str) -> Result<EntrantName, ApiError> {
    EntrantName::parse(raw).map_err(|e| {
        let err: ApiError = translate_domain_error(e);
        debug!(error = %err, "Rejected name");
        err
    })
}

fn rejected(period: Period, action: &'static str, err: ApiError) -> ApiError {
    if err.is_user_error() {
        debug!(period = %period, action, error = %err, "Command rejected");
    } else {
        error!(period = %period, action, error = %err, "Command failed");
    }
    err
}
