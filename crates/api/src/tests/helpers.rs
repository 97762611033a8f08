// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, NaiveTime, Utc};
use roleta::{ScriptedPicker, Snapshot, StoreMutation};
use roleta_domain::{Clock, FixedClock, OwnerHandle, WindowPolicy};
use roleta_persistence::{PersistenceError, RosterStore, StoredRoster};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::{Engine, EngineConfig, Gateway, WriterConfig};

pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

pub fn at_on(date: NaiveDate, hour: u32, minute: u32) -> DateTime<Utc> {
    WindowPolicy::canonical()
        .localize(date, NaiveTime::from_hms_opt(hour, minute, 0).unwrap())
        .unwrap()
}

/// Local wall-clock time on the test date.
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    at_on(test_date(), hour, minute)
}

pub fn next_day_at(hour: u32, minute: u32) -> DateTime<Utc> {
    at_on(test_date() + ChronoDuration::days(1), hour, minute)
}

pub fn handle(token: u64) -> OwnerHandle {
    OwnerHandle::from_token(token)
}

/// Gateway that keeps every published snapshot.
#[derive(Default)]
pub struct RecordingGateway {
    snapshots: Mutex<Vec<Arc<Snapshot>>>,
}

impl RecordingGateway {
    pub fn count(&self) -> usize {
        self.snapshots.lock().unwrap().len()
    }

    pub fn last(&self) -> Arc<Snapshot> {
        self.snapshots
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no snapshot published")
    }
}

impl Gateway for RecordingGateway {
    fn publish(&self, snapshot: Arc<Snapshot>) {
        self.snapshots.lock().unwrap().push(snapshot);
    }
}

/// In-memory store that can fail a set number of writes.
#[derive(Clone, Default)]
pub struct MemoryStore {
    pub initial: Option<StoredRoster>,
    pub applied: Arc<Mutex<Vec<StoreMutation>>>,
    pub failures_left: Arc<AtomicU32>,
}

impl MemoryStore {
    pub fn failing(times: u32) -> Self {
        let store = Self::default();
        store.failures_left.store(times, Ordering::SeqCst);
        store
    }

    pub fn applied_kinds(&self) -> Vec<&'static str> {
        self.applied
            .lock()
            .unwrap()
            .iter()
            .map(StoreMutation::kind)
            .collect()
    }
}

impl RosterStore for MemoryStore {
    fn load(&mut self) -> Result<StoredRoster, PersistenceError> {
        Ok(self.initial.clone().unwrap_or_else(StoredRoster::empty))
    }

    fn apply(&mut self, mutation: &StoreMutation) -> Result<(), PersistenceError> {
        let remaining: u32 = self.failures_left.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_left.store(remaining - 1, Ordering::SeqCst);
            return Err(PersistenceError::DatabaseError(String::from("injected failure")));
        }
        self.applied.lock().unwrap().push(mutation.clone());
        Ok(())
    }
}

pub struct Harness {
    pub engine: Engine,
    pub clock: Arc<FixedClock>,
    pub gateway: Arc<RecordingGateway>,
}

pub fn test_config() -> EngineConfig {
    let mut config = EngineConfig::new(WindowPolicy::canonical());
    config.writer = WriterConfig {
        max_attempts: 3,
        initial_backoff: Duration::from_millis(1),
    };
    config
}

pub fn harness_with(now: DateTime<Utc>, store: Box<dyn RosterStore>) -> Harness {
    let clock: Arc<FixedClock> = Arc::new(FixedClock::new(now));
    let gateway: Arc<RecordingGateway> = Arc::new(RecordingGateway::default());
    let engine = Engine::initialize(
        test_config(),
        store,
        Arc::clone(&clock) as Arc<dyn Clock>,
        Arc::clone(&gateway) as Arc<dyn Gateway>,
        Box::new(ScriptedPicker::identity()),
    )
    .unwrap();
    Harness {
        engine,
        clock,
        gateway,
    }
}

pub fn harness_at(now: DateTime<Utc>) -> Harness {
    harness_with(now, Box::new(MemoryStore::default()))
}
