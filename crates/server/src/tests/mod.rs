// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use roleta::ScriptedPicker;
use roleta_api::{Engine, EngineConfig, Gateway, WriterConfig};
use roleta_domain::{FixedClock, WindowPolicy};
use roleta_persistence::Persistence;
use std::sync::Arc;
use std::time::Duration;

use crate::AppState;
use crate::live::SnapshotBroadcaster;

/// Local wall-clock time on 2026-03-02.
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    WindowPolicy::canonical()
        .localize(
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            NaiveTime::from_hms_opt(hour, minute, 0).unwrap(),
        )
        .unwrap()
}

/// Engine over an in-memory database with a fixed clock and the identity
/// shuffle.
pub fn test_engine(now: DateTime<Utc>, gateway: Arc<dyn Gateway>) -> (Engine, Arc<FixedClock>) {
    let clock: Arc<FixedClock> = Arc::new(FixedClock::new(now));
    let mut config: EngineConfig = EngineConfig::new(WindowPolicy::canonical());
    config.writer = WriterConfig {
        max_attempts: 2,
        initial_backoff: Duration::from_millis(1),
    };
    let engine: Engine = Engine::initialize(
        config,
        Box::new(Persistence::new_in_memory().expect("in-memory database")),
        clock.clone(),
        gateway,
        Box::new(ScriptedPicker::identity()),
    )
    .expect("engine starts");
    (engine, clock)
}

pub fn test_app_state(now: DateTime<Utc>) -> (AppState, Arc<FixedClock>) {
    let broadcaster: SnapshotBroadcaster = SnapshotBroadcaster::new();
    let (engine, clock) = test_engine(now, Arc::new(broadcaster.clone()));
    (
        AppState {
            engine: Arc::new(engine),
            broadcaster,
        },
        clock,
    )
}
