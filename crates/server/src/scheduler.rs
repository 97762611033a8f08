// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Periodic driver for time-based transitions.

use roleta_api::Engine;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Spawns the task that runs the daily reset, the scheduled draws and the
/// selection window transitions every `tick`.
///
/// The first tick fires immediately so a late start catches up at once.
/// Missed ticks are skipped rather than replayed.
pub fn spawn_scheduler(engine: Arc<Engine>, tick: Duration) -> JoinHandle<()> {
    info!(tick_seconds = tick.as_secs(), "Starting scheduler");
    tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(Instant::now(), tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            debug!("Scheduler tick");
            engine.run_due(engine.now()).await;
        }
    })
}
