// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ordered background storage writes.
//!
//! Memory is authoritative. Mutations are queued here in the order memory
//! applied them and written by a single thread, so storage replays the same
//! sequence. A write that keeps failing is retried with exponential backoff
//! and then dropped; memory is never rolled back.

use roleta::StoreMutation;
use roleta_persistence::{PersistenceError, RosterStore};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, warn};

use crate::error::ApiError;

/// Retry policy of the store writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterConfig {
    /// Attempts per mutation, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry. Doubles on each further retry.
    pub initial_backoff: Duration,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(100),
        }
    }
}

enum WriterMessage {
    Apply(StoreMutation),
    Flush(oneshot::Sender<()>),
}

/// Handle to the writer thread.
///
/// The thread exits once every handle is dropped and the queue is drained.
#[derive(Debug, Clone)]
pub struct StoreWriter {
    tx: mpsc::UnboundedSender<WriterMessage>,
}

impl StoreWriter {
    /// Starts the writer thread, taking ownership of the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn(store: Box<dyn RosterStore>, config: WriterConfig) -> Result<Self, ApiError> {
        let (tx, rx) = mpsc::unbounded_channel();
        std::thread::Builder::new()
            .name(String::from("roleta-store-writer"))
            .spawn(move || run(store, rx, config))
            .map_err(|e| ApiError::Internal {
                message: format!("Failed to start store writer: {e}"),
            })?;
        Ok(Self { tx })
    }

    /// Queues a mutation behind every previously queued one.
    pub fn enqueue(&self, mutation: StoreMutation) {
        if self.tx.send(WriterMessage::Apply(mutation)).is_err() {
            error!("Store writer has stopped; mutation dropped");
        }
    }

    /// Waits until every mutation queued before this call has been handled.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(WriterMessage::Flush(done_tx)).is_err() {
            warn!("Store writer has stopped; nothing to flush");
            return;
        }
        if done_rx.await.is_err() {
            warn!("Store writer stopped before flushing");
        }
    }
}

fn run(
    mut store: Box<dyn RosterStore>,
    mut rx: mpsc::UnboundedReceiver<WriterMessage>,
    config: WriterConfig,
) {
    while let Some(message) = rx.blocking_recv() {
        match message {
            WriterMessage::Apply(mutation) => write_with_retry(store.as_mut(), &mutation, config),
            WriterMessage::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("Store writer finished");
}

fn write_with_retry(store: &mut dyn RosterStore, mutation: &StoreMutation, config: WriterConfig) {
    let attempts: u32 = config.max_attempts.max(1);
    let mut backoff: Duration = config.initial_backoff;

    for attempt in 1..=attempts {
        let result: Result<(), PersistenceError> = store.apply(mutation);
        match result {
            Ok(()) => {
                debug!(kind = mutation.kind(), attempt, "Mutation stored");
                return;
            }
            Err(e) if attempt < attempts => {
                warn!(
                    kind = mutation.kind(),
                    attempt,
                    backoff_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX),
                    error = %e,
                    "Storage write failed; retrying"
                );
                std::thread::sleep(backoff);
                backoff = backoff.saturating_mul(2);
            }
            Err(e) => {
                error!(
                    kind = mutation.kind(),
                    attempts,
                    error = %e,
                    "Storage write failed; giving up"
                );
            }
        }
    }
}
