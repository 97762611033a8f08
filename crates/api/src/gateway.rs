// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use roleta::Snapshot;
use std::sync::Arc;

/// Outbound side of the live view.
///
/// The engine publishes a fresh snapshot after every visible change. The
/// transport renders it per viewer; implementations must not block.
pub trait Gateway: Send + Sync {
    /// Publishes a snapshot to every connected viewer.
    fn publish(&self, snapshot: Arc<Snapshot>);
}

/// Gateway that drops every snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullGateway;

impl Gateway for NullGateway {
    fn publish(&self, _snapshot: Arc<Snapshot>) {}
}
