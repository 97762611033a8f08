// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Live view over WebSocket.
//!
//! Every connection receives a `connected` message carrying its owner handle,
//! then the current snapshot, then a fresh snapshot after every change. The
//! connection also carries the viewer's intents; a rejected intent is answered
//! with a notice sent to that viewer only.
//!
//! Snapshots are rendered per viewer, so entries the viewer added are flagged
//! `mine` and no owner handle ever leaves the server.

use axum::{
    extract::{
        Query, State as AxumState, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, stream::SplitSink, stream::StreamExt};
use roleta::Snapshot;
use roleta_api::{ClientIntent, Engine, Gateway, ServerMessage, handle_intent};
use roleta_domain::OwnerHandle;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::AppState;

/// Snapshots buffered per subscriber before it is considered lagging.
const SNAPSHOT_BUFFER_SIZE: usize = 64;

const UNRECOGNIZED_REQUEST: &str = "Unrecognized request.";

/// Fans engine snapshots out to every live connection.
#[derive(Clone)]
pub struct SnapshotBroadcaster {
    tx: broadcast::Sender<Arc<Snapshot>>,
}

impl SnapshotBroadcaster {
    /// Creates a broadcaster with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(SNAPSHOT_BUFFER_SIZE);
        Self { tx }
    }

    fn subscribe(&self) -> broadcast::Receiver<Arc<Snapshot>> {
        self.tx.subscribe()
    }
}

impl Default for SnapshotBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl Gateway for SnapshotBroadcaster {
    fn publish(&self, snapshot: Arc<Snapshot>) {
        match self.tx.send(snapshot) {
            Ok(receivers) => debug!(receivers, "Published snapshot"),
            Err(_) => debug!("No viewers connected"),
        }
    }
}

/// Query string of the live endpoint.
#[derive(Debug, Deserialize)]
pub struct LiveQuery {
    /// Handle from an earlier connection.
    pub token: Option<String>,
}

/// Upgrades the request and serves one viewer.
pub async fn live_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<LiveQuery>,
    AxumState(app_state): AxumState<AppState>,
) -> Response {
    let handle: OwnerHandle = Engine::issue_handle(query.token.as_deref());
    ws.on_upgrade(move |socket| serve_viewer(socket, app_state, handle))
}

/// Serializes the message sent for `snapshot` to `viewer`.
pub fn render_snapshot(snapshot: &Snapshot, viewer: &OwnerHandle) -> Option<String> {
    encode(&ServerMessage::Snapshot {
        state: snapshot.for_viewer(Some(viewer)),
    })
}

fn encode(message: &ServerMessage) -> Option<String> {
    match serde_json::to_string(message) {
        Ok(json) => Some(json),
        Err(e) => {
            error!(error = %e, "Failed to serialize server message");
            None
        }
    }
}

/// Sends one message. Returns `false` once the viewer is gone.
async fn send(sender: &mut SplitSink<WebSocket, Message>, json: Option<String>) -> bool {
    match json {
        Some(json) => sender.send(Message::Text(json.into())).await.is_ok(),
        None => true,
    }
}

fn connected_timestamp() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Iso8601::DEFAULT)
        .unwrap_or_else(|_| String::from("unknown"))
}

async fn serve_viewer(socket: WebSocket, app_state: AppState, handle: OwnerHandle) {
    let engine: Arc<Engine> = app_state.engine;
    info!(viewer = %handle, "Viewer connected");

    engine.check_and_reset_if_new_day(engine.now()).await;

    let (mut sender, mut receiver) = socket.split();
    // Subscribe before the first snapshot so no change falls between them.
    let mut rx: broadcast::Receiver<Arc<Snapshot>> = app_state.broadcaster.subscribe();

    let connected = ServerMessage::Connected {
        handle: handle.as_str().to_string(),
        timestamp: connected_timestamp(),
    };
    if !send(&mut sender, encode(&connected)).await {
        warn!(viewer = %handle, "Failed to send connection confirmation");
        return;
    }
    let current: Arc<Snapshot> = engine.snapshot().await;
    if !send(&mut sender, render_snapshot(&current, &handle)).await {
        return;
    }

    loop {
        tokio::select! {
            published = rx.recv() => {
                let snapshot: Arc<Snapshot> = match published {
                    Ok(snapshot) => snapshot,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(viewer = %handle, skipped, "Viewer lagged; resending current state");
                        engine.snapshot().await
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };
                if !send(&mut sender, render_snapshot(&snapshot, &handle)).await {
                    break;
                }
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(reply) = answer_intent(&engine, text.as_str(), &handle).await
                            && !send(&mut sender, encode(&reply)).await
                        {
                            break;
                        }
                    }
                    Some(Ok(Message::Binary(_))) => {
                        if !send(&mut sender, encode(&ServerMessage::notice(UNRECOGNIZED_REQUEST))).await {
                            break;
                        }
                    }
                    Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(viewer = %handle, "Viewer closed the connection");
                        break;
                    }
                    Some(Err(e)) => {
                        debug!(viewer = %handle, error = %e, "WebSocket receive error");
                        break;
                    }
                }
            }
        }
    }

    info!(viewer = %handle, "Viewer disconnected");
}

/// Applies one intent. Returns the notice to send back, if any.
///
/// Accepted intents need no reply: the resulting snapshot reaches the viewer
/// through the broadcast.
pub async fn answer_intent(engine: &Engine, text: &str, handle: &OwnerHandle) -> Option<ServerMessage> {
    let intent: ClientIntent = match serde_json::from_str(text) {
        Ok(intent) => intent,
        Err(e) => {
            debug!(viewer = %handle, error = %e, "Undecodable intent");
            return Some(ServerMessage::notice(UNRECOGNIZED_REQUEST));
        }
    };
    match handle_intent(engine, intent, handle).await {
        Ok(()) => None,
        Err(e) => Some(ServerMessage::notice(e.user_message())),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::tests::{at, test_engine};
    use roleta_api::REMOVE_OWN_ENTRY_MESSAGE;

    #[tokio::test]
    async fn test_publish_without_viewers_does_not_fail() {
        let broadcaster = SnapshotBroadcaster::new();
        let (engine, _clock) = test_engine(at(5, 10), Arc::new(broadcaster.clone()));
        let snapshot = engine.snapshot().await;
        broadcaster.publish(snapshot);
        assert_eq!(broadcaster.tx.receiver_count(), 0);
    }

    #[tokio::test]
    async fn test_engine_changes_reach_every_subscriber() {
        let broadcaster = SnapshotBroadcaster::new();
        let (engine, _clock) = test_engine(at(5, 10), Arc::new(broadcaster.clone()));
        engine.check_and_reset_if_new_day(engine.now()).await;
        let mut rx1 = broadcaster.subscribe();
        let mut rx2 = broadcaster.subscribe();

        engine
            .add_entrant(roleta_domain::Period::Morning, "Ana", &OwnerHandle::from_token(1))
            .await
            .unwrap();

        let first = rx1.recv().await.unwrap();
        let second = rx2.recv().await.unwrap();
        assert_eq!(first.morning.entrants.len(), 1);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_snapshot_is_rendered_per_viewer() {
        let (engine, _clock) = test_engine(at(5, 10), Arc::new(SnapshotBroadcaster::new()));
        let owner = OwnerHandle::from_token(1);
        engine
            .add_entrant(roleta_domain::Period::Morning, "Ana", &owner)
            .await
            .unwrap();
        let snapshot = engine.snapshot().await;

        let own = render_snapshot(&snapshot, &owner).unwrap();
        let other = render_snapshot(&snapshot, &OwnerHandle::from_token(2)).unwrap();

        assert!(own.contains("\"mine\":true"));
        assert!(other.contains("\"mine\":false"));
        assert!(!own.contains(owner.as_str()));
    }

    #[tokio::test]
    async fn test_accepted_intent_needs_no_reply() {
        let (engine, _clock) = test_engine(at(5, 10), Arc::new(SnapshotBroadcaster::new()));
        let text = r#"{"type":"add_name","list":"morning_list","name":"Ana"}"#;

        let reply = answer_intent(&engine, text, &OwnerHandle::from_token(1)).await;

        assert!(reply.is_none());
        assert_eq!(engine.snapshot().await.morning.entrants.len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_intent_gets_a_notice() {
        let (engine, _clock) = test_engine(at(5, 10), Arc::new(SnapshotBroadcaster::new()));
        let add = r#"{"type":"add_name","list":"morning","name":"Ana"}"#;
        let remove = r#"{"type":"remove_name","list":"morning","name":"Ana"}"#;
        answer_intent(&engine, add, &OwnerHandle::from_token(1)).await;

        let reply = answer_intent(&engine, remove, &OwnerHandle::from_token(2)).await;

        assert_eq!(reply, Some(ServerMessage::notice(REMOVE_OWN_ENTRY_MESSAGE)));
        assert_eq!(engine.snapshot().await.morning.entrants.len(), 1);
    }

    #[tokio::test]
    async fn test_undecodable_intent_gets_a_notice() {
        let (engine, _clock) = test_engine(at(5, 10), Arc::new(SnapshotBroadcaster::new()));

        let reply = answer_intent(&engine, "{\"type\":\"shout\"}", &OwnerHandle::from_token(1)).await;

        assert_eq!(reply, Some(ServerMessage::notice(UNRECOGNIZED_REQUEST)));
    }

    #[test]
    fn test_connected_timestamp_is_iso8601() {
        let timestamp = connected_timestamp();
        assert!(timestamp.contains('T'));
        assert_ne!(timestamp, "unknown");
    }
}
