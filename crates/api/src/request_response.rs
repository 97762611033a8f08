// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Client intents and server messages exchanged with viewers.

use roleta::ViewerSnapshot;
use serde::{Deserialize, Serialize};

/// How long a notice stays on screen.
pub const NOTICE_TTL_MS: u64 = 5000;

/// A request sent by a viewer over the live connection.
///
/// `list` accepts `morning`/`afternoon` and the legacy
/// `morning_list`/`afternoon_list` identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientIntent {
    /// Sign a name up.
    AddName {
        /// The list to join.
        list: String,
        /// The name as typed.
        name: String,
    },
    /// Remove a name this viewer added.
    RemoveName {
        /// The list to leave.
        list: String,
        /// The name to remove.
        name: String,
    },
    /// Draw a list immediately.
    ManualDraw {
        /// The list to draw.
        list: String,
    },
    /// Confirm or unconfirm one drawn name.
    RecordSelection {
        /// The drawn list.
        list: String,
        /// The drawn name.
        name: String,
        /// Whether the name is attending.
        selected: bool,
    },
    /// Replace all confirmations of a list at once.
    UpdateKeptNames {
        /// The drawn list.
        list: String,
        /// Every name that stays.
        kept: Vec<String>,
    },
}

/// A message sent to a viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Sent once when the connection is accepted.
    Connected {
        /// The handle the viewer should present to resume.
        handle: String,
        /// Server time, ISO 8601.
        timestamp: String,
    },
    /// The full state as this viewer sees it.
    Snapshot {
        /// The rendered state.
        state: ViewerSnapshot,
    },
    /// A rejection addressed to this viewer only.
    Notice {
        /// The text to show.
        message: String,
        /// How long to keep it on screen.
        expires_in_ms: u64,
    },
}

impl ServerMessage {
    /// A notice with the standard lifetime.
    #[must_use]
    pub fn notice(message: impl Into<String>) -> Self {
        Self::Notice {
            message: message.into(),
            expires_in_ms: NOTICE_TTL_MS,
        }
    }
}

/// Body of the HTTP signup form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddNameRequest {
    /// The name as typed.
    pub name: String,
    /// `morning_list` or `afternoon_list`.
    pub list: String,
    /// The handle of the submitting viewer's live connection.
    #[serde(rename = "socketId")]
    pub socket_id: Option<String>,
}

/// Response to an HTTP write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteResponse {
    /// Whether the write was applied.
    pub success: bool,
    /// Optional detail for the caller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
