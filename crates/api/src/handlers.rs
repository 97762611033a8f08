// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Client intent dispatch.
//!
//! Transports hand every decoded intent to [`handle_intent`] together with
//! the sender's owner handle. Rejections come back as [`ApiError`]s for the
//! transport to turn into a notice addressed to that viewer only.

use roleta_domain::{DrawTrigger, OwnerHandle, Period};
use tracing::debug;

use crate::engine::Engine;
use crate::error::{ApiError, translate_domain_error};
use crate::request_response::{AddNameRequest, ClientIntent};

/// Resolves a list identifier to its period.
///
/// # Errors
///
/// Returns an error if the identifier names no period.
pub fn parse_list(list: &str) -> Result<Period, ApiError> {
    Period::from_list_name(list).map_err(translate_domain_error)
}

/// Applies one client intent on behalf of `owner`.
///
/// # Errors
///
/// Returns the rejection to report back to the sender.
pub async fn handle_intent(
    engine: &Engine,
    intent: ClientIntent,
    owner: &OwnerHandle,
) -> Result<(), ApiError> {
    debug!(owner = %owner, ?intent, "Handling client intent");
    match intent {
        ClientIntent::AddName { list, name } => {
            engine.add_entrant(parse_list(&list)?, &name, owner).await
        }
        ClientIntent::RemoveName { list, name } => {
            engine.remove_entrant(parse_list(&list)?, &name, owner).await
        }
        ClientIntent::ManualDraw { list } => engine
            .run_draw(parse_list(&list)?, DrawTrigger::Manual)
            .await
            .map(|_| ()),
        ClientIntent::RecordSelection {
            list,
            name,
            selected,
        } => {
            engine
                .record_selection(parse_list(&list)?, &name, Some(owner), selected)
                .await
        }
        ClientIntent::UpdateKeptNames { list, kept } => {
            engine.record_kept_names(parse_list(&list)?, &kept).await
        }
    }
}

/// Applies the HTTP signup form.
///
/// The form carries the submitter's live connection handle in `socketId`.
///
/// # Errors
///
/// Returns an error if the handle or list is malformed, or the add is
/// rejected.
pub async fn handle_add_name_form(engine: &Engine, request: &AddNameRequest) -> Result<(), ApiError> {
    let owner: OwnerHandle = match request.socket_id.as_deref() {
        Some(token) => OwnerHandle::parse(token).map_err(translate_domain_error)?,
        None => {
            return Err(ApiError::InvalidInput {
                field: String::from("socketId"),
                message: String::from("A live connection is required to sign up"),
            });
        }
    };
    let period: Period = parse_list(&request.list)?;
    engine.add_entrant(period, &request.name, &owner).await
}
