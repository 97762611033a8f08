// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Engine and client boundary for the Roleta signup draw.
//!
//! [`Engine`] owns the live roster. Transports call its entry points (or
//! [`handle_intent`] for decoded client messages), storage sits behind the
//! [`StoreWriter`], and snapshots leave through a [`Gateway`].

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod engine;
mod error;
mod gateway;
mod handlers;
mod request_response;
mod writer;

#[cfg(test)]
mod tests;

pub use engine::{Engine, EngineConfig};
pub use error::{ApiError, REMOVE_OWN_ENTRY_MESSAGE, translate_core_error, translate_domain_error};
pub use gateway::{Gateway, NullGateway};
pub use handlers::{handle_add_name_form, handle_intent, parse_list};
pub use request_response::{
    AddNameRequest, ClientIntent, NOTICE_TTL_MS, ServerMessage, WriteResponse,
};
pub use writer::{StoreWriter, WriterConfig};
