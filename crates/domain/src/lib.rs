// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod clock;
mod error;
mod types;
mod validation;
mod window_policy;

#[cfg(test)]
mod tests;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::DomainError;
pub use types::{DrawEntry, DrawTrigger, Entrant, EntrantName, OwnerHandle, Period};
pub use validation::{MAX_NAME_CHARS, parse_clock_time, validate_entrant_name};
pub use window_policy::{PeriodPhase, PeriodSchedule, WindowPolicy};
