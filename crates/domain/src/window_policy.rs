// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Daily window policy for the two signup periods.
//!
//! This module maps `(period, instant)` to what is currently permitted:
//! - Adding and removing names (the signup window)
//! - Running the scheduled draw
//! - Confirming attendance (the selection window)
//! - Finalizing the cut
//!
//! ## Invariants
//!
//! - All boundaries are configuration, validated on construction
//! - All comparisons are wall-clock times in the declared timezone
//! - A window includes its start minute and its end minute through second :59
//! - Every function here is pure: the caller supplies the instant

use crate::error::DomainError;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::types::Period;

/// Where a period stands in its daily cycle at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodPhase {
    /// Before the signup window opens.
    Closed,
    /// Names may be added and removed.
    Signup,
    /// Signup has closed; the draw is pending or done.
    Draw,
    /// Drawn entrants may confirm attendance.
    Selection,
    /// The selection window has passed; the cut is final.
    PastCut,
}

impl PeriodPhase {
    /// Converts this phase to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Signup => "signup",
            Self::Draw => "draw",
            Self::Selection => "selection",
            Self::PastCut => "past_cut",
        }
    }
}

/// The configured daily timetable of one period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodSchedule {
    label: String,
    signup_opens: NaiveTime,
    signup_closes: NaiveTime,
    draw_at: NaiveTime,
    selection_opens: NaiveTime,
    selection_closes: NaiveTime,
}

impl PeriodSchedule {
    /// Creates a validated period schedule.
    ///
    /// # Arguments
    ///
    /// * `label` - Human-readable label shown to viewers
    /// * `signup_opens` - First minute names may be added
    /// * `signup_closes` - Last minute names may be added (inclusive)
    /// * `draw_at` - Minute from which the scheduled draw is due
    /// * `selection_opens` - First minute of the selection window
    /// * `selection_closes` - Last minute of the selection window (inclusive)
    ///
    /// # Errors
    ///
    /// Returns an error unless
    /// `signup_opens <= signup_closes < draw_at <= selection_opens <= selection_closes`.
    pub fn new(
        label: impl Into<String>,
        signup_opens: NaiveTime,
        signup_closes: NaiveTime,
        draw_at: NaiveTime,
        selection_opens: NaiveTime,
        selection_closes: NaiveTime,
    ) -> Result<Self, DomainError> {
        let label: String = label.into();
        if label.trim().is_empty() {
            return Err(DomainError::InvalidSchedule {
                reason: String::from("Period label cannot be empty"),
            });
        }

        let ordered: [(NaiveTime, NaiveTime, bool, &str); 4] = [
            (signup_opens, signup_closes, false, "signup must open before it closes"),
            (signup_closes, draw_at, true, "draw must be after signup closes"),
            (draw_at, selection_opens, false, "selection must not open before the draw"),
            (
                selection_opens,
                selection_closes,
                false,
                "selection must open before it closes",
            ),
        ];
        for (earlier, later, strict, rule) in ordered {
            let (a, b) = (minute_of_day(earlier), minute_of_day(later));
            if (strict && a >= b) || (!strict && a > b) {
                return Err(DomainError::InvalidSchedule {
                    reason: format!("{label}: {rule} ({earlier} vs {later})"),
                });
            }
        }

        Ok(Self {
            label,
            signup_opens,
            signup_closes,
            draw_at,
            selection_opens,
            selection_closes,
        })
    }

    /// Returns the label shown to viewers.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the first signup minute.
    #[must_use]
    pub const fn signup_opens(&self) -> NaiveTime {
        self.signup_opens
    }

    /// Returns the last signup minute.
    #[must_use]
    pub const fn signup_closes(&self) -> NaiveTime {
        self.signup_closes
    }

    /// Returns the scheduled draw minute.
    #[must_use]
    pub const fn draw_at(&self) -> NaiveTime {
        self.draw_at
    }

    /// Returns the first selection minute.
    #[must_use]
    pub const fn selection_opens(&self) -> NaiveTime {
        self.selection_opens
    }

    /// Returns the last selection minute.
    #[must_use]
    pub const fn selection_closes(&self) -> NaiveTime {
        self.selection_closes
    }
}

/// Pure window rules for both periods in one declared timezone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowPolicy {
    timezone: Tz,
    morning: PeriodSchedule,
    afternoon: PeriodSchedule,
}

impl WindowPolicy {
    /// Creates a policy from a timezone name and both period schedules.
    ///
    /// # Errors
    ///
    /// Returns an error if the timezone name is not a valid IANA zone.
    pub fn new(
        timezone: &str,
        morning: PeriodSchedule,
        afternoon: PeriodSchedule,
    ) -> Result<Self, DomainError> {
        let timezone: Tz = timezone
            .parse()
            .map_err(|_| DomainError::InvalidTimezone(timezone.to_string()))?;
        Ok(Self {
            timezone,
            morning,
            afternoon,
        })
    }

    /// The canonical configuration.
    ///
    /// Morning signup 05:00–09:44, draw 09:45, selection 09:45–11:44.
    /// Afternoon signup 12:00–14:44, draw 14:45, selection 14:45–17:44.
    /// Timezone `America/Sao_Paulo`.
    #[must_use]
    pub fn canonical() -> Self {
        let clock = |hour: u32, minute: u32| -> NaiveTime {
            NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
        };
        Self {
            timezone: chrono_tz::America::Sao_Paulo,
            morning: PeriodSchedule {
                label: String::from("Morning"),
                signup_opens: clock(5, 0),
                signup_closes: clock(9, 44),
                draw_at: clock(9, 45),
                selection_opens: clock(9, 45),
                selection_closes: clock(11, 44),
            },
            afternoon: PeriodSchedule {
                label: String::from("Afternoon"),
                signup_opens: clock(12, 0),
                signup_closes: clock(14, 44),
                draw_at: clock(14, 45),
                selection_opens: clock(14, 45),
                selection_closes: clock(17, 44),
            },
        }
    }

    /// Returns the declared timezone.
    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Returns the schedule of a period.
    #[must_use]
    pub const fn schedule(&self, period: Period) -> &PeriodSchedule {
        match period {
            Period::Morning => &self.morning,
            Period::Afternoon => &self.afternoon,
        }
    }

    /// Converts an instant to wall-clock time in the declared timezone.
    #[must_use]
    pub fn local(&self, now: DateTime<Utc>) -> DateTime<Tz> {
        now.with_timezone(&self.timezone)
    }

    /// Returns the calendar date of an instant in the declared timezone.
    #[must_use]
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        self.local(now).date_naive()
    }

    /// Converts a wall-clock date and time in the declared timezone to an instant.
    ///
    /// # Errors
    ///
    /// Returns an error if the local time is ambiguous or skipped (DST).
    pub fn localize(&self, date: NaiveDate, time: NaiveTime) -> Result<DateTime<Utc>, DomainError> {
        let naive = date.and_time(time);
        self.timezone
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| DomainError::UnresolvableLocalTime {
                local: naive.to_string(),
            })
    }

    /// Whether names may be added to or removed from `period` at `now`.
    #[must_use]
    pub fn is_add_remove_allowed(&self, period: Period, now: DateTime<Utc>) -> bool {
        let schedule = self.schedule(period);
        self.within(now, schedule.signup_opens, schedule.signup_closes)
    }

    /// Whether `period` is inside its selection window at `now`.
    #[must_use]
    pub fn is_selection_window_allowed(&self, period: Period, now: DateTime<Utc>) -> bool {
        let schedule = self.schedule(period);
        self.within(now, schedule.selection_opens, schedule.selection_closes)
    }

    /// Whether the scheduled draw for `period` is due at `now`.
    #[must_use]
    pub fn is_draw_due(&self, period: Period, now: DateTime<Utc>) -> bool {
        self.minute(now) >= minute_of_day(self.schedule(period).draw_at)
    }

    /// Whether the selection window of `period` has passed at `now`.
    #[must_use]
    pub fn is_past_cut(&self, period: Period, now: DateTime<Utc>) -> bool {
        self.minute(now) > minute_of_day(self.schedule(period).selection_closes)
    }

    /// Returns the phase of `period` at `now`.
    #[must_use]
    pub fn phase(&self, period: Period, now: DateTime<Utc>) -> PeriodPhase {
        let schedule = self.schedule(period);
        let minute: u32 = self.minute(now);
        if minute < minute_of_day(schedule.signup_opens) {
            PeriodPhase::Closed
        } else if minute <= minute_of_day(schedule.signup_closes) {
            PeriodPhase::Signup
        } else if minute < minute_of_day(schedule.selection_opens) {
            PeriodPhase::Draw
        } else if minute <= minute_of_day(schedule.selection_closes) {
            PeriodPhase::Selection
        } else {
            PeriodPhase::PastCut
        }
    }

    fn within(&self, now: DateTime<Utc>, opens: NaiveTime, closes: NaiveTime) -> bool {
        let minute: u32 = self.minute(now);
        minute >= minute_of_day(opens) && minute <= minute_of_day(closes)
    }

    fn minute(&self, now: DateTime<Utc>) -> u32 {
        let local = self.local(now);
        local.hour() * 60 + local.minute()
    }
}

/// Minutes since local midnight, ignoring seconds.
fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}
