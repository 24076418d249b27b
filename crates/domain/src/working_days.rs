// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Working-day duration calculation.
//!
//! ## Rules
//!
//! - Sundays are never chargeable
//! - The second Saturday of every month is never chargeable
//! - Every other calendar day counts as one chargeable day
//!
//! The second Saturday is the first Saturday of the month plus seven days,
//! computed independently for each month a range touches.
//!
//! Half-day scaling is applied on top of the whole-day count by
//! [`LeaveDuration::no_of_days`]; the exclusion rules know nothing about
//! half days.

use crate::error::DomainError;
use crate::types::HalfDay;
use chrono::{Datelike, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month, OffsetDateTime, Weekday};

/// The computed duration of a leave period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveDuration {
    /// Whole chargeable days in the range.
    pub chargeable_days: u32,
    /// Inclusive calendar span, kept for display and audit only.
    pub calendar_span_days: u32,
    /// Half-day marker, when the leave covers half a day.
    pub half_day: Option<HalfDay>,
}

impl LeaveDuration {
    /// The effective number of leave days, with half-day scaling applied.
    #[must_use]
    pub fn no_of_days(&self) -> f64 {
        let whole: f64 = f64::from(self.chargeable_days);
        if self.half_day.is_some() {
            whole * 0.5
        } else {
            whole
        }
    }

    /// The effective duration expressed in half-day units.
    ///
    /// This is the exact integer form of [`Self::no_of_days`], used for storage.
    #[must_use]
    pub const fn half_day_units(&self) -> u32 {
        if self.half_day.is_some() {
            self.chargeable_days
        } else {
            self.chargeable_days.saturating_mul(2)
        }
    }
}

/// Returns the second Saturday of the given month.
///
/// # Errors
///
/// Returns an error if the month falls outside the supported date range.
pub fn second_saturday(year: i32, month: Month) -> Result<Date, DomainError> {
    let first_of_month: Date = Date::from_calendar_date(year, month, 1).map_err(|e| {
        DomainError::DateArithmeticOverflow {
            operation: format!("locating the first day of {month} {year}: {e}"),
        }
    })?;

    let days_until_saturday: u8 = (13 - first_of_month.weekday().number_days_from_sunday()) % 7;

    first_of_month
        .checked_add(Duration::days(i64::from(days_until_saturday) + 7))
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("locating the second Saturday of {month} {year}"),
        })
}

/// Returns true if the date is a working (chargeable) day.
///
/// # Errors
///
/// Returns an error if the month's second Saturday cannot be computed.
pub fn is_working_day(date: Date) -> Result<bool, DomainError> {
    match date.weekday() {
        Weekday::Sunday => Ok(false),
        Weekday::Saturday => Ok(date != second_saturday(date.year(), date.month())?),
        _ => Ok(true),
    }
}

/// Counts the chargeable days in the inclusive range `[from, to]`.
///
/// # Errors
///
/// Returns `DomainError::InvalidRange` if `from` is after `to`. The dates are
/// never swapped.
pub fn count_chargeable_days(from: Date, to: Date) -> Result<u32, DomainError> {
    if from > to {
        return Err(DomainError::InvalidRange { from, to });
    }

    let mut total: u32 = 0;
    let mut current: Date = from;
    loop {
        if is_working_day(current)? {
            total += 1;
        }
        if current == to {
            break;
        }
        current = current
            .next_day()
            .ok_or_else(|| DomainError::DateArithmeticOverflow {
                operation: format!("advancing past {current}"),
            })?;
    }

    Ok(total)
}

/// Returns the inclusive number of calendar days in `[from, to]`.
///
/// # Errors
///
/// Returns `DomainError::InvalidRange` if `from` is after `to`.
pub fn calendar_span_days(from: Date, to: Date) -> Result<u32, DomainError> {
    if from > to {
        return Err(DomainError::InvalidRange { from, to });
    }
    let span: i64 = (to - from).whole_days() + 1;
    u32::try_from(span).map_err(|_| DomainError::DateArithmeticOverflow {
        operation: format!("measuring the span from {from} to {to}"),
    })
}

/// Computes the full duration of a leave period.
///
/// `to` defaults to `from` when absent.
///
/// # Errors
///
/// Returns an error if:
/// - `from` is after `to`
/// - a half-day leave spans more than one calendar day
pub fn compute_duration(
    from: Date,
    to: Option<Date>,
    half_day: Option<HalfDay>,
) -> Result<LeaveDuration, DomainError> {
    let to: Date = to.unwrap_or(from);

    if half_day.is_some() && from != to {
        if from > to {
            return Err(DomainError::InvalidRange { from, to });
        }
        return Err(DomainError::HalfDaySpansMultipleDays { from, to });
    }

    Ok(LeaveDuration {
        chargeable_days: count_chargeable_days(from, to)?,
        calendar_span_days: calendar_span_days(from, to)?,
        half_day,
    })
}

/// Returns the current calendar date at the institution.
///
/// Day boundaries follow the institution's time zone, not UTC.
///
/// # Errors
///
/// Returns an error if the instant cannot be represented in the zone.
pub fn institutional_today(now: OffsetDateTime, timezone: Tz) -> Result<Date, DomainError> {
    let overflow = || DomainError::DateArithmeticOverflow {
        operation: format!("converting {now} to {timezone}"),
    };

    let local: chrono::DateTime<Tz> = timezone
        .timestamp_opt(now.unix_timestamp(), 0)
        .single()
        .ok_or_else(overflow)?;
    let local_date: chrono::NaiveDate = local.date_naive();

    let month: Month = u8::try_from(local_date.month())
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .ok_or_else(overflow)?;
    let day: u8 = u8::try_from(local_date.day()).map_err(|_| overflow())?;

    Date::from_calendar_date(local_date.year(), month, day).map_err(|_| overflow())
}
