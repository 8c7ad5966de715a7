// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Participation status transition rules.
//!
//! A bookmaker may move a pitch between "not applied" and "applied" for a
//! fixture, subject to two asymmetric time gates:
//!
//! - Applying closes at local midnight, `apply_lead_days` before the fixture
//! - Withdrawing closes at `withdraw_deadline` local time on the fixture day
//!
//! ## Invariants
//!
//! - The same rules apply to every track; only the `TrackConfig` differs
//! - Deadlines are wall-clock times in the policy timezone
//! - A deadline is inclusive: a request at exactly the deadline is allowed
//! - The current status never blocks a transition, so re-applying the
//!   current status is an allowed, idempotent request
//!
//! ## Usage
//!
//! This logic is used by:
//! - The allocation upsert, before any write
//! - Bookmaker listings, to report the deadlines for each fixture

use crate::error::DomainError;
use crate::status::ParticipationStatus;
use crate::track::TrackConfig;
use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use time::{Date, Month, OffsetDateTime};

/// Format used when a deadline is reported back to the caller.
const DEADLINE_FORMAT: &str = "%Y-%m-%d %H:%M %Z";

/// A requested participation status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRequest {
    /// The stored status, or the default when no record exists.
    pub current: ParticipationStatus,
    /// The status being requested.
    pub requested: ParticipationStatus,
    /// The calendar date of the fixture.
    pub fixture_date: Date,
    /// The instant the request is evaluated at.
    pub now: OffsetDateTime,
}

/// A permitted status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: ParticipationStatus,
    pub to: ParticipationStatus,
}

impl Transition {
    /// Returns true if the transition re-applies the current status.
    #[must_use]
    pub fn is_reapplication(&self) -> bool {
        self.from == self.to
    }
}

/// Decides whether a participation status change is permitted.
///
/// # Arguments
///
/// * `request` - The current and requested status with the timing inputs
/// * `config` - The configuration of the track the request is made on
/// * `tz` - The timezone fixture-day deadlines are read in
///
/// # Errors
///
/// Returns an error if:
/// - Applying after the application deadline (`TooLateToApply`)
/// - Withdrawing after the withdrawal deadline (`TooLateToWithdraw`)
/// - The local deadline cannot be resolved to a single instant
///
/// # Example
///
/// ```text
/// track = plain (lead 5 days, withdraw by 18:00)
/// fixture_date = 2026-03-10
///
/// Applied:     allowed until 2026-03-05 00:00 local
/// Not Working: allowed until 2026-03-10 18:00 local
/// ```
pub fn validate_transition(
    request: &TransitionRequest,
    config: &TrackConfig,
    tz: Tz,
) -> Result<Transition, DomainError> {
    let deadline: DateTime<Tz> = match request.requested {
        ParticipationStatus::Applied => apply_deadline(request.fixture_date, config, tz)?,
        ParticipationStatus::NotApplied => withdraw_deadline(request.fixture_date, config, tz)?,
    };

    if is_after(request.now, &deadline) {
        let deadline_label: String = deadline.format(DEADLINE_FORMAT).to_string();
        return Err(match request.requested {
            ParticipationStatus::Applied => DomainError::TooLateToApply {
                track: config.track(),
                lead_days: config.apply_lead_days(),
                deadline: deadline_label,
            },
            ParticipationStatus::NotApplied => DomainError::TooLateToWithdraw {
                track: config.track(),
                deadline: deadline_label,
            },
        });
    }

    Ok(Transition {
        from: request.current,
        to: request.requested,
    })
}

/// Returns the last instant at which a pitch may be applied for.
///
/// # Errors
///
/// Returns an error if the date arithmetic overflows or the local
/// midnight does not map onto a single instant.
pub fn apply_deadline(
    fixture_date: Date,
    config: &TrackConfig,
    tz: Tz,
) -> Result<DateTime<Tz>, DomainError> {
    let fixture_day: NaiveDate = to_naive_date(fixture_date)?;
    let cutoff_day: NaiveDate = fixture_day
        .checked_sub_days(Days::new(u64::from(config.apply_lead_days())))
        .ok_or_else(|| DomainError::DeadlineUnresolvable {
            reason: format!(
                "{} days before {fixture_day} is out of range",
                config.apply_lead_days()
            ),
        })?;

    resolve_local(cutoff_day, NaiveTime::MIN, tz)
}

/// Returns the last instant at which a pitch may be withdrawn.
///
/// # Errors
///
/// Returns an error if the local deadline does not map onto a single
/// instant.
pub fn withdraw_deadline(
    fixture_date: Date,
    config: &TrackConfig,
    tz: Tz,
) -> Result<DateTime<Tz>, DomainError> {
    let fixture_day: NaiveDate = to_naive_date(fixture_date)?;
    let cutoff: time::Time = config.withdraw_deadline();
    let cutoff_time: NaiveTime = NaiveTime::from_hms_opt(
        u32::from(cutoff.hour()),
        u32::from(cutoff.minute()),
        u32::from(cutoff.second()),
    )
    .ok_or_else(|| DomainError::DeadlineUnresolvable {
        reason: format!("Invalid withdrawal time: {cutoff}"),
    })?;

    resolve_local(fixture_day, cutoff_time, tz)
}

/// Returns the calendar date of `now` in the given timezone.
///
/// # Errors
///
/// Returns an error if the instant is outside the representable range.
pub fn local_date(now: OffsetDateTime, tz: Tz) -> Result<Date, DomainError> {
    let unresolvable = || DomainError::DeadlineUnresolvable {
        reason: format!("{now} is out of range"),
    };
    let local: NaiveDate = DateTime::from_timestamp(now.unix_timestamp(), 0)
        .ok_or_else(unresolvable)?
        .with_timezone(&tz)
        .date_naive();
    let month: Month = u8::try_from(local.month())
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .ok_or_else(unresolvable)?;
    let day: u8 = u8::try_from(local.day()).map_err(|_| unresolvable())?;
    Date::from_calendar_date(local.year(), month, day).map_err(|_| unresolvable())
}

// Compares at nanosecond precision across the time and chrono types.
fn is_after(now: OffsetDateTime, deadline: &DateTime<Tz>) -> bool {
    (now.unix_timestamp(), now.nanosecond())
        > (deadline.timestamp(), deadline.timestamp_subsec_nanos())
}

// Convert time::Date to chrono::NaiveDate
fn to_naive_date(date: Date) -> Result<NaiveDate, DomainError> {
    NaiveDate::from_ymd_opt(date.year(), date.month() as u32, u32::from(date.day())).ok_or_else(
        || DomainError::DeadlineUnresolvable {
            reason: format!("Invalid fixture date: {date}"),
        },
    )
}

fn resolve_local(day: NaiveDate, at: NaiveTime, tz: Tz) -> Result<DateTime<Tz>, DomainError> {
    tz.from_local_datetime(&day.and_time(at))
        .single()
        .ok_or_else(|| DomainError::DeadlineUnresolvable {
            reason: format!(
                "{day} {at} is ambiguous or non-existent in {tz} (DST transition)"
            ),
        })
}
