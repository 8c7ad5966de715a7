// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::HashSet;

use time::Date;
use time::format_description::well_known::Iso8601;

use crate::error::DomainError;
use crate::types::Attendee;

/// Validates an attendance roster before it replaces the stored one.
///
/// # Errors
///
/// Returns an error if:
/// - The roster is empty
/// - A pitch appears more than once
pub fn validate_attendance_roster(attendees: &[Attendee]) -> Result<(), DomainError> {
    if attendees.is_empty() {
        return Err(DomainError::NoAttendeesProvided);
    }

    let mut seen: HashSet<i64> = HashSet::with_capacity(attendees.len());
    for attendee in attendees {
        if !seen.insert(attendee.pitch_id) {
            return Err(DomainError::DuplicateAttendee {
                pitch_id: attendee.pitch_id,
            });
        }
    }

    Ok(())
}

/// Validates an optional transfer value.
///
/// An absent value stays absent; it is never coerced to zero.
///
/// # Errors
///
/// Returns an error if the value is negative, NaN, or infinite.
pub fn validate_transfer_value(value: Option<f64>) -> Result<Option<f64>, DomainError> {
    match value {
        None => Ok(None),
        Some(v) if !v.is_finite() => Err(DomainError::InvalidTransferValue {
            reason: format!("{v} is not a finite amount"),
        }),
        Some(v) if v < 0.0 => Err(DomainError::InvalidTransferValue {
            reason: format!("{v} is negative"),
        }),
        Some(v) => Ok(Some(v)),
    }
}

/// Parses an ISO 8601 calendar date (`YYYY-MM-DD`).
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string is not a valid date.
pub fn parse_date(date_string: &str) -> Result<Date, DomainError> {
    Date::parse(date_string, &Iso8601::DEFAULT).map_err(|e| DomainError::DateParseError {
        date_string: date_string.to_string(),
        error: e.to_string(),
    })
}
