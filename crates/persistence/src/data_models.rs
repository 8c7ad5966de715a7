// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row structs and the conversions between stored and domain values.
//!
//! Status-like columns are nullable. A `NULL` decodes to the enum default,
//! so callers never see an absent status.

use diesel::prelude::*;
use pitchbook_domain::{
    AllocationRecord, AreaAvailability, AreaPlacement, AttendanceEntry, AttendanceMark, Fixture,
    ParticipationStatus, PermitNumber, Pitch, Track, TransferEntry, parse_date,
};
use std::str::FromStr;
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime, UtcOffset};

use crate::diesel_schema::{allocations, attendance_records, pitch_transfers, pitches};
use crate::error::PersistenceError;

/// Fixture row joined with its racecourse name.
pub type FixtureRow = (i64, i64, String, String, bool, i32, bool, i32);

/// Diesel Queryable struct for pitch rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = pitches)]
pub struct PitchRow {
    pub pitch_id: i64,
    pub racecourse_id: i64,
    pub owner_permit_no: String,
    pub pitch_label: String,
    pub pitch_no: i32,
    pub seniority_date: Option<String>,
}

/// Diesel Queryable struct for allocation rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = allocations)]
pub struct AllocationRow {
    pub track: String,
    pub fixture_id: i64,
    pub pitch_id: i64,
    pub racecourse_id: i64,
    pub permit_no: Option<String>,
    pub status: Option<String>,
    pub location: Option<String>,
    pub attendance: Option<String>,
    pub updated_at: Option<String>,
}

/// Diesel Queryable struct for attendance roster rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = attendance_records)]
pub struct AttendanceRow {
    pub track: String,
    pub fixture_id: i64,
    pub pitch_id: i64,
    pub bookmaker_permit_no: String,
    pub attended_at: String,
}

/// Diesel Queryable struct for transfer ledger rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = pitch_transfers)]
pub struct TransferRow {
    pub transfer_id: i64,
    pub pitch_id: i64,
    pub old_owner_permit_no: String,
    pub new_owner_permit_no: String,
    pub transfer_value: Option<f64>,
    pub transfer_date: String,
}

/// Formats an instant for storage as RFC 3339 in UTC.
///
/// # Errors
///
/// Returns an error if the instant cannot be formatted.
pub fn encode_timestamp(at: OffsetDateTime) -> Result<String, PersistenceError> {
    Ok(at.to_offset(UtcOffset::UTC).format(&Rfc3339)?)
}

/// Parses a stored RFC 3339 timestamp.
///
/// # Errors
///
/// Returns an error if the stored text is not RFC 3339.
pub fn decode_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    Ok(OffsetDateTime::parse(value, &Rfc3339)?)
}

/// Formats a calendar date for storage (`YYYY-MM-DD`).
#[must_use]
pub fn encode_date(date: Date) -> String {
    date.to_string()
}

/// Parses a stored calendar date.
///
/// # Errors
///
/// Returns an error if the stored text is not an ISO date.
pub fn decode_date(value: &str) -> Result<Date, PersistenceError> {
    parse_date(value).map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

fn decode_permit(value: &str) -> Result<PermitNumber, PersistenceError> {
    PermitNumber::new(value).map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

fn decode_code<T>(value: Option<&str>) -> Result<T, PersistenceError>
where
    T: FromStr<Err = pitchbook_domain::DomainError> + Default,
{
    value.map_or_else(
        || Ok(T::default()),
        |code| T::from_str(code).map_err(|e| PersistenceError::SerializationError(e.to_string())),
    )
}

fn decode_count(value: i32) -> Result<u32, PersistenceError> {
    u32::try_from(value).map_err(|_| {
        PersistenceError::SerializationError(format!("Negative pitch count stored: {value}"))
    })
}

/// Converts a joined fixture row into a domain fixture.
///
/// # Errors
///
/// Returns an error if the stored date or a pitch count is invalid.
pub fn fixture_from_row(row: FixtureRow) -> Result<Fixture, PersistenceError> {
    let (
        fixture_id,
        racecourse_id,
        racecourse_name,
        fixture_date,
        premium_available,
        premium_pitches,
        corporate_available,
        corporate_pitches,
    ) = row;

    Ok(Fixture {
        fixture_id,
        racecourse_id,
        racecourse_name,
        fixture_date: decode_date(&fixture_date)?,
        premium: AreaAvailability::new(premium_available, decode_count(premium_pitches)?),
        corporate: AreaAvailability::new(corporate_available, decode_count(corporate_pitches)?),
    })
}

impl TryFrom<PitchRow> for Pitch {
    type Error = PersistenceError;

    fn try_from(row: PitchRow) -> Result<Self, Self::Error> {
        Ok(Self {
            pitch_id: row.pitch_id,
            racecourse_id: row.racecourse_id,
            owner: decode_permit(&row.owner_permit_no)?,
            label: row.pitch_label,
            number: row.pitch_no,
            seniority_date: row.seniority_date.as_deref().map(decode_date).transpose()?,
        })
    }
}

impl TryFrom<AllocationRow> for AllocationRecord {
    type Error = PersistenceError;

    fn try_from(row: AllocationRow) -> Result<Self, Self::Error> {
        let track: Track = Track::from_str(&row.track)
            .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;
        let status: ParticipationStatus = decode_code(row.status.as_deref())?;
        let location: AreaPlacement = decode_code(row.location.as_deref())?;
        let attendance: AttendanceMark = decode_code(row.attendance.as_deref())?;

        Ok(Self {
            track,
            fixture_id: row.fixture_id,
            pitch_id: row.pitch_id,
            racecourse_id: row.racecourse_id,
            permit_no: row.permit_no.as_deref().map(decode_permit).transpose()?,
            status,
            location,
            attendance,
            updated_at: row.updated_at.as_deref().map(decode_timestamp).transpose()?,
        })
    }
}

impl TryFrom<AttendanceRow> for AttendanceEntry {
    type Error = PersistenceError;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        Ok(Self {
            track: Track::from_str(&row.track)
                .map_err(|e| PersistenceError::SerializationError(e.to_string()))?,
            fixture_id: row.fixture_id,
            pitch_id: row.pitch_id,
            bookmaker_permit_no: decode_permit(&row.bookmaker_permit_no)?,
            attended_at: decode_timestamp(&row.attended_at)?,
        })
    }
}

impl TryFrom<TransferRow> for TransferEntry {
    type Error = PersistenceError;

    fn try_from(row: TransferRow) -> Result<Self, Self::Error> {
        Ok(Self {
            transfer_id: row.transfer_id,
            pitch_id: row.pitch_id,
            old_owner: decode_permit(&row.old_owner_permit_no)?,
            new_owner: decode_permit(&row.new_owner_permit_no)?,
            transfer_value: row.transfer_value,
            transfer_date: decode_timestamp(&row.transfer_date)?,
        })
    }
}
