// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Allocation record upserts.
//!
//! Each upsert is a single `INSERT ... ON CONFLICT (track, fixture_id,
//! pitch_id) DO UPDATE` that writes one axis of the record. The other
//! axes are left as stored, or `NULL` (their default) on first insert, so
//! status, placement and attendance writes never overwrite one another.

use diesel::SqliteConnection;
use diesel::prelude::*;
use pitchbook_domain::{AreaPlacement, AttendanceMark, ParticipationStatus, PermitNumber, Track};
use time::OffsetDateTime;
use tracing::debug;

use crate::data_models::encode_timestamp;
use crate::diesel_schema::allocations;
use crate::error::PersistenceError;

/// Composite key of an allocation record plus its racecourse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationKey {
    pub track: Track,
    pub fixture_id: i64,
    pub pitch_id: i64,
    pub racecourse_id: i64,
}

/// Writes the participation status, the acting permit and `updated_at`.
///
/// `updated_at` advances even when the status is unchanged.
///
/// # Errors
///
/// Returns an error if the upsert fails.
pub fn upsert_status(
    conn: &mut SqliteConnection,
    key: &AllocationKey,
    permit_no: &PermitNumber,
    status: ParticipationStatus,
    updated_at: OffsetDateTime,
) -> Result<(), PersistenceError> {
    let stamp: String = encode_timestamp(updated_at)?;

    diesel::insert_into(allocations::table)
        .values((
            allocations::track.eq(key.track.as_str()),
            allocations::fixture_id.eq(key.fixture_id),
            allocations::pitch_id.eq(key.pitch_id),
            allocations::racecourse_id.eq(key.racecourse_id),
            allocations::permit_no.eq(permit_no.value()),
            allocations::status.eq(status.as_str()),
            allocations::updated_at.eq(&stamp),
        ))
        .on_conflict((
            allocations::track,
            allocations::fixture_id,
            allocations::pitch_id,
        ))
        .do_update()
        .set((
            allocations::permit_no.eq(permit_no.value()),
            allocations::status.eq(status.as_str()),
            allocations::updated_at.eq(&stamp),
        ))
        .execute(conn)?;

    debug!(
        track = %key.track,
        fixture_id = key.fixture_id,
        pitch_id = key.pitch_id,
        status = status.as_str(),
        "Upserted participation status"
    );
    Ok(())
}

/// Writes the area placement only.
///
/// # Errors
///
/// Returns an error if the upsert fails.
pub fn upsert_location(
    conn: &mut SqliteConnection,
    key: &AllocationKey,
    location: AreaPlacement,
) -> Result<(), PersistenceError> {
    diesel::insert_into(allocations::table)
        .values((
            allocations::track.eq(key.track.as_str()),
            allocations::fixture_id.eq(key.fixture_id),
            allocations::pitch_id.eq(key.pitch_id),
            allocations::racecourse_id.eq(key.racecourse_id),
            allocations::location.eq(location.as_str()),
        ))
        .on_conflict((
            allocations::track,
            allocations::fixture_id,
            allocations::pitch_id,
        ))
        .do_update()
        .set(allocations::location.eq(location.as_str()))
        .execute(conn)?;

    debug!(
        track = %key.track,
        fixture_id = key.fixture_id,
        pitch_id = key.pitch_id,
        location = location.as_str(),
        "Upserted area placement"
    );
    Ok(())
}

/// Writes the attendance mark only.
///
/// # Errors
///
/// Returns an error if the upsert fails.
pub fn upsert_attendance_mark(
    conn: &mut SqliteConnection,
    key: &AllocationKey,
    attendance: AttendanceMark,
) -> Result<(), PersistenceError> {
    diesel::insert_into(allocations::table)
        .values((
            allocations::track.eq(key.track.as_str()),
            allocations::fixture_id.eq(key.fixture_id),
            allocations::pitch_id.eq(key.pitch_id),
            allocations::racecourse_id.eq(key.racecourse_id),
            allocations::attendance.eq(attendance.as_str()),
        ))
        .on_conflict((
            allocations::track,
            allocations::fixture_id,
            allocations::pitch_id,
        ))
        .do_update()
        .set(allocations::attendance.eq(attendance.as_str()))
        .execute(conn)?;

    debug!(
        track = %key.track,
        fixture_id = key.fixture_id,
        pitch_id = key.pitch_id,
        attendance = attendance.as_str(),
        "Upserted attendance mark"
    );
    Ok(())
}

/// Deletes the allocation record for a key, if one exists.
///
/// # Returns
///
/// The number of records deleted (0 or 1).
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn clear_allocation(
    conn: &mut SqliteConnection,
    key: &AllocationKey,
) -> Result<usize, PersistenceError> {
    let deleted: usize = diesel::delete(allocations::table.find((
        key.track.as_str(),
        key.fixture_id,
        key.pitch_id,
    )))
    .execute(conn)?;

    debug!(
        track = %key.track,
        fixture_id = key.fixture_id,
        pitch_id = key.pitch_id,
        deleted,
        "Cleared allocation record"
    );
    Ok(deleted)
}
