// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Allocation record queries.
//!
//! A missing row is reported as `None`; callers substitute
//! `AllocationRecord::unrecorded` where the default state is wanted.

use std::collections::HashMap;

use diesel::prelude::*;
use diesel::SqliteConnection;
use pitchbook_domain::{AllocationFilter, AllocationRecord, Fixture, Pitch, PitchAllocation, Track};

use crate::data_models::AllocationRow;
use crate::diesel_schema::allocations;
use crate::error::PersistenceError;
use crate::queries::catalog::list_pitches_at_racecourse;

/// Retrieves the stored allocation record for a composite key.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `track` - The allocation track
/// * `fixture_id` - The fixture ID
/// * `pitch_id` - The pitch ID
///
/// # Errors
///
/// Returns an error if the database query fails or the row is invalid.
pub fn get_allocation(
    conn: &mut SqliteConnection,
    track: Track,
    fixture_id: i64,
    pitch_id: i64,
) -> Result<Option<AllocationRecord>, PersistenceError> {
    let row: Option<AllocationRow> = allocations::table
        .find((track.as_str(), fixture_id, pitch_id))
        .select(AllocationRow::as_select())
        .first(conn)
        .optional()?;

    row.map(AllocationRecord::try_from).transpose()
}

/// Lists stored allocation records on a track for a set of pitches.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is invalid.
pub fn list_allocations_for_pitches(
    conn: &mut SqliteConnection,
    track: Track,
    pitch_ids: &[i64],
) -> Result<Vec<AllocationRecord>, PersistenceError> {
    let rows: Vec<AllocationRow> = allocations::table
        .filter(allocations::track.eq(track.as_str()))
        .filter(allocations::pitch_id.eq_any(pitch_ids))
        .select(AllocationRow::as_select())
        .load(conn)?;

    rows.into_iter().map(AllocationRecord::try_from).collect()
}

/// Lists every pitch at a fixture's racecourse with its record on a track.
///
/// Pitches with no stored record, or whose record was written by a previous
/// owner, carry the default record. The filter is applied after defaults
/// are substituted. Pitches are ordered by ID.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is invalid.
pub fn list_fixture_allocations(
    conn: &mut SqliteConnection,
    track: Track,
    fixture: &Fixture,
    filter: AllocationFilter,
) -> Result<Vec<PitchAllocation>, PersistenceError> {
    let rows: Vec<AllocationRow> = allocations::table
        .filter(allocations::track.eq(track.as_str()))
        .filter(allocations::fixture_id.eq(fixture.fixture_id))
        .select(AllocationRow::as_select())
        .load(conn)?;

    let mut stored: HashMap<i64, AllocationRecord> = rows
        .into_iter()
        .map(|row| AllocationRecord::try_from(row).map(|record| (record.pitch_id, record)))
        .collect::<Result<HashMap<i64, AllocationRecord>, PersistenceError>>()?;

    let pitches: Vec<(Pitch, String)> = list_pitches_at_racecourse(conn, fixture.racecourse_id)?;
    Ok(pitches
        .into_iter()
        .map(|(pitch, owner_name)| {
            let record: AllocationRecord = stored.remove(&pitch.pitch_id).map_or_else(
                || {
                    AllocationRecord::unrecorded(
                        track,
                        fixture.fixture_id,
                        pitch.pitch_id,
                        fixture.racecourse_id,
                    )
                },
                |record| record.scoped_to_owner(&pitch.owner),
            );
            PitchAllocation {
                pitch,
                owner_name,
                record,
            }
        })
        .filter(|entry| filter.includes(&entry.record))
        .collect())
}
