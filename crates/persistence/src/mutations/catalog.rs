// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Catalog mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use pitchbook_domain::{AreaKind, PermitNumber};
use time::Date;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::data_models::encode_date;
use crate::diesel_schema::{bookmakers, fixtures, pitches, racecourses};
use crate::error::PersistenceError;

#[derive(AsChangeset)]
#[diesel(table_name = fixtures)]
struct PremiumAreaChanges {
    premium_area_available: Option<bool>,
    number_of_premium_pitches: Option<i32>,
}

#[derive(AsChangeset)]
#[diesel(table_name = fixtures)]
struct CorporateAreaChanges {
    corporate_area_available: Option<bool>,
    number_of_corporate_pitches: Option<i32>,
}

/// Creates a racecourse.
///
/// # Errors
///
/// Returns `UniqueViolation` if the name is taken.
pub fn insert_racecourse(conn: &mut SqliteConnection, name: &str) -> Result<i64, PersistenceError> {
    diesel::insert_into(racecourses::table)
        .values(racecourses::name.eq(name))
        .execute(conn)?;

    let racecourse_id: i64 = conn.get_last_insert_rowid()?;
    info!(racecourse_id, name, "Created racecourse");
    Ok(racecourse_id)
}

/// Registers a bookmaker under a permit number.
///
/// # Errors
///
/// Returns `UniqueViolation` if the permit number is already registered.
pub fn insert_bookmaker(
    conn: &mut SqliteConnection,
    permit_no: &PermitNumber,
    name: &str,
) -> Result<(), PersistenceError> {
    diesel::insert_into(bookmakers::table)
        .values((
            bookmakers::permit_no.eq(permit_no.value()),
            bookmakers::name.eq(name),
        ))
        .execute(conn)?;

    info!(permit_no = %permit_no, "Registered bookmaker");
    Ok(())
}

/// Creates a pitch owned by a bookmaker.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `racecourse_id` - The racecourse the pitch belongs to
/// * `owner` - The owning bookmaker
/// * `label` - The pitch label (e.g., the ring row)
/// * `number` - The pitch number within the label
/// * `seniority_date` - Optional seniority date
///
/// # Errors
///
/// Returns `UniqueViolation` if the `(racecourse, label, number)` slot is
/// taken, or `ForeignKeyViolation` if the racecourse or owner is unknown.
pub fn insert_pitch(
    conn: &mut SqliteConnection,
    racecourse_id: i64,
    owner: &PermitNumber,
    label: &str,
    number: i32,
    seniority_date: Option<Date>,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(pitches::table)
        .values((
            pitches::racecourse_id.eq(racecourse_id),
            pitches::owner_permit_no.eq(owner.value()),
            pitches::pitch_label.eq(label),
            pitches::pitch_no.eq(number),
            pitches::seniority_date.eq(seniority_date.map(encode_date)),
        ))
        .execute(conn)?;

    let pitch_id: i64 = conn.get_last_insert_rowid()?;
    info!(pitch_id, racecourse_id, owner = %owner, "Created pitch");
    Ok(pitch_id)
}

/// Creates a fixture with both special areas closed.
///
/// # Errors
///
/// Returns `UniqueViolation` if the racecourse already has a fixture on
/// that date.
pub fn insert_fixture(
    conn: &mut SqliteConnection,
    racecourse_id: i64,
    fixture_date: Date,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(fixtures::table)
        .values((
            fixtures::racecourse_id.eq(racecourse_id),
            fixtures::fixture_date.eq(encode_date(fixture_date)),
        ))
        .execute(conn)?;

    let fixture_id: i64 = conn.get_last_insert_rowid()?;
    info!(fixture_id, racecourse_id, %fixture_date, "Created fixture");
    Ok(fixture_id)
}

/// Deletes a fixture.
///
/// Allocation records and attendance rosters for the fixture are removed
/// by `ON DELETE CASCADE`.
///
/// # Returns
///
/// The number of fixtures deleted (0 or 1).
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_fixture(conn: &mut SqliteConnection, fixture_id: i64) -> Result<usize, PersistenceError> {
    let deleted: usize = diesel::delete(fixtures::table.find(fixture_id)).execute(conn)?;
    info!(fixture_id, deleted, "Deleted fixture");
    Ok(deleted)
}

/// Updates one special area's availability at a fixture.
///
/// Only the supplied fields are written.
///
/// # Returns
///
/// The number of fixtures updated (0 or 1).
///
/// # Errors
///
/// Returns an error if neither field is supplied, the pitch count does not
/// fit the column, or the update fails.
pub fn update_area_availability(
    conn: &mut SqliteConnection,
    fixture_id: i64,
    kind: AreaKind,
    available: Option<bool>,
    number_of_pitches: Option<u32>,
) -> Result<usize, PersistenceError> {
    if available.is_none() && number_of_pitches.is_none() {
        return Err(PersistenceError::Other(String::from("No fields to update")));
    }

    let count: Option<i32> = number_of_pitches
        .map(i32::try_from)
        .transpose()
        .map_err(|_| PersistenceError::Other(String::from("Pitch count out of range")))?;

    let target = fixtures::table.find(fixture_id);
    let updated: usize = match kind {
        AreaKind::Premium => diesel::update(target)
            .set(&PremiumAreaChanges {
                premium_area_available: available,
                number_of_premium_pitches: count,
            })
            .execute(conn)?,
        AreaKind::Corporate => diesel::update(target)
            .set(&CorporateAreaChanges {
                corporate_area_available: available,
                number_of_corporate_pitches: count,
            })
            .execute(conn)?,
    };

    info!(fixture_id, area = kind.label(), updated, "Updated area availability");
    Ok(updated)
}
