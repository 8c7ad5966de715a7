// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Catalog queries.

use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::SqliteConnection;
use pitchbook_domain::{Fixture, PermitNumber, Pitch};
use time::Date;
use tracing::debug;

use crate::data_models::{FixtureRow, PitchRow, encode_date, fixture_from_row};
use crate::diesel_schema::{bookmakers, fixtures, pitches, racecourses};
use crate::error::PersistenceError;

type FixtureColumns = (
    fixtures::fixture_id,
    fixtures::racecourse_id,
    racecourses::name,
    fixtures::fixture_date,
    fixtures::premium_area_available,
    fixtures::number_of_premium_pitches,
    fixtures::corporate_area_available,
    fixtures::number_of_corporate_pitches,
);

const FIXTURE_COLUMNS: FixtureColumns = (
    fixtures::fixture_id,
    fixtures::racecourse_id,
    racecourses::name,
    fixtures::fixture_date,
    fixtures::premium_area_available,
    fixtures::number_of_premium_pitches,
    fixtures::corporate_area_available,
    fixtures::number_of_corporate_pitches,
);

/// Returns true if the racecourse exists.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn racecourse_exists(
    conn: &mut SqliteConnection,
    racecourse_id: i64,
) -> Result<bool, PersistenceError> {
    Ok(diesel::select(exists(racecourses::table.find(racecourse_id))).get_result(conn)?)
}

/// Returns true if a bookmaker holds the permit number.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn bookmaker_exists(
    conn: &mut SqliteConnection,
    permit_no: &PermitNumber,
) -> Result<bool, PersistenceError> {
    Ok(
        diesel::select(exists(bookmakers::table.find(permit_no.value())))
            .get_result(conn)?,
    )
}

/// Retrieves a fixture with its racecourse name.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `fixture_id` - The fixture ID
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the fixture is not found.
pub fn get_fixture(
    conn: &mut SqliteConnection,
    fixture_id: i64,
) -> Result<Option<Fixture>, PersistenceError> {
    debug!("Looking up fixture {}", fixture_id);

    let row: Option<FixtureRow> = fixtures::table
        .inner_join(racecourses::table)
        .filter(fixtures::fixture_id.eq(fixture_id))
        .select(FIXTURE_COLUMNS)
        .first::<FixtureRow>(conn)
        .optional()?;

    row.map(fixture_from_row).transpose()
}

/// Lists fixtures dated on or after `from`, earliest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored row is invalid.
pub fn list_fixtures_from(
    conn: &mut SqliteConnection,
    from: Date,
) -> Result<Vec<Fixture>, PersistenceError> {
    let rows: Vec<FixtureRow> = fixtures::table
        .inner_join(racecourses::table)
        .filter(fixtures::fixture_date.ge(encode_date(from)))
        .select(FIXTURE_COLUMNS)
        .order((fixtures::fixture_date.asc(), fixtures::fixture_id.asc()))
        .load::<FixtureRow>(conn)?;

    rows.into_iter().map(fixture_from_row).collect()
}

/// Retrieves a pitch.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the pitch is not found.
pub fn get_pitch(
    conn: &mut SqliteConnection,
    pitch_id: i64,
) -> Result<Option<Pitch>, PersistenceError> {
    debug!("Looking up pitch {}", pitch_id);

    let result: Result<PitchRow, diesel::result::Error> = pitches::table
        .find(pitch_id)
        .select(PitchRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(Pitch::try_from(row)?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists the pitches currently owned by a bookmaker.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored row is invalid.
pub fn list_pitches_owned_by(
    conn: &mut SqliteConnection,
    owner: &PermitNumber,
) -> Result<Vec<Pitch>, PersistenceError> {
    let rows: Vec<PitchRow> = pitches::table
        .filter(pitches::owner_permit_no.eq(owner.value()))
        .select(PitchRow::as_select())
        .order((
            pitches::racecourse_id.asc(),
            pitches::pitch_label.asc(),
            pitches::pitch_no.asc(),
        ))
        .load(conn)?;

    rows.into_iter().map(Pitch::try_from).collect()
}

/// Lists the pitches at a racecourse with their owners' names, by pitch ID.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored row is invalid.
pub fn list_pitches_at_racecourse(
    conn: &mut SqliteConnection,
    racecourse_id: i64,
) -> Result<Vec<(Pitch, String)>, PersistenceError> {
    let rows: Vec<(PitchRow, String)> = pitches::table
        .inner_join(bookmakers::table)
        .filter(pitches::racecourse_id.eq(racecourse_id))
        .select((PitchRow::as_select(), bookmakers::name))
        .order(pitches::pitch_id.asc())
        .load(conn)?;

    rows.into_iter()
        .map(|(row, owner_name)| Ok((Pitch::try_from(row)?, owner_name)))
        .collect()
}
