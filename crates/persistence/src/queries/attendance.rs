// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use pitchbook_domain::{AttendanceEntry, Track};

use crate::data_models::AttendanceRow;
use crate::diesel_schema::attendance_records;
use crate::error::PersistenceError;

/// Lists the attendance roster for a fixture on a track, by pitch.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is invalid.
pub fn list_attendance(
    conn: &mut SqliteConnection,
    track: Track,
    fixture_id: i64,
) -> Result<Vec<AttendanceEntry>, PersistenceError> {
    let rows: Vec<AttendanceRow> = attendance_records::table
        .filter(attendance_records::track.eq(track.as_str()))
        .filter(attendance_records::fixture_id.eq(fixture_id))
        .select(AttendanceRow::as_select())
        .order(attendance_records::pitch_id.asc())
        .load(conn)?;

    rows.into_iter().map(AttendanceEntry::try_from).collect()
}
