// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use pitchbook_domain::{Attendee, Track};
use time::OffsetDateTime;
use tracing::info;

use crate::data_models::encode_timestamp;
use crate::diesel_schema::attendance_records;
use crate::error::PersistenceError;

/// Replaces the attendance roster for a fixture on a track.
///
/// The previous roster is deleted and every attendee inserted, all inside
/// one transaction. If any insert fails the prior roster is restored.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `track` - The allocation track
/// * `fixture_id` - The fixture ID
/// * `attendees` - The new roster
/// * `attended_at` - The timestamp stamped on every entry
///
/// # Returns
///
/// The number of entries written.
///
/// # Errors
///
/// Returns an error if any delete or insert fails, for example when an
/// attendee references an unknown pitch or bookmaker.
pub fn replace_attendance(
    conn: &mut SqliteConnection,
    track: Track,
    fixture_id: i64,
    attendees: &[Attendee],
    attended_at: OffsetDateTime,
) -> Result<usize, PersistenceError> {
    let stamp: String = encode_timestamp(attended_at)?;

    conn.transaction::<usize, PersistenceError, _>(|conn| {
        let removed: usize = diesel::delete(
            attendance_records::table
                .filter(attendance_records::track.eq(track.as_str()))
                .filter(attendance_records::fixture_id.eq(fixture_id)),
        )
        .execute(conn)?;

        for attendee in attendees {
            diesel::insert_into(attendance_records::table)
                .values((
                    attendance_records::track.eq(track.as_str()),
                    attendance_records::fixture_id.eq(fixture_id),
                    attendance_records::pitch_id.eq(attendee.pitch_id),
                    attendance_records::bookmaker_permit_no
                        .eq(attendee.bookmaker_permit_no.value()),
                    attendance_records::attended_at.eq(&stamp),
                ))
                .execute(conn)?;
        }

        info!(
            track = %track,
            fixture_id,
            removed,
            written = attendees.len(),
            "Replaced attendance roster"
        );
        Ok(attendees.len())
    })
}
