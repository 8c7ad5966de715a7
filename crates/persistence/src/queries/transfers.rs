// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use pitchbook_domain::TransferEntry;

use crate::data_models::TransferRow;
use crate::diesel_schema::pitch_transfers;
use crate::error::PersistenceError;

/// Lists the transfer ledger for a pitch, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is invalid.
pub fn list_transfers(
    conn: &mut SqliteConnection,
    pitch_id: i64,
) -> Result<Vec<TransferEntry>, PersistenceError> {
    let rows: Vec<TransferRow> = pitch_transfers::table
        .filter(pitch_transfers::pitch_id.eq(pitch_id))
        .select(TransferRow::as_select())
        .order(pitch_transfers::transfer_id.asc())
        .load(conn)?;

    rows.into_iter().map(TransferEntry::try_from).collect()
}
