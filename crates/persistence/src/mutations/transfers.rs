// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pitch ownership transfers.
//!
//! The pitch owner column and the ledger change together. The ledger is
//! append-only; triggers reject updates and deletes.

use diesel::SqliteConnection;
use diesel::prelude::*;
use pitchbook_domain::{PermitNumber, TransferEntry};
use time::OffsetDateTime;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::data_models::encode_timestamp;
use crate::diesel_schema::{pitch_transfers, pitches};
use crate::error::PersistenceError;

/// Moves a pitch to a new owner and appends the ledger entry.
///
/// The old owner is read inside the same transaction as the update.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `pitch_id` - The pitch being transferred
/// * `new_owner` - The receiving bookmaker
/// * `transfer_value` - The agreed value; `None` is stored as `NULL`
/// * `transfer_date` - When the transfer took effect
///
/// # Errors
///
/// Returns `NotFound` if the pitch does not exist, `ForeignKeyViolation`
/// if the new owner is not a registered bookmaker, or any database error.
pub fn record_transfer(
    conn: &mut SqliteConnection,
    pitch_id: i64,
    new_owner: &PermitNumber,
    transfer_value: Option<f64>,
    transfer_date: OffsetDateTime,
) -> Result<TransferEntry, PersistenceError> {
    let stamp: String = encode_timestamp(transfer_date)?;

    conn.transaction::<TransferEntry, PersistenceError, _>(|conn| {
        let old_owner: String = pitches::table
            .find(pitch_id)
            .select(pitches::owner_permit_no)
            .first::<String>(conn)
            .optional()?
            .ok_or_else(|| PersistenceError::NotFound(format!("Pitch {pitch_id}")))?;

        diesel::update(pitches::table.find(pitch_id))
            .set(pitches::owner_permit_no.eq(new_owner.value()))
            .execute(conn)?;

        diesel::insert_into(pitch_transfers::table)
            .values((
                pitch_transfers::pitch_id.eq(pitch_id),
                pitch_transfers::old_owner_permit_no.eq(&old_owner),
                pitch_transfers::new_owner_permit_no.eq(new_owner.value()),
                pitch_transfers::transfer_value.eq(transfer_value),
                pitch_transfers::transfer_date.eq(&stamp),
            ))
            .execute(conn)?;

        let transfer_id: i64 = conn.get_last_insert_rowid()?;
        info!(
            transfer_id,
            pitch_id,
            old_owner = %old_owner,
            new_owner = %new_owner,
            "Recorded pitch transfer"
        );

        Ok(TransferEntry {
            transfer_id,
            pitch_id,
            old_owner: PermitNumber::new(&old_owner)
                .map_err(|e| PersistenceError::SerializationError(e.to_string()))?,
            new_owner: new_owner.clone(),
            transfer_value,
            transfer_date,
        })
    })
}
