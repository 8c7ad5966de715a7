// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Pitchbook pitch allocation system.
//!
//! This crate stores the fixture and pitch catalog, per-track allocation
//! records, attendance rosters and the pitch transfer ledger. It is built
//! on Diesel over `SQLite`.
//!
//! ## Access Model
//!
//! [`Persistence`] owns the connection. All reads and writes go through a
//! [`Store`] handle, obtained either directly with [`Persistence::store`]
//! or inside [`Persistence::immediate_transaction`]. The latter issues
//! `BEGIN IMMEDIATE`, so the write lock is held from the first read and a
//! read-validate-write sequence cannot interleave with another writer.
//!
//! ## Defaults
//!
//! A missing allocation row, or a `NULL` status column, reads as the
//! default variant of the corresponding domain enum.
//!
//! ## Testing Philosophy
//!
//! - Each test opens its own shared-cache in-memory database
//! - Multi-connection behaviour is tested against a temporary file

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::{Connection, SqliteConnection};
use pitchbook_domain::{
    AllocationFilter, AllocationRecord, AreaKind, AreaPlacement, AttendanceEntry, AttendanceMark,
    Attendee, Fixture, ParticipationStatus, PermitNumber, Pitch, PitchAllocation, Track,
    TransferEntry,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::{Date, OffsetDateTime};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use backend::sqlite::BUSY_TIMEOUT_MS;
pub use error::PersistenceError;
pub use mutations::allocations::AllocationKey;

use backend::PersistenceBackend;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter owning one `SQLite` connection.
pub struct Persistence {
    conn: SqliteConnection,
}

/// A borrowed handle for reading and writing the store.
///
/// Inside [`Persistence::immediate_transaction`] every call made through the
/// handle belongs to the same transaction.
pub struct Store<'a> {
    conn: &'a mut SqliteConnection,
}

/// Why a transaction closure was aborted.
enum Aborted<E> {
    Caller(E),
    Store(diesel::result::Error),
}

impl<E> From<diesel::result::Error> for Aborted<E> {
    fn from(err: diesel::result::Error) -> Self {
        Self::Store(err)
    }
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique shared-cache database, so instances are
    /// isolated from one another.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String =
            format!("file:pitchbook_memdb_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// Several adapters may open the same file; writers wait on one another
    /// for up to [`BUSY_TIMEOUT_MS`].
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        self.conn.verify_foreign_key_enforcement()
    }

    /// Returns a handle for statements outside an explicit transaction.
    pub const fn store(&mut self) -> Store<'_> {
        Store {
            conn: &mut self.conn,
        }
    }

    /// Runs `f` inside a `BEGIN IMMEDIATE` transaction.
    ///
    /// The transaction commits if `f` returns `Ok` and rolls back otherwise.
    /// Failures to begin, commit or roll back are reported through
    /// `E::from(PersistenceError)`; a lock held past the busy timeout
    /// surfaces as `PersistenceError::Busy`.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `f`, or the storage error that aborted
    /// the transaction.
    pub fn immediate_transaction<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Store<'_>) -> Result<T, E>,
        E: From<PersistenceError>,
    {
        let outcome: Result<T, Aborted<E>> = self.conn.immediate_transaction(|conn| {
            let mut store: Store<'_> = Store { conn };
            f(&mut store).map_err(Aborted::Caller)
        });

        outcome.map_err(|aborted| match aborted {
            Aborted::Caller(err) => err,
            Aborted::Store(err) => E::from(PersistenceError::from(err)),
        })
    }
}

impl Store<'_> {
    // ========================================================================
    // Catalog
    // ========================================================================

    /// Creates a racecourse and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns `UniqueViolation` if the name is taken.
    pub fn create_racecourse(&mut self, name: &str) -> Result<i64, PersistenceError> {
        mutations::catalog::insert_racecourse(self.conn, name)
    }

    /// Returns true if the racecourse exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn racecourse_exists(&mut self, racecourse_id: i64) -> Result<bool, PersistenceError> {
        queries::catalog::racecourse_exists(self.conn, racecourse_id)
    }

    /// Registers a bookmaker.
    ///
    /// # Errors
    ///
    /// Returns `UniqueViolation` if the permit number is already registered.
    pub fn register_bookmaker(
        &mut self,
        permit_no: &PermitNumber,
        name: &str,
    ) -> Result<(), PersistenceError> {
        mutations::catalog::insert_bookmaker(self.conn, permit_no, name)
    }

    /// Returns true if a bookmaker holds the permit number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn bookmaker_exists(&mut self, permit_no: &PermitNumber) -> Result<bool, PersistenceError> {
        queries::catalog::bookmaker_exists(self.conn, permit_no)
    }

    /// Creates a pitch and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns `UniqueViolation` for a taken slot or `ForeignKeyViolation`
    /// for an unknown racecourse or owner.
    pub fn create_pitch(
        &mut self,
        racecourse_id: i64,
        owner: &PermitNumber,
        label: &str,
        number: i32,
        seniority_date: Option<Date>,
    ) -> Result<i64, PersistenceError> {
        mutations::catalog::insert_pitch(
            self.conn,
            racecourse_id,
            owner,
            label,
            number,
            seniority_date,
        )
    }

    /// Retrieves a pitch.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_pitch(&mut self, pitch_id: i64) -> Result<Option<Pitch>, PersistenceError> {
        queries::catalog::get_pitch(self.conn, pitch_id)
    }

    /// Lists the pitches a bookmaker currently owns.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_pitches_owned_by(
        &mut self,
        owner: &PermitNumber,
    ) -> Result<Vec<Pitch>, PersistenceError> {
        queries::catalog::list_pitches_owned_by(self.conn, owner)
    }

    /// Creates a fixture and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns `UniqueViolation` if the racecourse already races that day.
    pub fn create_fixture(
        &mut self,
        racecourse_id: i64,
        fixture_date: Date,
    ) -> Result<i64, PersistenceError> {
        mutations::catalog::insert_fixture(self.conn, racecourse_id, fixture_date)
    }

    /// Retrieves a fixture.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_fixture(&mut self, fixture_id: i64) -> Result<Option<Fixture>, PersistenceError> {
        queries::catalog::get_fixture(self.conn, fixture_id)
    }

    /// Lists fixtures on or after `from`, earliest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_fixtures_from(&mut self, from: Date) -> Result<Vec<Fixture>, PersistenceError> {
        queries::catalog::list_fixtures_from(self.conn, from)
    }

    /// Deletes a fixture and, by cascade, its allocations and attendance.
    ///
    /// # Returns
    ///
    /// The number of fixtures deleted (0 or 1).
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_fixture(&mut self, fixture_id: i64) -> Result<usize, PersistenceError> {
        mutations::catalog::delete_fixture(self.conn, fixture_id)
    }

    /// Partially updates a special area's availability.
    ///
    /// # Returns
    ///
    /// The number of fixtures updated (0 or 1).
    ///
    /// # Errors
    ///
    /// Returns an error if no field is supplied or the update fails.
    pub fn update_area_availability(
        &mut self,
        fixture_id: i64,
        kind: AreaKind,
        available: Option<bool>,
        number_of_pitches: Option<u32>,
    ) -> Result<usize, PersistenceError> {
        mutations::catalog::update_area_availability(
            self.conn,
            fixture_id,
            kind,
            available,
            number_of_pitches,
        )
    }

    // ========================================================================
    // Allocations
    // ========================================================================

    /// Retrieves the stored allocation record, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_allocation(
        &mut self,
        track: Track,
        fixture_id: i64,
        pitch_id: i64,
    ) -> Result<Option<AllocationRecord>, PersistenceError> {
        queries::allocations::get_allocation(self.conn, track, fixture_id, pitch_id)
    }

    /// Lists stored allocation records on a track for the given pitches.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_allocations_for_pitches(
        &mut self,
        track: Track,
        pitch_ids: &[i64],
    ) -> Result<Vec<AllocationRecord>, PersistenceError> {
        queries::allocations::list_allocations_for_pitches(self.conn, track, pitch_ids)
    }

    /// Lists every pitch at a fixture with its record on a track.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_fixture_allocations(
        &mut self,
        track: Track,
        fixture: &Fixture,
        filter: AllocationFilter,
    ) -> Result<Vec<PitchAllocation>, PersistenceError> {
        queries::allocations::list_fixture_allocations(self.conn, track, fixture, filter)
    }

    /// Deletes the allocation record for a key.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn clear_allocation(&mut self, key: &AllocationKey) -> Result<usize, PersistenceError> {
        mutations::allocations::clear_allocation(self.conn, key)
    }

    /// Upserts the participation status.
    ///
    /// # Errors
    ///
    /// Returns an error if the upsert fails.
    pub fn upsert_status(
        &mut self,
        key: &AllocationKey,
        permit_no: &PermitNumber,
        status: ParticipationStatus,
        updated_at: OffsetDateTime,
    ) -> Result<(), PersistenceError> {
        mutations::allocations::upsert_status(self.conn, key, permit_no, status, updated_at)
    }

    /// Upserts the area placement.
    ///
    /// # Errors
    ///
    /// Returns an error if the upsert fails.
    pub fn upsert_location(
        &mut self,
        key: &AllocationKey,
        location: AreaPlacement,
    ) -> Result<(), PersistenceError> {
        mutations::allocations::upsert_location(self.conn, key, location)
    }

    /// Upserts the attendance mark.
    ///
    /// # Errors
    ///
    /// Returns an error if the upsert fails.
    pub fn upsert_attendance_mark(
        &mut self,
        key: &AllocationKey,
        attendance: AttendanceMark,
    ) -> Result<(), PersistenceError> {
        mutations::allocations::upsert_attendance_mark(self.conn, key, attendance)
    }

    // ========================================================================
    // Attendance
    // ========================================================================

    /// Replaces a fixture's attendance roster on a track.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails; the prior roster is kept.
    pub fn replace_attendance(
        &mut self,
        track: Track,
        fixture_id: i64,
        attendees: &[Attendee],
        attended_at: OffsetDateTime,
    ) -> Result<usize, PersistenceError> {
        mutations::attendance::replace_attendance(
            self.conn,
            track,
            fixture_id,
            attendees,
            attended_at,
        )
    }

    /// Lists a fixture's attendance roster on a track.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_attendance(
        &mut self,
        track: Track,
        fixture_id: i64,
    ) -> Result<Vec<AttendanceEntry>, PersistenceError> {
        queries::attendance::list_attendance(self.conn, track, fixture_id)
    }

    // ========================================================================
    // Transfers
    // ========================================================================

    /// Transfers a pitch and appends the ledger entry.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown pitch, `ForeignKeyViolation` for an
    /// unregistered new owner, or any database error.
    pub fn record_transfer(
        &mut self,
        pitch_id: i64,
        new_owner: &PermitNumber,
        transfer_value: Option<f64>,
        transfer_date: OffsetDateTime,
    ) -> Result<TransferEntry, PersistenceError> {
        mutations::transfers::record_transfer(
            self.conn,
            pitch_id,
            new_owner,
            transfer_value,
            transfer_date,
        )
    }

    /// Lists a pitch's transfer ledger, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_transfers(&mut self, pitch_id: i64) -> Result<Vec<TransferEntry>, PersistenceError> {
        queries::transfers::list_transfers(self.conn, pitch_id)
    }
}
