// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::error::DomainError;
use crate::status::{AreaPlacement, AttendanceMark, ParticipationStatus};
use crate::track::{AreaKind, Track};

/// A bookmaker's permit number.
///
/// The permit number is the bookmaker's identity throughout the system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermitNumber {
    value: String,
}

impl PermitNumber {
    /// Creates a new `PermitNumber`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPermitNumber` if the value is empty
    /// after trimming.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let trimmed: &str = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidPermitNumber(String::from(
                "Permit number cannot be empty",
            )));
        }
        Ok(Self {
            value: trimmed.to_string(),
        })
    }

    /// Returns the permit number value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for PermitNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

/// Availability of a special area at a fixture.
///
/// The pitch count is meaningful only while the area is available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaAvailability {
    available: bool,
    number_of_pitches: u32,
}

impl AreaAvailability {
    #[must_use]
    pub const fn new(available: bool, number_of_pitches: u32) -> Self {
        Self {
            available,
            number_of_pitches,
        }
    }

    #[must_use]
    pub const fn available(&self) -> bool {
        self.available
    }

    /// Returns the stored pitch count, whether or not the area is open.
    #[must_use]
    pub const fn number_of_pitches(&self) -> u32 {
        self.number_of_pitches
    }

    /// Returns the pitch count if the area is open.
    #[must_use]
    pub const fn capacity(&self) -> Option<u32> {
        if self.available {
            Some(self.number_of_pitches)
        } else {
            None
        }
    }
}

/// A racing fixture: one racecourse on one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    pub fixture_id: i64,
    pub racecourse_id: i64,
    pub racecourse_name: String,
    pub fixture_date: Date,
    pub premium: AreaAvailability,
    pub corporate: AreaAvailability,
}

impl Fixture {
    /// Returns the availability of a special area.
    #[must_use]
    pub const fn area(&self, kind: AreaKind) -> &AreaAvailability {
        match kind {
            AreaKind::Premium => &self.premium,
            AreaKind::Corporate => &self.corporate,
        }
    }

    /// Returns true if the fixture accepts allocations on the track.
    ///
    /// The plain track is open at every fixture; the premium and corporate
    /// tracks only where the fixture offers the area.
    #[must_use]
    pub const fn is_open_for(&self, track: Track) -> bool {
        match track.area_kind() {
            None => true,
            Some(kind) => self.area(kind).available(),
        }
    }
}

/// A bookmaker's trading slot at a racecourse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pitch {
    pub pitch_id: i64,
    pub racecourse_id: i64,
    pub owner: PermitNumber,
    pub label: String,
    pub number: i32,
    pub seniority_date: Option<Date>,
}

/// The allocation state of one pitch at one fixture on one track.
///
/// A pitch with no stored record is represented by [`AllocationRecord::unrecorded`],
/// with every axis at its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationRecord {
    pub track: Track,
    pub fixture_id: i64,
    pub pitch_id: i64,
    pub racecourse_id: i64,
    /// The bookmaker who last set the participation status.
    pub permit_no: Option<PermitNumber>,
    pub status: ParticipationStatus,
    pub location: AreaPlacement,
    pub attendance: AttendanceMark,
    /// When the participation status was last written.
    pub updated_at: Option<OffsetDateTime>,
}

impl AllocationRecord {
    /// Creates the record implied by the absence of a stored row.
    #[must_use]
    pub fn unrecorded(track: Track, fixture_id: i64, pitch_id: i64, racecourse_id: i64) -> Self {
        Self {
            track,
            fixture_id,
            pitch_id,
            racecourse_id,
            permit_no: None,
            status: ParticipationStatus::default(),
            location: AreaPlacement::default(),
            attendance: AttendanceMark::default(),
            updated_at: None,
        }
    }

    /// Returns true if the status was last set by a bookmaker other than
    /// `owner`.
    ///
    /// After a pitch changes hands, a record written by the previous owner
    /// does not describe the new owner's participation.
    #[must_use]
    pub fn is_held_by_other(&self, owner: &PermitNumber) -> bool {
        self.permit_no.as_ref().is_some_and(|permit| permit != owner)
    }

    /// Scopes a stored record to the pitch's current owner.
    ///
    /// A record left by a previous owner reads as unrecorded.
    #[must_use]
    pub fn scoped_to_owner(self, owner: &PermitNumber) -> Self {
        if self.is_held_by_other(owner) {
            Self::unrecorded(self.track, self.fixture_id, self.pitch_id, self.racecourse_id)
        } else {
            self
        }
    }
}

/// Which pitches a fixture-level allocation view includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationFilter {
    /// Every pitch at the fixture's racecourse.
    #[default]
    All,
    /// Pitches whose owner has applied.
    Applied,
    /// Pitches placed in the special area.
    Awarded,
    /// Pitches marked as attended.
    Attended,
}

impl AllocationFilter {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Applied => "applied",
            Self::Awarded => "awarded",
            Self::Attended => "attended",
        }
    }

    /// Returns true if the view includes a pitch with this record.
    #[must_use]
    pub fn includes(self, record: &AllocationRecord) -> bool {
        match self {
            Self::All => true,
            Self::Applied => record.status == ParticipationStatus::Applied,
            Self::Awarded => record.location == AreaPlacement::SpecialArea,
            Self::Attended => record.attendance == AttendanceMark::Attended,
        }
    }
}

/// A pitch at a fixture with its owner and its allocation record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PitchAllocation {
    pub pitch: Pitch,
    pub owner_name: String,
    pub record: AllocationRecord,
}

/// One line of an attendance roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attendee {
    pub pitch_id: i64,
    pub bookmaker_permit_no: PermitNumber,
}

/// A stored attendance roster entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceEntry {
    pub track: Track,
    pub fixture_id: i64,
    pub pitch_id: i64,
    pub bookmaker_permit_no: PermitNumber,
    pub attended_at: OffsetDateTime,
}

/// An immutable pitch ownership transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferEntry {
    pub transfer_id: i64,
    pub pitch_id: i64,
    pub old_owner: PermitNumber,
    pub new_owner: PermitNumber,
    /// `None` means no value was recorded, which is not the same as zero.
    pub transfer_value: Option<f64>,
    pub transfer_date: OffsetDateTime,
}
