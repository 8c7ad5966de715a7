// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod error;
mod status;
mod track;
mod transition;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use status::{AreaPlacement, AttendanceMark, ParticipationStatus};
pub use track::{
    APPLIED_LABEL, AllocationPolicy, AreaKind, DEFAULT_TIMEZONE, MAIN_RING_LABEL, Track,
    TrackConfig,
};
pub use transition::{
    Transition, TransitionRequest, apply_deadline, local_date, validate_transition,
    withdraw_deadline,
};
pub use types::{
    AllocationFilter, AllocationRecord, AreaAvailability, AttendanceEntry, Attendee, Fixture,
    PermitNumber, Pitch, PitchAllocation, TransferEntry,
};
pub use validation::{parse_date, validate_attendance_roster, validate_transfer_value};
