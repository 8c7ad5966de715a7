// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Status, area and attendance values travel as the display labels of
//! the track they belong to ("Applied", "Not Working", "Premium Area").
//! Timestamps are RFC 3339 and dates are `YYYY-MM-DD`.

use pitchbook_domain::{AllocationFilter, AreaKind, Track};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// API request to change a pitch's participation status at a fixture.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApplyStatusRequest {
    /// The track the status belongs to.
    pub track: Track,
    /// The fixture.
    pub fixture_id: i64,
    /// The pitch.
    pub pitch_id: i64,
    /// The racecourse the caller believes the pitch is at, if supplied.
    pub racecourse_id: Option<i64>,
    /// The requested status label.
    pub status: String,
}

/// API response for a successful status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyStatusResponse {
    pub track: Track,
    pub fixture_id: i64,
    pub pitch_id: i64,
    /// The stored status label.
    pub status: String,
    /// The status label before the change.
    pub previous_status: String,
    /// When the status was written.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    /// A success message.
    pub message: String,
}

/// API request to place a pitch in the main ring or the track's area.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SetAreaRequest {
    pub track: Track,
    pub fixture_id: i64,
    pub pitch_id: i64,
    pub racecourse_id: i64,
    /// "Main Ring" or the track's special area label.
    pub area: String,
}

/// API response for a successful area reassignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetAreaResponse {
    pub track: Track,
    pub fixture_id: i64,
    pub pitch_id: i64,
    /// The stored area label.
    pub area: String,
    /// A success message.
    pub message: String,
}

/// API request to mark a single pitch's attendance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConfirmAttendanceRequest {
    pub track: Track,
    pub fixture_id: i64,
    pub pitch_id: i64,
    /// "Attended" or "Did Not Attend".
    pub attendance: String,
}

/// API response for a confirmed attendance mark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmAttendanceResponse {
    pub track: Track,
    pub fixture_id: i64,
    pub pitch_id: i64,
    pub attendance: String,
    /// A success message.
    pub message: String,
}

/// One line of an attendance roster as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendeeInput {
    pub pitch_id: i64,
    pub bookmaker_permit_no: String,
}

/// API request to replace a fixture's attendance roster.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReplaceAttendanceRequest {
    pub track: Track,
    pub fixture_id: i64,
    pub attendees: Vec<AttendeeInput>,
}

/// API response for a replaced roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceAttendanceResponse {
    pub track: Track,
    pub fixture_id: i64,
    /// The number of attendees written.
    pub recorded: usize,
    /// A success message.
    pub message: String,
}

/// A stored roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceInfo {
    pub pitch_id: i64,
    pub bookmaker_permit_no: String,
    #[serde(with = "time::serde::rfc3339")]
    pub attended_at: OffsetDateTime,
}

/// API response listing a fixture's roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetAttendanceResponse {
    pub track: Track,
    pub fixture_id: i64,
    pub attendees: Vec<AttendanceInfo>,
}

/// API request to transfer a pitch to another bookmaker.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransferPitchRequest {
    pub pitch_id: i64,
    pub new_owner_permit_no: String,
    /// The agreed value, if any. Absent is recorded as absent, not zero.
    pub transfer_value: Option<f64>,
}

/// A ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferInfo {
    pub transfer_id: i64,
    pub pitch_id: i64,
    pub old_owner_permit_no: String,
    pub new_owner_permit_no: String,
    pub transfer_value: Option<f64>,
    #[serde(with = "time::serde::rfc3339")]
    pub transfer_date: OffsetDateTime,
}

/// API response for a completed transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferPitchResponse {
    pub transfer: TransferInfo,
    /// A success message.
    pub message: String,
}

/// API response listing a pitch's transfer history, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListTransfersResponse {
    pub pitch_id: i64,
    pub transfers: Vec<TransferInfo>,
}

/// API request to create a racecourse.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateRacecourseRequest {
    pub name: String,
}

/// API response for a created racecourse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRacecourseResponse {
    pub racecourse_id: i64,
    pub name: String,
    /// A success message.
    pub message: String,
}

/// API request to register a bookmaker.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterBookmakerRequest {
    pub permit_no: String,
    pub name: String,
}

/// API response for a registered bookmaker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterBookmakerResponse {
    pub permit_no: String,
    pub name: String,
    /// A success message.
    pub message: String,
}

/// API request to create a pitch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatePitchRequest {
    pub racecourse_id: i64,
    pub owner_permit_no: String,
    pub label: String,
    pub number: i32,
    /// Optional seniority date (`YYYY-MM-DD`).
    pub seniority_date: Option<String>,
}

/// API response for a created pitch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePitchResponse {
    pub pitch_id: i64,
    pub racecourse_id: i64,
    pub owner_permit_no: String,
    pub label: String,
    pub number: i32,
    /// A success message.
    pub message: String,
}

/// API request to create a fixture.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateFixtureRequest {
    pub racecourse_id: i64,
    /// The fixture date (`YYYY-MM-DD`).
    pub fixture_date: String,
}

/// API response for a created fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateFixtureResponse {
    pub fixture: FixtureInfo,
    /// A success message.
    pub message: String,
}

/// API response for a deleted fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteFixtureResponse {
    pub fixture_id: i64,
    /// A success message.
    pub message: String,
}

/// API request to change one special area's availability.
///
/// Omitted fields keep their stored values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateAreaAvailabilityRequest {
    pub fixture_id: i64,
    pub area: AreaKind,
    pub available: Option<bool>,
    pub number_of_pitches: Option<u32>,
}

/// API response for an area availability change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAreaAvailabilityResponse {
    pub fixture: FixtureInfo,
    /// A success message.
    pub message: String,
}

/// A fixture with its area availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureInfo {
    pub fixture_id: i64,
    pub racecourse_id: i64,
    pub racecourse_name: String,
    pub fixture_date: String,
    pub premium_area_available: bool,
    pub number_of_premium_pitches: u32,
    pub corporate_area_available: bool,
    pub number_of_corporate_pitches: u32,
}

/// API response listing upcoming fixtures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFixturesResponse {
    pub fixtures: Vec<FixtureInfo>,
}

/// The allocation state of one pitch at one fixture on one track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationInfo {
    pub track: Track,
    pub fixture_id: i64,
    pub pitch_id: i64,
    pub racecourse_id: i64,
    /// The bookmaker who last set the status, if any.
    pub permit_no: Option<String>,
    pub status: String,
    pub area: String,
    pub attendance: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

/// One pitch in a fixture-level allocation view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixturePitchInfo {
    pub pitch_id: i64,
    pub pitch_label: String,
    pub pitch_number: i32,
    pub owner_permit_no: String,
    pub owner_name: String,
    pub status: String,
    pub area: String,
    pub attendance: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

/// API response listing the pitches at a fixture on one track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFixtureAllocationsResponse {
    pub track: Track,
    pub fixture: FixtureInfo,
    pub filter: AllocationFilter,
    pub pitches: Vec<FixturePitchInfo>,
}

/// One of a bookmaker's pitches at an upcoming fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmakerPitchInfo {
    pub fixture_id: i64,
    pub fixture_date: String,
    pub racecourse_name: String,
    pub pitch_id: i64,
    pub pitch_label: String,
    pub pitch_number: i32,
    pub status: String,
    pub area: String,
    pub attendance: String,
    /// The last instant at which the pitch may be applied for.
    pub apply_deadline: String,
    /// The last instant at which the pitch may be withdrawn.
    pub withdraw_deadline: String,
}

/// API response listing a bookmaker's pitches on a track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListBookmakerPitchesResponse {
    pub permit_no: String,
    pub track: Track,
    pub pitches: Vec<BookmakerPitchInfo>,
}
