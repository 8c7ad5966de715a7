// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Handlers assume the caller has already been authorized through
//! [`crate::AuthorizationService`]. The only identity check performed here
//! is pitch ownership for bookmaker status changes.
//!
//! Every read-then-write handler runs inside
//! [`Persistence::immediate_transaction`], so a rejected request leaves the
//! store exactly as it was.

use std::collections::HashMap;

use pitchbook_domain::{
    AllocationPolicy, AllocationRecord, AreaPlacement, AttendanceEntry, AttendanceMark, Attendee,
    AllocationFilter, Fixture, ParticipationStatus, PermitNumber, Pitch, PitchAllocation, Track,
    TrackConfig, TransferEntry,
    Transition, TransitionRequest, apply_deadline, parse_date, validate_attendance_roster,
    validate_transfer_value, validate_transition, withdraw_deadline,
};
use pitchbook_persistence::{AllocationKey, Persistence, Store};
use time::{Date, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::auth::{AuthenticatedActor, Role};
use crate::error::{ApiError, translate_domain_error};
use crate::request_response::{
    AllocationInfo, ApplyStatusRequest, ApplyStatusResponse, AttendanceInfo, BookmakerPitchInfo,
    ConfirmAttendanceRequest, ConfirmAttendanceResponse, CreateFixtureRequest,
    CreateFixtureResponse, CreatePitchRequest, CreatePitchResponse, CreateRacecourseRequest,
    CreateRacecourseResponse, DeleteFixtureResponse, FixtureInfo, FixturePitchInfo,
    GetAttendanceResponse, ListBookmakerPitchesResponse, ListFixtureAllocationsResponse,
    ListFixturesResponse, ListTransfersResponse,
    RegisterBookmakerRequest, RegisterBookmakerResponse, ReplaceAttendanceRequest,
    ReplaceAttendanceResponse, SetAreaRequest, SetAreaResponse, TransferInfo,
    TransferPitchRequest, TransferPitchResponse, UpdateAreaAvailabilityRequest,
    UpdateAreaAvailabilityResponse,
};

/// The message returned for every failed fixture, pitch or ownership
/// lookup on a bookmaker status change.
pub const NOT_FOUND_FOR_BOOKMAKER: &str = "Fixture or pitch not found for this bookmaker";

fn fixture_or_pitch_not_found() -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: String::from("Fixture or pitch"),
        message: String::from(NOT_FOUND_FOR_BOOKMAKER),
    }
}

fn fixture_not_found(fixture_id: i64) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: String::from("Fixture"),
        message: format!("Fixture {fixture_id} not found"),
    }
}

fn pitch_not_found(pitch_id: i64) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: String::from("Pitch"),
        message: format!("Pitch {pitch_id} not found"),
    }
}

fn bookmaker_not_found(permit_no: &PermitNumber) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: String::from("Bookmaker"),
        message: format!("No bookmaker holds permit {permit_no}"),
    }
}

fn area_not_offered(track: Track, fixture: &Fixture) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: String::from("Fixture"),
        message: format!(
            "Fixture {} does not offer the {track} area",
            fixture.fixture_id
        ),
    }
}

fn require_text(field: &str, value: &str) -> Result<String, ApiError> {
    let trimmed: &str = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidInput {
            field: field.to_string(),
            message: format!("{field} cannot be empty"),
        });
    }
    Ok(trimmed.to_string())
}

fn parse_permit(value: &str) -> Result<PermitNumber, ApiError> {
    PermitNumber::new(value).map_err(translate_domain_error)
}

/// Resolves a fixture and a pitch that must race at the same racecourse.
///
/// When `racecourse_id` is supplied it must match as well. The pitch is
/// reported missing when it exists at another racecourse.
fn resolve_fixture_and_pitch(
    store: &mut Store<'_>,
    fixture_id: i64,
    pitch_id: i64,
    racecourse_id: Option<i64>,
) -> Result<(Fixture, Pitch), ApiError> {
    let fixture: Fixture = store
        .get_fixture(fixture_id)?
        .ok_or_else(|| fixture_not_found(fixture_id))?;
    let pitch: Pitch = store
        .get_pitch(pitch_id)?
        .filter(|p| p.racecourse_id == fixture.racecourse_id)
        .ok_or_else(|| pitch_not_found(pitch_id))?;

    if racecourse_id.is_some_and(|id| id != fixture.racecourse_id) {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Pitch"),
            message: format!("Pitch {pitch_id} is not at racecourse for fixture {fixture_id}"),
        });
    }

    Ok((fixture, pitch))
}

const fn allocation_key(track: Track, fixture: &Fixture, pitch: &Pitch) -> AllocationKey {
    AllocationKey {
        track,
        fixture_id: fixture.fixture_id,
        pitch_id: pitch.pitch_id,
        racecourse_id: fixture.racecourse_id,
    }
}

fn fixture_info(fixture: &Fixture) -> FixtureInfo {
    FixtureInfo {
        fixture_id: fixture.fixture_id,
        racecourse_id: fixture.racecourse_id,
        racecourse_name: fixture.racecourse_name.clone(),
        fixture_date: fixture.fixture_date.to_string(),
        premium_area_available: fixture.premium.available(),
        number_of_premium_pitches: fixture.premium.number_of_pitches(),
        corporate_area_available: fixture.corporate.available(),
        number_of_corporate_pitches: fixture.corporate.number_of_pitches(),
    }
}

fn transfer_info(entry: &TransferEntry) -> TransferInfo {
    TransferInfo {
        transfer_id: entry.transfer_id,
        pitch_id: entry.pitch_id,
        old_owner_permit_no: entry.old_owner.to_string(),
        new_owner_permit_no: entry.new_owner.to_string(),
        transfer_value: entry.transfer_value,
        transfer_date: entry.transfer_date,
    }
}

// ============================================================================
// Allocation status
// ============================================================================

/// Applies for, or withdraws from, a pitch at a fixture on one track.
///
/// The requested label is parsed against the track's accepted set, the
/// fixture and pitch are resolved, and the transition is validated against
/// the track's deadlines. Only then is the status upserted. The write
/// touches the status, the acting permit and `updated_at`; the area
/// placement and attendance mark are left as stored.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The status change request
/// * `actor` - The authenticated bookmaker
/// * `policy` - The allocation policy supplying the track configuration
/// * `now` - The instant the request is evaluated at
///
/// # Errors
///
/// Returns an error if:
/// - The status label is not accepted by the track
/// - The fixture or pitch cannot be resolved for this bookmaker
/// - The premium or corporate area is not offered at the fixture
/// - The application or withdrawal deadline has passed
/// - The store fails or stays locked past the busy timeout
pub fn apply_status(
    persistence: &mut Persistence,
    request: &ApplyStatusRequest,
    actor: &AuthenticatedActor,
    policy: &AllocationPolicy,
    now: OffsetDateTime,
) -> Result<ApplyStatusResponse, ApiError> {
    let config: &TrackConfig = policy.config(request.track);
    let requested: ParticipationStatus = config
        .parse_status(&request.status)
        .map_err(translate_domain_error)?;

    persistence.immediate_transaction(
        |store: &mut Store<'_>| -> Result<ApplyStatusResponse, ApiError> {
            // Every lookup failure reads the same so that a bookmaker cannot
            // discover pitches it does not own.
            let (fixture, pitch) = resolve_fixture_and_pitch(
                store,
                request.fixture_id,
                request.pitch_id,
                request.racecourse_id,
            )
            .map_err(|_| fixture_or_pitch_not_found())?;

            if actor.role == Role::Bookmaker && actor.identity != pitch.owner.value() {
                return Err(fixture_or_pitch_not_found());
            }
            if !fixture.is_open_for(request.track) {
                return Err(fixture_or_pitch_not_found());
            }

            let key: AllocationKey = allocation_key(request.track, &fixture, &pitch);
            let stored: Option<AllocationRecord> =
                store.get_allocation(request.track, fixture.fixture_id, pitch.pitch_id)?;
            let inherited: bool = stored
                .as_ref()
                .is_some_and(|record| record.is_held_by_other(&pitch.owner));
            let current: ParticipationStatus = stored
                .filter(|_| !inherited)
                .map_or_else(ParticipationStatus::default, |record| record.status);

            let transition: Transition = validate_transition(
                &TransitionRequest {
                    current,
                    requested,
                    fixture_date: fixture.fixture_date,
                    now,
                },
                config,
                policy.timezone(),
            )
            .map_err(|err| {
                warn!(
                    track = %request.track,
                    fixture_id = fixture.fixture_id,
                    pitch_id = pitch.pitch_id,
                    error = %err,
                    "Rejected status change"
                );
                translate_domain_error(err)
            })?;

            // A record left by the previous owner of a transferred pitch
            // must not carry its placement or mark over to the new owner.
            if inherited {
                store.clear_allocation(&key)?;
            }
            store.upsert_status(&key, &pitch.owner, transition.to, now)?;

            info!(
                track = %request.track,
                fixture_id = fixture.fixture_id,
                pitch_id = pitch.pitch_id,
                permit_no = %pitch.owner,
                from = transition.from.as_str(),
                to = transition.to.as_str(),
                reapplied = transition.is_reapplication(),
                "Updated participation status"
            );

            Ok(ApplyStatusResponse {
                track: request.track,
                fixture_id: fixture.fixture_id,
                pitch_id: pitch.pitch_id,
                status: config.status_label(transition.to).to_string(),
                previous_status: config.status_label(transition.from).to_string(),
                updated_at: now,
                message: format!(
                    "Pitch {}{} is now '{}' for {}",
                    pitch.label,
                    pitch.number,
                    config.status_label(transition.to),
                    fixture.fixture_date
                ),
            })
        },
    )
}

/// Places a pitch in the main ring or in the track's special area.
///
/// Only the area placement is written. A record created by this call
/// carries the default participation status and attendance mark.
///
/// # Errors
///
/// Returns an error if:
/// - The area label is not accepted by the track
/// - The fixture does not exist
/// - The pitch does not exist at the fixture's racecourse
/// - The store fails
pub fn set_area(
    persistence: &mut Persistence,
    request: &SetAreaRequest,
    actor: &AuthenticatedActor,
    policy: &AllocationPolicy,
) -> Result<SetAreaResponse, ApiError> {
    let config: &TrackConfig = policy.config(request.track);
    let placement: AreaPlacement = config
        .parse_area(&request.area)
        .map_err(translate_domain_error)?;

    persistence.immediate_transaction(|store: &mut Store<'_>| -> Result<SetAreaResponse, ApiError> {
        let (fixture, pitch) = resolve_fixture_and_pitch(
            store,
            request.fixture_id,
            request.pitch_id,
            Some(request.racecourse_id),
        )?;

        store.upsert_location(&allocation_key(request.track, &fixture, &pitch), placement)?;

        info!(
            track = %request.track,
            fixture_id = fixture.fixture_id,
            pitch_id = pitch.pitch_id,
            area = placement.as_str(),
            actor = %actor.identity,
            "Updated area placement"
        );

        Ok(SetAreaResponse {
            track: request.track,
            fixture_id: fixture.fixture_id,
            pitch_id: pitch.pitch_id,
            area: config.area_label(placement).to_string(),
            message: format!(
                "Pitch {}{} placed in {}",
                pitch.label,
                pitch.number,
                config.area_label(placement)
            ),
        })
    })
}

/// Marks whether a single pitch was staffed at a fixture.
///
/// # Errors
///
/// Returns an error if:
/// - The attendance label is neither "Attended" nor "Did Not Attend"
/// - The fixture does not exist
/// - The pitch does not exist at the fixture's racecourse
/// - The premium or corporate area is not offered at the fixture
/// - The store fails
pub fn confirm_attendance(
    persistence: &mut Persistence,
    request: &ConfirmAttendanceRequest,
    actor: &AuthenticatedActor,
) -> Result<ConfirmAttendanceResponse, ApiError> {
    let mark: AttendanceMark =
        AttendanceMark::from_label(&request.attendance).map_err(translate_domain_error)?;

    persistence.immediate_transaction(
        |store: &mut Store<'_>| -> Result<ConfirmAttendanceResponse, ApiError> {
            let (fixture, pitch) =
                resolve_fixture_and_pitch(store, request.fixture_id, request.pitch_id, None)?;
            if !fixture.is_open_for(request.track) {
                return Err(area_not_offered(request.track, &fixture));
            }

            store.upsert_attendance_mark(&allocation_key(request.track, &fixture, &pitch), mark)?;

            info!(
                track = %request.track,
                fixture_id = fixture.fixture_id,
                pitch_id = pitch.pitch_id,
                attendance = mark.as_str(),
                actor = %actor.identity,
                "Confirmed attendance"
            );

            Ok(ConfirmAttendanceResponse {
                track: request.track,
                fixture_id: fixture.fixture_id,
                pitch_id: pitch.pitch_id,
                attendance: mark.label().to_string(),
                message: format!("Pitch {}{} marked '{}'", pitch.label, pitch.number, mark.label()),
            })
        },
    )
}

/// Returns the allocation record of a pitch at a fixture.
///
/// A pitch with no stored record, or whose record was written by a
/// previous owner, is reported with every axis at its default.
///
/// # Errors
///
/// Returns an error if the fixture or pitch cannot be resolved, or the
/// store fails.
pub fn get_allocation(
    persistence: &mut Persistence,
    track: Track,
    fixture_id: i64,
    pitch_id: i64,
    policy: &AllocationPolicy,
) -> Result<AllocationInfo, ApiError> {
    let mut store: Store<'_> = persistence.store();
    let (fixture, pitch) = resolve_fixture_and_pitch(&mut store, fixture_id, pitch_id, None)?;

    let record: AllocationRecord = store
        .get_allocation(track, fixture.fixture_id, pitch.pitch_id)?
        .map(|record| record.scoped_to_owner(&pitch.owner))
        .unwrap_or_else(|| {
            AllocationRecord::unrecorded(
                track,
                fixture.fixture_id,
                pitch.pitch_id,
                fixture.racecourse_id,
            )
        });
    debug!(%track, fixture_id, pitch_id, "Read allocation record");

    let config: &TrackConfig = policy.config(track);
    Ok(AllocationInfo {
        track,
        fixture_id: record.fixture_id,
        pitch_id: record.pitch_id,
        racecourse_id: record.racecourse_id,
        permit_no: record.permit_no.map(|p| p.to_string()),
        status: config.status_label(record.status).to_string(),
        area: config.area_label(record.location).to_string(),
        attendance: record.attendance.label().to_string(),
        updated_at: record.updated_at,
    })
}

/// Lists every pitch at a fixture's racecourse with its record on a track.
///
/// This is the officials' working sheet for a fixture: the applicants to
/// place with [`set_area`], the pitches already placed in the special
/// area, or the pitches marked as attended, depending on `filter`.
/// Unrecorded pitches carry the default record and are included by
/// [`AllocationFilter::All`].
///
/// # Errors
///
/// Returns an error if:
/// - The fixture does not exist
/// - The premium or corporate area is not offered at the fixture
/// - The store fails
pub fn list_fixture_allocations(
    persistence: &mut Persistence,
    track: Track,
    fixture_id: i64,
    filter: AllocationFilter,
    policy: &AllocationPolicy,
) -> Result<ListFixtureAllocationsResponse, ApiError> {
    let mut store: Store<'_> = persistence.store();
    let fixture: Fixture = store
        .get_fixture(fixture_id)?
        .ok_or_else(|| fixture_not_found(fixture_id))?;
    if !fixture.is_open_for(track) {
        return Err(area_not_offered(track, &fixture));
    }

    let entries: Vec<PitchAllocation> = store.list_fixture_allocations(track, &fixture, filter)?;
    debug!(
        %track,
        fixture_id,
        filter = filter.as_str(),
        count = entries.len(),
        "Listed fixture allocations"
    );

    let config: &TrackConfig = policy.config(track);
    let pitches: Vec<FixturePitchInfo> = entries
        .into_iter()
        .map(|entry| FixturePitchInfo {
            pitch_id: entry.pitch.pitch_id,
            pitch_label: entry.pitch.label,
            pitch_number: entry.pitch.number,
            owner_permit_no: entry.pitch.owner.to_string(),
            owner_name: entry.owner_name,
            status: config.status_label(entry.record.status).to_string(),
            area: config.area_label(entry.record.location).to_string(),
            attendance: entry.record.attendance.label().to_string(),
            updated_at: entry.record.updated_at,
        })
        .collect();

    Ok(ListFixtureAllocationsResponse {
        track,
        fixture: fixture_info(&fixture),
        filter,
        pitches,
    })
}

// ============================================================================
// Attendance rosters
// ============================================================================

/// Replaces the attendance roster of a fixture on one track.
///
/// The roster is validated before the store is touched. Each attendee's
/// pitch must race at the fixture's racecourse and each permit must
/// belong to a registered bookmaker. The delete and every insert share one
/// transaction, so any failure keeps the prior roster.
///
/// # Errors
///
/// Returns an error if:
/// - The roster is empty or names a pitch twice
/// - A permit number is blank
/// - The fixture does not exist
/// - A pitch or bookmaker cannot be resolved
/// - The store fails
pub fn replace_attendance(
    persistence: &mut Persistence,
    request: &ReplaceAttendanceRequest,
    actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<ReplaceAttendanceResponse, ApiError> {
    let attendees: Vec<Attendee> = request
        .attendees
        .iter()
        .map(|input| {
            Ok(Attendee {
                pitch_id: input.pitch_id,
                bookmaker_permit_no: parse_permit(&input.bookmaker_permit_no)?,
            })
        })
        .collect::<Result<Vec<Attendee>, ApiError>>()?;
    validate_attendance_roster(&attendees).map_err(translate_domain_error)?;

    persistence.immediate_transaction(
        |store: &mut Store<'_>| -> Result<ReplaceAttendanceResponse, ApiError> {
            let fixture: Fixture = store
                .get_fixture(request.fixture_id)?
                .ok_or_else(|| fixture_not_found(request.fixture_id))?;

            for attendee in &attendees {
                let at_racecourse: bool = store
                    .get_pitch(attendee.pitch_id)?
                    .is_some_and(|p| p.racecourse_id == fixture.racecourse_id);
                if !at_racecourse {
                    return Err(pitch_not_found(attendee.pitch_id));
                }
                if !store.bookmaker_exists(&attendee.bookmaker_permit_no)? {
                    return Err(bookmaker_not_found(&attendee.bookmaker_permit_no));
                }
            }

            let recorded: usize =
                store.replace_attendance(request.track, fixture.fixture_id, &attendees, now)?;

            info!(
                track = %request.track,
                fixture_id = fixture.fixture_id,
                recorded,
                actor = %actor.identity,
                "Replaced attendance roster"
            );

            Ok(ReplaceAttendanceResponse {
                track: request.track,
                fixture_id: fixture.fixture_id,
                recorded,
                message: format!(
                    "Recorded {recorded} attendees for {} on {}",
                    fixture.racecourse_name, fixture.fixture_date
                ),
            })
        },
    )
}

/// Returns the attendance roster of a fixture on one track.
///
/// # Errors
///
/// Returns an error if the fixture does not exist or the store fails.
pub fn get_attendance(
    persistence: &mut Persistence,
    track: Track,
    fixture_id: i64,
) -> Result<GetAttendanceResponse, ApiError> {
    let mut store: Store<'_> = persistence.store();
    if store.get_fixture(fixture_id)?.is_none() {
        return Err(fixture_not_found(fixture_id));
    }

    let entries: Vec<AttendanceEntry> = store.list_attendance(track, fixture_id)?;
    debug!(%track, fixture_id, count = entries.len(), "Read attendance roster");

    Ok(GetAttendanceResponse {
        track,
        fixture_id,
        attendees: entries
            .into_iter()
            .map(|entry| AttendanceInfo {
                pitch_id: entry.pitch_id,
                bookmaker_permit_no: entry.bookmaker_permit_no.to_string(),
                attended_at: entry.attended_at,
            })
            .collect(),
    })
}

// ============================================================================
// Transfers
// ============================================================================

/// Transfers a pitch to another bookmaker and appends a ledger entry.
///
/// An absent transfer value is recorded as absent.
///
/// # Errors
///
/// Returns an error if:
/// - The new owner's permit number is blank
/// - The transfer value is negative or not finite
/// - The pitch does not exist
/// - The new owner is not a registered bookmaker
/// - The store fails
pub fn transfer_pitch(
    persistence: &mut Persistence,
    request: &TransferPitchRequest,
    actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<TransferPitchResponse, ApiError> {
    let new_owner: PermitNumber = parse_permit(&request.new_owner_permit_no).map_err(|_| {
        ApiError::InvalidInput {
            field: String::from("new_owner_permit_no"),
            message: String::from("New owner permit number is required"),
        }
    })?;
    let transfer_value: Option<f64> =
        validate_transfer_value(request.transfer_value).map_err(translate_domain_error)?;

    persistence.immediate_transaction(
        |store: &mut Store<'_>| -> Result<TransferPitchResponse, ApiError> {
            if store.get_pitch(request.pitch_id)?.is_none() {
                return Err(pitch_not_found(request.pitch_id));
            }
            if !store.bookmaker_exists(&new_owner)? {
                return Err(bookmaker_not_found(&new_owner));
            }

            let entry: TransferEntry =
                store.record_transfer(request.pitch_id, &new_owner, transfer_value, now)?;

            info!(
                pitch_id = entry.pitch_id,
                transfer_id = entry.transfer_id,
                old_owner = %entry.old_owner,
                new_owner = %entry.new_owner,
                actor = %actor.identity,
                "Transferred pitch"
            );

            Ok(TransferPitchResponse {
                message: format!(
                    "Pitch {} transferred from {} to {}",
                    entry.pitch_id, entry.old_owner, entry.new_owner
                ),
                transfer: transfer_info(&entry),
            })
        },
    )
}

/// Lists a pitch's transfer ledger, oldest first.
///
/// # Errors
///
/// Returns an error if the pitch does not exist or the store fails.
pub fn list_transfers(
    persistence: &mut Persistence,
    pitch_id: i64,
) -> Result<ListTransfersResponse, ApiError> {
    let mut store: Store<'_> = persistence.store();
    if store.get_pitch(pitch_id)?.is_none() {
        return Err(pitch_not_found(pitch_id));
    }

    let transfers: Vec<TransferInfo> = store
        .list_transfers(pitch_id)?
        .iter()
        .map(transfer_info)
        .collect();

    Ok(ListTransfersResponse {
        pitch_id,
        transfers,
    })
}

// ============================================================================
// Catalog
// ============================================================================

/// Creates a racecourse.
///
/// # Errors
///
/// Returns an error if the name is blank or already taken.
pub fn create_racecourse(
    persistence: &mut Persistence,
    request: &CreateRacecourseRequest,
) -> Result<CreateRacecourseResponse, ApiError> {
    let name: String = require_text("name", &request.name)?;
    let racecourse_id: i64 = persistence.store().create_racecourse(&name)?;

    info!(racecourse_id, name = %name, "Created racecourse");

    Ok(CreateRacecourseResponse {
        racecourse_id,
        message: format!("Racecourse '{name}' created"),
        name,
    })
}

/// Registers a bookmaker under a permit number.
///
/// # Errors
///
/// Returns an error if the permit number or name is blank, or the permit
/// number is already registered.
pub fn register_bookmaker(
    persistence: &mut Persistence,
    request: &RegisterBookmakerRequest,
) -> Result<RegisterBookmakerResponse, ApiError> {
    let permit_no: PermitNumber = parse_permit(&request.permit_no)?;
    let name: String = require_text("name", &request.name)?;
    persistence.store().register_bookmaker(&permit_no, &name)?;

    info!(permit_no = %permit_no, "Registered bookmaker");

    Ok(RegisterBookmakerResponse {
        message: format!("Bookmaker {permit_no} registered"),
        permit_no: permit_no.to_string(),
        name,
    })
}

/// Creates a pitch at a racecourse.
///
/// # Errors
///
/// Returns an error if:
/// - The label or owner permit number is blank
/// - The seniority date is not a valid `YYYY-MM-DD` date
/// - The racecourse or owner does not exist
/// - The label and number are already taken at the racecourse
pub fn create_pitch(
    persistence: &mut Persistence,
    request: &CreatePitchRequest,
) -> Result<CreatePitchResponse, ApiError> {
    let owner: PermitNumber = parse_permit(&request.owner_permit_no)?;
    let label: String = require_text("label", &request.label)?;
    let seniority_date: Option<Date> = request
        .seniority_date
        .as_deref()
        .map(parse_date)
        .transpose()
        .map_err(translate_domain_error)?;

    persistence.immediate_transaction(
        |store: &mut Store<'_>| -> Result<CreatePitchResponse, ApiError> {
            if !store.racecourse_exists(request.racecourse_id)? {
                return Err(ApiError::ResourceNotFound {
                    resource_type: String::from("Racecourse"),
                    message: format!("Racecourse {} not found", request.racecourse_id),
                });
            }
            if !store.bookmaker_exists(&owner)? {
                return Err(bookmaker_not_found(&owner));
            }

            let pitch_id: i64 = store.create_pitch(
                request.racecourse_id,
                &owner,
                &label,
                request.number,
                seniority_date,
            )?;

            info!(pitch_id, racecourse_id = request.racecourse_id, owner = %owner, "Created pitch");

            Ok(CreatePitchResponse {
                pitch_id,
                racecourse_id: request.racecourse_id,
                owner_permit_no: owner.to_string(),
                message: format!("Pitch {label}{} created", request.number),
                label,
                number: request.number,
            })
        },
    )
}

/// Creates a fixture for a racecourse on a date.
///
/// Both special areas start closed.
///
/// # Errors
///
/// Returns an error if:
/// - The date is not a valid `YYYY-MM-DD` date
/// - The racecourse does not exist
/// - The racecourse already has a fixture on that date
pub fn create_fixture(
    persistence: &mut Persistence,
    request: &CreateFixtureRequest,
) -> Result<CreateFixtureResponse, ApiError> {
    let fixture_date: Date = parse_date(&request.fixture_date).map_err(translate_domain_error)?;

    persistence.immediate_transaction(
        |store: &mut Store<'_>| -> Result<CreateFixtureResponse, ApiError> {
            if !store.racecourse_exists(request.racecourse_id)? {
                return Err(ApiError::ResourceNotFound {
                    resource_type: String::from("Racecourse"),
                    message: format!("Racecourse {} not found", request.racecourse_id),
                });
            }

            let fixture_id: i64 = store
                .create_fixture(request.racecourse_id, fixture_date)
                .map_err(|err| match ApiError::from(err) {
                    ApiError::Conflict { .. } => ApiError::Conflict {
                        message: format!(
                            "Racecourse {} already has a fixture on {fixture_date}",
                            request.racecourse_id
                        ),
                    },
                    other => other,
                })?;
            let fixture: Fixture = store
                .get_fixture(fixture_id)?
                .ok_or_else(|| fixture_not_found(fixture_id))?;

            info!(fixture_id, racecourse_id = fixture.racecourse_id, date = %fixture_date, "Created fixture");

            Ok(CreateFixtureResponse {
                message: format!(
                    "Fixture created for {} on {fixture_date}",
                    fixture.racecourse_name
                ),
                fixture: fixture_info(&fixture),
            })
        },
    )
}

/// Deletes a fixture along with its allocation records and rosters.
///
/// # Errors
///
/// Returns an error if the fixture does not exist or the store fails.
pub fn delete_fixture(
    persistence: &mut Persistence,
    fixture_id: i64,
) -> Result<DeleteFixtureResponse, ApiError> {
    let deleted: usize = persistence.store().delete_fixture(fixture_id)?;
    if deleted == 0 {
        return Err(fixture_not_found(fixture_id));
    }

    info!(fixture_id, "Deleted fixture");

    Ok(DeleteFixtureResponse {
        fixture_id,
        message: format!("Fixture {fixture_id} deleted"),
    })
}

/// Partially updates whether a fixture offers a special area and how many
/// pitches it holds.
///
/// # Errors
///
/// Returns an error if neither field is supplied, the fixture does not
/// exist, or the store fails.
pub fn update_area_availability(
    persistence: &mut Persistence,
    request: &UpdateAreaAvailabilityRequest,
) -> Result<UpdateAreaAvailabilityResponse, ApiError> {
    if request.available.is_none() && request.number_of_pitches.is_none() {
        return Err(ApiError::InvalidInput {
            field: String::from("area"),
            message: String::from("No fields to update"),
        });
    }
    if request
        .number_of_pitches
        .is_some_and(|count| i32::try_from(count).is_err())
    {
        return Err(ApiError::InvalidInput {
            field: String::from("number_of_pitches"),
            message: format!("number_of_pitches cannot exceed {}", i32::MAX),
        });
    }

    persistence.immediate_transaction(
        |store: &mut Store<'_>| -> Result<UpdateAreaAvailabilityResponse, ApiError> {
            let updated: usize = store.update_area_availability(
                request.fixture_id,
                request.area,
                request.available,
                request.number_of_pitches,
            )?;
            if updated == 0 {
                return Err(fixture_not_found(request.fixture_id));
            }
            let fixture: Fixture = store
                .get_fixture(request.fixture_id)?
                .ok_or_else(|| fixture_not_found(request.fixture_id))?;

            info!(
                fixture_id = fixture.fixture_id,
                area = request.area.label(),
                available = fixture.area(request.area).available(),
                number_of_pitches = fixture.area(request.area).number_of_pitches(),
                "Updated area availability"
            );

            Ok(UpdateAreaAvailabilityResponse {
                message: format!(
                    "{} updated for fixture {}",
                    request.area.label(),
                    fixture.fixture_id
                ),
                fixture: fixture_info(&fixture),
            })
        },
    )
}

/// Lists fixtures dated `today` or later, earliest first.
///
/// # Errors
///
/// Returns an error if the store fails.
pub fn list_upcoming_fixtures(
    persistence: &mut Persistence,
    today: Date,
) -> Result<ListFixturesResponse, ApiError> {
    let fixtures: Vec<FixtureInfo> = persistence
        .store()
        .list_fixtures_from(today)?
        .iter()
        .map(fixture_info)
        .collect();
    debug!(%today, count = fixtures.len(), "Listed upcoming fixtures");

    Ok(ListFixturesResponse { fixtures })
}

/// Lists the actor's pitches at every upcoming fixture on a track.
///
/// Each entry carries the stored state, or the defaults when nothing has
/// been recorded, and the deadlines for changing the status. Premium and
/// corporate listings only include fixtures that offer the area.
///
/// # Errors
///
/// Returns an error if the actor's identity is not a valid permit number,
/// a deadline cannot be resolved, or the store fails.
pub fn list_bookmaker_pitches(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    track: Track,
    policy: &AllocationPolicy,
    today: Date,
) -> Result<ListBookmakerPitchesResponse, ApiError> {
    let permit_no: PermitNumber = parse_permit(&actor.identity)?;
    let config: &TrackConfig = policy.config(track);

    let mut store: Store<'_> = persistence.store();
    let pitches: Vec<Pitch> = store.list_pitches_owned_by(&permit_no)?;
    let pitch_ids: Vec<i64> = pitches.iter().map(|p| p.pitch_id).collect();
    let fixtures: Vec<Fixture> = store.list_fixtures_from(today)?;
    let records: HashMap<(i64, i64), AllocationRecord> = store
        .list_allocations_for_pitches(track, &pitch_ids)?
        .into_iter()
        .map(|record| ((record.fixture_id, record.pitch_id), record))
        .collect();

    let mut entries: Vec<BookmakerPitchInfo> = Vec::new();
    for fixture in fixtures.iter().filter(|f| f.is_open_for(track)) {
        let apply_by: String = apply_deadline(fixture.fixture_date, config, policy.timezone())
            .map_err(translate_domain_error)?
            .to_rfc3339();
        let withdraw_by: String =
            withdraw_deadline(fixture.fixture_date, config, policy.timezone())
                .map_err(translate_domain_error)?
                .to_rfc3339();

        for pitch in pitches
            .iter()
            .filter(|p| p.racecourse_id == fixture.racecourse_id)
        {
            let (status, location, attendance) = records
                .get(&(fixture.fixture_id, pitch.pitch_id))
                .filter(|r| !r.is_held_by_other(&pitch.owner))
                .map_or_else(Default::default, |r| (r.status, r.location, r.attendance));

            entries.push(BookmakerPitchInfo {
                fixture_id: fixture.fixture_id,
                fixture_date: fixture.fixture_date.to_string(),
                racecourse_name: fixture.racecourse_name.clone(),
                pitch_id: pitch.pitch_id,
                pitch_label: pitch.label.clone(),
                pitch_number: pitch.number,
                status: config.status_label(status).to_string(),
                area: config.area_label(location).to_string(),
                attendance: attendance.label().to_string(),
                apply_deadline: apply_by.clone(),
                withdraw_deadline: withdraw_by.clone(),
            });
        }
    }
    debug!(permit_no = %permit_no, %track, count = entries.len(), "Listed bookmaker pitches");

    Ok(ListBookmakerPitchesResponse {
        permit_no: permit_no.to_string(),
        track,
        pitches: entries,
    })
}
