// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use pitchbook_domain::{AllocationPolicy, AreaKind, Track};
use pitchbook_persistence::Persistence;
use time::OffsetDateTime;

use crate::{
    ApplyStatusRequest, ApplyStatusResponse, ApiError, AuthenticatedActor, CreateFixtureRequest,
    CreatePitchRequest, CreateRacecourseRequest, RegisterBookmakerRequest, Role,
    UpdateAreaAvailabilityRequest, apply_status, create_fixture, create_pitch, create_racecourse,
    register_bookmaker, update_area_availability,
};

pub const OWNER: &str = "B1001";
pub const OTHER: &str = "B2002";

/// A Saturday in April, when Dublin is on summer time (UTC+1).
pub const FIXTURE_DATE: &str = "2026-04-18";

/// Identifiers of the catalog rows created by [`seeded`].
pub struct Seed {
    pub racecourse_id: i64,
    pub fixture_id: i64,
    pub pitch_ids: Vec<i64>,
}

pub fn create_test_admin() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("admin-1"), Role::Admin)
}

pub fn create_test_sis() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("sis-1"), Role::Sis)
}

pub fn create_test_bookmaker(permit_no: &str) -> AuthenticatedActor {
    AuthenticatedActor::new(permit_no.to_string(), Role::Bookmaker)
}

pub fn policy() -> AllocationPolicy {
    AllocationPolicy::default()
}

/// Well before every deadline of the seeded fixture.
pub fn early() -> OffsetDateTime {
    time::macros::datetime!(2026-04-01 12:00 UTC)
}

/// Creates one racecourse, two bookmakers and one fixture with the premium
/// area open. The first bookmaker owns three pitches.
pub fn seeded() -> (Persistence, Seed) {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    let racecourse_id: i64 = create_racecourse(
        &mut persistence,
        &CreateRacecourseRequest {
            name: String::from("Punchestown"),
        },
    )
    .unwrap()
    .racecourse_id;

    for (permit_no, name) in [(OWNER, "Red Rum Turf"), (OTHER, "Arkle Odds")] {
        register_bookmaker(
            &mut persistence,
            &RegisterBookmakerRequest {
                permit_no: permit_no.to_string(),
                name: name.to_string(),
            },
        )
        .unwrap();
    }

    let fixture_id: i64 = create_fixture(
        &mut persistence,
        &CreateFixtureRequest {
            racecourse_id,
            fixture_date: String::from(FIXTURE_DATE),
        },
    )
    .unwrap()
    .fixture
    .fixture_id;

    update_area_availability(
        &mut persistence,
        &UpdateAreaAvailabilityRequest {
            fixture_id,
            area: AreaKind::Premium,
            available: Some(true),
            number_of_pitches: Some(4),
        },
    )
    .unwrap();

    let pitch_ids: Vec<i64> = (1..=3)
        .map(|number| {
            create_pitch(
                &mut persistence,
                &CreatePitchRequest {
                    racecourse_id,
                    owner_permit_no: String::from(OWNER),
                    label: String::from("A"),
                    number,
                    seniority_date: Some(String::from("1998-05-01")),
                },
            )
            .unwrap()
            .pitch_id
        })
        .collect();

    (
        persistence,
        Seed {
            racecourse_id,
            fixture_id,
            pitch_ids,
        },
    )
}

pub fn status_request(track: Track, seed: &Seed, pitch_id: i64, status: &str) -> ApplyStatusRequest {
    ApplyStatusRequest {
        track,
        fixture_id: seed.fixture_id,
        pitch_id,
        racecourse_id: Some(seed.racecourse_id),
        status: status.to_string(),
    }
}

/// Applies a status as the owning bookmaker.
pub fn apply_as_owner(
    persistence: &mut Persistence,
    request: &ApplyStatusRequest,
    now: OffsetDateTime,
) -> Result<ApplyStatusResponse, ApiError> {
    apply_status(
        persistence,
        request,
        &create_test_bookmaker(OWNER),
        &policy(),
        now,
    )
}
