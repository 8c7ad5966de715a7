// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use pitchbook_domain::Track;

use super::helpers::{
    Seed, apply_as_owner, create_test_admin, create_test_sis, early, policy, seeded,
    status_request,
};
use crate::{
    AllocationInfo, ApiError, ConfirmAttendanceRequest, SetAreaRequest, confirm_attendance,
    get_allocation, set_area,
};

fn area_request(track: Track, seed: &Seed, pitch_id: i64, area: &str) -> SetAreaRequest {
    SetAreaRequest {
        track,
        fixture_id: seed.fixture_id,
        pitch_id,
        racecourse_id: seed.racecourse_id,
        area: area.to_string(),
    }
}

#[test]
fn test_unrecorded_pitch_reads_as_defaults() {
    let (mut persistence, seed) = seeded();

    let record: AllocationInfo = get_allocation(
        &mut persistence,
        Track::Premium,
        seed.fixture_id,
        seed.pitch_ids[0],
        &policy(),
    )
    .unwrap();

    assert_eq!(record.status, "Not Applying");
    assert_eq!(record.area, "Main Ring");
    assert_eq!(record.attendance, "Did Not Attend");
    assert_eq!(record.permit_no, None);
    assert_eq!(record.updated_at, None);
}

#[test]
fn test_area_and_status_writes_do_not_clobber_each_other() {
    let (mut persistence, seed) = seeded();
    let pitch_id: i64 = seed.pitch_ids[0];

    let apply = status_request(Track::Premium, &seed, pitch_id, "Applied");
    apply_as_owner(&mut persistence, &apply, early()).unwrap();

    set_area(
        &mut persistence,
        &area_request(Track::Premium, &seed, pitch_id, "Premium Area"),
        &create_test_admin(),
        &policy(),
    )
    .unwrap();

    let record: AllocationInfo =
        get_allocation(&mut persistence, Track::Premium, seed.fixture_id, pitch_id, &policy())
            .unwrap();
    assert_eq!(record.status, "Applied");
    assert_eq!(record.area, "Premium Area");
    assert_eq!(record.updated_at, Some(early()));

    // A later status write leaves the placement alone
    let withdraw = status_request(Track::Premium, &seed, pitch_id, "Not Applying");
    apply_as_owner(&mut persistence, &withdraw, early()).unwrap();
    let record: AllocationInfo =
        get_allocation(&mut persistence, Track::Premium, seed.fixture_id, pitch_id, &policy())
            .unwrap();
    assert_eq!(record.status, "Not Applying");
    assert_eq!(record.area, "Premium Area");
}

#[test]
fn test_area_placement_on_unrecorded_pitch_keeps_default_status() {
    let (mut persistence, seed) = seeded();
    let pitch_id: i64 = seed.pitch_ids[1];

    let response = set_area(
        &mut persistence,
        &area_request(Track::Premium, &seed, pitch_id, "Premium Area"),
        &create_test_admin(),
        &policy(),
    )
    .unwrap();
    assert_eq!(response.area, "Premium Area");

    let record: AllocationInfo =
        get_allocation(&mut persistence, Track::Premium, seed.fixture_id, pitch_id, &policy())
            .unwrap();
    assert_eq!(record.status, "Not Applying");
    assert_eq!(record.permit_no, None);
    assert_eq!(record.updated_at, None);
}

#[test]
fn test_area_label_must_belong_to_the_track() {
    let (mut persistence, seed) = seeded();

    for (track, area) in [
        (Track::Plain, "Premium Area"),
        (Track::Premium, "Corporate Area"),
        (Track::Corporate, "VIP Lounge"),
    ] {
        let result = set_area(
            &mut persistence,
            &area_request(track, &seed, seed.pitch_ids[0], area),
            &create_test_admin(),
            &policy(),
        );
        assert!(
            matches!(result, Err(ApiError::InvalidInput { ref field, .. }) if field == "area"),
            "{track} accepted {area}"
        );
    }

    assert!(
        set_area(
            &mut persistence,
            &area_request(Track::Plain, &seed, seed.pitch_ids[0], "Main Ring"),
            &create_test_admin(),
            &policy(),
        )
        .is_ok()
    );
}

#[test]
fn test_area_placement_requires_matching_racecourse() {
    let (mut persistence, seed) = seeded();
    let mut request = area_request(Track::Premium, &seed, seed.pitch_ids[0], "Premium Area");
    request.racecourse_id += 1;

    let result = set_area(&mut persistence, &request, &create_test_admin(), &policy());

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_confirm_attendance_writes_only_the_mark() {
    let (mut persistence, seed) = seeded();
    let pitch_id: i64 = seed.pitch_ids[2];

    let apply = status_request(Track::Plain, &seed, pitch_id, "Applied");
    apply_as_owner(&mut persistence, &apply, early()).unwrap();

    let response = confirm_attendance(
        &mut persistence,
        &ConfirmAttendanceRequest {
            track: Track::Plain,
            fixture_id: seed.fixture_id,
            pitch_id,
            attendance: String::from("Attended"),
        },
        &create_test_sis(),
    )
    .unwrap();
    assert_eq!(response.attendance, "Attended");

    let record: AllocationInfo =
        get_allocation(&mut persistence, Track::Plain, seed.fixture_id, pitch_id, &policy())
            .unwrap();
    assert_eq!(record.attendance, "Attended");
    assert_eq!(record.status, "Applied");
    assert_eq!(record.area, "Main Ring");
}

#[test]
fn test_confirm_attendance_rejects_unknown_label() {
    let (mut persistence, seed) = seeded();

    let result = confirm_attendance(
        &mut persistence,
        &ConfirmAttendanceRequest {
            track: Track::Plain,
            fixture_id: seed.fixture_id,
            pitch_id: seed.pitch_ids[0],
            attendance: String::from("Present"),
        },
        &create_test_sis(),
    );

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "attendance"
    ));
}

#[test]
fn test_confirm_attendance_for_unknown_fixture_is_not_found() {
    let (mut persistence, seed) = seeded();

    let result = confirm_attendance(
        &mut persistence,
        &ConfirmAttendanceRequest {
            track: Track::Plain,
            fixture_id: seed.fixture_id + 100,
            pitch_id: seed.pitch_ids[0],
            attendance: String::from("Attended"),
        },
        &create_test_sis(),
    );

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_confirm_attendance_requires_open_area() {
    let (mut persistence, seed) = seeded();
    let pitch_id: i64 = seed.pitch_ids[0];

    let result = confirm_attendance(
        &mut persistence,
        &ConfirmAttendanceRequest {
            track: Track::Corporate,
            fixture_id: seed.fixture_id,
            pitch_id,
            attendance: String::from("Attended"),
        },
        &create_test_sis(),
    );

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
    let record: AllocationInfo = get_allocation(
        &mut persistence,
        Track::Corporate,
        seed.fixture_id,
        pitch_id,
        &policy(),
    )
    .unwrap();
    assert_eq!(record.attendance, "Did Not Attend");
}
