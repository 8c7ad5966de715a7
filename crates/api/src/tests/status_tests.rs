// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use pitchbook_domain::{AreaKind, Track};
use time::macros::datetime;

use super::helpers::{
    OTHER, apply_as_owner, create_test_admin, create_test_bookmaker, early, policy, seeded,
    status_request,
};
use crate::{
    AllocationInfo, ApiError, ApplyStatusResponse, NOT_FOUND_FOR_BOOKMAKER,
    UpdateAreaAvailabilityRequest, apply_status, get_allocation, update_area_availability,
};

fn not_applied_label(track: Track) -> &'static str {
    match track {
        Track::Plain => "Not Working",
        Track::Premium | Track::Corporate => "Not Applying",
    }
}

fn open_corporate(persistence: &mut pitchbook_persistence::Persistence, fixture_id: i64) {
    update_area_availability(
        persistence,
        &UpdateAreaAvailabilityRequest {
            fixture_id,
            area: AreaKind::Corporate,
            available: Some(true),
            number_of_pitches: None,
        },
    )
    .unwrap();
}

fn assert_not_found_for_bookmaker(result: Result<ApplyStatusResponse, ApiError>) {
    match result {
        Err(ApiError::ResourceNotFound { message, .. }) => {
            assert_eq!(message, NOT_FOUND_FOR_BOOKMAKER);
        }
        other => panic!("Expected uniform not-found, got {other:?}"),
    }
}

#[test]
fn test_plain_application_ten_days_out_succeeds() {
    let (mut persistence, seed) = seeded();
    let request = status_request(Track::Plain, &seed, seed.pitch_ids[0], "Applied");

    let response = apply_as_owner(&mut persistence, &request, datetime!(2026-04-08 12:00 UTC))
        .unwrap();

    assert_eq!(response.status, "Applied");
    assert_eq!(response.previous_status, "Not Working");
    assert_eq!(response.updated_at, datetime!(2026-04-08 12:00 UTC));
}

#[test]
fn test_plain_application_four_days_out_is_too_late() {
    let (mut persistence, seed) = seeded();
    let request = status_request(Track::Plain, &seed, seed.pitch_ids[0], "Applied");

    let result = apply_as_owner(&mut persistence, &request, datetime!(2026-04-14 12:00 UTC));

    assert!(matches!(result, Err(ApiError::TooLateToApply { .. })));
}

#[test]
fn test_plain_application_deadline_is_local_midnight() {
    let (mut persistence, seed) = seeded();
    let request = status_request(Track::Plain, &seed, seed.pitch_ids[0], "Applied");

    // Midnight on 13 April in Dublin summer time is 23:00 UTC on 12 April
    assert!(apply_as_owner(&mut persistence, &request, datetime!(2026-04-12 23:00 UTC)).is_ok());
    assert!(matches!(
        apply_as_owner(&mut persistence, &request, datetime!(2026-04-12 23:00:01 UTC)),
        Err(ApiError::TooLateToApply { .. })
    ));
}

#[test]
fn test_late_application_leaves_prior_record_on_every_track() {
    let (mut persistence, seed) = seeded();
    open_corporate(&mut persistence, seed.fixture_id);
    let pitch_id: i64 = seed.pitch_ids[1];

    for track in Track::ALL {
        let withdraw = status_request(track, &seed, pitch_id, not_applied_label(track));
        apply_as_owner(&mut persistence, &withdraw, early()).unwrap();

        let apply = status_request(track, &seed, pitch_id, "Applied");
        let result = apply_as_owner(&mut persistence, &apply, datetime!(2026-04-17 12:00 UTC));
        assert!(
            matches!(result, Err(ApiError::TooLateToApply { .. })),
            "{track}: {result:?}"
        );

        let record: AllocationInfo =
            get_allocation(&mut persistence, track, seed.fixture_id, pitch_id, &policy()).unwrap();
        assert_eq!(record.status, not_applied_label(track));
        assert_eq!(record.updated_at, Some(early()));
    }
}

#[test]
fn test_late_withdrawal_is_rejected_on_every_track() {
    let (mut persistence, seed) = seeded();
    open_corporate(&mut persistence, seed.fixture_id);
    let pitch_id: i64 = seed.pitch_ids[0];

    for track in Track::ALL {
        let apply = status_request(track, &seed, pitch_id, "Applied");
        apply_as_owner(&mut persistence, &apply, early()).unwrap();

        // Past 18:00 and 09:00 Irish summer time on the fixture day
        let withdraw = status_request(track, &seed, pitch_id, not_applied_label(track));
        let result = apply_as_owner(&mut persistence, &withdraw, datetime!(2026-04-18 17:30 UTC));
        assert!(
            matches!(result, Err(ApiError::TooLateToWithdraw { .. })),
            "{track}: {result:?}"
        );

        let record: AllocationInfo =
            get_allocation(&mut persistence, track, seed.fixture_id, pitch_id, &policy()).unwrap();
        assert_eq!(record.status, "Applied");
    }
}

#[test]
fn test_withdrawal_deadlines_differ_by_track() {
    let (mut persistence, seed) = seeded();
    let pitch_id: i64 = seed.pitch_ids[0];
    let fixture_day_afternoon = datetime!(2026-04-18 16:59 UTC);

    let plain = status_request(Track::Plain, &seed, pitch_id, "Not Working");
    assert!(apply_as_owner(&mut persistence, &plain, fixture_day_afternoon).is_ok());

    let premium = status_request(Track::Premium, &seed, pitch_id, "Not Applying");
    assert!(matches!(
        apply_as_owner(&mut persistence, &premium, fixture_day_afternoon),
        Err(ApiError::TooLateToWithdraw { .. })
    ));
}

#[test]
fn test_reapplying_same_status_advances_timestamp() {
    let (mut persistence, seed) = seeded();
    let request = status_request(Track::Plain, &seed, seed.pitch_ids[0], "Applied");

    apply_as_owner(&mut persistence, &request, early()).unwrap();
    let later = datetime!(2026-04-02 08:15 UTC);
    let response = apply_as_owner(&mut persistence, &request, later).unwrap();

    assert_eq!(response.status, "Applied");
    assert_eq!(response.previous_status, "Applied");

    let record: AllocationInfo = get_allocation(
        &mut persistence,
        Track::Plain,
        seed.fixture_id,
        seed.pitch_ids[0],
        &policy(),
    )
    .unwrap();
    assert_eq!(record.status, "Applied");
    assert_eq!(record.updated_at, Some(later));
    assert_eq!(record.permit_no.as_deref(), Some(super::helpers::OWNER));
}

#[test]
fn test_tracks_are_stored_independently() {
    let (mut persistence, seed) = seeded();
    let pitch_id: i64 = seed.pitch_ids[0];

    let premium = status_request(Track::Premium, &seed, pitch_id, "Applied");
    apply_as_owner(&mut persistence, &premium, early()).unwrap();

    let plain: AllocationInfo =
        get_allocation(&mut persistence, Track::Plain, seed.fixture_id, pitch_id, &policy())
            .unwrap();
    assert_eq!(plain.status, "Not Working");
    assert_eq!(plain.updated_at, None);
}

#[test]
fn test_label_from_another_track_is_invalid_input() {
    let (mut persistence, seed) = seeded();
    let request = status_request(Track::Plain, &seed, seed.pitch_ids[0], "Not Applying");

    let result = apply_as_owner(&mut persistence, &request, early());

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "status"
    ));
}

#[test]
fn test_other_bookmakers_pitch_reads_as_not_found() {
    let (mut persistence, seed) = seeded();
    let request = status_request(Track::Plain, &seed, seed.pitch_ids[0], "Applied");

    let result = apply_status(
        &mut persistence,
        &request,
        &create_test_bookmaker(OTHER),
        &policy(),
        early(),
    );

    assert_not_found_for_bookmaker(result);
}

#[test]
fn test_unknown_fixture_and_wrong_racecourse_read_the_same() {
    let (mut persistence, seed) = seeded();

    let mut unknown_fixture = status_request(Track::Plain, &seed, seed.pitch_ids[0], "Applied");
    unknown_fixture.fixture_id = 9_999;
    assert_not_found_for_bookmaker(apply_as_owner(&mut persistence, &unknown_fixture, early()));

    let mut unknown_pitch = status_request(Track::Plain, &seed, 9_999, "Applied");
    unknown_pitch.racecourse_id = None;
    assert_not_found_for_bookmaker(apply_as_owner(&mut persistence, &unknown_pitch, early()));

    let mut wrong_racecourse = status_request(Track::Plain, &seed, seed.pitch_ids[0], "Applied");
    wrong_racecourse.racecourse_id = Some(seed.racecourse_id + 1);
    assert_not_found_for_bookmaker(apply_as_owner(&mut persistence, &wrong_racecourse, early()));
}

#[test]
fn test_closed_corporate_area_reads_as_not_found() {
    let (mut persistence, seed) = seeded();
    let request = status_request(Track::Corporate, &seed, seed.pitch_ids[0], "Applied");

    assert_not_found_for_bookmaker(apply_as_owner(&mut persistence, &request, early()));

    open_corporate(&mut persistence, seed.fixture_id);
    assert!(apply_as_owner(&mut persistence, &request, early()).is_ok());
}

#[test]
fn test_non_bookmaker_actor_skips_ownership_check() {
    let (mut persistence, seed) = seeded();
    let request = status_request(Track::Plain, &seed, seed.pitch_ids[2], "Applied");

    apply_status(
        &mut persistence,
        &request,
        &create_test_admin(),
        &policy(),
        early(),
    )
    .unwrap();

    let record: AllocationInfo = get_allocation(
        &mut persistence,
        Track::Plain,
        seed.fixture_id,
        seed.pitch_ids[2],
        &policy(),
    )
    .unwrap();
    // The status is attributed to the pitch owner, not the caller
    assert_eq!(record.permit_no.as_deref(), Some(super::helpers::OWNER));
}
