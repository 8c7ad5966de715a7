// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use pitchbook_domain::Track;
use pitchbook_persistence::Persistence;
use time::macros::datetime;
use time::{Date, OffsetDateTime};

use super::helpers::{
    OTHER, OWNER, apply_as_owner, create_test_admin, create_test_bookmaker, early, policy, seeded,
    status_request,
};
use crate::{
    ApiError, ListTransfersResponse, RegisterBookmakerRequest, SetAreaRequest,
    TransferPitchRequest, TransferPitchResponse, apply_status, get_allocation,
    list_bookmaker_pitches, list_transfers, register_bookmaker, set_area, transfer_pitch,
};

fn transfer(
    persistence: &mut Persistence,
    pitch_id: i64,
    new_owner: &str,
    transfer_value: Option<f64>,
    now: OffsetDateTime,
) -> Result<TransferPitchResponse, ApiError> {
    transfer_pitch(
        persistence,
        &TransferPitchRequest {
            pitch_id,
            new_owner_permit_no: new_owner.to_string(),
            transfer_value,
        },
        &create_test_admin(),
        now,
    )
}

#[test]
fn test_each_transfer_appends_one_ledger_row() {
    let (mut persistence, seed) = seeded();
    register_bookmaker(
        &mut persistence,
        &RegisterBookmakerRequest {
            permit_no: String::from("C3003"),
            name: String::from("Shergar Prices"),
        },
    )
    .unwrap();
    let pitch_id: i64 = seed.pitch_ids[0];

    transfer(&mut persistence, pitch_id, OTHER, Some(12_500.0), datetime!(2026-02-01 10:00 UTC))
        .unwrap();
    transfer(&mut persistence, pitch_id, "C3003", None, datetime!(2026-02-15 10:00 UTC)).unwrap();
    let last = transfer(&mut persistence, pitch_id, OWNER, Some(0.0), datetime!(2026-03-01 10:00 UTC))
        .unwrap();
    assert_eq!(last.transfer.old_owner_permit_no, "C3003");

    let ledger: ListTransfersResponse = list_transfers(&mut persistence, pitch_id).unwrap();
    assert_eq!(ledger.transfers.len(), 3);

    let owners: Vec<(&str, &str)> = ledger
        .transfers
        .iter()
        .map(|t| (t.old_owner_permit_no.as_str(), t.new_owner_permit_no.as_str()))
        .collect();
    assert_eq!(
        owners,
        vec![(OWNER, OTHER), (OTHER, "C3003"), ("C3003", OWNER)]
    );

    let values: Vec<Option<f64>> = ledger.transfers.iter().map(|t| t.transfer_value).collect();
    assert_eq!(values, vec![Some(12_500.0), None, Some(0.0)]);
}

#[test]
fn test_new_owner_takes_over_status_changes() {
    let (mut persistence, seed) = seeded();
    let pitch_id: i64 = seed.pitch_ids[0];

    transfer(&mut persistence, pitch_id, OTHER, None, early()).unwrap();

    let request = status_request(Track::Plain, &seed, pitch_id, "Applied");
    assert!(matches!(
        apply_as_owner(&mut persistence, &request, early()),
        Err(ApiError::ResourceNotFound { .. })
    ));
    assert!(
        apply_status(
            &mut persistence,
            &request,
            &create_test_bookmaker(OTHER),
            &policy(),
            early(),
        )
        .is_ok()
    );

    let today: Date = early().date();
    let listed = list_bookmaker_pitches(
        &mut persistence,
        &create_test_bookmaker(OTHER),
        Track::Plain,
        &policy(),
        today,
    )
    .unwrap();
    assert_eq!(listed.pitches.len(), 1);
    assert_eq!(listed.pitches[0].pitch_id, pitch_id);
    assert_eq!(listed.pitches[0].status, "Applied");
}

#[test]
fn test_new_owner_does_not_inherit_previous_record() {
    let (mut persistence, seed) = seeded();
    let pitch_id: i64 = seed.pitch_ids[0];
    let request = status_request(Track::Premium, &seed, pitch_id, "Applied");

    apply_as_owner(&mut persistence, &request, early()).unwrap();
    set_area(
        &mut persistence,
        &SetAreaRequest {
            track: Track::Premium,
            fixture_id: seed.fixture_id,
            pitch_id,
            racecourse_id: seed.racecourse_id,
            area: String::from("Premium Area"),
        },
        &create_test_admin(),
        &policy(),
    )
    .unwrap();
    transfer(&mut persistence, pitch_id, OTHER, None, early()).unwrap();

    let listed = list_bookmaker_pitches(
        &mut persistence,
        &create_test_bookmaker(OTHER),
        Track::Premium,
        &policy(),
        early().date(),
    )
    .unwrap();
    assert_eq!(listed.pitches.len(), 1);
    assert_eq!(listed.pitches[0].status, "Not Applying");
    assert_eq!(listed.pitches[0].area, "Main Ring");

    let record = get_allocation(
        &mut persistence,
        Track::Premium,
        seed.fixture_id,
        pitch_id,
        &policy(),
    )
    .unwrap();
    assert_eq!(record.status, "Not Applying");
    assert_eq!(record.permit_no, None);

    let applied = apply_status(
        &mut persistence,
        &request,
        &create_test_bookmaker(OTHER),
        &policy(),
        early(),
    )
    .unwrap();
    assert_eq!(applied.previous_status, "Not Applying");

    let record = get_allocation(
        &mut persistence,
        Track::Premium,
        seed.fixture_id,
        pitch_id,
        &policy(),
    )
    .unwrap();
    assert_eq!(record.status, "Applied");
    assert_eq!(record.permit_no.as_deref(), Some(OTHER));
    assert_eq!(record.area, "Main Ring");
}

#[test]
fn test_negative_value_is_rejected() {
    let (mut persistence, seed) = seeded();

    let result = transfer(&mut persistence, seed.pitch_ids[0], OTHER, Some(-1.0), early());

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "transfer_value"
    ));
    assert!(
        list_transfers(&mut persistence, seed.pitch_ids[0])
            .unwrap()
            .transfers
            .is_empty()
    );
}

#[test]
fn test_blank_new_owner_is_rejected() {
    let (mut persistence, seed) = seeded();

    let result = transfer(&mut persistence, seed.pitch_ids[0], "   ", None, early());

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "new_owner_permit_no"
    ));
}

#[test]
fn test_unregistered_new_owner_is_not_found() {
    let (mut persistence, seed) = seeded();

    let result = transfer(&mut persistence, seed.pitch_ids[0], "X9999", None, early());

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
    assert!(
        list_transfers(&mut persistence, seed.pitch_ids[0])
            .unwrap()
            .transfers
            .is_empty()
    );
}

#[test]
fn test_unknown_pitch_is_not_found() {
    let (mut persistence, _seed) = seeded();

    assert!(matches!(
        transfer(&mut persistence, 4_242, OTHER, None, early()),
        Err(ApiError::ResourceNotFound { .. })
    ));
    assert!(matches!(
        list_transfers(&mut persistence, 4_242),
        Err(ApiError::ResourceNotFound { .. })
    ));
}
