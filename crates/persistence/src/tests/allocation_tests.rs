// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use pitchbook_domain::{
    AllocationFilter, AreaPlacement, AttendanceMark, Fixture, ParticipationStatus, PitchAllocation,
    Track,
};
use time::Duration;

use super::{Seed, seeded_persistence, test_now};
use crate::AllocationKey;

fn key_for(seed: &Seed, track: Track) -> AllocationKey {
    AllocationKey {
        track,
        fixture_id: seed.fixture_id,
        pitch_id: seed.pitch_ids[0],
        racecourse_id: seed.racecourse_id,
    }
}

#[test]
fn test_status_upsert_creates_then_updates_one_row() {
    let (mut persistence, seed) = seeded_persistence();
    let mut store = persistence.store();
    let key = key_for(&seed, Track::Plain);

    store
        .upsert_status(&key, &seed.owner, ParticipationStatus::Applied, test_now())
        .unwrap();
    let later = test_now() + Duration::hours(1);
    store
        .upsert_status(&key, &seed.owner, ParticipationStatus::NotApplied, later)
        .unwrap();

    let record = store
        .get_allocation(Track::Plain, seed.fixture_id, seed.pitch_ids[0])
        .unwrap()
        .unwrap();
    assert_eq!(record.status, ParticipationStatus::NotApplied);
    assert_eq!(record.permit_no, Some(seed.owner.clone()));
    assert_eq!(record.updated_at, Some(later));

    let all = store
        .list_allocations_for_pitches(Track::Plain, &seed.pitch_ids)
        .unwrap();
    assert_eq!(all.len(), 1);
}

#[test]
fn test_reapplying_same_status_advances_timestamp() {
    let (mut persistence, seed) = seeded_persistence();
    let mut store = persistence.store();
    let key = key_for(&seed, Track::Premium);

    store
        .upsert_status(&key, &seed.owner, ParticipationStatus::Applied, test_now())
        .unwrap();
    let later = test_now() + Duration::minutes(5);
    store
        .upsert_status(&key, &seed.owner, ParticipationStatus::Applied, later)
        .unwrap();

    let record = store
        .get_allocation(Track::Premium, seed.fixture_id, seed.pitch_ids[0])
        .unwrap()
        .unwrap();
    assert_eq!(record.status, ParticipationStatus::Applied);
    assert_eq!(record.updated_at, Some(later));
}

#[test]
fn test_location_and_status_do_not_clobber() {
    let (mut persistence, seed) = seeded_persistence();
    let mut store = persistence.store();
    let key = key_for(&seed, Track::Corporate);

    store
        .upsert_status(&key, &seed.owner, ParticipationStatus::Applied, test_now())
        .unwrap();
    store
        .upsert_location(&key, AreaPlacement::SpecialArea)
        .unwrap();
    store
        .upsert_attendance_mark(&key, AttendanceMark::Attended)
        .unwrap();
    store
        .upsert_status(
            &key,
            &seed.owner,
            ParticipationStatus::Applied,
            test_now() + Duration::seconds(30),
        )
        .unwrap();

    let record = store
        .get_allocation(Track::Corporate, seed.fixture_id, seed.pitch_ids[0])
        .unwrap()
        .unwrap();
    assert_eq!(record.status, ParticipationStatus::Applied);
    assert_eq!(record.location, AreaPlacement::SpecialArea);
    assert_eq!(record.attendance, AttendanceMark::Attended);
}

#[test]
fn test_location_first_leaves_status_at_default() {
    let (mut persistence, seed) = seeded_persistence();
    let mut store = persistence.store();
    let key = key_for(&seed, Track::Premium);

    store
        .upsert_location(&key, AreaPlacement::SpecialArea)
        .unwrap();

    let record = store
        .get_allocation(Track::Premium, seed.fixture_id, seed.pitch_ids[0])
        .unwrap()
        .unwrap();
    assert_eq!(record.status, ParticipationStatus::NotApplied);
    assert_eq!(record.permit_no, None);
    assert_eq!(record.updated_at, None);
}

#[test]
fn test_tracks_are_independent() {
    let (mut persistence, seed) = seeded_persistence();
    let mut store = persistence.store();

    store
        .upsert_status(
            &key_for(&seed, Track::Plain),
            &seed.owner,
            ParticipationStatus::Applied,
            test_now(),
        )
        .unwrap();

    assert!(
        store
            .get_allocation(Track::Premium, seed.fixture_id, seed.pitch_ids[0])
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_clear_allocation_removes_only_that_key() {
    let (mut persistence, seed) = seeded_persistence();
    let mut store = persistence.store();
    let plain = key_for(&seed, Track::Plain);
    let premium = key_for(&seed, Track::Premium);

    store
        .upsert_status(&plain, &seed.owner, ParticipationStatus::Applied, test_now())
        .unwrap();
    store
        .upsert_status(&premium, &seed.owner, ParticipationStatus::Applied, test_now())
        .unwrap();

    assert_eq!(store.clear_allocation(&plain).unwrap(), 1);
    assert_eq!(store.clear_allocation(&plain).unwrap(), 0);
    assert!(
        store
            .get_allocation(Track::Plain, seed.fixture_id, seed.pitch_ids[0])
            .unwrap()
            .is_none()
    );
    assert!(
        store
            .get_allocation(Track::Premium, seed.fixture_id, seed.pitch_ids[0])
            .unwrap()
            .is_some()
    );
}

#[test]
fn test_fixture_allocations_fill_defaults_and_filter() {
    let (mut persistence, seed) = seeded_persistence();
    let mut store = persistence.store();
    let fixture: Fixture = store.get_fixture(seed.fixture_id).unwrap().unwrap();

    let first = key_for(&seed, Track::Premium);
    let second = AllocationKey {
        pitch_id: seed.pitch_ids[1],
        ..first
    };
    store
        .upsert_status(&first, &seed.owner, ParticipationStatus::Applied, test_now())
        .unwrap();
    store
        .upsert_location(&second, AreaPlacement::SpecialArea)
        .unwrap();

    let all: Vec<PitchAllocation> = store
        .list_fixture_allocations(Track::Premium, &fixture, AllocationFilter::All)
        .unwrap();
    let ids: Vec<i64> = all.iter().map(|entry| entry.pitch.pitch_id).collect();
    assert_eq!(ids, seed.pitch_ids);
    assert_eq!(all[0].owner_name, "Red Rum Turf");
    assert_eq!(all[2].record.status, ParticipationStatus::NotApplied);
    assert_eq!(all[2].record.updated_at, None);

    let applied = store
        .list_fixture_allocations(Track::Premium, &fixture, AllocationFilter::Applied)
        .unwrap();
    assert_eq!(applied.len(), 1);
    assert_eq!(applied[0].pitch.pitch_id, seed.pitch_ids[0]);

    let awarded = store
        .list_fixture_allocations(Track::Premium, &fixture, AllocationFilter::Awarded)
        .unwrap();
    assert_eq!(awarded.len(), 1);
    assert_eq!(awarded[0].pitch.pitch_id, seed.pitch_ids[1]);

    // Other tracks keep their own records.
    let plain_applied = store
        .list_fixture_allocations(Track::Plain, &fixture, AllocationFilter::Applied)
        .unwrap();
    assert!(plain_applied.is_empty());
}

#[test]
fn test_fixture_allocations_ignore_previous_owner_records() {
    let (mut persistence, seed) = seeded_persistence();
    let mut store = persistence.store();
    let fixture: Fixture = store.get_fixture(seed.fixture_id).unwrap().unwrap();
    let key = key_for(&seed, Track::Plain);

    store
        .upsert_status(&key, &seed.owner, ParticipationStatus::Applied, test_now())
        .unwrap();
    store
        .record_transfer(seed.pitch_ids[0], &seed.other, None, test_now())
        .unwrap();

    let applied = store
        .list_fixture_allocations(Track::Plain, &fixture, AllocationFilter::Applied)
        .unwrap();
    assert!(applied.is_empty());

    let all = store
        .list_fixture_allocations(Track::Plain, &fixture, AllocationFilter::All)
        .unwrap();
    assert_eq!(all[0].pitch.owner, seed.other);
    assert_eq!(all[0].owner_name, "Arkle Odds");
    assert_eq!(all[0].record.status, ParticipationStatus::NotApplied);
    assert_eq!(all[0].record.permit_no, None);
}
