// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use pitchbook_domain::{Attendee, Track};
use time::Duration;

use super::{Seed, permit, seeded_persistence, test_now};
use crate::PersistenceError;

fn roster(seed: &Seed, pitch_ids: &[i64]) -> Vec<Attendee> {
    pitch_ids
        .iter()
        .map(|&pitch_id| Attendee {
            pitch_id,
            bookmaker_permit_no: seed.owner.clone(),
        })
        .collect()
}

#[test]
fn test_replace_swaps_the_whole_roster() {
    let (mut persistence, seed) = seeded_persistence();
    let mut store = persistence.store();

    store
        .replace_attendance(
            Track::Plain,
            seed.fixture_id,
            &roster(&seed, &seed.pitch_ids[..2]),
            test_now(),
        )
        .unwrap();
    let written = store
        .replace_attendance(
            Track::Plain,
            seed.fixture_id,
            &roster(&seed, &seed.pitch_ids[2..]),
            test_now() + Duration::hours(2),
        )
        .unwrap();
    assert_eq!(written, 1);

    let entries = store.list_attendance(Track::Plain, seed.fixture_id).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].pitch_id, seed.pitch_ids[2]);
    assert_eq!(entries[0].attended_at, test_now() + Duration::hours(2));
}

#[test]
fn test_failure_on_third_attendee_keeps_prior_roster() {
    let (mut persistence, seed) = seeded_persistence();
    let mut store = persistence.store();

    store
        .replace_attendance(
            Track::Premium,
            seed.fixture_id,
            &roster(&seed, &seed.pitch_ids[..1]),
            test_now(),
        )
        .unwrap();

    let broken: Vec<Attendee> = roster(&seed, &[seed.pitch_ids[1], seed.pitch_ids[2], 9_999]);
    let result = store.replace_attendance(
        Track::Premium,
        seed.fixture_id,
        &broken,
        test_now() + Duration::hours(1),
    );
    assert!(matches!(
        result,
        Err(PersistenceError::ForeignKeyViolation(_))
    ));

    let entries = store.list_attendance(Track::Premium, seed.fixture_id).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].pitch_id, seed.pitch_ids[0]);
    assert_eq!(entries[0].attended_at, test_now());
}

#[test]
fn test_unknown_bookmaker_is_rejected() {
    let (mut persistence, seed) = seeded_persistence();
    let attendees = vec![Attendee {
        pitch_id: seed.pitch_ids[0],
        bookmaker_permit_no: permit("GHOST"),
    }];
    let result =
        persistence
            .store()
            .replace_attendance(Track::Plain, seed.fixture_id, &attendees, test_now());
    assert!(result.is_err());
}

#[test]
fn test_rosters_are_scoped_by_track() {
    let (mut persistence, seed) = seeded_persistence();
    let mut store = persistence.store();

    store
        .replace_attendance(
            Track::Plain,
            seed.fixture_id,
            &roster(&seed, &seed.pitch_ids),
            test_now(),
        )
        .unwrap();
    store
        .replace_attendance(
            Track::Corporate,
            seed.fixture_id,
            &roster(&seed, &seed.pitch_ids[..1]),
            test_now(),
        )
        .unwrap();

    assert_eq!(
        store.list_attendance(Track::Plain, seed.fixture_id).unwrap().len(),
        3
    );
    assert_eq!(
        store
            .list_attendance(Track::Corporate, seed.fixture_id)
            .unwrap()
            .len(),
        1
    );
}
