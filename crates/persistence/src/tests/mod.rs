// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod allocation_tests;
mod attendance_tests;

use pitchbook_domain::PermitNumber;
use time::macros::date;
use time::{Date, OffsetDateTime};

use crate::{Persistence, Store};

/// Identifiers of the catalog rows created by [`seed_catalog`].
pub struct Seed {
    pub racecourse_id: i64,
    pub fixture_id: i64,
    pub pitch_ids: Vec<i64>,
    pub owner: PermitNumber,
    pub other: PermitNumber,
}

pub const FIXTURE_DATE: Date = date!(2026 - 04 - 18);

pub fn permit(value: &str) -> PermitNumber {
    PermitNumber::new(value).unwrap()
}

pub fn test_now() -> OffsetDateTime {
    time::macros::datetime!(2026-04-01 12:00 UTC)
}

/// Creates one racecourse, two bookmakers, one fixture and three pitches
/// owned by the first bookmaker.
pub fn seed_catalog(store: &mut Store<'_>) -> Seed {
    let racecourse_id: i64 = store.create_racecourse("Punchestown").unwrap();
    let owner: PermitNumber = permit("B1001");
    let other: PermitNumber = permit("B2002");
    store.register_bookmaker(&owner, "Red Rum Turf").unwrap();
    store.register_bookmaker(&other, "Arkle Odds").unwrap();

    let fixture_id: i64 = store.create_fixture(racecourse_id, FIXTURE_DATE).unwrap();
    let pitch_ids: Vec<i64> = (1..=3)
        .map(|number| {
            store
                .create_pitch(racecourse_id, &owner, "A", number, None)
                .unwrap()
        })
        .collect();

    Seed {
        racecourse_id,
        fixture_id,
        pitch_ids,
        owner,
        other,
    }
}

pub fn seeded_persistence() -> (Persistence, Seed) {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let seed: Seed = seed_catalog(&mut persistence.store());
    (persistence, seed)
}
