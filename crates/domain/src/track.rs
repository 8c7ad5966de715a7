// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Allocation tracks and their configuration.
//!
//! A fixture is allocated along three parallel tracks:
//!
//! - `Plain`: the standard ring, open at every fixture
//! - `Premium`: the premium area, open only when the fixture offers one
//! - `Corporate`: the corporate area, open only when the fixture offers one
//!
//! All tracks share the same transition and upsert rules. What differs is
//! carried by [`TrackConfig`]: the application lead time, the withdrawal
//! cut-off on fixture day, the display labels, and the special area name.
//!
//! ## Invariants
//!
//! - Every track accepts exactly two participation labels
//! - Every track accepts "Main Ring" plus at most one special area label
//! - Wall-clock cut-offs are interpreted in the policy timezone

use std::str::FromStr;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use time::Time;
use time::macros::time;

use crate::error::DomainError;
use crate::status::{AreaPlacement, ParticipationStatus};

/// Label shared by every track for the applied state.
pub const APPLIED_LABEL: &str = "Applied";

/// Label for the default area placement.
pub const MAIN_RING_LABEL: &str = "Main Ring";

/// The default racing timezone.
pub const DEFAULT_TIMEZONE: &str = "Europe/Dublin";

/// One of the three parallel allocation subsystems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    /// The standard ring.
    Plain,
    /// The premium area.
    Premium,
    /// The corporate area.
    Corporate,
}

impl Track {
    /// All tracks, in display order.
    pub const ALL: [Self; 3] = [Self::Plain, Self::Premium, Self::Corporate];

    /// Returns the storage code for the track.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Premium => "premium",
            Self::Corporate => "corporate",
        }
    }

    /// Returns the special area gated by this track, if any.
    #[must_use]
    pub const fn area_kind(&self) -> Option<AreaKind> {
        match self {
            Self::Plain => None,
            Self::Premium => Some(AreaKind::Premium),
            Self::Corporate => Some(AreaKind::Corporate),
        }
    }
}

impl FromStr for Track {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(Self::Plain),
            "premium" => Ok(Self::Premium),
            "corporate" => Ok(Self::Corporate),
            _ => Err(DomainError::InvalidTrack(s.to_string())),
        }
    }
}

impl std::fmt::Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A special area that a fixture may offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaKind {
    /// The premium area.
    Premium,
    /// The corporate area.
    Corporate,
}

impl AreaKind {
    /// Returns the display label for the area.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Premium => "Premium Area",
            Self::Corporate => "Corporate Area",
        }
    }
}

impl FromStr for AreaKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "premium" => Ok(Self::Premium),
            "corporate" => Ok(Self::Corporate),
            _ => Err(DomainError::UnrecognizedValue {
                kind: "area kind",
                value: s.to_string(),
            }),
        }
    }
}

/// Per-track constants for the transition rules and labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackConfig {
    track: Track,
    apply_lead_days: u16,
    withdraw_deadline: Time,
    not_applied_label: &'static str,
}

impl TrackConfig {
    /// Creates a track configuration.
    ///
    /// # Arguments
    ///
    /// * `track` - The track being configured
    /// * `apply_lead_days` - Days before the fixture after which applying is closed
    /// * `withdraw_deadline` - Local clock time on fixture day after which withdrawing is closed
    /// * `not_applied_label` - Display label for the default participation state
    #[must_use]
    pub const fn new(
        track: Track,
        apply_lead_days: u16,
        withdraw_deadline: Time,
        not_applied_label: &'static str,
    ) -> Self {
        Self {
            track,
            apply_lead_days,
            withdraw_deadline,
            not_applied_label,
        }
    }

    /// Returns the standard configuration for a track.
    ///
    /// The plain track closes applications 5 days out and withdrawals at
    /// 18:00 on the day. The premium and corporate tracks close
    /// applications 2 days out and withdrawals at 09:00 on the day.
    #[must_use]
    pub const fn for_track(track: Track) -> Self {
        match track {
            Track::Plain => Self::new(track, 5, time!(18:00), "Not Working"),
            Track::Premium | Track::Corporate => {
                Self::new(track, 2, time!(9:00), "Not Applying")
            }
        }
    }

    #[must_use]
    pub const fn track(&self) -> Track {
        self.track
    }

    #[must_use]
    pub const fn apply_lead_days(&self) -> u16 {
        self.apply_lead_days
    }

    #[must_use]
    pub const fn withdraw_deadline(&self) -> Time {
        self.withdraw_deadline
    }

    /// Returns the display label for a participation status on this track.
    #[must_use]
    pub const fn status_label(&self, status: ParticipationStatus) -> &'static str {
        match status {
            ParticipationStatus::NotApplied => self.not_applied_label,
            ParticipationStatus::Applied => APPLIED_LABEL,
        }
    }

    /// Parses a participation label against this track's allowed set.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusValue` if the label is not one of
    /// the two labels accepted by this track.
    pub fn parse_status(&self, label: &str) -> Result<ParticipationStatus, DomainError> {
        if label == APPLIED_LABEL {
            Ok(ParticipationStatus::Applied)
        } else if label == self.not_applied_label {
            Ok(ParticipationStatus::NotApplied)
        } else {
            Err(DomainError::InvalidStatusValue {
                track: self.track,
                value: label.to_string(),
            })
        }
    }

    /// Returns the display label for an area placement on this track.
    #[must_use]
    pub fn area_label(&self, placement: AreaPlacement) -> &'static str {
        match (placement, self.track.area_kind()) {
            (AreaPlacement::SpecialArea, Some(kind)) => kind.label(),
            _ => MAIN_RING_LABEL,
        }
    }

    /// Parses an area label against this track's allowed set.
    ///
    /// The plain track has no special area and accepts only "Main Ring".
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAreaLabel` for any other label.
    pub fn parse_area(&self, label: &str) -> Result<AreaPlacement, DomainError> {
        if label == MAIN_RING_LABEL {
            return Ok(AreaPlacement::MainRing);
        }
        match self.track.area_kind() {
            Some(kind) if kind.label() == label => Ok(AreaPlacement::SpecialArea),
            _ => Err(DomainError::InvalidAreaLabel {
                track: self.track,
                value: label.to_string(),
            }),
        }
    }
}

/// The full allocation policy: one configuration per track plus the
/// timezone in which fixture-day deadlines are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationPolicy {
    timezone: Tz,
    plain: TrackConfig,
    premium: TrackConfig,
    corporate: TrackConfig,
}

impl AllocationPolicy {
    /// Creates the standard policy for the given timezone.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimezone` if the name is not a known
    /// IANA timezone.
    pub fn new(timezone: &str) -> Result<Self, DomainError> {
        let tz: Tz = timezone
            .parse()
            .map_err(|_| DomainError::InvalidTimezone(timezone.to_string()))?;
        Ok(Self::with_timezone(tz))
    }

    /// Creates the standard policy for an already-parsed timezone.
    #[must_use]
    pub const fn with_timezone(timezone: Tz) -> Self {
        Self {
            timezone,
            plain: TrackConfig::for_track(Track::Plain),
            premium: TrackConfig::for_track(Track::Premium),
            corporate: TrackConfig::for_track(Track::Corporate),
        }
    }

    /// Replaces the configuration of one track.
    #[must_use]
    pub fn with_track_config(mut self, config: TrackConfig) -> Self {
        match config.track() {
            Track::Plain => self.plain = config,
            Track::Premium => self.premium = config,
            Track::Corporate => self.corporate = config,
        }
        self
    }

    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Returns the configuration for a track.
    #[must_use]
    pub const fn config(&self, track: Track) -> &TrackConfig {
        match track {
            Track::Plain => &self.plain,
            Track::Premium => &self.premium,
            Track::Corporate => &self.corporate,
        }
    }
}

impl Default for AllocationPolicy {
    fn default() -> Self {
        Self::with_timezone(chrono_tz::Europe::Dublin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_round_trip() {
        for track in Track::ALL {
            match track.as_str().parse::<Track>() {
                Ok(parsed) => assert_eq!(track, parsed),
                Err(e) => panic!("Failed to parse track {track}: {e}"),
            }
        }
        assert!("standard".parse::<Track>().is_err());
    }

    #[test]
    fn test_standard_constants_are_preserved_per_track() {
        let plain = TrackConfig::for_track(Track::Plain);
        assert_eq!(plain.apply_lead_days(), 5);
        assert_eq!(plain.withdraw_deadline(), time!(18:00));

        for track in [Track::Premium, Track::Corporate] {
            let config = TrackConfig::for_track(track);
            assert_eq!(config.apply_lead_days(), 2);
            assert_eq!(config.withdraw_deadline(), time!(9:00));
        }
    }

    #[test]
    fn test_status_labels_differ_by_track() {
        let plain = TrackConfig::for_track(Track::Plain);
        let premium = TrackConfig::for_track(Track::Premium);

        assert_eq!(
            plain.parse_status("Not Working"),
            Ok(ParticipationStatus::NotApplied)
        );
        assert_eq!(
            premium.parse_status("Not Applying"),
            Ok(ParticipationStatus::NotApplied)
        );
        assert_eq!(
            premium.parse_status("Applied"),
            Ok(ParticipationStatus::Applied)
        );
        assert!(matches!(
            plain.parse_status("Not Applying"),
            Err(DomainError::InvalidStatusValue {
                track: Track::Plain,
                ..
            })
        ));
        assert!(premium.parse_status("Working").is_err());
    }

    #[test]
    fn test_area_labels() {
        let corporate = TrackConfig::for_track(Track::Corporate);
        assert_eq!(
            corporate.parse_area("Corporate Area"),
            Ok(AreaPlacement::SpecialArea)
        );
        assert_eq!(corporate.parse_area("Main Ring"), Ok(AreaPlacement::MainRing));
        assert!(matches!(
            corporate.parse_area("Premium Area"),
            Err(DomainError::InvalidAreaLabel { .. })
        ));
        assert_eq!(
            corporate.area_label(AreaPlacement::SpecialArea),
            "Corporate Area"
        );

        let plain = TrackConfig::for_track(Track::Plain);
        assert!(plain.parse_area("Premium Area").is_err());
        assert_eq!(plain.area_label(AreaPlacement::SpecialArea), "Main Ring");
    }

    #[test]
    fn test_policy_rejects_unknown_timezone() {
        assert!(AllocationPolicy::new("Europe/Dublin").is_ok());
        assert_eq!(
            AllocationPolicy::new("Mars/Olympus"),
            Err(DomainError::InvalidTimezone(String::from("Mars/Olympus")))
        );
    }

    #[test]
    fn test_policy_track_override() {
        let policy = AllocationPolicy::default()
            .with_track_config(TrackConfig::new(Track::Premium, 3, time!(8:30), "Not Applying"));
        assert_eq!(policy.config(Track::Premium).apply_lead_days(), 3);
        assert_eq!(policy.config(Track::Corporate).apply_lead_days(), 2);
    }
}
