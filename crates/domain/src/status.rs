// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-fixture pitch status values.
//!
//! Each allocation record carries three independent axes: the bookmaker's
//! participation status, the administrative area placement, and the
//! attendance mark recorded on the day. Every axis has a default variant,
//! and a missing record reads as the default on every axis.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Whether the bookmaker has applied to work the pitch at a fixture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipationStatus {
    /// Not working / not applying. Also the state of an unrecorded pitch.
    #[default]
    NotApplied,
    /// Applied to work the pitch.
    Applied,
}

impl ParticipationStatus {
    /// Returns the storage code for the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotApplied => "not_applied",
            Self::Applied => "applied",
        }
    }
}

impl FromStr for ParticipationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_applied" => Ok(Self::NotApplied),
            "applied" => Ok(Self::Applied),
            _ => Err(DomainError::UnrecognizedValue {
                kind: "participation status",
                value: s.to_string(),
            }),
        }
    }
}

/// Where a pitch is physically placed for a fixture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaPlacement {
    /// The main ring.
    #[default]
    MainRing,
    /// The track's special area (premium or corporate).
    SpecialArea,
}

impl AreaPlacement {
    /// Returns the storage code for the placement.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MainRing => "main_ring",
            Self::SpecialArea => "special_area",
        }
    }
}

impl FromStr for AreaPlacement {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main_ring" => Ok(Self::MainRing),
            "special_area" => Ok(Self::SpecialArea),
            _ => Err(DomainError::UnrecognizedValue {
                kind: "area placement",
                value: s.to_string(),
            }),
        }
    }
}

/// Whether the pitch was staffed on the day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceMark {
    #[default]
    DidNotAttend,
    Attended,
}

impl AttendanceMark {
    /// Returns the storage code for the mark.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DidNotAttend => "did_not_attend",
            Self::Attended => "attended",
        }
    }

    /// Returns the display label for the mark.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::DidNotAttend => "Did Not Attend",
            Self::Attended => "Attended",
        }
    }

    /// Parses a display label.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAttendanceValue` for any label other than
    /// "Did Not Attend" or "Attended".
    pub fn from_label(label: &str) -> Result<Self, DomainError> {
        match label {
            "Did Not Attend" => Ok(Self::DidNotAttend),
            "Attended" => Ok(Self::Attended),
            _ => Err(DomainError::InvalidAttendanceValue(label.to_string())),
        }
    }
}

impl FromStr for AttendanceMark {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "did_not_attend" => Ok(Self::DidNotAttend),
            "attended" => Ok(Self::Attended),
            _ => Err(DomainError::UnrecognizedValue {
                kind: "attendance mark",
                value: s.to_string(),
            }),
        }
    }
}
