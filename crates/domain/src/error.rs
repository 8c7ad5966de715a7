// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::track::Track;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The requested participation status is not valid for the track.
    InvalidStatusValue {
        /// The track the status was requested on.
        track: Track,
        /// The rejected label.
        value: String,
    },
    /// The requested area label is not valid for the track.
    InvalidAreaLabel {
        /// The track the area was requested on.
        track: Track,
        /// The rejected label.
        value: String,
    },
    /// The requested attendance mark is not recognized.
    InvalidAttendanceValue(String),
    /// A permit number is empty or invalid.
    InvalidPermitNumber(String),
    /// The track name is not recognized.
    InvalidTrack(String),
    /// The configured timezone is not a valid IANA name.
    InvalidTimezone(String),
    /// An attendance roster was submitted without any attendees.
    NoAttendeesProvided,
    /// The same pitch appears more than once in an attendance roster.
    DuplicateAttendee {
        /// The repeated pitch.
        pitch_id: i64,
    },
    /// A transfer value is negative or not a finite number.
    InvalidTransferValue {
        /// Description of the validation error.
        reason: String,
    },
    /// The application window for the fixture has closed.
    TooLateToApply {
        /// The track the application was made on.
        track: Track,
        /// Minimum number of days before the fixture.
        lead_days: u16,
        /// The local deadline that was missed.
        deadline: String,
    },
    /// The withdrawal window for the fixture has closed.
    TooLateToWithdraw {
        /// The track the withdrawal was made on.
        track: Track,
        /// The local deadline that was missed.
        deadline: String,
    },
    /// A local deadline could not be mapped onto a single instant.
    DeadlineUnresolvable {
        /// Description of the resolution failure.
        reason: String,
    },
    /// A stored code could not be mapped onto a domain value.
    UnrecognizedValue {
        /// The kind of value being decoded.
        kind: &'static str,
        /// The unrecognized code.
        value: String,
    },
    /// Failed to parse date from string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidStatusValue { track, value } => {
                write!(f, "Invalid status '{value}' for the {track} track")
            }
            Self::InvalidAreaLabel { track, value } => {
                write!(f, "Invalid area '{value}' for the {track} track")
            }
            Self::InvalidAttendanceValue(value) => {
                write!(f, "Invalid attendance option '{value}'")
            }
            Self::InvalidPermitNumber(msg) => write!(f, "Invalid permit number: {msg}"),
            Self::InvalidTrack(value) => write!(f, "Unknown track '{value}'"),
            Self::InvalidTimezone(value) => write!(f, "Invalid timezone '{value}'"),
            Self::NoAttendeesProvided => write!(f, "No attendees provided"),
            Self::DuplicateAttendee { pitch_id } => {
                write!(f, "Pitch {pitch_id} appears more than once in the roster")
            }
            Self::InvalidTransferValue { reason } => {
                write!(f, "Invalid transfer value: {reason}")
            }
            Self::TooLateToApply {
                track,
                lead_days,
                deadline,
            } => {
                write!(
                    f,
                    "You must apply at least {lead_days} days before the fixture date ({track} track deadline was {deadline})"
                )
            }
            Self::TooLateToWithdraw { track, deadline } => {
                write!(
                    f,
                    "You can only withdraw from the {track} track before {deadline} on fixture day"
                )
            }
            Self::DeadlineUnresolvable { reason } => {
                write!(f, "Could not resolve deadline: {reason}")
            }
            Self::UnrecognizedValue { kind, value } => {
                write!(f, "Unrecognized {kind} '{value}'")
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
