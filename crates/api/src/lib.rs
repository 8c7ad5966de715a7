// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the Pitchbook pitch allocation system.
//!
//! This crate sits between the transport layer and the store. It owns the
//! request and response shapes, role checks, and the translation of domain
//! and persistence failures into [`ApiError`].
//!
//! ## Call sequence
//!
//! 1. The transport builds an [`AuthenticatedActor`] from the identity the
//!    upstream gateway verified
//! 2. [`AuthorizationService`] checks the actor's role for the operation
//! 3. The handler validates the request and runs it as one transaction

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthorizationService, Role};
pub use error::{ApiError, AuthError, translate_domain_error, translate_persistence_error};
pub use handlers::{
    NOT_FOUND_FOR_BOOKMAKER, apply_status, confirm_attendance, create_fixture, create_pitch,
    create_racecourse, delete_fixture, get_allocation, get_attendance, list_bookmaker_pitches,
    list_fixture_allocations, list_transfers, list_upcoming_fixtures, register_bookmaker,
    replace_attendance, set_area, transfer_pitch, update_area_availability,
};
pub use request_response::{
    AllocationInfo, ApplyStatusRequest, ApplyStatusResponse, AttendanceInfo, AttendeeInput,
    BookmakerPitchInfo, ConfirmAttendanceRequest, ConfirmAttendanceResponse, CreateFixtureRequest,
    CreateFixtureResponse, CreatePitchRequest, CreatePitchResponse, CreateRacecourseRequest,
    CreateRacecourseResponse, DeleteFixtureResponse, FixtureInfo, FixturePitchInfo,
    GetAttendanceResponse, ListBookmakerPitchesResponse, ListFixtureAllocationsResponse,
    ListFixturesResponse, ListTransfersResponse,
    RegisterBookmakerRequest, RegisterBookmakerResponse, ReplaceAttendanceRequest,
    ReplaceAttendanceResponse, SetAreaRequest, SetAreaResponse, TransferInfo,
    TransferPitchRequest, TransferPitchResponse, UpdateAreaAvailabilityRequest,
    UpdateAreaAvailabilityResponse,
};
