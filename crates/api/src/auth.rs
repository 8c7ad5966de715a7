// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.
//!
//! Credentials are verified upstream. This module receives the resulting
//! identity and role and decides which engine operations the actor may
//! invoke.

use std::str::FromStr;

use crate::error::AuthError;

/// Actor roles for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// A permit-holding bookmaker.
    ///
    /// Bookmakers may:
    /// - apply for, or withdraw from, fixtures on pitches they own
    /// - list their own pitches and allocation status
    Bookmaker,
    /// An on-course official.
    ///
    /// SIS officials may:
    /// - confirm attendance for a pitch
    /// - replace the attendance roster of a fixture
    Sis,
    /// An administrator with catalog and corrective authority.
    ///
    /// Admins may perform:
    /// - creation of racecourses, bookmakers, pitches and fixtures
    /// - fixture deletion and area availability updates
    /// - area reassignment and pitch ownership transfers
    /// - everything an SIS official may do
    Admin,
}

impl Role {
    /// Returns the wire name of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bookmaker => "bookmaker",
            Self::Sis => "sis",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bookmaker" => Ok(Self::Bookmaker),
            "sis" => Ok(Self::Sis),
            "admin" => Ok(Self::Admin),
            _ => Err(AuthError::AuthenticationFailed {
                reason: format!("Unknown role '{s}'"),
            }),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated actor with an associated role.
///
/// For bookmakers the identity is the permit number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The verified identity of the actor.
    pub identity: String,
    /// The role assigned to this actor.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `identity` - The verified identity
    /// * `role` - The role assigned to this actor
    #[must_use]
    pub const fn new(identity: String, role: Role) -> Self {
        Self { identity, role }
    }

    /// Builds an actor from the raw identity and role supplied by the
    /// upstream authenticator.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AuthenticationFailed` if the identity is blank or
    /// the role is unknown.
    pub fn from_credentials(identity: &str, role: &str) -> Result<Self, AuthError> {
        let identity: &str = identity.trim();
        if identity.is_empty() {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Missing identity"),
            });
        }
        Ok(Self::new(identity.to_string(), role.parse::<Role>()?))
    }
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks if an actor may change a participation status.
    ///
    /// Only bookmakers may apply or withdraw, and only for their own pitches.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not a bookmaker.
    pub fn authorize_apply_status(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(actor, "apply_status", &[Role::Bookmaker])
    }

    /// Checks if an actor may list their own pitches.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not a bookmaker.
    pub fn authorize_list_own_pitches(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(actor, "list_own_pitches", &[Role::Bookmaker])
    }

    /// Checks if an actor may reassign a pitch's area.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_set_area(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(actor, "set_area", &[Role::Admin])
    }

    /// Checks if an actor may transfer pitch ownership.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_transfer_pitch(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(actor, "transfer_pitch", &[Role::Admin])
    }

    /// Checks if an actor may change the fixture and pitch catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_manage_catalog(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(actor, "manage_catalog", &[Role::Admin])
    }

    /// Checks if an actor may record or read attendance.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is an SIS official or an admin.
    pub fn authorize_record_attendance(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(actor, "record_attendance", &[Role::Sis, Role::Admin])
    }

    /// Checks if an actor may inspect allocation records and ledgers.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is an SIS official or an admin.
    pub fn authorize_inspect_allocations(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(actor, "inspect_allocations", &[Role::Sis, Role::Admin])
    }

    fn require(
        actor: &AuthenticatedActor,
        action: &str,
        allowed: &[Role],
    ) -> Result<(), AuthError> {
        if allowed.contains(&actor.role) {
            return Ok(());
        }
        let required_role: String = allowed
            .iter()
            .map(Role::as_str)
            .collect::<Vec<&str>>()
            .join(" or ");
        Err(AuthError::Unauthorized {
            action: action.to_string(),
            required_role,
        })
    }
}
