// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Caller identity extraction for the server.
//!
//! Tokens are verified by the gateway in front of this server, which then
//! forwards the caller's identity in two headers:
//!
//! - `x-permit-no`: the permit number, or operator ID for officials
//! - `x-role`: one of `bookmaker`, `sis` or `admin`

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use pitchbook_api::{AuthError, AuthenticatedActor};
use tracing::{debug, warn};

use crate::AppState;

/// Header carrying the caller's verified identity.
pub const IDENTITY_HEADER: &str = "x-permit-no";

/// Header carrying the caller's verified role.
pub const ROLE_HEADER: &str = "x-role";

/// Extractor for the authenticated caller.
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(
///     Identity(actor): Identity,
/// ) -> Result<Json<Response>, HttpError> {
///     // actor: AuthenticatedActor
/// }
/// ```
///
/// # Errors
///
/// Rejects with HTTP 401 Unauthorized if either header is missing, is not
/// valid UTF-8, is blank, or names an unknown role.
pub struct Identity(pub AuthenticatedActor);

impl FromRequestParts<AppState> for Identity {
    type Rejection = IdentityError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let identity: &str = header_value(&parts.headers, IDENTITY_HEADER)?;
        let role: &str = header_value(&parts.headers, ROLE_HEADER)?;

        let actor: AuthenticatedActor =
            AuthenticatedActor::from_credentials(identity, role).map_err(|e| {
                warn!(error = %e, "Rejected caller identity");
                IdentityError::Rejected(e)
            })?;

        debug!(identity = %actor.identity, role = %actor.role, "Caller identified");
        Ok(Self(actor))
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &'static str) -> Result<&'a str, IdentityError> {
    headers
        .get(name)
        .ok_or_else(|| {
            debug!(header = name, "Missing identity header");
            IdentityError::MissingHeader(name)
        })?
        .to_str()
        .map_err(|_| {
            warn!(header = name, "Identity header is not valid UTF-8");
            IdentityError::InvalidHeader(name)
        })
}

/// Identity extraction errors.
#[derive(Debug)]
pub enum IdentityError {
    /// A required header is missing.
    MissingHeader(&'static str),
    /// A header is not valid UTF-8.
    InvalidHeader(&'static str),
    /// The identity or role was rejected.
    Rejected(AuthError),
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        let message: String = match self {
            Self::MissingHeader(name) => format!("Missing {name} header"),
            Self::InvalidHeader(name) => format!("Invalid {name} header encoding"),
            Self::Rejected(err) => err.to_string(),
        };

        (StatusCode::UNAUTHORIZED, message).into_response()
    }
}
