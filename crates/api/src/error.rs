// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use pitchbook_domain::DomainError;
use pitchbook_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain and persistence errors and represent the
/// engine's contract with its callers. Every failure leaves the store as it
/// was before the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The application window for the fixture has closed.
    TooLateToApply {
        /// A human-readable description including the deadline.
        message: String,
    },
    /// The withdrawal window for the fixture has closed.
    TooLateToWithdraw {
        /// A human-readable description including the deadline.
        message: String,
    },
    /// The write conflicts with existing data or a concurrent writer.
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// The store failed.
    StorageFailure {
        /// A description of the storage failure.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::TooLateToApply { message } | Self::TooLateToWithdraw { message } => {
                write!(f, "{message}")
            }
            Self::Conflict { message } => write!(f, "Conflict: {message}"),
            Self::StorageFailure { message } => write!(f, "Storage failure: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        translate_persistence_error(err)
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::TooLateToApply { .. } => ApiError::TooLateToApply {
            message: err.to_string(),
        },
        DomainError::TooLateToWithdraw { .. } => ApiError::TooLateToWithdraw {
            message: err.to_string(),
        },
        DomainError::InvalidStatusValue { .. } => ApiError::InvalidInput {
            field: String::from("status"),
            message: err.to_string(),
        },
        DomainError::InvalidAreaLabel { .. } => ApiError::InvalidInput {
            field: String::from("area"),
            message: err.to_string(),
        },
        DomainError::InvalidAttendanceValue(_) => ApiError::InvalidInput {
            field: String::from("attendance"),
            message: err.to_string(),
        },
        DomainError::InvalidPermitNumber(msg) => ApiError::InvalidInput {
            field: String::from("permit_no"),
            message: msg,
        },
        DomainError::InvalidTrack(_) => ApiError::InvalidInput {
            field: String::from("track"),
            message: err.to_string(),
        },
        DomainError::InvalidTimezone(_) => ApiError::InvalidInput {
            field: String::from("timezone"),
            message: err.to_string(),
        },
        DomainError::NoAttendeesProvided | DomainError::DuplicateAttendee { .. } => {
            ApiError::InvalidInput {
                field: String::from("attendees"),
                message: err.to_string(),
            }
        }
        DomainError::InvalidTransferValue { .. } => ApiError::InvalidInput {
            field: String::from("transfer_value"),
            message: err.to_string(),
        },
        DomainError::DeadlineUnresolvable { .. } => ApiError::InvalidInput {
            field: String::from("fixture_date"),
            message: err.to_string(),
        },
        DomainError::UnrecognizedValue { kind, .. } => ApiError::InvalidInput {
            field: kind.replace(' ', "_"),
            message: err.to_string(),
        },
        DomainError::DateParseError { date_string, error } => ApiError::InvalidInput {
            field: String::from("date"),
            message: format!("Failed to parse date '{date_string}': {error}"),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Constraint violations become `Conflict` or `ResourceNotFound`; a lock
/// held past the busy timeout becomes `Conflict`. Everything else is a
/// storage failure.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message,
        },
        PersistenceError::UniqueViolation(message) => ApiError::Conflict { message },
        PersistenceError::Busy(message) => ApiError::Conflict {
            message: format!("The store is busy, try again: {message}"),
        },
        PersistenceError::ForeignKeyViolation(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Referenced record"),
            message,
        },
        other => ApiError::StorageFailure {
            message: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_store_is_a_conflict() {
        let err: ApiError =
            translate_persistence_error(PersistenceError::Busy(String::from("database is locked")));
        assert!(matches!(err, ApiError::Conflict { .. }));
    }

    #[test]
    fn test_unrecognized_value_names_its_field() {
        let err: ApiError = translate_domain_error(DomainError::UnrecognizedValue {
            kind: "area kind",
            value: String::from("vip"),
        });
        assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "area_kind"));
    }

    #[test]
    fn test_blank_permit_keeps_domain_message() {
        let err: ApiError = translate_domain_error(DomainError::InvalidPermitNumber(String::from(
            "Permit number cannot be empty",
        )));
        assert_eq!(
            err,
            ApiError::InvalidInput {
                field: String::from("permit_no"),
                message: String::from("Permit number cannot be empty"),
            }
        );
    }
}
