// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use leavedesk::CoreError;
use leavedesk_domain::{AdmissionError, AdmissionErrors, DomainError};
use leavedesk_persistence::PersistenceError;
use serde::{Deserialize, Serialize};

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// The request field the failure refers to.
    pub field: String,
    /// A human-readable description of the failure.
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: &str, message: String) -> Self {
        Self {
            field: field.to_string(),
            message,
        }
    }
}

impl From<&AdmissionError> for FieldError {
    fn from(err: &AdmissionError) -> Self {
        Self::new(err.field(), err.to_string())
    }
}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request failed admission; every failure is listed.
    ValidationFailed {
        /// The individual field failures.
        errors: Vec<FieldError>,
    },
    /// The period overlaps another non-rejected request of the requester.
    DuplicatePeriod {
        /// The overlapping request, when known.
        existing_request_id: Option<i64>,
        /// A human-readable description.
        message: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
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
    /// The actor may not perform this action.
    Forbidden {
        /// A human-readable description.
        message: String,
    },
    /// The action conflicts with the current state.
    Conflict {
        /// A human-readable description.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ValidationFailed { errors } => {
                let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
                write!(f, "Validation failed: {}", messages.join("; "))
            }
            Self::DuplicatePeriod { message, .. }
            | Self::Forbidden { message }
            | Self::Conflict { message } => write!(f, "{message}"),
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
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
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::InvalidRange { .. } => ApiError::InvalidInput {
            field: String::from("toDate"),
            message,
        },
        DomainError::HalfDaySpansMultipleDays { .. } | DomainError::InvalidHalfDay(_) => {
            ApiError::InvalidInput {
                field: String::from("isHalfDay"),
                message,
            }
        }
        DomainError::UnresolvedApprovalChain { .. } => ApiError::DomainRuleViolation {
            rule: String::from("approval_chain"),
            message,
        },
        DomainError::UnknownStage { .. } => ApiError::ResourceNotFound {
            resource_type: String::from("Stage"),
            message,
        },
        DomainError::AlreadyDecided { .. } => ApiError::Conflict { message },
        DomainError::ForbiddenActor { .. } => ApiError::Forbidden { message },
        DomainError::InvalidApprovalStatus(_) => ApiError::InvalidInput {
            field: String::from("status"),
            message,
        },
        DomainError::InvalidStage(_) => ApiError::InvalidInput {
            field: String::from("stage"),
            message,
        },
        DomainError::InvalidDecision(_) => ApiError::InvalidInput {
            field: String::from("decision"),
            message,
        },
        DomainError::InvalidLeaveType(_) => ApiError::InvalidInput {
            field: String::from("typeOfLeave"),
            message,
        },
        DomainError::InvalidRequesterKind(_) => ApiError::InvalidInput {
            field: String::from("kind"),
            message,
        },
        DomainError::DateArithmeticOverflow { .. } | DomainError::DateParseError { .. } => {
            ApiError::InvalidInput {
                field: String::from("date"),
                message,
            }
        }
    }
}

/// Translates admission failures into an API error.
///
/// An overlap that is the only failure gets its own kind so clients can
/// branch on it; otherwise every failure is listed together.
#[must_use]
pub fn translate_admission_errors(errs: AdmissionErrors) -> ApiError {
    if errs.is_duplicate_period_only() {
        let existing_request_id: Option<i64> = errs.errors().iter().find_map(|e| match e {
            AdmissionError::DuplicatePeriod {
                existing_request_id,
            } => Some(*existing_request_id),
            _ => None,
        });
        return ApiError::DuplicatePeriod {
            existing_request_id,
            message: errs
                .errors()
                .first()
                .map(ToString::to_string)
                .unwrap_or_default(),
        };
    }

    ApiError::ValidationFailed {
        errors: errs.errors().iter().map(FieldError::from).collect(),
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::AdmissionRejected(errs) => translate_admission_errors(errs),
    }
}

/// Translates a persistence error into an API error.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    let message: String = err.to_string();
    match err {
        PersistenceError::RequestNotFound(_) => ApiError::ResourceNotFound {
            resource_type: String::from("Leave request"),
            message,
        },
        PersistenceError::StageNotFound { .. } => ApiError::ResourceNotFound {
            resource_type: String::from("Stage"),
            message,
        },
        PersistenceError::StageAlreadyDecided { .. } => ApiError::Conflict { message },
        PersistenceError::OverlappingPeriod {
            existing_request_id,
            ..
        } => ApiError::DuplicatePeriod {
            existing_request_id,
            message: AdmissionError::DuplicatePeriod {
                existing_request_id: existing_request_id.unwrap_or_default(),
            }
            .to_string(),
        },
        _ => ApiError::Internal { message },
    }
}
