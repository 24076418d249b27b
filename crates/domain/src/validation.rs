// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Admission validation for new leave requests.
//!
//! A candidate request is checked field by field and every violation is
//! collected, so the requester sees all problems in one response rather than
//! fixing them one at a time.

use crate::status::ApprovalStatus;
use crate::types::{HalfDay, LeaveClassification, LeavePeriod, LeaveType, RequesterKind};
use thiserror::Error;
use time::Date;

/// Maximum number of characters allowed in a leave reason.
pub const MAX_REASON_LENGTH: usize = 200;

/// A single field-level admission failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AdmissionError {
    /// No start date was supplied.
    #[error("Leave start date is required")]
    MissingFromDate,

    /// The start date lies before the institution's current day.
    #[error("Leave start date {from_date} is in the past")]
    FromDateInPast { from_date: Date, today: Date },

    /// No end date was supplied for a multi-day request.
    #[error("Leave end date is required")]
    MissingToDate,

    /// The end date precedes the start date.
    #[error("Leave end date must be after the start date")]
    EndBeforeStart { from_date: Date, to_date: Date },

    /// The end date lies before the institution's current day.
    #[error("Leave end date {to_date} is in the past")]
    ToDateInPast { to_date: Date, today: Date },

    /// A half-day request was given an end date on a different day.
    #[error("A half-day leave must start and end on the same day")]
    HalfDaySpansMultipleDays { from_date: Date, to_date: Date },

    /// The reason is empty.
    #[error("Reason is required")]
    EmptyReason,

    /// The reason exceeds the character limit.
    #[error("Reason must be at most {max} characters (got {length})")]
    ReasonTooLong { max: usize, length: usize },

    /// A staff request did not name a leave category.
    #[error("Type of leave is required for staff")]
    MissingLeaveType,

    /// A staff request named a category that does not exist.
    #[error("'{value}' is not a valid type of leave")]
    InvalidLeaveType { value: String },

    /// A staff request carried the student-only medical flag.
    #[error("The medical leave flag applies to students only")]
    MedicalFlagNotAllowed,

    /// The period intersects an existing non-rejected request.
    #[error("You already have a leave request for this period")]
    DuplicatePeriod { existing_request_id: i64 },
}

impl AdmissionError {
    /// Returns the request field this error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::MissingFromDate | Self::FromDateInPast { .. } | Self::DuplicatePeriod { .. } => {
                "fromDate"
            }
            Self::MissingToDate | Self::EndBeforeStart { .. } | Self::ToDateInPast { .. } => {
                "toDate"
            }
            Self::HalfDaySpansMultipleDays { .. } => "isHalfDay",
            Self::EmptyReason | Self::ReasonTooLong { .. } => "reason",
            Self::MissingLeaveType | Self::InvalidLeaveType { .. } => "typeOfLeave",
            Self::MedicalFlagNotAllowed => "forMedical",
        }
    }
}

fn join_messages(errors: &[AdmissionError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<String>>()
        .join("; ")
}

/// Every admission failure found for one candidate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Leave request rejected: {}", join_messages(.errors))]
pub struct AdmissionErrors {
    errors: Vec<AdmissionError>,
}

impl AdmissionErrors {
    #[must_use]
    pub const fn new(errors: Vec<AdmissionError>) -> Self {
        Self { errors }
    }

    #[must_use]
    pub fn errors(&self) -> &[AdmissionError] {
        &self.errors
    }

    #[must_use]
    pub fn into_errors(self) -> Vec<AdmissionError> {
        self.errors
    }

    /// Returns true if one of the failures is an overlapping period.
    #[must_use]
    pub fn has_duplicate_period(&self) -> bool {
        self.errors
            .iter()
            .any(|e| matches!(e, AdmissionError::DuplicatePeriod { .. }))
    }

    /// Returns true if the overlap is the only reason the candidate failed.
    #[must_use]
    pub fn is_duplicate_period_only(&self) -> bool {
        !self.errors.is_empty()
            && self
                .errors
                .iter()
                .all(|e| matches!(e, AdmissionError::DuplicatePeriod { .. }))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }
}

/// A leave request as submitted, before any validation.
///
/// Dates have already been parsed; absent dates are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveCandidate {
    pub kind: RequesterKind,
    pub from_date: Option<Date>,
    pub to_date: Option<Date>,
    pub single_day: bool,
    pub half_day: Option<HalfDay>,
    pub reason: String,
    pub type_of_leave: Option<String>,
    pub for_medical: bool,
}

/// A previously admitted request belonging to the same requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExistingLeave {
    pub request_id: i64,
    pub from_date: Date,
    pub to_date: Date,
    pub status: ApprovalStatus,
}

/// A candidate that passed admission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedLeave {
    pub period: LeavePeriod,
    pub classification: LeaveClassification,
    pub reason: String,
}

/// Works out the effective end date, recording any end-date failures.
fn resolve_to_date(
    candidate: &LeaveCandidate,
    from_date: Date,
    errors: &mut Vec<AdmissionError>,
) -> Option<Date> {
    if let Some(to_date) = candidate.to_date
        && to_date < from_date
    {
        errors.push(AdmissionError::EndBeforeStart { from_date, to_date });
        return None;
    }

    if candidate.half_day.is_some() {
        if let Some(to_date) = candidate.to_date
            && to_date != from_date
        {
            errors.push(AdmissionError::HalfDaySpansMultipleDays { from_date, to_date });
            return None;
        }
        return Some(from_date);
    }

    if candidate.single_day {
        return Some(from_date);
    }

    let Some(to_date) = candidate.to_date else {
        errors.push(AdmissionError::MissingToDate);
        return None;
    };

    Some(to_date)
}

fn validate_reason(reason: &str, errors: &mut Vec<AdmissionError>) {
    let length: usize = reason.trim().chars().count();
    if length == 0 {
        errors.push(AdmissionError::EmptyReason);
    } else if length > MAX_REASON_LENGTH {
        errors.push(AdmissionError::ReasonTooLong {
            max: MAX_REASON_LENGTH,
            length,
        });
    }
}

fn validate_classification(
    candidate: &LeaveCandidate,
    errors: &mut Vec<AdmissionError>,
) -> Option<LeaveClassification> {
    match candidate.kind {
        RequesterKind::Student => Some(LeaveClassification::Student {
            for_medical: candidate.for_medical,
        }),
        RequesterKind::Staff => {
            if candidate.for_medical {
                errors.push(AdmissionError::MedicalFlagNotAllowed);
            }

            let raw: &str = candidate.type_of_leave.as_deref().map_or("", str::trim);
            if raw.is_empty() {
                errors.push(AdmissionError::MissingLeaveType);
                return None;
            }

            match raw.parse::<LeaveType>() {
                Ok(type_of_leave) => Some(LeaveClassification::Staff { type_of_leave }),
                Err(_) => {
                    errors.push(AdmissionError::InvalidLeaveType {
                        value: raw.to_string(),
                    });
                    None
                }
            }
        }
    }
}

/// Validates a candidate leave request for admission.
///
/// # Arguments
///
/// * `candidate` - The request as submitted
/// * `existing` - The requester's previously admitted requests
/// * `today` - The current day in the institution's time zone
///
/// # Returns
///
/// The typed period, classification and trimmed reason.
///
/// # Errors
///
/// Returns `AdmissionErrors` holding every violation found, including a
/// `DuplicatePeriod` when the period intersects (inclusively) any existing
/// request that has not been rejected.
pub fn validate_admission(
    candidate: &LeaveCandidate,
    existing: &[ExistingLeave],
    today: Date,
) -> Result<ValidatedLeave, AdmissionErrors> {
    let mut errors: Vec<AdmissionError> = Vec::new();

    let mut period: Option<LeavePeriod> = None;
    match candidate.from_date {
        None => errors.push(AdmissionError::MissingFromDate),
        Some(from_date) => {
            if from_date < today {
                errors.push(AdmissionError::FromDateInPast { from_date, today });
            }
            if let Some(to_date) = resolve_to_date(candidate, from_date, &mut errors) {
                if to_date < today && to_date != from_date {
                    errors.push(AdmissionError::ToDateInPast { to_date, today });
                }
                period = LeavePeriod::new(from_date, to_date, candidate.half_day).ok();
            }
        }
    }

    validate_reason(&candidate.reason, &mut errors);
    let classification: Option<LeaveClassification> =
        validate_classification(candidate, &mut errors);

    if let Some(period) = period
        && let Some(clash) = existing.iter().find(|leave| {
            leave.status != ApprovalStatus::Rejected
                && period.overlaps(leave.from_date, leave.to_date)
        })
    {
        errors.push(AdmissionError::DuplicatePeriod {
            existing_request_id: clash.request_id,
        });
    }

    match (period, classification) {
        (Some(period), Some(classification)) if errors.is_empty() => Ok(ValidatedLeave {
            period,
            classification,
            reason: candidate.reason.trim().to_string(),
        }),
        _ => Err(AdmissionErrors::new(errors)),
    }
}
