// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::approval_chain::StageId;
use crate::status::ApprovalStatus;
use crate::types::StaffId;

/// Errors that can occur while evaluating domain rules.
///
/// Field-level admission failures are reported separately through
/// [`crate::AdmissionErrors`] so that every violation can be collected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A date range was supplied with its start after its end.
    InvalidRange {
        /// The start of the range.
        from: time::Date,
        /// The end of the range.
        to: time::Date,
    },
    /// A half-day leave was requested across more than one calendar day.
    HalfDaySpansMultipleDays {
        /// The start of the range.
        from: time::Date,
        /// The end of the range.
        to: time::Date,
    },
    /// Reference data needed to build the approval chain is missing.
    UnresolvedApprovalChain {
        /// The stage that could not be bound to an approver.
        stage: StageId,
        /// Description of the missing reference data.
        reason: String,
    },
    /// The stage is not part of the request's resolved chain.
    UnknownStage {
        /// The stage that was addressed.
        stage: StageId,
    },
    /// The stage has already reached a terminal status.
    AlreadyDecided {
        /// The stage that was addressed.
        stage: StageId,
        /// The terminal status the stage holds.
        status: ApprovalStatus,
    },
    /// The acting staff member is not the approver bound to the stage.
    ForbiddenActor {
        /// The stage that was addressed.
        stage: StageId,
        /// The staff member who attempted the decision.
        actor: StaffId,
    },
    /// A status string could not be parsed.
    InvalidApprovalStatus(String),
    /// A stage identifier string could not be parsed.
    InvalidStage(String),
    /// A decision string could not be parsed.
    InvalidDecision(String),
    /// A leave category string could not be parsed.
    InvalidLeaveType(String),
    /// A half-day marker string could not be parsed.
    InvalidHalfDay(String),
    /// A requester kind string could not be parsed.
    InvalidRequesterKind(String),
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
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
            Self::InvalidRange { from, to } => {
                write!(f, "Invalid date range: {from} is after {to}")
            }
            Self::HalfDaySpansMultipleDays { from, to } => {
                write!(
                    f,
                    "A half-day leave must cover a single day, but {from} to {to} spans several"
                )
            }
            Self::UnresolvedApprovalChain { stage, reason } => {
                write!(
                    f,
                    "Cannot resolve approval chain: no {} approver ({reason})",
                    stage.label()
                )
            }
            Self::UnknownStage { stage } => {
                write!(
                    f,
                    "Stage '{}' is not part of this request's approval chain",
                    stage.as_str()
                )
            }
            Self::AlreadyDecided { stage, status } => {
                write!(
                    f,
                    "Stage '{}' has already been decided ({})",
                    stage.as_str(),
                    status.as_str()
                )
            }
            Self::ForbiddenActor { stage, actor } => {
                write!(
                    f,
                    "Staff member '{}' is not the approver for stage '{}'",
                    actor.value(),
                    stage.as_str()
                )
            }
            Self::InvalidApprovalStatus(value) => write!(f, "Invalid approval status: {value}"),
            Self::InvalidStage(value) => write!(f, "Invalid approval stage: {value}"),
            Self::InvalidDecision(value) => write!(f, "Invalid decision: {value}"),
            Self::InvalidLeaveType(value) => write!(f, "Invalid type of leave: {value}"),
            Self::InvalidHalfDay(value) => {
                write!(f, "Invalid half-day marker: {value}. Must be FN or AN")
            }
            Self::InvalidRequesterKind(value) => {
                write!(
                    f,
                    "Invalid requester kind: {value}. Must be Student or Staff"
                )
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
