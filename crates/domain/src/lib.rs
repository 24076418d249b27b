// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod approval_chain;
mod error;
mod status;
mod types;
mod validation;
mod working_days;

#[cfg(test)]
mod tests;

pub use approval_chain::{ApprovalChain, OrgRefs, StageBinding, StageId, resolve_stages};
pub use error::DomainError;
pub use status::{ApprovalStatus, Decision, project_overall_status};
pub use types::{
    BatchId, DATE_FORMAT, DepartmentId, HalfDay, LeaveClassification, LeavePeriod, LeaveType,
    Requester, RequesterId, RequesterKind, SectionId, StaffId, format_date, parse_date,
};
pub use validation::{
    AdmissionError, AdmissionErrors, ExistingLeave, LeaveCandidate, MAX_REASON_LENGTH,
    ValidatedLeave, validate_admission,
};
pub use working_days::{
    LeaveDuration, calendar_span_days, compute_duration, count_chargeable_days,
    institutional_today, is_working_day, second_saturday,
};
