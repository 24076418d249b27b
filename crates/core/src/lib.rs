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

mod apply;
mod command;
mod error;
mod request;
mod state;

#[cfg(test)]
mod tests;

use leavedesk_domain::{
    ApprovalChain, ExistingLeave, LeaveCandidate, OrgRefs, RequesterKind, ValidatedLeave,
    resolve_stages, validate_admission,
};
use time::Date;

// Re-export public types and functions
pub use apply::{apply, apply_submission};
pub use command::Command;
pub use error::CoreError;
pub use request::{LeaveRequest, StageApproval};
pub use state::TransitionResult;

/// Runs admission validation for a submission.
///
/// This is a read-only validation that does not create audit events.
///
/// # Arguments
///
/// * `candidate` - The request as submitted
/// * `existing` - The requester's stored requests
/// * `today` - The current day in the institution's time zone
///
/// # Errors
///
/// Returns `CoreError::AdmissionRejected` with every violation found.
pub fn admit(
    candidate: &LeaveCandidate,
    existing: &[ExistingLeave],
    today: Date,
) -> Result<ValidatedLeave, CoreError> {
    Ok(validate_admission(candidate, existing, today)?)
}

/// Resolves the approval chain for a requester.
///
/// # Errors
///
/// Returns `CoreError::DomainViolation` if a required approver is missing.
pub fn resolve_chain(kind: RequesterKind, refs: &OrgRefs) -> Result<ApprovalChain, CoreError> {
    Ok(resolve_stages(kind, refs)?)
}
