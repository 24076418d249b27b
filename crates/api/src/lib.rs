// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Application boundary for Leave Desk.
//!
//! Handlers take DTOs, run them through the domain and core crates, store
//! the outcome and return DTOs. Every failure leaves this crate as an
//! [`ApiError`].

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

mod directory;
mod error;
mod handlers;
mod identity;
mod request_response;

#[cfg(test)]
mod tests;

pub use directory::{
    DepartmentEntry, ReferenceDirectory, SectionEntry, StaticDirectory, resolve_org_refs,
};
pub use error::{
    ApiError, FieldError, translate_admission_errors, translate_core_error,
    translate_domain_error, translate_persistence_error,
};
pub use handlers::{
    ApiResult, compute_duration, decide, get_request, list_pending_for_approver,
    list_requests_for_requester, submit,
};
pub use identity::AuthenticatedRequester;
pub use request_response::{
    DecideStageRequest, DurationResponse, LeaveRequestResponse, ListLeaveRequestsResponse,
    StageApprovalInfo, SubmitLeaveRequest,
};
