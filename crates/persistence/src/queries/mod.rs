// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `audit` — Audit event retrieval
//! - `requests` — Leave request retrieval and reconstruction

pub mod audit;
pub mod requests;

pub use audit::{get_audit_event, get_audit_events_for_request};
pub use requests::{
    find_overlapping_request, get_request, list_existing_leaves, list_pending_for_approver,
    list_requests_for_requester,
};
