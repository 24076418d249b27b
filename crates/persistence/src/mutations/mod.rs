// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations for the persistence layer.
//!
//! ## Module Organization
//!
//! - `audit` — Audit event persistence
//! - `requests` — Leave request admission and stage decisions
//!
//! Every mutation that touches more than one row runs inside a single
//! immediate transaction so the write lock is taken before any check.

pub mod audit;
pub mod requests;

pub use audit::persist_audit_event;
pub use requests::{insert_request, record_decision};
