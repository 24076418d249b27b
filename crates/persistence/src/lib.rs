// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for Leave Desk.
//!
//! This crate stores leave requests, their approval stages and audit events
//! in `SQLite` through Diesel.
//!
//! ## Schema
//!
//! - `leave_requests` — one row per request, with a cached `overall_status`
//! - `leave_approvals` — one row per stage, ordered by `sequence`
//! - `audit_events` — one row per successful state change
//!
//! A partial unique index on `(requester_id, from_date)` over non-rejected
//! rows backs the overlap check performed inside the insert transaction.
//!
//! ## Concurrency
//!
//! Every multi-row mutation runs in an immediate transaction. Stage
//! decisions are conditional updates that only match a `pending` row, so a
//! stale in-memory copy of a request can never overwrite a decision another
//! approver already recorded.
//!
//! ## Testing
//!
//! Tests use a uniquely named shared in-memory database per adapter.

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
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use leavedesk::{LeaveRequest, TransitionResult};
use leavedesk_audit::AuditEvent;
use leavedesk_domain::{ExistingLeave, RequesterId, StaffId, StageId};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::PersistedRequest;
pub use error::PersistenceError;

use backend::PersistenceBackend;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter for leave requests and audit events.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled on the connection.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        self.conn.verify_foreign_key_enforcement()
    }

    /// Stores a submitted request, its stages and the submission audit event.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::OverlappingPeriod` if the requester already
    /// holds a non-rejected request sharing a day with this one.
    pub fn insert_request(
        &mut self,
        result: &TransitionResult,
    ) -> Result<PersistedRequest, PersistenceError> {
        mutations::insert_request(&mut self.conn, result)
    }

    /// Records a stage decision and its audit event.
    ///
    /// # Returns
    ///
    /// The ID of the persisted audit event.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::StageAlreadyDecided` if the stored stage is
    /// no longer pending.
    pub fn record_decision(
        &mut self,
        result: &TransitionResult,
        stage: StageId,
    ) -> Result<i64, PersistenceError> {
        mutations::record_decision(&mut self.conn, result, stage)
    }

    /// Retrieves a leave request by ID.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::RequestNotFound` if it does not exist.
    pub fn get_request(&mut self, request_id: i64) -> Result<LeaveRequest, PersistenceError> {
        queries::get_request(&mut self.conn, request_id)
    }

    /// Lists every request filed by a requester.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_requests_for_requester(
        &mut self,
        requester_id: &RequesterId,
    ) -> Result<Vec<LeaveRequest>, PersistenceError> {
        queries::list_requests_for_requester(&mut self.conn, requester_id.value())
    }

    /// Lists requests on which the approver has a pending stage.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_pending_for_approver(
        &mut self,
        approver_id: &StaffId,
    ) -> Result<Vec<LeaveRequest>, PersistenceError> {
        queries::list_pending_for_approver(&mut self.conn, approver_id.value())
    }

    /// Lists the requester's stored periods for admission validation.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_existing_leaves(
        &mut self,
        requester_id: &RequesterId,
    ) -> Result<Vec<ExistingLeave>, PersistenceError> {
        queries::list_existing_leaves(&mut self.conn, requester_id.value())
    }

    /// Retrieves an audit event by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the event does not exist.
    pub fn get_audit_event(&mut self, event_id: i64) -> Result<AuditEvent, PersistenceError> {
        queries::get_audit_event(&mut self.conn, event_id)
    }

    /// Retrieves the audit trail of a request, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_audit_events_for_request(
        &mut self,
        request_id: i64,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::get_audit_events_for_request(&mut self.conn, request_id)
    }
}
