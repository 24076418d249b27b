// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::diesel_schema::{audit_events, leave_approvals, leave_requests};
use crate::error::PersistenceError;

/// Serializable representation of an Actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub id: String,
    pub actor_type: String,
}

/// Serializable representation of a Cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serializable representation of an Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// Serializable representation of a `StateSnapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshotData {
    pub data: String,
}

/// Identifiers assigned when a new request is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistedRequest {
    /// The request ID assigned by the database.
    pub request_id: i64,
    /// The ID of the submission audit event.
    pub event_id: i64,
}

/// Diesel row for `leave_requests`.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = leave_requests)]
pub struct LeaveRequestRow {
    pub request_id: i64,
    pub requester_id: String,
    pub requester_kind: String,
    pub requester_json: String,
    pub name: String,
    pub from_date: String,
    pub to_date: String,
    pub half_day: Option<String>,
    pub chargeable_days: i32,
    pub calendar_span_days: i32,
    pub for_medical: i32,
    pub type_of_leave: Option<String>,
    pub reason: String,
    pub overall_status: String,
    pub created_at: String,
    pub updated_at: String,
    pub version: i64,
}

/// Insertable form of a `leave_requests` row.
#[derive(Debug, Insertable)]
#[diesel(table_name = leave_requests)]
pub struct NewLeaveRequestRow<'a> {
    pub requester_id: &'a str,
    pub requester_kind: &'a str,
    pub requester_json: String,
    pub name: &'a str,
    pub from_date: String,
    pub to_date: String,
    pub half_day: Option<&'a str>,
    pub chargeable_days: i32,
    pub calendar_span_days: i32,
    pub for_medical: i32,
    pub type_of_leave: Option<&'a str>,
    pub reason: &'a str,
    pub overall_status: &'a str,
    pub created_at: String,
    pub updated_at: String,
    pub version: i64,
}

/// Diesel row for `leave_approvals`.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = leave_approvals)]
pub struct ApprovalRow {
    #[allow(dead_code)]
    pub approval_id: i64,
    pub request_id: i64,
    pub sequence: i32,
    pub stage: String,
    pub approver_id: String,
    pub status: String,
    pub decided_at: Option<String>,
}

/// Insertable form of a `leave_approvals` row.
#[derive(Debug, Insertable)]
#[diesel(table_name = leave_approvals)]
pub struct NewApprovalRow<'a> {
    pub request_id: i64,
    pub sequence: i32,
    pub stage: &'a str,
    pub approver_id: &'a str,
    pub status: &'a str,
    pub decided_at: Option<String>,
}

/// Diesel row for `audit_events`.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = audit_events)]
pub struct AuditEventRow {
    pub event_id: i64,
    pub request_id: Option<i64>,
    pub actor_json: String,
    pub cause_json: String,
    pub action_json: String,
    pub before_snapshot_json: String,
    pub after_snapshot_json: String,
    #[allow(dead_code)]
    pub created_at: String,
}

/// Formats a timestamp for storage (RFC 3339, UTC offset preserved).
///
/// # Errors
///
/// Returns an error if the timestamp cannot be represented in RFC 3339.
pub fn format_timestamp(timestamp: OffsetDateTime) -> Result<String, PersistenceError> {
    timestamp
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// Parses a stored RFC 3339 timestamp.
///
/// # Errors
///
/// Returns an error if the stored value is not valid RFC 3339.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|e| PersistenceError::ReconstructionError(format!("timestamp '{value}': {e}")))
}
