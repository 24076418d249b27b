// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Leave request admission and stage decision mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use leavedesk::{LeaveRequest, StageApproval, TransitionResult};
use leavedesk_audit::AuditEvent;
use leavedesk_domain::{ApprovalStatus, StageId, format_date, project_overall_status};
use tracing::{info, warn};

use crate::backend::PersistenceBackend;
use crate::data_models::{NewApprovalRow, NewLeaveRequestRow, PersistedRequest, format_timestamp};
use crate::diesel_schema::{leave_approvals, leave_requests};
use crate::error::PersistenceError;
use crate::mutations::audit::persist_audit_event;
use crate::queries::requests::find_overlapping_request;

fn to_column_count(value: u32, column: &str) -> Result<i32, PersistenceError> {
    i32::try_from(value).map_err(|_| {
        PersistenceError::SerializationError(format!("{column} value {value} is out of range"))
    })
}

/// Stores a newly submitted request with its stages and audit event.
///
/// Overlap with the requester's live requests is checked again inside the
/// transaction, so two concurrent submissions for the same period cannot both
/// be admitted. The partial unique index on `(requester_id, from_date)` backs
/// the check.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `result` - The submission transition
///
/// # Errors
///
/// Returns `PersistenceError::OverlappingPeriod` if the period intersects a
/// non-rejected request of the same requester, or a database error.
pub fn insert_request(
    conn: &mut SqliteConnection,
    result: &TransitionResult,
) -> Result<PersistedRequest, PersistenceError> {
    let request: &LeaveRequest = &result.new_state;
    let requester_id: &str = request.requester.id().value();
    let from_date: String = format_date(request.period.from_date());
    let to_date: String = format_date(request.period.to_date());

    let row: NewLeaveRequestRow<'_> = NewLeaveRequestRow {
        requester_id,
        requester_kind: request.requester.kind().as_str(),
        requester_json: serde_json::to_string(&request.requester)?,
        name: &request.name,
        from_date: from_date.clone(),
        to_date: to_date.clone(),
        half_day: request.period.half_day().map(|half_day| half_day.as_str()),
        chargeable_days: to_column_count(request.duration.chargeable_days, "chargeable_days")?,
        calendar_span_days: to_column_count(
            request.duration.calendar_span_days,
            "calendar_span_days",
        )?,
        for_medical: i32::from(request.classification.for_medical()),
        type_of_leave: request
            .classification
            .type_of_leave()
            .map(|leave_type| leave_type.as_str()),
        reason: &request.reason,
        overall_status: request.overall_status().as_str(),
        created_at: format_timestamp(request.created_at)?,
        updated_at: format_timestamp(request.updated_at)?,
        version: request.version,
    };

    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        if let Some(existing_request_id) =
            find_overlapping_request(conn, requester_id, &from_date, &to_date)?
        {
            warn!(
                requester_id,
                existing_request_id, "Rejected overlapping leave request at insert"
            );
            return Err(PersistenceError::OverlappingPeriod {
                requester_id: requester_id.to_string(),
                existing_request_id: Some(existing_request_id),
            });
        }

        diesel::insert_into(leave_requests::table)
            .values(&row)
            .execute(conn)
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    PersistenceError::OverlappingPeriod {
                        requester_id: requester_id.to_string(),
                        existing_request_id: None,
                    }
                }
                other => PersistenceError::from(other),
            })?;

        let request_id: i64 = conn.get_last_insert_rowid()?;

        for (index, approval) in request.approvals().iter().enumerate() {
            insert_approval(conn, request_id, index, approval)?;
        }

        let event: AuditEvent = result.audit_event.clone().with_request_id(request_id);
        let event_id: i64 = persist_audit_event(conn, &event)?;

        info!(
            request_id,
            requester_id,
            kind = request.requester.kind().as_str(),
            stages = request.approvals().len(),
            "Stored leave request"
        );

        Ok(PersistedRequest {
            request_id,
            event_id,
        })
    })
}

fn insert_approval(
    conn: &mut SqliteConnection,
    request_id: i64,
    index: usize,
    approval: &StageApproval,
) -> Result<(), PersistenceError> {
    let sequence: i32 = i32::try_from(index).map_err(|_| {
        PersistenceError::SerializationError(format!("stage index {index} is out of range"))
    })?;
    let decided_at: Option<String> = approval.decided_at.map(format_timestamp).transpose()?;

    diesel::insert_into(leave_approvals::table)
        .values(&NewApprovalRow {
            request_id,
            sequence,
            stage: approval.stage.as_str(),
            approver_id: approval.approver.value(),
            status: approval.status.as_str(),
            decided_at,
        })
        .execute(conn)?;

    Ok(())
}

/// Persists one stage decision as a conditional update.
///
/// The stage row is only updated while it is still `pending`. The overall
/// status is then recomputed from the stored stage rows and the request's
/// version is incremented, all in the same transaction. Two approvers
/// deciding different stages concurrently therefore never overwrite each
/// other's result.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `result` - The decision transition
/// * `stage` - The stage that was decided
///
/// # Returns
///
/// The ID of the persisted audit event.
///
/// # Errors
///
/// Returns an error if:
/// - the request has no ID or the stage is not stored for it
/// - the stage was already decided (zero rows matched the update)
/// - a database error occurs
pub fn record_decision(
    conn: &mut SqliteConnection,
    result: &TransitionResult,
    stage: StageId,
) -> Result<i64, PersistenceError> {
    let request: &LeaveRequest = &result.new_state;
    let request_id: i64 = request.request_id.ok_or(PersistenceError::UnsavedRequest)?;
    let approval: &StageApproval = request
        .stage(stage)
        .ok_or(PersistenceError::StageNotFound { request_id, stage })?;
    let decided_at: Option<String> = approval.decided_at.map(format_timestamp).transpose()?;
    let updated_at: String = format_timestamp(request.updated_at)?;

    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        let rows_affected: usize = diesel::update(leave_approvals::table)
            .filter(leave_approvals::request_id.eq(request_id))
            .filter(leave_approvals::stage.eq(stage.as_str()))
            .filter(leave_approvals::status.eq(ApprovalStatus::Pending.as_str()))
            .set((
                leave_approvals::status.eq(approval.status.as_str()),
                leave_approvals::decided_at.eq(&decided_at),
            ))
            .execute(conn)?;

        if rows_affected == 0 {
            let stored: i64 = leave_approvals::table
                .filter(leave_approvals::request_id.eq(request_id))
                .filter(leave_approvals::stage.eq(stage.as_str()))
                .count()
                .get_result(conn)?;
            warn!(
                request_id,
                stage = stage.as_str(),
                "Conditional stage update matched no pending row"
            );
            return Err(if stored == 0 {
                PersistenceError::StageNotFound { request_id, stage }
            } else {
                PersistenceError::StageAlreadyDecided { request_id, stage }
            });
        }

        let stored_statuses: Vec<String> = leave_approvals::table
            .filter(leave_approvals::request_id.eq(request_id))
            .select(leave_approvals::status)
            .load(conn)?;
        let statuses: Vec<ApprovalStatus> = stored_statuses
            .iter()
            .map(|s| s.parse::<ApprovalStatus>())
            .collect::<Result<Vec<ApprovalStatus>, _>>()
            .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;
        let overall: ApprovalStatus = project_overall_status(statuses);

        diesel::update(leave_requests::table.find(request_id))
            .set((
                leave_requests::overall_status.eq(overall.as_str()),
                leave_requests::updated_at.eq(&updated_at),
                leave_requests::version.eq(leave_requests::version + 1),
            ))
            .execute(conn)?;

        let event: AuditEvent = result.audit_event.clone().with_request_id(request_id);
        let event_id: i64 = persist_audit_event(conn, &event)?;

        info!(
            request_id,
            stage = stage.as_str(),
            status = approval.status.as_str(),
            overall_status = overall.as_str(),
            "Recorded stage decision"
        );

        Ok(event_id)
    })
}
