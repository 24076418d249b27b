// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Leave request queries and reconstruction.
//!
//! Requests are stored as one `leave_requests` row plus one
//! `leave_approvals` row per stage. Reconstruction reassembles the core
//! [`LeaveRequest`]; the stored `overall_status` column is only used for
//! filtering, the returned value always projects from the stage rows.

use std::collections::BTreeMap;

use diesel::SqliteConnection;
use diesel::prelude::*;
use leavedesk::{LeaveRequest, StageApproval};
use leavedesk_domain::{
    ApprovalStatus, ExistingLeave, HalfDay, LeaveClassification, LeaveDuration, LeavePeriod,
    LeaveType, Requester, RequesterKind, StaffId, StageId, parse_date,
};
use time::Date;

use crate::data_models::{ApprovalRow, LeaveRequestRow, parse_timestamp};
use crate::diesel_schema::{leave_approvals, leave_requests};
use crate::error::PersistenceError;

fn reconstruction<E: std::fmt::Display>(context: &str) -> impl Fn(E) -> PersistenceError + '_ {
    move |e| PersistenceError::ReconstructionError(format!("{context}: {e}"))
}

fn to_count(value: i32, column: &str) -> Result<u32, PersistenceError> {
    u32::try_from(value).map_err(|_| {
        PersistenceError::ReconstructionError(format!("{column} holds negative value {value}"))
    })
}

fn row_to_approval(row: ApprovalRow) -> Result<StageApproval, PersistenceError> {
    Ok(StageApproval {
        stage: row
            .stage
            .parse::<StageId>()
            .map_err(reconstruction("stage"))?,
        approver: StaffId::new(&row.approver_id),
        status: row
            .status
            .parse::<ApprovalStatus>()
            .map_err(reconstruction("stage status"))?,
        decided_at: row.decided_at.as_deref().map(parse_timestamp).transpose()?,
    })
}

/// Rebuilds a core request from its stored row and stage rows.
///
/// # Errors
///
/// Returns `PersistenceError::ReconstructionError` if any stored value does
/// not map back onto a domain value.
pub fn reconstruct_request(
    row: LeaveRequestRow,
    approvals: Vec<ApprovalRow>,
) -> Result<LeaveRequest, PersistenceError> {
    let requester: Requester =
        serde_json::from_str(&row.requester_json).map_err(reconstruction("requester"))?;
    let kind: RequesterKind = row
        .requester_kind
        .parse::<RequesterKind>()
        .map_err(reconstruction("requester kind"))?;
    if kind != requester.kind() {
        return Err(PersistenceError::ReconstructionError(format!(
            "request {} is stored as '{}' but its requester is '{}'",
            row.request_id,
            kind.as_str(),
            requester.kind().as_str()
        )));
    }

    let half_day: Option<HalfDay> = row
        .half_day
        .as_deref()
        .map(str::parse::<HalfDay>)
        .transpose()
        .map_err(reconstruction("half day"))?;
    let from_date: Date = parse_date(&row.from_date).map_err(reconstruction("from_date"))?;
    let to_date: Date = parse_date(&row.to_date).map_err(reconstruction("to_date"))?;
    let period: LeavePeriod =
        LeavePeriod::new(from_date, to_date, half_day).map_err(reconstruction("period"))?;

    let duration: LeaveDuration = LeaveDuration {
        chargeable_days: to_count(row.chargeable_days, "chargeable_days")?,
        calendar_span_days: to_count(row.calendar_span_days, "calendar_span_days")?,
        half_day,
    };

    let classification: LeaveClassification = match kind {
        RequesterKind::Student => LeaveClassification::Student {
            for_medical: row.for_medical != 0,
        },
        RequesterKind::Staff => {
            let raw: &str = row.type_of_leave.as_deref().ok_or_else(|| {
                PersistenceError::ReconstructionError(format!(
                    "staff request {} has no type of leave",
                    row.request_id
                ))
            })?;
            LeaveClassification::Staff {
                type_of_leave: raw
                    .parse::<LeaveType>()
                    .map_err(reconstruction("type of leave"))?,
            }
        }
    };

    let stages: Vec<StageApproval> = approvals
        .into_iter()
        .map(row_to_approval)
        .collect::<Result<Vec<StageApproval>, PersistenceError>>()?;

    Ok(LeaveRequest::restore(
        row.request_id,
        requester,
        row.name,
        period,
        duration,
        classification,
        row.reason,
        stages,
        parse_timestamp(&row.created_at)?,
        parse_timestamp(&row.updated_at)?,
        row.version,
    ))
}

/// Loads the stage rows for a set of requests, grouped by request and in
/// sequence order.
fn load_approvals(
    conn: &mut SqliteConnection,
    request_ids: &[i64],
) -> Result<BTreeMap<i64, Vec<ApprovalRow>>, PersistenceError> {
    let rows: Vec<ApprovalRow> = leave_approvals::table
        .filter(leave_approvals::request_id.eq_any(request_ids))
        .order((
            leave_approvals::request_id.asc(),
            leave_approvals::sequence.asc(),
        ))
        .select(ApprovalRow::as_select())
        .load(conn)?;

    let mut grouped: BTreeMap<i64, Vec<ApprovalRow>> = BTreeMap::new();
    for row in rows {
        grouped.entry(row.request_id).or_default().push(row);
    }
    Ok(grouped)
}

fn reconstruct_all(
    conn: &mut SqliteConnection,
    rows: Vec<LeaveRequestRow>,
) -> Result<Vec<LeaveRequest>, PersistenceError> {
    let request_ids: Vec<i64> = rows.iter().map(|row| row.request_id).collect();
    let mut approvals: BTreeMap<i64, Vec<ApprovalRow>> = load_approvals(conn, &request_ids)?;

    rows.into_iter()
        .map(|row| {
            let stages: Vec<ApprovalRow> = approvals.remove(&row.request_id).unwrap_or_default();
            reconstruct_request(row, stages)
        })
        .collect()
}

/// Retrieves one leave request with its stages.
///
/// # Errors
///
/// Returns `PersistenceError::RequestNotFound` if no such request exists.
pub fn get_request(
    conn: &mut SqliteConnection,
    request_id: i64,
) -> Result<LeaveRequest, PersistenceError> {
    let row: LeaveRequestRow = leave_requests::table
        .find(request_id)
        .select(LeaveRequestRow::as_select())
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::RequestNotFound(request_id))?;

    let mut approvals: BTreeMap<i64, Vec<ApprovalRow>> = load_approvals(conn, &[request_id])?;
    reconstruct_request(row, approvals.remove(&request_id).unwrap_or_default())
}

/// Lists every request filed by a requester, newest start date first.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn list_requests_for_requester(
    conn: &mut SqliteConnection,
    requester_id: &str,
) -> Result<Vec<LeaveRequest>, PersistenceError> {
    let rows: Vec<LeaveRequestRow> = leave_requests::table
        .filter(leave_requests::requester_id.eq(requester_id))
        .order((
            leave_requests::from_date.desc(),
            leave_requests::request_id.desc(),
        ))
        .select(LeaveRequestRow::as_select())
        .load(conn)?;

    reconstruct_all(conn, rows)
}

/// Lists the requests on which the approver still has a pending stage.
///
/// Requests that are already rejected overall are included while the
/// approver's own stage remains pending.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be reconstructed.
pub fn list_pending_for_approver(
    conn: &mut SqliteConnection,
    approver_id: &str,
) -> Result<Vec<LeaveRequest>, PersistenceError> {
    let rows: Vec<LeaveRequestRow> = leave_requests::table
        .inner_join(leave_approvals::table)
        .filter(leave_approvals::approver_id.eq(approver_id))
        .filter(leave_approvals::status.eq(ApprovalStatus::Pending.as_str()))
        .order((
            leave_requests::from_date.asc(),
            leave_requests::request_id.asc(),
        ))
        .select(LeaveRequestRow::as_select())
        .distinct()
        .load(conn)?;

    reconstruct_all(conn, rows)
}

/// Lists a requester's stored periods in the form admission validation expects.
///
/// # Errors
///
/// Returns an error if the query fails or a stored value is malformed.
pub fn list_existing_leaves(
    conn: &mut SqliteConnection,
    requester_id: &str,
) -> Result<Vec<ExistingLeave>, PersistenceError> {
    let rows: Vec<(i64, String, String, String)> = leave_requests::table
        .filter(leave_requests::requester_id.eq(requester_id))
        .select((
            leave_requests::request_id,
            leave_requests::from_date,
            leave_requests::to_date,
            leave_requests::overall_status,
        ))
        .load(conn)?;

    rows.into_iter()
        .map(|(request_id, from_date, to_date, status)| {
            Ok(ExistingLeave {
                request_id,
                from_date: parse_date(&from_date).map_err(reconstruction("from_date"))?,
                to_date: parse_date(&to_date).map_err(reconstruction("to_date"))?,
                status: status
                    .parse::<ApprovalStatus>()
                    .map_err(reconstruction("overall status"))?,
            })
        })
        .collect()
}

/// Finds a non-rejected request of the requester that shares a day with the
/// given inclusive range.
///
/// Dates are stored as `YYYY-MM-DD`, so text comparison orders them
/// chronologically.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_overlapping_request(
    conn: &mut SqliteConnection,
    requester_id: &str,
    from_date: &str,
    to_date: &str,
) -> Result<Option<i64>, PersistenceError> {
    let existing: Option<i64> = leave_requests::table
        .filter(leave_requests::requester_id.eq(requester_id))
        .filter(leave_requests::overall_status.ne(ApprovalStatus::Rejected.as_str()))
        .filter(leave_requests::from_date.le(to_date))
        .filter(leave_requests::to_date.ge(from_date))
        .order(leave_requests::request_id.asc())
        .select(leave_requests::request_id)
        .first(conn)
        .optional()?;

    Ok(existing)
}
