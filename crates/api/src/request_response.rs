// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Field names follow the leave form's wire spelling (`fromDate`,
//! `isHalfDay`, `typeOfLeave`, ...).

use leavedesk::{LeaveRequest, StageApproval};
use leavedesk_domain::{LeaveDuration, format_date};
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;

/// API request to file a new leave request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitLeaveRequest {
    /// First day of leave (`YYYY-MM-DD`).
    #[serde(default)]
    pub from_date: Option<String>,
    /// Last day of leave (`YYYY-MM-DD`); optional for single-day and half-day leave.
    #[serde(default)]
    pub to_date: Option<String>,
    /// Marks the leave as covering `fromDate` only.
    #[serde(default)]
    pub single_day: bool,
    /// `"FN"` or `"AN"` for half-day leave.
    #[serde(default, rename = "isHalfDay")]
    pub half_day: Option<String>,
    #[serde(default)]
    pub reason: String,
    /// Staff leave category, e.g. `"Sick Leave"`. Ignored for students.
    #[serde(default)]
    pub type_of_leave: Option<String>,
    /// Student-only medical flag.
    #[serde(default)]
    pub for_medical: bool,
    /// Client-computed duration. Accepted for compatibility and ignored.
    #[serde(default)]
    pub no_of_days: Option<f64>,
}

/// API request to decide one approval stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecideStageRequest {
    /// `mentor`, `class_incharge` or `hod`.
    pub stage: String,
    /// The staff member making the decision.
    pub approver_id: String,
    /// `approve` or `reject`.
    pub decision: String,
}

/// One approval stage as reported to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageApprovalInfo {
    pub stage: String,
    pub approver_id: String,
    pub status: String,
    pub decided_at: Option<String>,
}

/// A leave request as reported to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequestResponse {
    pub request_id: i64,
    pub requester_id: String,
    pub requester_kind: String,
    pub name: String,
    pub from_date: String,
    pub to_date: String,
    #[serde(rename = "isHalfDay")]
    pub half_day: Option<String>,
    /// Effective duration in days, half-day scaling applied.
    pub no_of_days: f64,
    pub chargeable_days: u32,
    pub calendar_span_days: u32,
    pub for_medical: bool,
    pub type_of_leave: Option<String>,
    pub reason: String,
    pub approvals: Vec<StageApprovalInfo>,
    pub overall_status: String,
    pub created_at: String,
    pub updated_at: String,
    pub version: i64,
}

/// API response listing leave requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListLeaveRequestsResponse {
    pub requests: Vec<LeaveRequestResponse>,
}

/// API response for a duration preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationResponse {
    pub from_date: String,
    pub to_date: String,
    #[serde(rename = "isHalfDay")]
    pub half_day: Option<String>,
    pub chargeable_days: u32,
    pub calendar_span_days: u32,
    pub no_of_days: f64,
}

impl DurationResponse {
    #[must_use]
    pub fn new(from_date: time::Date, to_date: time::Date, duration: &LeaveDuration) -> Self {
        Self {
            from_date: format_date(from_date),
            to_date: format_date(to_date),
            half_day: duration.half_day.map(|h| h.as_str().to_string()),
            chargeable_days: duration.chargeable_days,
            calendar_span_days: duration.calendar_span_days,
            no_of_days: duration.no_of_days(),
        }
    }
}

fn format_instant(instant: time::OffsetDateTime) -> String {
    instant
        .format(&Rfc3339)
        .unwrap_or_else(|_| instant.to_string())
}

impl From<&StageApproval> for StageApprovalInfo {
    fn from(approval: &StageApproval) -> Self {
        Self {
            stage: approval.stage.as_str().to_string(),
            approver_id: approval.approver.value().to_string(),
            status: approval.status.as_str().to_string(),
            decided_at: approval.decided_at.map(format_instant),
        }
    }
}

impl LeaveRequestResponse {
    /// Builds the response for a stored request.
    ///
    /// Returns `None` if the request has not been assigned an ID yet.
    #[must_use]
    pub fn from_request(request: &LeaveRequest) -> Option<Self> {
        let request_id: i64 = request.request_id?;

        Some(Self {
            request_id,
            requester_id: request.requester.id().value().to_string(),
            requester_kind: request.requester.kind().as_str().to_string(),
            name: request.name.clone(),
            from_date: format_date(request.period.from_date()),
            to_date: format_date(request.period.to_date()),
            half_day: request.period.half_day().map(|h| h.as_str().to_string()),
            no_of_days: request.duration.no_of_days(),
            chargeable_days: request.duration.chargeable_days,
            calendar_span_days: request.duration.calendar_span_days,
            for_medical: request.classification.for_medical(),
            type_of_leave: request
                .classification
                .type_of_leave()
                .map(|t| t.as_str().to_string()),
            reason: request.reason.clone(),
            approvals: request
                .approvals()
                .iter()
                .map(StageApprovalInfo::from)
                .collect(),
            overall_status: request.overall_status().as_str().to_string(),
            created_at: format_instant(request.created_at),
            updated_at: format_instant(request.updated_at),
            version: request.version,
        })
    }
}
