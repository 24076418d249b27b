// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.

use leavedesk::{
    Command, LeaveRequest, TransitionResult, admit, apply, apply_submission, resolve_chain,
};
use leavedesk_audit::{Actor, AuditEvent, Cause};
use leavedesk_domain::{
    ApprovalChain, Decision, ExistingLeave, HalfDay, LeaveCandidate, LeaveDuration, OrgRefs,
    Requester, RequesterId, StaffId, StageId, ValidatedLeave, parse_date,
};
use leavedesk_persistence::{PersistedRequest, Persistence};
use time::{Date, OffsetDateTime};
use tracing::{debug, error, info, warn};

use crate::directory::{ReferenceDirectory, resolve_org_refs};
use crate::error::{
    ApiError, FieldError, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
use crate::identity::AuthenticatedRequester;
use crate::request_response::{
    DecideStageRequest, DurationResponse, LeaveRequestResponse, ListLeaveRequestsResponse,
    SubmitLeaveRequest,
};

/// The result of an API operation that includes both the response and the audit event.
///
/// This ensures that successful API operations always produce an audit trail.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResult<T> {
    /// The API response.
    pub response: T,
    /// The audit event generated by this operation, as persisted.
    pub audit_event: AuditEvent,
}

fn to_response(request: &LeaveRequest) -> Result<LeaveRequestResponse, ApiError> {
    LeaveRequestResponse::from_request(request).ok_or_else(|| ApiError::Internal {
        message: String::from("Leave request has no identifier after persistence"),
    })
}

/// Parses an optional date field, recording a field error on failure.
fn parse_optional_date(
    value: Option<&str>,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<Date> {
    let raw: &str = value.map(str::trim).filter(|v| !v.is_empty())?;
    match parse_date(raw) {
        Ok(date) => Some(date),
        Err(e) => {
            errors.push(FieldError::new(field, e.to_string()));
            None
        }
    }
}

/// Turns the wire form into a validation candidate.
///
/// Values that fail to parse are left out of the candidate and returned as
/// field errors, so admission validation still reports every other failure.
fn to_candidate(
    requester: &Requester,
    request: &SubmitLeaveRequest,
) -> (LeaveCandidate, Vec<FieldError>) {
    let mut errors: Vec<FieldError> = Vec::new();

    let from_date: Option<Date> =
        parse_optional_date(request.from_date.as_deref(), "fromDate", &mut errors);
    let to_date: Option<Date> =
        parse_optional_date(request.to_date.as_deref(), "toDate", &mut errors);

    let half_day: Option<HalfDay> = match request
        .half_day
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        None => None,
        Some(raw) => match raw.parse::<HalfDay>() {
            Ok(half_day) => Some(half_day),
            Err(e) => {
                errors.push(FieldError::new("isHalfDay", e.to_string()));
                None
            }
        },
    };

    let candidate: LeaveCandidate = LeaveCandidate {
        kind: requester.kind(),
        from_date,
        to_date,
        single_day: request.single_day,
        half_day,
        reason: request.reason.clone(),
        type_of_leave: request.type_of_leave.clone(),
        for_medical: request.for_medical,
    };

    (candidate, errors)
}

/// Combines parse failures with the admission outcome into one error.
///
/// A field that failed to parse is reported once, with its parse message.
fn merge_parse_errors(parse_errors: Vec<FieldError>, admission: ApiError) -> ApiError {
    if parse_errors.is_empty() {
        return admission;
    }

    let admission_errors: Vec<FieldError> = match admission {
        ApiError::ValidationFailed { errors } => errors,
        ApiError::DuplicatePeriod { message, .. } => vec![FieldError::new("fromDate", message)],
        other => return other,
    };

    let mut errors: Vec<FieldError> = parse_errors;
    for field_error in admission_errors {
        if !errors.iter().any(|e| e.field == field_error.field) {
            errors.push(field_error);
        }
    }
    ApiError::ValidationFailed { errors }
}

/// Files a new leave request.
///
/// This function:
/// - Validates the request, collecting every field failure
/// - Rejects periods overlapping the requester's live requests
/// - Resolves the approval chain from the reference directory
/// - Computes the duration (any client-supplied value is ignored)
/// - Stores the request with every stage pending
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `directory` - The organizational reference data
/// * `identity` - The verified requester
/// * `request` - The submitted form
/// * `cause` - The cause or reason for this action
/// * `now` - The current instant
/// * `today` - The current day in the institution's time zone
///
/// # Errors
///
/// Returns an error if:
/// - The form is malformed or fails admission (`ValidationFailed`)
/// - The period overlaps a live request (`DuplicatePeriod`)
/// - An approver cannot be resolved (`DomainRuleViolation`)
/// - Persistence fails
pub fn submit<D: ReferenceDirectory + ?Sized>(
    persistence: &mut Persistence,
    directory: &D,
    identity: &AuthenticatedRequester,
    request: &SubmitLeaveRequest,
    cause: Cause,
    now: OffsetDateTime,
    today: Date,
) -> Result<ApiResult<LeaveRequestResponse>, ApiError> {
    let requester: Requester = identity.to_requester()?;
    let (candidate, parse_errors): (LeaveCandidate, Vec<FieldError>) =
        to_candidate(&requester, request);

    if let Some(client_days) = request.no_of_days {
        debug!(
            requester_id = %requester.id(),
            client_days, "Ignoring client-supplied duration"
        );
    }

    let existing: Vec<ExistingLeave> = persistence
        .list_existing_leaves(requester.id())
        .map_err(translate_persistence_error)?;

    let leave: ValidatedLeave = match admit(&candidate, &existing, today) {
        Ok(leave) if parse_errors.is_empty() => leave,
        Ok(_) => {
            warn!(requester_id = %requester.id(), "Leave request has unparseable fields");
            return Err(ApiError::ValidationFailed {
                errors: parse_errors,
            });
        }
        Err(e) => {
            warn!(
                requester_id = %requester.id(),
                error = %e,
                "Leave request rejected at admission"
            );
            return Err(merge_parse_errors(parse_errors, translate_core_error(e)));
        }
    };

    let refs: OrgRefs = resolve_org_refs(directory, identity, &requester);
    let chain: ApprovalChain = resolve_chain(requester.kind(), &refs).map_err(|e| {
        warn!(requester_id = %requester.id(), error = %e, "Approval chain could not be resolved");
        translate_core_error(e)
    })?;

    let actor: Actor = identity.to_audit_actor();
    let result: TransitionResult = apply_submission(
        requester,
        leave,
        identity.name.clone(),
        &chain,
        actor,
        cause,
        now,
    )
    .map_err(translate_core_error)?;

    let persisted: PersistedRequest = persistence
        .insert_request(&result)
        .map_err(translate_persistence_error)?;

    let mut stored: LeaveRequest = result.new_state;
    stored.request_id = Some(persisted.request_id);

    let mut audit_event: AuditEvent = result.audit_event.with_request_id(persisted.request_id);
    audit_event.event_id = Some(persisted.event_id);

    info!(
        request_id = persisted.request_id,
        requester_id = %stored.requester.id(),
        stages = stored.approvals().len(),
        no_of_days = stored.duration.no_of_days(),
        "Leave request submitted"
    );

    Ok(ApiResult {
        response: to_response(&stored)?,
        audit_event,
    })
}

/// Records an approver's decision on one stage of a request.
///
/// The returned response is read back from storage after the decision is
/// committed, so it reflects decisions other approvers made concurrently.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request_id` - The request being decided
/// * `request` - The stage, approver and decision
/// * `cause` - The cause or reason for this action
/// * `now` - The current instant
///
/// # Errors
///
/// Returns an error if:
/// - The stage or decision is not recognized (`InvalidInput`)
/// - The request does not exist, or the stage is not in its chain (`ResourceNotFound`)
/// - The stage was already decided (`Conflict`)
/// - The approver is not bound to the stage (`Forbidden`)
pub fn decide(
    persistence: &mut Persistence,
    request_id: i64,
    request: &DecideStageRequest,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<ApiResult<LeaveRequestResponse>, ApiError> {
    let stage: StageId = request
        .stage
        .parse::<StageId>()
        .map_err(translate_domain_error)?;
    let decision: Decision = request
        .decision
        .parse::<Decision>()
        .map_err(translate_domain_error)?;
    let approver: StaffId = StaffId::new(&request.approver_id);
    if approver.value().is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("approverId"),
            message: String::from("Approver is required"),
        });
    }

    let current: LeaveRequest = persistence
        .get_request(request_id)
        .map_err(translate_persistence_error)?;

    let actor: Actor = Actor::approver(&approver);
    let command: Command = Command::Decide {
        stage,
        approver,
        decision,
    };
    let result: TransitionResult = apply(&current, command, actor, cause, now).map_err(|e| {
        warn!(request_id, stage = stage.as_str(), error = %e, "Stage decision refused");
        translate_core_error(e)
    })?;

    let event_id: i64 = persistence
        .record_decision(&result, stage)
        .map_err(|e| {
            warn!(request_id, stage = stage.as_str(), error = %e, "Stage decision not stored");
            translate_persistence_error(e)
        })?;

    let stored: LeaveRequest = persistence
        .get_request(request_id)
        .map_err(translate_persistence_error)?;

    let mut audit_event: AuditEvent = result.audit_event;
    audit_event.event_id = Some(event_id);

    info!(
        request_id,
        stage = stage.as_str(),
        decision = decision.as_str(),
        overall_status = stored.overall_status().as_str(),
        "Stage decided"
    );

    Ok(ApiResult {
        response: to_response(&stored)?,
        audit_event,
    })
}

/// Computes the working-day duration of a period without storing anything.
///
/// # Arguments
///
/// * `from` - First day (`YYYY-MM-DD`)
/// * `to` - Last day; defaults to `from`
/// * `half_day` - `"FN"` or `"AN"` for half-day leave
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` if a value cannot be parsed, `from` is
/// after `to`, or a half-day period spans several days.
pub fn compute_duration(
    from: &str,
    to: Option<&str>,
    half_day: Option<&str>,
) -> Result<DurationResponse, ApiError> {
    let from_date: Date = parse_date(from).map_err(|e| ApiError::InvalidInput {
        field: String::from("from"),
        message: e.to_string(),
    })?;
    let to_date: Option<Date> = to
        .filter(|v| !v.trim().is_empty())
        .map(parse_date)
        .transpose()
        .map_err(|e| ApiError::InvalidInput {
            field: String::from("to"),
            message: e.to_string(),
        })?;
    let half_day: Option<HalfDay> = half_day
        .filter(|v| !v.trim().is_empty())
        .map(|v| v.trim().parse::<HalfDay>())
        .transpose()
        .map_err(translate_domain_error)?;

    let duration: LeaveDuration = leavedesk_domain::compute_duration(from_date, to_date, half_day)
        .map_err(|e| {
            error!(
                from = %from_date,
                to = ?to_date,
                error = %e,
                "Duration requested for an invalid range"
            );
            translate_domain_error(e)
        })?;

    Ok(DurationResponse::new(
        from_date,
        to_date.unwrap_or(from_date),
        &duration,
    ))
}

/// Retrieves one leave request.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the request does not exist.
pub fn get_request(
    persistence: &mut Persistence,
    request_id: i64,
) -> Result<LeaveRequestResponse, ApiError> {
    let request: LeaveRequest = persistence
        .get_request(request_id)
        .map_err(translate_persistence_error)?;
    to_response(&request)
}

/// Lists every request filed by a requester.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_requests_for_requester(
    persistence: &mut Persistence,
    requester_id: &str,
) -> Result<ListLeaveRequestsResponse, ApiError> {
    let requests: Vec<LeaveRequest> = persistence
        .list_requests_for_requester(&RequesterId::new(requester_id))
        .map_err(translate_persistence_error)?;

    Ok(ListLeaveRequestsResponse {
        requests: requests
            .iter()
            .map(to_response)
            .collect::<Result<Vec<LeaveRequestResponse>, ApiError>>()?,
    })
}

/// Lists the requests waiting on an approver's decision.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_pending_for_approver(
    persistence: &mut Persistence,
    approver_id: &str,
) -> Result<ListLeaveRequestsResponse, ApiError> {
    let requests: Vec<LeaveRequest> = persistence
        .list_pending_for_approver(&StaffId::new(approver_id))
        .map_err(translate_persistence_error)?;

    Ok(ListLeaveRequestsResponse {
        requests: requests
            .iter()
            .map(to_response)
            .collect::<Result<Vec<LeaveRequestResponse>, ApiError>>()?,
    })
}
