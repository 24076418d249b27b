// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::request::LeaveRequest;
use crate::state::TransitionResult;
use leavedesk_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use leavedesk_domain::{ApprovalChain, Requester, StageId, ValidatedLeave};
use time::OffsetDateTime;

/// Creates a new leave request from a validated submission.
///
/// Every stage in `chain` starts pending. The audit event has no request ID
/// until persistence assigns one.
///
/// # Arguments
///
/// * `requester` - The owner of the request
/// * `leave` - The validated period, classification and reason
/// * `name` - The requester's display name
/// * `chain` - The resolved approval chain
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
/// * `now` - The current instant
///
/// # Errors
///
/// Returns an error if the request's duration cannot be computed.
pub fn apply_submission(
    requester: Requester,
    leave: ValidatedLeave,
    name: String,
    chain: &ApprovalChain,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    let new_state: LeaveRequest = LeaveRequest::new(requester, name, leave, chain, now)?;

    let stages: Vec<&str> = chain.stages().iter().map(StageId::as_str).collect();
    let action: Action = Action::new(
        String::from("SubmitLeaveRequest"),
        Some(format!(
            "Submitted leave from {} to {} ({} day(s)) with stages [{}]",
            new_state.period.from_date(),
            new_state.period.to_date(),
            new_state.duration.no_of_days(),
            stages.join(", ")
        )),
    );

    let audit_event: AuditEvent = AuditEvent::new(
        None,
        actor,
        cause,
        action,
        StateSnapshot::empty(),
        new_state.to_snapshot(),
    );

    Ok(TransitionResult {
        new_state,
        audit_event,
    })
}

/// Applies a command to a request, producing a new request and audit event.
///
/// # Arguments
///
/// * `request` - The current request (immutable)
/// * `command` - The command to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
/// * `now` - The current instant
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new request and audit event
/// * `Err(CoreError)` if the command is invalid
///
/// # Errors
///
/// Returns an error if:
/// - The stage is not part of the request's chain
/// - The stage has already been decided
/// - The approver is not bound to the stage
pub fn apply(
    request: &LeaveRequest,
    command: Command,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    match command {
        Command::Decide {
            stage,
            approver,
            decision,
        } => {
            // Capture state before transition
            let before: StateSnapshot = request.to_snapshot();

            let mut new_state: LeaveRequest = request.clone();
            new_state.decide(stage, &approver, decision, now)?;

            let after: StateSnapshot = new_state.to_snapshot();

            let action: Action = Action::new(
                String::from("DecideStage"),
                Some(format!(
                    "{} '{}' {} stage '{}'; overall status is now {}",
                    stage.label(),
                    approver.value(),
                    decision.resulting_status().as_str(),
                    stage.as_str(),
                    new_state.overall_status().as_str()
                )),
            );
            let audit_event: AuditEvent =
                AuditEvent::new(request.request_id, actor, cause, action, before, after);

            Ok(TransitionResult {
                new_state,
                audit_event,
            })
        }
    }
}
