// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leavedesk_persistence::Persistence;

use super::helpers::{
    LATER, create_test_cause, create_test_staff, create_test_student, decide_as, decision,
    leave_form, sick_leave_form, submit_as,
};
use crate::{ApiError, ApiResult, LeaveRequestResponse, decide, get_request};

fn student_request(persistence: &mut Persistence) -> i64 {
    submit_as(
        persistence,
        &create_test_student(),
        &leave_form("2024-06-10", "2024-06-12"),
    )
    .request_id
}

fn try_decide(
    persistence: &mut Persistence,
    request_id: i64,
    stage: &str,
    approver: &str,
    verdict: &str,
) -> Result<ApiResult<LeaveRequestResponse>, ApiError> {
    decide(
        persistence,
        request_id,
        &decision(stage, approver, verdict),
        create_test_cause(),
        LATER,
    )
}

#[test]
fn test_stages_can_be_decided_in_any_order() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let request_id: i64 = student_request(&mut persistence);

    decide_as(&mut persistence, request_id, "hod", "hod-1", "approve");
    let partial: LeaveRequestResponse =
        decide_as(&mut persistence, request_id, "mentor", "mentor-1", "approve");
    assert_eq!(partial.overall_status, "pending");

    let done: LeaveRequestResponse =
        decide_as(&mut persistence, request_id, "class_incharge", "ci-1", "approve");
    assert_eq!(done.overall_status, "approved");
    assert_eq!(done.version, 4);
    assert!(done.approvals.iter().all(|a| a.decided_at.is_some()));
}

#[test]
fn test_single_rejection_rejects_immediately() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let request_id: i64 = student_request(&mut persistence);

    let response: LeaveRequestResponse =
        decide_as(&mut persistence, request_id, "class_incharge", "ci-1", "reject");

    assert_eq!(response.overall_status, "rejected");
    assert_eq!(response.approvals[0].status, "pending");
    assert_eq!(response.approvals[1].status, "rejected");
}

#[test]
fn test_decision_event_carries_ids() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let request_id: i64 = student_request(&mut persistence);

    let result: ApiResult<LeaveRequestResponse> =
        try_decide(&mut persistence, request_id, "mentor", "mentor-1", "approve").unwrap();

    assert_eq!(result.audit_event.request_id, Some(request_id));
    assert!(result.audit_event.event_id.is_some());
    assert_eq!(result.audit_event.actor.id, "mentor-1");
    assert_eq!(result.audit_event.action.name, "DecideStage");
}

#[test]
fn test_second_decision_on_stage_conflicts_and_leaves_state_unchanged() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let request_id: i64 = student_request(&mut persistence);
    let approved: LeaveRequestResponse =
        decide_as(&mut persistence, request_id, "mentor", "mentor-1", "approve");

    let err: ApiError =
        try_decide(&mut persistence, request_id, "mentor", "mentor-1", "reject").unwrap_err();

    assert!(matches!(err, ApiError::Conflict { .. }));
    assert_eq!(get_request(&mut persistence, request_id).unwrap(), approved);
}

#[test]
fn test_wrong_approver_is_forbidden() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let request_id: i64 = student_request(&mut persistence);

    let err: ApiError =
        try_decide(&mut persistence, request_id, "hod", "mentor-1", "approve").unwrap_err();

    assert!(matches!(err, ApiError::Forbidden { .. }));
}

#[test]
fn test_stage_outside_chain_is_not_found() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let request_id: i64 = submit_as(
        &mut persistence,
        &create_test_staff(),
        &sick_leave_form("2024-06-12"),
    )
    .request_id;

    let err: ApiError =
        try_decide(&mut persistence, request_id, "mentor", "mentor-1", "approve").unwrap_err();

    assert!(matches!(
        err,
        ApiError::ResourceNotFound { ref resource_type, .. } if resource_type == "Stage"
    ));
}

#[test]
fn test_missing_request_is_not_found() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    let err: ApiError =
        try_decide(&mut persistence, 404, "hod", "hod-1", "approve").unwrap_err();

    assert!(matches!(
        err,
        ApiError::ResourceNotFound { ref resource_type, .. } if resource_type == "Leave request"
    ));
}

#[test]
fn test_unrecognized_stage_and_decision_are_invalid_input() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let request_id: i64 = student_request(&mut persistence);

    let bad_stage: ApiError =
        try_decide(&mut persistence, request_id, "principal", "hod-1", "approve").unwrap_err();
    let bad_decision: ApiError =
        try_decide(&mut persistence, request_id, "hod", "hod-1", "maybe").unwrap_err();
    let no_approver: ApiError =
        try_decide(&mut persistence, request_id, "hod", "  ", "approve").unwrap_err();

    assert!(matches!(bad_stage, ApiError::InvalidInput { ref field, .. } if field == "stage"));
    assert!(
        matches!(bad_decision, ApiError::InvalidInput { ref field, .. } if field == "decision")
    );
    assert!(
        matches!(no_approver, ApiError::InvalidInput { ref field, .. } if field == "approverId")
    );
}
