// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leavedesk::{LeaveRequest, TransitionResult};
use leavedesk_audit::{ACTOR_TYPE_APPROVER, ACTOR_TYPE_REQUESTER, AuditEvent};
use leavedesk_domain::{Decision, StageId};
use time::macros::date;

use crate::error::PersistenceError;
use crate::{PersistedRequest, Persistence};

use super::helpers::{decide, student_submission};

#[test]
fn test_submission_event_is_bound_to_new_request() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let submission: TransitionResult =
        student_submission("stu-1", date!(2024 - 06 - 10), date!(2024 - 06 - 12));

    let persisted: PersistedRequest = persistence.insert_request(&submission).unwrap();
    let event: AuditEvent = persistence.get_audit_event(persisted.event_id).unwrap();

    assert_eq!(event.event_id, Some(persisted.event_id));
    assert_eq!(event.request_id, Some(persisted.request_id));
    assert_eq!(event.actor.id, "stu-1");
    assert_eq!(event.actor.actor_type, ACTOR_TYPE_REQUESTER);
    assert_eq!(event.cause, submission.audit_event.cause);
    assert_eq!(event.action, submission.audit_event.action);
    assert_eq!(event.before.data, "none");
    assert_eq!(event.after, submission.audit_event.after);
}

#[test]
fn test_audit_trail_is_ordered() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let persisted: PersistedRequest = persistence
        .insert_request(&student_submission(
            "stu-1",
            date!(2024 - 06 - 10),
            date!(2024 - 06 - 12),
        ))
        .unwrap();
    let request: LeaveRequest = persistence.get_request(persisted.request_id).unwrap();

    decide(
        &mut persistence,
        &request,
        StageId::Mentor,
        "mentor-1",
        Decision::Approve,
    );

    let events: Vec<AuditEvent> = persistence
        .get_audit_events_for_request(persisted.request_id)
        .unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].action.name, "SubmitLeaveRequest");
    assert_eq!(events[1].action.name, "DecideStage");
    assert_eq!(events[1].actor.actor_type, ACTOR_TYPE_APPROVER);
    assert_eq!(events[1].actor.id, "mentor-1");
    assert_eq!(events[1].before, events[0].after);
}

#[test]
fn test_missing_audit_event_is_not_found() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    let result: Result<AuditEvent, PersistenceError> = persistence.get_audit_event(42);

    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
}
