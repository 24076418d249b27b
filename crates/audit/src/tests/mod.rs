// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    ACTOR_TYPE_APPROVER, ACTOR_TYPE_REQUESTER, Action, Actor, AuditEvent, Cause, StateSnapshot,
};
use leavedesk_domain::{RequesterId, StaffId};

fn create_test_event() -> AuditEvent {
    AuditEvent::new(
        None,
        Actor::requester(&RequesterId::new("stu-1")),
        Cause::new(String::from("req-456"), String::from("Leave form submitted")),
        Action::new(String::from("SubmitLeaveRequest"), None),
        StateSnapshot::empty(),
        StateSnapshot::new(String::from("overall_status=pending")),
    )
}

#[test]
fn test_actor_creation_requires_all_fields() {
    let actor: Actor = Actor::new(String::from("st-1"), String::from("approver"));

    assert_eq!(actor.id, "st-1");
    assert_eq!(actor.actor_type, "approver");
}

#[test]
fn test_actor_helpers_set_type() {
    let requester: Actor = Actor::requester(&RequesterId::new("stu-1"));
    assert_eq!(requester.id, "stu-1");
    assert_eq!(requester.actor_type, ACTOR_TYPE_REQUESTER);

    let approver: Actor = Actor::approver(&StaffId::new("st-9"));
    assert_eq!(approver.id, "st-9");
    assert_eq!(approver.actor_type, ACTOR_TYPE_APPROVER);
}

#[test]
fn test_action_creation_with_details() {
    let action: Action = Action::new(
        String::from("DecideStage"),
        Some(String::from("hod approved")),
    );

    assert_eq!(action.name, "DecideStage");
    assert_eq!(action.details, Some(String::from("hod approved")));
}

#[test]
fn test_new_event_has_no_identifiers_yet() {
    let event: AuditEvent = create_test_event();

    assert_eq!(event.event_id, None);
    assert_eq!(event.request_id, None);
    assert_eq!(event.before, StateSnapshot::empty());
}

#[test]
fn test_with_request_id_binds_event() {
    let event: AuditEvent = create_test_event().with_request_id(42);

    assert_eq!(event.request_id, Some(42));
    assert_eq!(event.action.name, "SubmitLeaveRequest");
    assert_eq!(event.after.data, "overall_status=pending");
}

#[test]
fn test_audit_event_equality() {
    assert_eq!(create_test_event(), create_test_event());
    assert_ne!(create_test_event(), create_test_event().with_request_id(1));
}
