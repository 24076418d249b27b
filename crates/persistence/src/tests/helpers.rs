// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leavedesk::{Command, LeaveRequest, TransitionResult, apply, apply_submission};
use leavedesk_audit::{Actor, Cause};
use leavedesk_domain::{
    ApprovalChain, BatchId, Decision, DepartmentId, HalfDay, LeaveClassification, LeavePeriod,
    LeaveType, OrgRefs, Requester, RequesterId, RequesterKind, SectionId, StaffId, StageId,
    ValidatedLeave, resolve_stages,
};
use time::macros::datetime;
use time::{Date, OffsetDateTime};

use crate::{PersistedRequest, Persistence};

pub const NOW: OffsetDateTime = datetime!(2024 - 06 - 03 09:00 UTC);
pub const LATER: OffsetDateTime = datetime!(2024 - 06 - 04 11:30 UTC);

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("http-1"), String::from("Test operation"))
}

pub fn create_test_student(id: &str) -> Requester {
    Requester::Student {
        id: RequesterId::new(id),
        department: DepartmentId::new("CSE"),
        batch: BatchId::new("2022-2026"),
        section: SectionId::new("A"),
        roll_no: Some(String::from("22CS001")),
        register_no: None,
    }
}

pub fn create_test_staff(id: &str) -> Requester {
    Requester::Staff {
        id: RequesterId::new(id),
        department: DepartmentId::new("CSE"),
    }
}

pub fn create_student_chain() -> ApprovalChain {
    let refs: OrgRefs = OrgRefs {
        mentor: Some(StaffId::new("mentor-1")),
        class_incharge: Some(StaffId::new("ci-1")),
        hod: Some(StaffId::new("hod-1")),
    };
    resolve_stages(RequesterKind::Student, &refs).unwrap()
}

pub fn create_staff_chain() -> ApprovalChain {
    let refs: OrgRefs = OrgRefs {
        hod: Some(StaffId::new("hod-1")),
        ..OrgRefs::default()
    };
    resolve_stages(RequesterKind::Staff, &refs).unwrap()
}

pub fn student_submission(requester_id: &str, from: Date, to: Date) -> TransitionResult {
    student_submission_with_chain(requester_id, from, to, &create_student_chain())
}

pub fn student_submission_with_chain(
    requester_id: &str,
    from: Date,
    to: Date,
    chain: &ApprovalChain,
) -> TransitionResult {
    let requester: Requester = create_test_student(requester_id);
    let actor: Actor = Actor::requester(requester.id());
    let leave: ValidatedLeave = ValidatedLeave {
        period: LeavePeriod::new(from, to, None).unwrap(),
        classification: LeaveClassification::Student { for_medical: true },
        reason: String::from("Surgery follow-up"),
    };
    apply_submission(
        requester,
        leave,
        String::from("Asha"),
        chain,
        actor,
        create_test_cause(),
        NOW,
    )
    .unwrap()
}

pub fn staff_half_day_submission(requester_id: &str, day: Date) -> TransitionResult {
    let requester: Requester = create_test_staff(requester_id);
    let actor: Actor = Actor::requester(requester.id());
    let leave: ValidatedLeave = ValidatedLeave {
        period: LeavePeriod::new(day, day, Some(HalfDay::Afternoon)).unwrap(),
        classification: LeaveClassification::Staff {
            type_of_leave: LeaveType::Casual,
        },
        reason: String::from("Bank visit"),
    };
    apply_submission(
        requester,
        leave,
        String::from("Ravi"),
        &create_staff_chain(),
        actor,
        create_test_cause(),
        NOW,
    )
    .unwrap()
}

/// Stores a student request and returns its ID.
pub fn store_student_request(
    persistence: &mut Persistence,
    requester_id: &str,
    from: Date,
    to: Date,
) -> i64 {
    let persisted: PersistedRequest = persistence
        .insert_request(&student_submission(requester_id, from, to))
        .unwrap();
    persisted.request_id
}

/// Applies and stores a decision on `request`, returning the transition.
pub fn decide(
    persistence: &mut Persistence,
    request: &LeaveRequest,
    stage: StageId,
    approver: &str,
    decision: Decision,
) -> TransitionResult {
    let approver_id: StaffId = StaffId::new(approver);
    let result: TransitionResult = apply(
        request,
        Command::Decide {
            stage,
            approver: approver_id.clone(),
            decision,
        },
        Actor::approver(&approver_id),
        create_test_cause(),
        LATER,
    )
    .unwrap();
    persistence.record_decision(&result, stage).unwrap();
    result
}
