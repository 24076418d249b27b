// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{LeaveRequest, TransitionResult, apply_submission};
use leavedesk_audit::{Actor, Cause};
use leavedesk_domain::{
    ApprovalChain, BatchId, DepartmentId, LeaveClassification, LeavePeriod, LeaveType, OrgRefs,
    Requester, RequesterId, RequesterKind, SectionId, StaffId, ValidatedLeave, resolve_stages,
};
use time::macros::{date, datetime};
use time::{Date, OffsetDateTime};

pub const NOW: OffsetDateTime = datetime!(2024 - 06 - 03 09:00 UTC);
pub const LATER: OffsetDateTime = datetime!(2024 - 06 - 04 11:30 UTC);

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Leave form submitted"))
}

pub fn create_test_student() -> Requester {
    Requester::Student {
        id: RequesterId::new("stu-1"),
        department: DepartmentId::new("CSE"),
        batch: BatchId::new("2022-2026"),
        section: SectionId::new("A"),
        roll_no: Some(String::from("22CS001")),
        register_no: Some(String::from("7100221")),
    }
}

pub fn create_test_staff() -> Requester {
    Requester::Staff {
        id: RequesterId::new("st-50"),
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

pub fn create_validated_leave(from: Date, to: Date) -> ValidatedLeave {
    ValidatedLeave {
        period: LeavePeriod::new(from, to, None).unwrap(),
        classification: LeaveClassification::Student { for_medical: false },
        reason: String::from("Family function"),
    }
}

/// A three-stage student request spanning 10..12 June 2024, stored as ID 11.
pub fn create_student_request() -> LeaveRequest {
    let requester: Requester = create_test_student();
    let actor: Actor = Actor::requester(requester.id());
    let result: TransitionResult = apply_submission(
        requester,
        create_validated_leave(date!(2024 - 06 - 10), date!(2024 - 06 - 12)),
        String::from("Asha"),
        &create_student_chain(),
        actor,
        create_test_cause(),
        NOW,
    )
    .unwrap();

    let mut request: LeaveRequest = result.new_state;
    request.request_id = Some(11);
    request
}

/// A single-day staff sick leave on Wednesday 12 June 2024.
pub fn create_staff_request() -> LeaveRequest {
    let requester: Requester = create_test_staff();
    let actor: Actor = Actor::requester(requester.id());
    let leave: ValidatedLeave = ValidatedLeave {
        period: LeavePeriod::new(date!(2024 - 06 - 12), date!(2024 - 06 - 12), None).unwrap(),
        classification: LeaveClassification::Staff {
            type_of_leave: LeaveType::Sick,
        },
        reason: String::from("Fever"),
    };
    let result: TransitionResult = apply_submission(
        requester,
        leave,
        String::from("Ravi"),
        &create_staff_chain(),
        actor,
        create_test_cause(),
        NOW,
    )
    .unwrap();

    let mut request: LeaveRequest = result.new_state;
    request.request_id = Some(12);
    request
}
