// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use leavedesk_audit::Cause;
use leavedesk_domain::RequesterKind;
use leavedesk_persistence::Persistence;
use time::macros::{date, datetime};
use time::{Date, OffsetDateTime};

use crate::{
    ApiResult, AuthenticatedRequester, DecideStageRequest, LeaveRequestResponse,
    StaticDirectory, SubmitLeaveRequest, decide, submit,
};

/// Monday 3 June 2024, 09:00 UTC.
pub const NOW: OffsetDateTime = datetime!(2024 - 06 - 03 09:00 UTC);
pub const TODAY: Date = date!(2024 - 06 - 03);
pub const LATER: OffsetDateTime = datetime!(2024 - 06 - 04 10:00 UTC);

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-456"), String::from("API request"))
}

pub fn create_test_directory() -> StaticDirectory {
    StaticDirectory::from_json(
        r#"{
            "sections": {
                "cse-a": { "class_incharge": "ci-1", "mentors": ["mentor-1", "mentor-2"] },
                "cse-b": { "class_incharge": "ci-2", "mentors": ["ci-2"] }
            },
            "departments": {
                "CSE": { "hod": "hod-1" }
            }
        }"#,
    )
    .unwrap()
}

pub fn create_test_student() -> AuthenticatedRequester {
    AuthenticatedRequester {
        id: String::from("stu-1"),
        name: String::from("Asha"),
        kind: RequesterKind::Student,
        department: String::from("CSE"),
        batch: Some(String::from("2022-2026")),
        section: Some(String::from("cse-a")),
        roll_no: Some(String::from("22CS001")),
        register_no: None,
        mentor_id: Some(String::from("mentor-1")),
    }
}

pub fn create_test_staff() -> AuthenticatedRequester {
    AuthenticatedRequester {
        id: String::from("st-50"),
        name: String::from("Ravi"),
        kind: RequesterKind::Staff,
        department: String::from("CSE"),
        batch: None,
        section: None,
        roll_no: None,
        register_no: None,
        mentor_id: None,
    }
}

pub fn leave_form(from: &str, to: &str) -> SubmitLeaveRequest {
    SubmitLeaveRequest {
        from_date: Some(String::from(from)),
        to_date: Some(String::from(to)),
        reason: String::from("Family function"),
        ..SubmitLeaveRequest::default()
    }
}

pub fn sick_leave_form(day: &str) -> SubmitLeaveRequest {
    SubmitLeaveRequest {
        from_date: Some(String::from(day)),
        single_day: true,
        reason: String::from("Fever"),
        type_of_leave: Some(String::from("Sick Leave")),
        ..SubmitLeaveRequest::default()
    }
}

pub fn submit_as(
    persistence: &mut Persistence,
    identity: &AuthenticatedRequester,
    form: &SubmitLeaveRequest,
) -> LeaveRequestResponse {
    let result: ApiResult<LeaveRequestResponse> = submit(
        persistence,
        &create_test_directory(),
        identity,
        form,
        create_test_cause(),
        NOW,
        TODAY,
    )
    .unwrap();
    result.response
}

pub fn decision(stage: &str, approver: &str, decision: &str) -> DecideStageRequest {
    DecideStageRequest {
        stage: String::from(stage),
        approver_id: String::from(approver),
        decision: String::from(decision),
    }
}

pub fn decide_as(
    persistence: &mut Persistence,
    request_id: i64,
    stage: &str,
    approver: &str,
    verdict: &str,
) -> LeaveRequestResponse {
    decide(
        persistence,
        request_id,
        &decision(stage, approver, verdict),
        create_test_cause(),
        LATER,
    )
    .unwrap()
    .response
}
