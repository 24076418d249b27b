// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leavedesk_persistence::Persistence;

use super::helpers::{
    create_test_staff, create_test_student, decide_as, leave_form, sick_leave_form, submit_as,
};
use crate::{
    ApiError, LeaveRequestResponse, ListLeaveRequestsResponse, get_request,
    list_pending_for_approver, list_requests_for_requester,
};

#[test]
fn test_get_request_returns_stored_request() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let submitted: LeaveRequestResponse = submit_as(
        &mut persistence,
        &create_test_student(),
        &leave_form("2024-06-10", "2024-06-12"),
    );

    let fetched: LeaveRequestResponse =
        get_request(&mut persistence, submitted.request_id).unwrap();

    assert_eq!(fetched, submitted);
}

#[test]
fn test_get_missing_request_is_not_found() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    assert!(matches!(
        get_request(&mut persistence, 7),
        Err(ApiError::ResourceNotFound { .. })
    ));
}

#[test]
fn test_requester_listing_is_scoped_to_requester() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    submit_as(
        &mut persistence,
        &create_test_student(),
        &leave_form("2024-06-10", "2024-06-12"),
    );
    submit_as(
        &mut persistence,
        &create_test_staff(),
        &sick_leave_form("2024-06-12"),
    );

    let listing: ListLeaveRequestsResponse =
        list_requests_for_requester(&mut persistence, "stu-1").unwrap();

    assert_eq!(listing.requests.len(), 1);
    assert_eq!(listing.requests[0].requester_id, "stu-1");
}

#[test]
fn test_approver_inbox_drops_decided_stages() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let student: LeaveRequestResponse = submit_as(
        &mut persistence,
        &create_test_student(),
        &leave_form("2024-06-10", "2024-06-12"),
    );
    submit_as(
        &mut persistence,
        &create_test_staff(),
        &sick_leave_form("2024-06-12"),
    );

    let before: ListLeaveRequestsResponse =
        list_pending_for_approver(&mut persistence, "hod-1").unwrap();
    assert_eq!(before.requests.len(), 2);

    decide_as(
        &mut persistence,
        student.request_id,
        "hod",
        "hod-1",
        "approve",
    );

    let after: ListLeaveRequestsResponse =
        list_pending_for_approver(&mut persistence, "hod-1").unwrap();
    assert_eq!(after.requests.len(), 1);
    assert_eq!(after.requests[0].requester_id, "st-50");
}
