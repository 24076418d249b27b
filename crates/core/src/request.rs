// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leavedesk_audit::StateSnapshot;
use leavedesk_domain::{
    ApprovalChain, ApprovalStatus, Decision, DomainError, LeaveClassification, LeaveDuration,
    LeavePeriod, Requester, StaffId, StageId, ValidatedLeave, compute_duration,
    project_overall_status,
};
use time::OffsetDateTime;

/// The state of one approval stage on a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageApproval {
    /// The stage being approved.
    pub stage: StageId,
    /// The staff member allowed to decide this stage.
    pub approver: StaffId,
    /// Current status of the stage.
    pub status: ApprovalStatus,
    /// When the stage was decided, if it has been.
    pub decided_at: Option<OffsetDateTime>,
}

/// A leave request and its approval stages.
///
/// The overall status is always projected from the stages. Persistence keeps
/// a cached copy for filtering, recomputed whenever a stage is decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveRequest {
    /// Assigned by persistence; `None` before the request is stored.
    pub request_id: Option<i64>,
    pub requester: Requester,
    /// Display name of the requester.
    pub name: String,
    pub period: LeavePeriod,
    pub duration: LeaveDuration,
    pub classification: LeaveClassification,
    pub reason: String,
    approvals: Vec<StageApproval>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    /// Incremented on every mutation.
    pub version: i64,
}

impl LeaveRequest {
    /// Creates a new request with every stage of the chain pending.
    ///
    /// The duration is always computed here from the validated period.
    ///
    /// # Arguments
    ///
    /// * `requester` - The owner of the request
    /// * `name` - The requester's display name
    /// * `leave` - The validated period, classification and reason
    /// * `chain` - The resolved approval chain
    /// * `now` - The creation timestamp
    ///
    /// # Errors
    ///
    /// Returns an error if the duration cannot be computed for the period.
    pub fn new(
        requester: Requester,
        name: String,
        leave: ValidatedLeave,
        chain: &ApprovalChain,
        now: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        let duration: LeaveDuration = compute_duration(
            leave.period.from_date(),
            Some(leave.period.to_date()),
            leave.period.half_day(),
        )?;

        let approvals: Vec<StageApproval> = chain
            .bindings()
            .iter()
            .map(|binding| StageApproval {
                stage: binding.stage,
                approver: binding.approver.clone(),
                status: ApprovalStatus::Pending,
                decided_at: None,
            })
            .collect();

        Ok(Self {
            request_id: None,
            requester,
            name,
            period: leave.period,
            duration,
            classification: leave.classification,
            reason: leave.reason,
            approvals,
            created_at: now,
            updated_at: now,
            version: 1,
        })
    }

    /// Rebuilds a stored request.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub const fn restore(
        request_id: i64,
        requester: Requester,
        name: String,
        period: LeavePeriod,
        duration: LeaveDuration,
        classification: LeaveClassification,
        reason: String,
        approvals: Vec<StageApproval>,
        created_at: OffsetDateTime,
        updated_at: OffsetDateTime,
        version: i64,
    ) -> Self {
        Self {
            request_id: Some(request_id),
            requester,
            name,
            period,
            duration,
            classification,
            reason,
            approvals,
            created_at,
            updated_at,
            version,
        }
    }

    /// Returns the approval stages in sequence order.
    #[must_use]
    pub fn approvals(&self) -> &[StageApproval] {
        &self.approvals
    }

    /// Returns the approval record for a stage.
    #[must_use]
    pub fn stage(&self, stage: StageId) -> Option<&StageApproval> {
        self.approvals.iter().find(|a| a.stage == stage)
    }

    /// The overall status, projected from the stage statuses.
    #[must_use]
    pub fn overall_status(&self) -> ApprovalStatus {
        project_overall_status(self.approvals.iter().map(|a| a.status))
    }

    /// Returns true if the staff member has a pending stage on this request.
    #[must_use]
    pub fn is_pending_for(&self, approver: &StaffId) -> bool {
        self.approvals
            .iter()
            .any(|a| &a.approver == approver && a.status == ApprovalStatus::Pending)
    }

    /// Records an approver's decision on one stage.
    ///
    /// Stages are independent: any pending stage may be decided in any order.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the stage is not part of this request's chain
    /// - the stage has already been decided (the request is left unchanged)
    /// - `actor` is not the approver bound to the stage
    pub fn decide(
        &mut self,
        stage: StageId,
        actor: &StaffId,
        decision: Decision,
        now: OffsetDateTime,
    ) -> Result<(), DomainError> {
        let approval: &mut StageApproval = self
            .approvals
            .iter_mut()
            .find(|a| a.stage == stage)
            .ok_or(DomainError::UnknownStage { stage })?;

        if approval.status.is_terminal() {
            return Err(DomainError::AlreadyDecided {
                stage,
                status: approval.status,
            });
        }

        if &approval.approver != actor {
            return Err(DomainError::ForbiddenActor {
                stage,
                actor: actor.clone(),
            });
        }

        approval.status = decision.resulting_status();
        approval.decided_at = Some(now);
        self.updated_at = now;
        self.version += 1;

        Ok(())
    }

    /// Converts the request to a snapshot for audit purposes.
    #[must_use]
    pub fn to_snapshot(&self) -> StateSnapshot {
        let stages: Vec<String> = self
            .approvals
            .iter()
            .map(|a| format!("{}:{}", a.stage.as_str(), a.status.as_str()))
            .collect();

        StateSnapshot::new(format!(
            "requester={},from={},to={},half_day_units={},overall_status={},stages={},version={}",
            self.requester.id().value(),
            self.period.from_date(),
            self.period.to_date(),
            self.duration.half_day_units(),
            self.overall_status().as_str(),
            stages.join("|"),
            self.version
        ))
    }
}
