// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Approval status tracking and projection.
//!
//! A single status type is shared by every approval stage and by the
//! overall status of a request. Stage statuses only move forward:
//! `pending` may become `approved` or `rejected`, and both of those are
//! terminal. The overall status is never stored independently; it is
//! always projected from the stage statuses.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Status of an approval stage or of a whole request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// No decision has been recorded yet.
    #[default]
    Pending,
    /// The approver accepted the request.
    Approved,
    /// The approver turned the request down.
    Rejected,
}

impl ApprovalStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Returns true if this status is terminal (cannot transition to another state).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl FromStr for ApprovalStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidApprovalStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An approver's verdict on a single stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    /// The terminal status this decision moves a stage into.
    #[must_use]
    pub const fn resulting_status(&self) -> ApprovalStatus {
        match self {
            Self::Approve => ApprovalStatus::Approved,
            Self::Reject => ApprovalStatus::Rejected,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

impl FromStr for Decision {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" | "approved" => Ok(Self::Approve),
            "reject" | "rejected" => Ok(Self::Reject),
            _ => Err(DomainError::InvalidDecision(s.to_string())),
        }
    }
}

/// Projects the overall status of a request from its stage statuses.
///
/// - Any rejected stage rejects the whole request, whatever the other
///   stages hold.
/// - Otherwise the request is approved only when every stage is approved.
/// - Otherwise it is pending. An empty stage list is pending.
pub fn project_overall_status<I>(stage_statuses: I) -> ApprovalStatus
where
    I: IntoIterator<Item = ApprovalStatus>,
{
    let mut seen_any: bool = false;
    let mut all_approved: bool = true;

    for status in stage_statuses {
        seen_any = true;
        match status {
            ApprovalStatus::Rejected => return ApprovalStatus::Rejected,
            ApprovalStatus::Pending => all_approved = false,
            ApprovalStatus::Approved => {}
        }
    }

    if seen_any && all_approved {
        ApprovalStatus::Approved
    } else {
        ApprovalStatus::Pending
    }
}
