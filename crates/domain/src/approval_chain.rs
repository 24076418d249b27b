// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Approval chain resolution.
//!
//! The chain of approval stages a request must pass depends on who asks:
//!
//! - Students: mentor, class incharge, HOD (in that order)
//! - Staff: HOD only
//!
//! All stages are opened at once; the order is presentational and does not
//! gate later stages on earlier ones.
//!
//! A mentor who is also the class incharge approves once, as class
//! incharge. Any other overlap keeps every stage: a class incharge who is
//! also the HOD decides both stages.

use crate::error::DomainError;
use crate::types::{RequesterKind, StaffId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One approval checkpoint in a request's chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageId {
    Mentor,
    ClassIncharge,
    Hod,
}

impl StageId {
    /// Returns the string representation used for persistence and the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mentor => "mentor",
            Self::ClassIncharge => "class_incharge",
            Self::Hod => "hod",
        }
    }

    /// Returns a human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Mentor => "mentor",
            Self::ClassIncharge => "class incharge",
            Self::Hod => "HOD",
        }
    }
}

impl FromStr for StageId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mentor" => Ok(Self::Mentor),
            "class_incharge" | "classIncharge" => Ok(Self::ClassIncharge),
            "hod" => Ok(Self::Hod),
            _ => Err(DomainError::InvalidStage(s.to_string())),
        }
    }
}

impl std::fmt::Display for StageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Approver identities looked up from the reference directory.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrgRefs {
    pub mentor: Option<StaffId>,
    pub class_incharge: Option<StaffId>,
    pub hod: Option<StaffId>,
}

/// A stage bound to the staff member allowed to decide it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageBinding {
    pub stage: StageId,
    pub approver: StaffId,
}

/// The ordered, deduplicated set of stages a request must pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalChain {
    bindings: Vec<StageBinding>,
}

impl ApprovalChain {
    /// Builds a chain from explicit bindings, applying stage deduplication.
    ///
    /// Bindings are put in sequence order before deduplicating.
    #[must_use]
    pub fn new(mut bindings: Vec<StageBinding>) -> Self {
        bindings.sort_by_key(|binding| binding.stage);
        Self {
            bindings: deduplicate_stages(bindings),
        }
    }

    /// Returns the stage bindings in sequence order.
    #[must_use]
    pub fn bindings(&self) -> &[StageBinding] {
        &self.bindings
    }

    /// Returns the stage identifiers in sequence order.
    #[must_use]
    pub fn stages(&self) -> Vec<StageId> {
        self.bindings.iter().map(|binding| binding.stage).collect()
    }

    /// Returns the approver bound to a stage, if the stage is in the chain.
    #[must_use]
    pub fn approver_for(&self, stage: StageId) -> Option<&StaffId> {
        self.bindings
            .iter()
            .find(|binding| binding.stage == stage)
            .map(|binding| &binding.approver)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Drops the mentor stage when the mentor is also the class incharge.
///
/// This is the only merge: a staff member may otherwise hold several stages
/// of one chain and decides each of them separately.
fn deduplicate_stages(bindings: Vec<StageBinding>) -> Vec<StageBinding> {
    let class_incharge: Option<StaffId> = bindings
        .iter()
        .find(|binding| binding.stage == StageId::ClassIncharge)
        .map(|binding| binding.approver.clone());

    bindings
        .into_iter()
        .filter(|binding| {
            binding.stage != StageId::Mentor
                || class_incharge.as_ref() != Some(&binding.approver)
        })
        .collect()
}

fn require(
    approver: Option<&StaffId>,
    stage: StageId,
    reason: &str,
) -> Result<StageBinding, DomainError> {
    approver
        .cloned()
        .map(|approver| StageBinding { stage, approver })
        .ok_or_else(|| DomainError::UnresolvedApprovalChain {
            stage,
            reason: reason.to_string(),
        })
}

/// Resolves the approval stages that apply to a request.
///
/// # Arguments
///
/// * `kind` - Whether the requester is a student or staff member
/// * `refs` - Approver identities from the reference directory
///
/// # Returns
///
/// A non-empty `ApprovalChain` in sequence order.
///
/// # Errors
///
/// Returns `DomainError::UnresolvedApprovalChain` if any approver required for
/// the requester's kind is missing. A request is never created with zero stages.
pub fn resolve_stages(kind: RequesterKind, refs: &OrgRefs) -> Result<ApprovalChain, DomainError> {
    let bindings: Vec<StageBinding> = match kind {
        RequesterKind::Student => {
            let class_incharge: StageBinding = require(
                refs.class_incharge.as_ref(),
                StageId::ClassIncharge,
                "the student's section has no class incharge",
            )?;
            let mentor: StageBinding = require(
                refs.mentor.as_ref(),
                StageId::Mentor,
                "no mentor was selected for the student",
            )?;
            let hod: StageBinding = require(
                refs.hod.as_ref(),
                StageId::Hod,
                "the student's department has no HOD",
            )?;
            vec![mentor, class_incharge, hod]
        }
        RequesterKind::Staff => vec![require(
            refs.hod.as_ref(),
            StageId::Hod,
            "the staff member's department has no HOD",
        )?],
    };

    Ok(ApprovalChain::new(bindings))
}
