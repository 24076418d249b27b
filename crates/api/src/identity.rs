// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The identity of a requester as supplied by the upstream session layer.
//!
//! Authentication happens outside this crate. Callers hand in an
//! [`AuthenticatedRequester`] that has already been verified.

use leavedesk_audit::Actor;
use leavedesk_domain::{
    BatchId, DepartmentId, Requester, RequesterId, RequesterKind, SectionId, StaffId,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// A verified student or staff member filing leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedRequester {
    pub id: String,
    pub name: String,
    pub kind: RequesterKind,
    pub department: String,
    #[serde(default)]
    pub batch: Option<String>,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub roll_no: Option<String>,
    #[serde(default)]
    pub register_no: Option<String>,
    /// The mentor assigned to a student in their profile.
    #[serde(default)]
    pub mentor_id: Option<String>,
}

impl AuthenticatedRequester {
    /// Builds the domain requester record.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` if a student has no batch or section.
    pub fn to_requester(&self) -> Result<Requester, ApiError> {
        let id: RequesterId = RequesterId::new(&self.id);
        let department: DepartmentId = DepartmentId::new(&self.department);

        match self.kind {
            RequesterKind::Staff => Ok(Requester::Staff { id, department }),
            RequesterKind::Student => {
                let batch: &str = self.batch.as_deref().ok_or_else(|| ApiError::InvalidInput {
                    field: String::from("batch"),
                    message: String::from("Students must belong to a batch"),
                })?;
                let section: &str =
                    self.section
                        .as_deref()
                        .ok_or_else(|| ApiError::InvalidInput {
                            field: String::from("section"),
                            message: String::from("Students must belong to a section"),
                        })?;
                Ok(Requester::Student {
                    id,
                    department,
                    batch: BatchId::new(batch),
                    section: SectionId::new(section),
                    roll_no: self.roll_no.clone(),
                    register_no: self.register_no.clone(),
                })
            }
        }
    }

    /// The mentor named in the requester's profile, if any.
    #[must_use]
    pub fn assigned_mentor(&self) -> Option<StaffId> {
        self.mentor_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .map(StaffId::new)
    }

    /// Converts this requester into an audit actor.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::requester(&RequesterId::new(&self.id))
    }
}
