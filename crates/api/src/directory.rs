// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only organizational reference data.
//!
//! The directory answers who holds each approving role for a section or
//! department. It never changes as a result of a leave operation.

use std::collections::BTreeMap;

use leavedesk_domain::{DepartmentId, OrgRefs, Requester, SectionId, StaffId};
use serde::Deserialize;

use crate::identity::AuthenticatedRequester;

/// Lookup of approvers by section and department.
pub trait ReferenceDirectory {
    /// The class incharge of a section.
    fn class_incharge(&self, section: &SectionId) -> Option<StaffId>;

    /// The staff members who mentor students of a section.
    fn mentors(&self, section: &SectionId) -> Vec<StaffId>;

    /// The head of a department.
    fn hod(&self, department: &DepartmentId) -> Option<StaffId>;
}

/// Reference data for one section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SectionEntry {
    #[serde(default)]
    pub class_incharge: Option<String>,
    #[serde(default)]
    pub mentors: Vec<String>,
}

/// Reference data for one department.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DepartmentEntry {
    #[serde(default)]
    pub hod: Option<String>,
}

/// An in-memory directory, usually loaded from a JSON file.
///
/// ```json
/// {
///   "sections": { "cse-a": { "class_incharge": "st-7", "mentors": ["st-9"] } },
///   "departments": { "CSE": { "hod": "st-1" } }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StaticDirectory {
    #[serde(default)]
    pub sections: BTreeMap<String, SectionEntry>,
    #[serde(default)]
    pub departments: BTreeMap<String, DepartmentEntry>,
}

impl StaticDirectory {
    /// Parses a directory from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl ReferenceDirectory for StaticDirectory {
    fn class_incharge(&self, section: &SectionId) -> Option<StaffId> {
        self.sections
            .get(section.value())
            .and_then(|entry| entry.class_incharge.as_deref())
            .map(StaffId::new)
    }

    fn mentors(&self, section: &SectionId) -> Vec<StaffId> {
        self.sections
            .get(section.value())
            .map(|entry| entry.mentors.iter().map(String::as_str).map(StaffId::new).collect())
            .unwrap_or_default()
    }

    fn hod(&self, department: &DepartmentId) -> Option<StaffId> {
        self.departments
            .get(department.value())
            .and_then(|entry| entry.hod.as_deref())
            .map(StaffId::new)
    }
}

/// Picks the student's mentor from the section's mentors.
///
/// The mentor assigned in the requester's profile wins when the section
/// lists them. Without an assignment, a section with exactly one mentor
/// supplies it. Anything else leaves the mentor unresolved.
fn select_mentor(assigned: Option<StaffId>, section_mentors: Vec<StaffId>) -> Option<StaffId> {
    match assigned {
        Some(mentor) => section_mentors.contains(&mentor).then_some(mentor),
        None if section_mentors.len() == 1 => section_mentors.into_iter().next(),
        None => None,
    }
}

/// Gathers the approver references for a requester.
pub fn resolve_org_refs<D: ReferenceDirectory + ?Sized>(
    directory: &D,
    identity: &AuthenticatedRequester,
    requester: &Requester,
) -> OrgRefs {
    let hod: Option<StaffId> = directory.hod(requester.department());

    match requester.section() {
        Some(section) => OrgRefs {
            mentor: select_mentor(identity.assigned_mentor(), directory.mentors(section)),
            class_incharge: directory.class_incharge(section),
            hod,
        },
        None => OrgRefs {
            hod,
            ..OrgRefs::default()
        },
    }
}
