// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::Date;

/// Calendar date format used on every external boundary (`YYYY-MM-DD`).
pub const DATE_FORMAT: &[time::format_description::FormatItem<'_>] =
    time::macros::format_description!("[year]-[month]-[day]");

/// Parses a `YYYY-MM-DD` calendar date.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string is not a valid date.
pub fn parse_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value.trim(), DATE_FORMAT).map_err(|e| DomainError::DateParseError {
        date_string: value.to_string(),
        error: e.to_string(),
    })
}

/// Formats a calendar date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: Date) -> String {
    // `Date`'s Display impl already renders the ISO calendar form
    date.to_string()
}

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name {
            value: String,
        }

        impl $name {
            /// Creates a new identifier, trimming surrounding whitespace.
            #[must_use]
            pub fn new(value: &str) -> Self {
                Self {
                    value: value.trim().to_string(),
                }
            }

            /// Returns the identifier value.
            #[must_use]
            pub fn value(&self) -> &str {
                &self.value
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.value)
            }
        }
    };
}

identifier!(
    /// Identifies the student or staff member who owns a leave request.
    RequesterId
);
identifier!(
    /// Identifies a staff member acting as an approver.
    StaffId
);
identifier!(
    /// Identifies a department in the reference directory.
    DepartmentId
);
identifier!(
    /// Identifies a student batch in the reference directory.
    BatchId
);
identifier!(
    /// Identifies a class section in the reference directory.
    SectionId
);

/// The two kinds of people who can request leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequesterKind {
    Student,
    Staff,
}

impl RequesterKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Staff => "Staff",
        }
    }
}

impl FromStr for RequesterKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Student" | "student" => Ok(Self::Student),
            "Staff" | "staff" => Ok(Self::Staff),
            _ => Err(DomainError::InvalidRequesterKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for RequesterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The owner of a leave request together with their organizational placement.
///
/// The variant selects which reference fields are meaningful: batch and
/// section exist only for students.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Requester {
    Student {
        id: RequesterId,
        department: DepartmentId,
        batch: BatchId,
        section: SectionId,
        roll_no: Option<String>,
        register_no: Option<String>,
    },
    Staff {
        id: RequesterId,
        department: DepartmentId,
    },
}

impl Requester {
    /// Returns the requester's identifier.
    #[must_use]
    pub const fn id(&self) -> &RequesterId {
        match self {
            Self::Student { id, .. } | Self::Staff { id, .. } => id,
        }
    }

    /// Returns the kind tag for this requester.
    #[must_use]
    pub const fn kind(&self) -> RequesterKind {
        match self {
            Self::Student { .. } => RequesterKind::Student,
            Self::Staff { .. } => RequesterKind::Staff,
        }
    }

    /// Returns the requester's department.
    #[must_use]
    pub const fn department(&self) -> &DepartmentId {
        match self {
            Self::Student { department, .. } | Self::Staff { department, .. } => department,
        }
    }

    /// Returns the section for students, `None` for staff.
    #[must_use]
    pub const fn section(&self) -> Option<&SectionId> {
        match self {
            Self::Student { section, .. } => Some(section),
            Self::Staff { .. } => None,
        }
    }

    /// Returns the batch for students, `None` for staff.
    #[must_use]
    pub const fn batch(&self) -> Option<&BatchId> {
        match self {
            Self::Student { batch, .. } => Some(batch),
            Self::Staff { .. } => None,
        }
    }
}

/// Which half of the working day a half-day leave covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HalfDay {
    /// Forenoon session ("FN").
    #[serde(rename = "FN")]
    Forenoon,
    /// Afternoon session ("AN").
    #[serde(rename = "AN")]
    Afternoon,
}

impl HalfDay {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Forenoon => "FN",
            Self::Afternoon => "AN",
        }
    }
}

impl FromStr for HalfDay {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FN" | "fn" => Ok(Self::Forenoon),
            "AN" | "an" => Ok(Self::Afternoon),
            _ => Err(DomainError::InvalidHalfDay(s.to_string())),
        }
    }
}

/// Staff leave categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaveType {
    Casual,
    Sick,
    Earned,
    Maternity,
    Paternity,
    Study,
    Duty,
    Special,
    Sabbatical,
}

impl LeaveType {
    /// All categories, in the order they are offered to staff.
    pub const ALL: [Self; 9] = [
        Self::Casual,
        Self::Sick,
        Self::Earned,
        Self::Maternity,
        Self::Paternity,
        Self::Study,
        Self::Duty,
        Self::Special,
        Self::Sabbatical,
    ];

    /// Returns the display/wire form, e.g. `"Sick Leave"`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Casual => "Casual Leave",
            Self::Sick => "Sick Leave",
            Self::Earned => "Earned Leave",
            Self::Maternity => "Maternity Leave",
            Self::Paternity => "Paternity Leave",
            Self::Study => "Study Leave",
            Self::Duty => "Duty Leave",
            Self::Special => "Special Leave",
            Self::Sabbatical => "Sabbatical Leave",
        }
    }
}

impl FromStr for LeaveType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|leave_type| leave_type.as_str() == s.trim())
            .ok_or_else(|| DomainError::InvalidLeaveType(s.to_string()))
    }
}

impl std::fmt::Display for LeaveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific classification of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaveClassification {
    Student { for_medical: bool },
    Staff { type_of_leave: LeaveType },
}

impl LeaveClassification {
    #[must_use]
    pub const fn for_medical(&self) -> bool {
        matches!(self, Self::Student { for_medical: true })
    }

    #[must_use]
    pub const fn type_of_leave(&self) -> Option<LeaveType> {
        match self {
            Self::Student { .. } => None,
            Self::Staff { type_of_leave } => Some(*type_of_leave),
        }
    }
}

/// The requested leave period.
///
/// `to_date` always holds a value; single-day and half-day requests carry
/// `to_date == from_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeavePeriod {
    from_date: Date,
    to_date: Date,
    half_day: Option<HalfDay>,
}

impl LeavePeriod {
    /// Creates a new period.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRange` if `from_date` is after `to_date`.
    pub fn new(
        from_date: Date,
        to_date: Date,
        half_day: Option<HalfDay>,
    ) -> Result<Self, DomainError> {
        if from_date > to_date {
            return Err(DomainError::InvalidRange {
                from: from_date,
                to: to_date,
            });
        }
        Ok(Self {
            from_date,
            to_date,
            half_day,
        })
    }

    #[must_use]
    pub const fn from_date(&self) -> Date {
        self.from_date
    }

    #[must_use]
    pub const fn to_date(&self) -> Date {
        self.to_date
    }

    #[must_use]
    pub const fn half_day(&self) -> Option<HalfDay> {
        self.half_day
    }

    /// Returns true if both periods share at least one calendar day.
    ///
    /// Boundaries are inclusive: a period ending on the day another starts
    /// overlaps it.
    #[must_use]
    pub fn overlaps(&self, from_date: Date, to_date: Date) -> bool {
        self.from_date <= to_date && from_date <= self.to_date
    }
}
