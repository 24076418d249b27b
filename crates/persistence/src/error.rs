// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leavedesk_domain::StageId;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// A stored row could not be turned back into a domain value.
    ReconstructionError(String),
    /// Serialization/deserialization error.
    SerializationError(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// The requested leave request was not found.
    RequestNotFound(i64),
    /// A request without an assigned ID was passed where a stored one is required.
    UnsavedRequest,
    /// The stage is not stored for the request.
    StageNotFound { request_id: i64, stage: StageId },
    /// The conditional stage update matched no pending row.
    StageAlreadyDecided { request_id: i64, stage: StageId },
    /// The period overlaps another live request of the same requester.
    OverlappingPeriod {
        requester_id: String,
        existing_request_id: Option<i64>,
    },
    /// The requested resource was not found.
    NotFound(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::ReconstructionError(msg) => write!(f, "Reconstruction error: {msg}"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::RequestNotFound(id) => write!(f, "Leave request not found: {id}"),
            Self::UnsavedRequest => write!(f, "Leave request has not been stored yet"),
            Self::StageNotFound { request_id, stage } => {
                write!(
                    f,
                    "Stage '{}' not found on leave request {request_id}",
                    stage.as_str()
                )
            }
            Self::StageAlreadyDecided { request_id, stage } => {
                write!(
                    f,
                    "Stage '{}' on leave request {request_id} has already been decided",
                    stage.as_str()
                )
            }
            Self::OverlappingPeriod {
                requester_id,
                existing_request_id,
            } => match existing_request_id {
                Some(existing) => write!(
                    f,
                    "Requester '{requester_id}' already has leave request {existing} for this period"
                ),
                None => write!(
                    f,
                    "Requester '{requester_id}' already has a leave request for this period"
                ),
            },
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
