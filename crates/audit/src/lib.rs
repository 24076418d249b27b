// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use leavedesk_domain::{RequesterId, StaffId};

#[cfg(test)]
mod tests;

/// Actor type recorded for a student or staff member filing a request.
pub const ACTOR_TYPE_REQUESTER: &str = "requester";
/// Actor type recorded for a staff member deciding an approval stage.
pub const ACTOR_TYPE_APPROVER: &str = "approver";

/// Represents the entity performing an action.
///
/// An actor is any identifiable entity that initiates a state change:
/// a requester filing leave or an approver deciding a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (e.g., "requester", "approver").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }

    /// Creates an actor for the owner of a leave request.
    #[must_use]
    pub fn requester(id: &RequesterId) -> Self {
        Self::new(id.value().to_string(), String::from(ACTOR_TYPE_REQUESTER))
    }

    /// Creates an actor for a staff member acting on an approval stage.
    #[must_use]
    pub fn approver(id: &StaffId) -> Self {
        Self::new(id.value().to_string(), String::from(ACTOR_TYPE_APPROVER))
    }
}

/// Represents the reason or trigger for an action.
///
/// A cause describes why a state change was initiated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., HTTP request ID).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this cause
    /// * `description` - A description of what triggered this action
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// Represents the specific action performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The name of the action (e.g., "`SubmitLeaveRequest`", "`DecideStage`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the action
    /// * `details` - Optional additional details
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A serialized view of a leave request at a point in time.
///
/// The `data` string is produced by the core crate; audit consumers treat
/// it as opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    /// A string representation of the state.
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }

    /// The snapshot recorded before a request exists.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(String::from("none"))
    }
}

/// An immutable audit event representing a state transition.
///
/// Every successful state change produces exactly one audit event, which
/// captures:
/// - Who performed the action (actor)
/// - Why it was performed (cause)
/// - What action was performed (action)
/// - The state before and after the transition
///
/// `request_id` is `None` for a submission until persistence assigns the
/// request its identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// The event ID (assigned by persistence layer).
    pub event_id: Option<i64>,
    /// The leave request this event belongs to.
    pub request_id: Option<i64>,
    /// The actor who initiated this state change.
    pub actor: Actor,
    /// The cause or reason for this state change.
    pub cause: Cause,
    /// The action that was performed.
    pub action: Action,
    /// The state before the transition.
    pub before: StateSnapshot,
    /// The state after the transition.
    pub after: StateSnapshot,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    ///
    /// # Arguments
    ///
    /// * `request_id` - The affected request, if it already has an identifier
    /// * `actor` - The actor who initiated the change
    /// * `cause` - The reason for the change
    /// * `action` - The action that was performed
    /// * `before` - The state before the transition
    /// * `after` - The state after the transition
    #[must_use]
    pub const fn new(
        request_id: Option<i64>,
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
    ) -> Self {
        Self {
            event_id: None,
            request_id,
            actor,
            cause,
            action,
            before,
            after,
        }
    }

    /// Returns the event bound to the given request identifier.
    #[must_use]
    pub fn with_request_id(self, request_id: i64) -> Self {
        Self {
            request_id: Some(request_id),
            ..self
        }
    }
}
