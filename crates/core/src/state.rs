// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::request::LeaveRequest;
use leavedesk_audit::AuditEvent;

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The request after the transition.
    pub new_state: LeaveRequest,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}
