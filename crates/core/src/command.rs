// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use leavedesk_domain::{Decision, StaffId, StageId};

/// A command represents approver intent as data only.
///
/// Submissions are applied through `apply_submission`; every later change to a
/// request goes through a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Decide one approval stage.
    Decide {
        /// The stage being decided.
        stage: StageId,
        /// The staff member making the decision.
        approver: StaffId,
        /// Approve or reject.
        decision: Decision,
    },
}
