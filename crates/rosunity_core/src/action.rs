//! Action protocol decisions (goal acceptance, cancel handling) without ROS transport.

use uuid::Uuid;

/// Answer to an incoming goal request.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum GoalResponse {
    Reject,
    AcceptAndExecute,
    AcceptAndDefer,
}

impl GoalResponse {
    pub fn is_accepted(self) -> bool {
        !matches!(self, GoalResponse::Reject)
    }
}

/// Answer to a cancel request for an accepted goal.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CancelResponse {
    Reject,
    Accept,
}

/// Policy used when the host does not supply a goal callback: every goal runs.
pub fn default_goal_response<G>(_goal_id: Uuid, _goal: &G) -> GoalResponse {
    GoalResponse::AcceptAndExecute
}

/// Policy used when the host does not supply a cancel callback: goals run to completion.
pub fn default_cancel_response<H>(_goal_handle: &H) -> CancelResponse {
    CancelResponse::Reject
}
