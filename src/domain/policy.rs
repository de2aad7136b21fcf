//! Board-side gatekeeping for status changes.
//!
//! [`decide`] is the full decision table over every `(current, target)` pair.
//! It never performs the change; a [`Decision::Confirm`] only describes the
//! acknowledgement the caller has to obtain first.

use crate::domain::task::TaskStatus;
use serde::{Deserialize, Serialize};

/// Outcome of asking whether a status change may be made from the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum Decision {
    /// Nothing to do; only returned for identical statuses
    Allowed,
    /// Permitted once the user acknowledges the prompt
    Confirm(String),
    /// Not permitted from the board
    Blocked(String),
}

impl Decision {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked(_))
    }

    pub fn needs_confirmation(&self) -> bool {
        matches!(self, Self::Confirm(_))
    }

    /// Prompt or reason text, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Allowed => None,
            Self::Confirm(msg) | Self::Blocked(msg) => Some(msg),
        }
    }
}

const OVERDUE_IS_SYSTEM_SET: &str =
    "Only the backend due-date check can mark a task as overdue.";
const COMPLETION_IS_CREW_ONLY: &str =
    "Completion is recorded by the assigned crew through a maintenance report, not from the board.";
const COMPLETED_IS_TERMINAL: &str = "Completed tasks cannot be moved.";

/// Decides whether moving a task from `current` to `target` is allowed
pub fn decide(current: TaskStatus, target: TaskStatus) -> Decision {
    use crate::domain::task::TaskStatus::{Completed, InProgress, Overdue, Pending};

    match (current, target) {
        // From Pending
        (Pending, Pending) => Decision::Allowed,
        (Pending, Overdue) => Decision::Blocked(OVERDUE_IS_SYSTEM_SET.to_string()),
        (Pending, InProgress) => Decision::Confirm(
            "Start this task? It will be marked as in progress.".to_string(),
        ),
        (Pending, Completed) => Decision::Blocked(
            "A pending task must be started before it can be completed.".to_string(),
        ),

        // From Overdue
        (Overdue, Pending) => Decision::Blocked(
            "An overdue task returns to pending only when the backend re-evaluates its due date."
                .to_string(),
        ),
        (Overdue, Overdue) => Decision::Allowed,
        (Overdue, InProgress) => Decision::Confirm(
            "This task is overdue. Start it now and mark it as in progress?".to_string(),
        ),
        (Overdue, Completed) => Decision::Blocked(
            "An overdue task must be started before it can be completed.".to_string(),
        ),

        // From InProgress
        (InProgress, Pending) => Decision::Confirm(
            "Move this task back to pending? Its recorded start time is kept.".to_string(),
        ),
        (InProgress, Overdue) => Decision::Blocked(OVERDUE_IS_SYSTEM_SET.to_string()),
        (InProgress, InProgress) => Decision::Allowed,
        (InProgress, Completed) => Decision::Blocked(COMPLETION_IS_CREW_ONLY.to_string()),

        // From Completed (terminal)
        (Completed, Pending) | (Completed, Overdue) | (Completed, InProgress) => {
            Decision::Blocked(COMPLETED_IS_TERMINAL.to_string())
        }
        (Completed, Completed) => Decision::Allowed,
    }
}
