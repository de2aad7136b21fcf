//! Drag Interaction Controller.
//!
//! A gesture goes `Idle -> Dragging(card) -> Idle`. When it ends, the drop
//! target is resolved to a column and the gesture is classified as a
//! cancellation, a same-column reorder, a cross-domain violation, a custom
//! move, or a status transition. Status transitions never touch local state:
//! a permitted one comes back as [`DropOutcome::AwaitingConfirmation`] and is
//! only sent to the task service by [`confirm_transition`] once the user has
//! acknowledged it.

use crate::{
    domain::{
        decide, Board, Card, CardId, ColumnId, CustomColumnId, CustomTaskId, Decision, Domain,
        TaskId, TaskStatus,
    },
    error::{BoardError, Result},
    service::TaskService,
    storage::CustomStateStorage,
    store::CustomBoardStore,
};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Where a card was released
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// Released over another card
    Card(CardId),
    /// Released over a column
    Column(ColumnId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    /// Snapshot of the card being dragged, used for overlay rendering
    Dragging(Card),
}

/// User answer to a confirmation prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acknowledgement {
    Accepted,
    Declined,
}

/// A permitted status change waiting for the user's acknowledgement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingTransition {
    pub task_id: TaskId,
    pub from: TaskStatus,
    pub to: TaskStatus,
    pub prompt: String,
}

/// How a finished gesture was resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// No drag in progress or nothing to drop on
    Cancelled,
    /// Dropped back into its own column
    Reordered { column: ColumnId },
    /// Backend card onto a custom column, or the other way round
    CrossDomainRejected {
        card: CardId,
        destination: ColumnId,
        reason: String,
    },
    /// The transition policy refused the status change
    Blocked {
        task_id: TaskId,
        from: TaskStatus,
        to: TaskStatus,
        reason: String,
    },
    /// A custom task was moved to another custom column
    Moved {
        task_id: CustomTaskId,
        column: CustomColumnId,
    },
    AwaitingConfirmation(PendingTransition),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// User-facing feedback for an interaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl From<&BoardError> for Notice {
    fn from(err: &BoardError) -> Self {
        match err {
            BoardError::EmptyTitle { .. } => Notice::warning(err.to_string()),
            _ => Notice::error(err.to_string()),
        }
    }
}

impl DropOutcome {
    /// Feedback to show for this outcome; silent outcomes return `None`
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Self::Cancelled | Self::Reordered { .. } => None,
            Self::CrossDomainRejected { reason, .. } | Self::Blocked { reason, .. } => {
                Some(Notice::warning(reason.clone()))
            }
            Self::Moved { .. } => Some(Notice::info("Task moved.")),
            Self::AwaitingConfirmation(pending) => Some(Notice::info(pending.prompt.clone())),
        }
    }

    /// Whether the gesture was refused by a board rule
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::CrossDomainRejected { .. } | Self::Blocked { .. })
    }
}

/// Result of answering a confirmation prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The task service accepted the change; the next refresh shows it
    Applied { task_id: TaskId, status: TaskStatus },
    Declined,
}

const BACKEND_INTO_CUSTOM: &str =
    "Maintenance tasks can only be moved between status columns.";
const CUSTOM_INTO_BACKEND: &str = "Custom tasks can only be moved between custom columns.";
const DEFAULT_PROMPT: &str = "Change the status of this task?";

#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Card currently being dragged
    pub fn dragging(&self) -> Option<&Card> {
        match &self.state {
            DragState::Idle => None,
            DragState::Dragging(card) => Some(card),
        }
    }

    /// Starts a gesture on `card` and returns the domain it belongs to.
    /// Any previous gesture is abandoned.
    pub fn begin(&mut self, card: &CardId, board: &Board) -> Result<Domain> {
        let found = board
            .find_card(card)
            .cloned()
            .ok_or_else(|| BoardError::CardNotFound(card.to_string()))?;

        let domain = found.domain();
        debug!(card = %card, %domain, "drag started");
        self.state = DragState::Dragging(found);
        Ok(domain)
    }

    /// Abandons the current gesture without side effects
    pub fn cancel(&mut self) {
        if let DragState::Dragging(card) = std::mem::take(&mut self.state) {
            debug!(card = %card.id(), "drag cancelled");
        }
    }

    /// Finishes the current gesture.
    ///
    /// Custom moves are applied to `store` right away; everything else is
    /// reported back without touching any state.
    pub fn end<S: CustomStateStorage>(
        &mut self,
        target: Option<DropTarget>,
        board: &Board,
        store: &mut CustomBoardStore<S>,
    ) -> Result<DropOutcome> {
        let DragState::Dragging(source) = std::mem::take(&mut self.state) else {
            return Ok(DropOutcome::Cancelled);
        };

        let Some(target) = target else {
            debug!(card = %source.id(), "dropped outside any column");
            return Ok(DropOutcome::Cancelled);
        };

        let Some(destination) = resolve_destination(&target, board) else {
            debug!(card = %source.id(), ?target, "drop target no longer on the board");
            return Ok(DropOutcome::Cancelled);
        };

        let is_custom_source = match source.id() {
            CardId::Custom(id) if store.state().is_custom_task(id) => true,
            CardId::Custom(id) => {
                debug!(task = %id, "dragged custom task no longer exists");
                return Ok(DropOutcome::Cancelled);
            }
            CardId::Backend(_) => false,
        };
        let is_custom_destination = destination.domain() == Domain::Custom;

        if is_custom_source != is_custom_destination {
            let reason = if is_custom_source {
                CUSTOM_INTO_BACKEND
            } else {
                BACKEND_INTO_CUSTOM
            };
            warn!(card = %source.id(), destination = %destination, "cross-domain drop rejected");
            return Ok(DropOutcome::CrossDomainRejected {
                card: source.id(),
                destination,
                reason: reason.to_string(),
            });
        }

        match (source.id(), destination) {
            (CardId::Custom(task_id), ColumnId::Custom(column)) => {
                let current = store.column_containing(task_id).map(|col| col.id.clone());
                if current.as_ref() == Some(&column) {
                    return Ok(DropOutcome::Reordered {
                        column: ColumnId::Custom(column),
                    });
                }

                store.move_task(task_id, &column)?;
                Ok(DropOutcome::Moved { task_id, column })
            }
            (CardId::Backend(task_id), ColumnId::Status(to)) => {
                // Prefer the latest cached status over the drag-start snapshot
                let Some(from) = board
                    .find_card(&source.id())
                    .and_then(Card::status)
                    .or_else(|| source.status())
                else {
                    return Ok(DropOutcome::Cancelled);
                };

                if from == to {
                    return Ok(DropOutcome::Reordered {
                        column: ColumnId::Status(to),
                    });
                }

                match decide(from, to) {
                    Decision::Blocked(reason) => {
                        if from.is_terminal() {
                            info!(task = %task_id, %from, %to, "task already closed; status change blocked");
                        } else {
                            info!(task = %task_id, %from, %to, "status change blocked");
                        }
                        Ok(DropOutcome::Blocked {
                            task_id,
                            from,
                            to,
                            reason,
                        })
                    }
                    Decision::Confirm(prompt) => Ok(awaiting(task_id, from, to, prompt)),
                    // Identity is the only allowed pair and was handled above
                    Decision::Allowed => Ok(awaiting(task_id, from, to, DEFAULT_PROMPT.to_string())),
                }
            }
            // Card and column domains disagree with the membership check
            (card, destination) => {
                warn!(card = %card, destination = %destination, "inconsistent drop domains");
                Ok(DropOutcome::Cancelled)
            }
        }
    }
}

fn awaiting(task_id: TaskId, from: TaskStatus, to: TaskStatus, prompt: String) -> DropOutcome {
    debug!(task = %task_id, %from, %to, "status change awaiting confirmation");
    DropOutcome::AwaitingConfirmation(PendingTransition {
        task_id,
        from,
        to,
        prompt,
    })
}

/// Column a drop lands in: the target column itself, or the column holding
/// the target card
pub fn resolve_destination(target: &DropTarget, board: &Board) -> Option<ColumnId> {
    match target {
        DropTarget::Column(id) => board.column(id).map(|col| col.id.clone()),
        DropTarget::Card(card) => board.column_of(card).cloned(),
    }
}

/// Completes a confirmed status change through the task service.
///
/// Declining is a no-op. On failure nothing local changes and the error is
/// returned to the caller.
pub async fn confirm_transition<T: TaskService + ?Sized>(
    pending: &PendingTransition,
    acknowledgement: Acknowledgement,
    service: &T,
) -> Result<TransitionOutcome> {
    if acknowledgement == Acknowledgement::Declined {
        debug!(task = %pending.task_id, "status change declined");
        return Ok(TransitionOutcome::Declined);
    }

    match service.update_task_status(pending.task_id, pending.to).await {
        Ok(()) => {
            info!(task = %pending.task_id, from = %pending.from, to = %pending.to, "status change applied");
            Ok(TransitionOutcome::Applied {
                task_id: pending.task_id,
                status: pending.to,
            })
        }
        Err(err) => {
            warn!(task = %pending.task_id, error = %err, "status change failed");
            Err(err)
        }
    }
}
