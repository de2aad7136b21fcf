use crate::domain::{
    custom::{CustomColumnId, CustomTask, CustomTaskId},
    task::{MaintenanceTask, TaskId, TaskStatus},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side owns a card or column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// Backend-authoritative maintenance tasks
    Backend,
    /// Locally owned custom columns and tasks
    Custom,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backend => write!(f, "maintenance"),
            Self::Custom => write!(f, "custom"),
        }
    }
}

/// Identifier of a card on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "domain", content = "id", rename_all = "lowercase")]
pub enum CardId {
    Backend(TaskId),
    Custom(CustomTaskId),
}

impl CardId {
    pub fn domain(&self) -> Domain {
        match self {
            Self::Backend(_) => Domain::Backend,
            Self::Custom(_) => Domain::Custom,
        }
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backend(id) => write!(f, "task-{}", id),
            Self::Custom(id) => write!(f, "{}", id),
        }
    }
}

/// Identifier of a board column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum ColumnId {
    /// One of the fixed backend status columns
    Status(TaskStatus),
    /// A user-defined column
    Custom(CustomColumnId),
}

impl ColumnId {
    pub fn domain(&self) -> Domain {
        match self {
            Self::Status(_) => Domain::Backend,
            Self::Custom(_) => Domain::Custom,
        }
    }

    pub fn status(&self) -> Option<TaskStatus> {
        match self {
            Self::Status(status) => Some(*status),
            Self::Custom(_) => None,
        }
    }

    pub fn custom_id(&self) -> Option<&CustomColumnId> {
        match self {
            Self::Status(_) => None,
            Self::Custom(id) => Some(id),
        }
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => write!(f, "{}", status.key()),
            Self::Custom(id) => write!(f, "{}", id),
        }
    }
}

/// A card rendered on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "domain", content = "task", rename_all = "lowercase")]
pub enum Card {
    Backend(MaintenanceTask),
    Custom(CustomTask),
}

impl Card {
    pub fn id(&self) -> CardId {
        match self {
            Self::Backend(task) => CardId::Backend(task.id),
            Self::Custom(task) => CardId::Custom(task.id),
        }
    }

    pub fn domain(&self) -> Domain {
        self.id().domain()
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Backend(task) => &task.equipment_name,
            Self::Custom(task) => &task.title,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Self::Backend(task) => &task.description,
            Self::Custom(task) => &task.description,
        }
    }

    /// Status that the transition policy applies to. Custom cards have none
    /// and can never go through a status transition.
    pub fn status(&self) -> Option<TaskStatus> {
        match self {
            Self::Backend(task) => Some(task.status),
            Self::Custom(_) => None,
        }
    }

    pub fn as_backend(&self) -> Option<&MaintenanceTask> {
        match self {
            Self::Backend(task) => Some(task),
            Self::Custom(_) => None,
        }
    }

    pub fn as_custom(&self) -> Option<&CustomTask> {
        match self {
            Self::Backend(_) => None,
            Self::Custom(task) => Some(task),
        }
    }
}
