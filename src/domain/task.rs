use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Identifier assigned to a maintenance task by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a maintenance task, as owned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    Overdue,
    InProgress,
    Completed,
}

impl TaskStatus {
    /// Canonical column order of the backend statuses on the board
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::Overdue,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    /// Wire key used by the backend (e.g. `IN_PROGRESS`)
    pub fn key(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Overdue => "OVERDUE",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
        }
    }

    /// No transition out of a terminal status is permitted from the board
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Overdue => write!(f, "Overdue"),
            Self::InProgress => write!(f, "In Progress"),
            Self::Completed => write!(f, "Completed"),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = crate::error::BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|status| status.key() == normalized)
            .ok_or_else(|| crate::error::BoardError::InvalidStatus(s.to_string()))
    }
}

/// Priority assigned by the planner
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
            Self::Critical => write!(f, "Critical"),
        }
    }
}

/// A recurring equipment task as reported by the backend.
///
/// This crate only caches these records; status changes and deletions go
/// through the [`TaskService`](crate::service::TaskService).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceTask {
    pub id: TaskId,
    pub status: TaskStatus,
    pub priority: Priority,
    #[serde(default)]
    pub assigned_to: Option<String>,
    pub next_due_at: DateTime<Utc>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    pub equipment_name: String,
    #[serde(default)]
    pub description: String,
}

impl MaintenanceTask {
    /// Creates a pending task with medium priority
    pub fn new(id: TaskId, equipment_name: impl Into<String>, next_due_at: DateTime<Utc>) -> Self {
        Self {
            id,
            status: TaskStatus::Pending,
            priority: Priority::Medium,
            assigned_to: None,
            next_due_at,
            started_at: None,
            equipment_name: equipment_name.into(),
            description: String::new(),
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assigned_to = Some(assignee.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_keys_round_trip_through_from_str() {
        for status in TaskStatus::ALL {
            assert_eq!(TaskStatus::from_str(status.key()).unwrap(), status);
        }
    }

    #[test]
    fn test_status_parsing_is_lenient_on_case_and_separators() {
        assert_eq!(
            TaskStatus::from_str("in progress").unwrap(),
            TaskStatus::InProgress
        );
        assert_eq!(
            TaskStatus::from_str("in-progress").unwrap(),
            TaskStatus::InProgress
        );
        assert!(TaskStatus::from_str("DONE").is_err());
    }

    #[test]
    fn test_only_completed_is_terminal() {
        assert!(TaskStatus::Completed.is_terminal());
        assert!(!TaskStatus::Pending.is_terminal());
        assert!(!TaskStatus::Overdue.is_terminal());
        assert!(!TaskStatus::InProgress.is_terminal());
    }

    #[test]
    fn test_task_deserializes_from_backend_json() {
        let json = r#"{
            "id": 17,
            "status": "IN_PROGRESS",
            "priority": "HIGH",
            "assignedTo": "2nd Engineer",
            "nextDueAt": "2026-03-01T00:00:00Z",
            "startedAt": "2026-02-27T08:30:00Z",
            "equipmentName": "Main engine fuel pump",
            "description": "Replace seals"
        }"#;

        let task: MaintenanceTask = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, TaskId::new(17));
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.assigned_to.as_deref(), Some("2nd Engineer"));
        assert!(task.started_at.is_some());
    }
}
