use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt, str::FromStr};
use uuid::Uuid;

/// Identifier of a locally created column
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomColumnId(String);

impl CustomColumnId {
    const PREFIX: &'static str = "col-";

    /// Generates a fresh random column id
    pub fn generate() -> Self {
        Self(format!("{}{}", Self::PREFIX, Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CustomColumnId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for CustomColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a locally created task: a millisecond timestamp that is
/// kept strictly increasing within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomTaskId(i64);

impl CustomTaskId {
    const PREFIX: &'static str = "custom-";

    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Next id after `last`, based on the current time. Fails once `last`
    /// is the largest representable id.
    pub fn next_after(
        last: Option<CustomTaskId>,
        now: DateTime<Utc>,
    ) -> Result<Self, crate::error::BoardError> {
        let millis = now.timestamp_millis();
        match last {
            Some(last) if last.0 >= millis => last
                .0
                .checked_add(1)
                .map(Self)
                .ok_or_else(|| crate::error::BoardError::InvalidCustomTaskId(last.to_string())),
            _ => Ok(Self(millis)),
        }
    }
}

impl FromStr for CustomTaskId {
    type Err = crate::error::BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(Self::PREFIX)
            .unwrap_or(s)
            .parse::<i64>()
            .map(Self)
            .map_err(|_| crate::error::BoardError::InvalidCustomTaskId(s.to_string()))
    }
}

impl fmt::Display for CustomTaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, self.0)
    }
}

/// Label attached to a custom task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomTag {
    #[default]
    Routine,
    Inspection,
    Repair,
    Urgent,
}

impl fmt::Display for CustomTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Routine => write!(f, "Routine"),
            Self::Inspection => write!(f, "Inspection"),
            Self::Repair => write!(f, "Repair"),
            Self::Urgent => write!(f, "Urgent"),
        }
    }
}

/// A user-defined board column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomColumn {
    pub id: CustomColumnId,
    pub title: String,
    pub task_ids: Vec<CustomTaskId>,
    pub created_at: DateTime<Utc>,
}

impl CustomColumn {
    pub fn new(title: String) -> Self {
        Self {
            id: CustomColumnId::generate(),
            title,
            task_ids: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn contains(&self, task_id: CustomTaskId) -> bool {
        self.task_ids.contains(&task_id)
    }
}

/// An ad-hoc task that only exists on this device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomTask {
    pub id: CustomTaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tag: CustomTag,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a custom task
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCustomTask {
    pub title: String,
    pub description: String,
    pub tag: CustomTag,
}

impl NewCustomTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tag(mut self, tag: CustomTag) -> Self {
        self.tag = tag;
        self
    }
}

/// Everything the custom board persists, written as one snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomBoardState {
    #[serde(default)]
    pub columns: Vec<CustomColumn>,
    #[serde(default)]
    pub tasks: Vec<CustomTask>,
}

impl CustomBoardState {
    pub fn column(&self, id: &CustomColumnId) -> Option<&CustomColumn> {
        self.columns.iter().find(|col| &col.id == id)
    }

    pub fn task(&self, id: CustomTaskId) -> Option<&CustomTask> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Column currently holding the task, if any
    pub fn column_containing(&self, task_id: CustomTaskId) -> Option<&CustomColumn> {
        self.columns.iter().find(|col| col.contains(task_id))
    }

    pub fn is_custom_task(&self, id: CustomTaskId) -> bool {
        self.task(id).is_some()
    }

    /// Highest task id in the snapshot
    pub fn last_task_id(&self) -> Option<CustomTaskId> {
        self.tasks.iter().map(|task| task.id).max()
    }

    /// Drops duplicate and dangling ids from column lists so that every task
    /// id appears at most once across all columns and refers to an existing
    /// task. The first occurrence wins. Task records no column holds are
    /// dropped as well.
    pub fn repair(&mut self) -> RepairReport {
        let known: HashSet<CustomTaskId> = self.tasks.iter().map(|task| task.id).collect();
        let mut seen = HashSet::new();
        let mut report = RepairReport::default();

        for column in &mut self.columns {
            let before = column.task_ids.len();
            column
                .task_ids
                .retain(|id| known.contains(id) && seen.insert(*id));
            report.dropped_ids += before - column.task_ids.len();
        }

        let before = self.tasks.len();
        self.tasks.retain(|task| seen.contains(&task.id));
        report.orphaned_tasks = before - self.tasks.len();

        report
    }
}

/// What [`CustomBoardState::repair`] removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Duplicate or dangling ids taken out of column lists
    pub dropped_ids: usize,
    /// Task records no column referenced
    pub orphaned_tasks: usize,
}

impl RepairReport {
    pub fn is_clean(&self) -> bool {
        self.dropped_ids == 0 && self.orphaned_tasks == 0
    }
}
