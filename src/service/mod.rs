use crate::{
    domain::{MaintenanceTask, TaskId, TaskStatus},
    error::Result,
};
use async_trait::async_trait;

pub mod memory;

pub use memory::InMemoryTaskService;

/// The backend task authority.
///
/// Owns maintenance tasks and decides what their status is; the board only
/// reads them and asks for changes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskService: Send + Sync {
    /// Fetches the current set of maintenance tasks
    async fn fetch_tasks(&self) -> Result<Vec<MaintenanceTask>>;

    /// Requests a status change for a task
    async fn update_task_status(&self, id: TaskId, status: TaskStatus) -> Result<()>;

    /// Deletes a task
    async fn delete_task(&self, id: TaskId) -> Result<()>;
}
