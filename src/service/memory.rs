//! In-process task authority for offline boards and tests.

use crate::{
    domain::{MaintenanceTask, TaskId, TaskStatus},
    error::{BoardError, Result},
    service::TaskService,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Thread-safe in-memory task authority
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskService {
    state: Arc<RwLock<ServiceState>>,
}

#[derive(Debug, Default)]
struct ServiceState {
    tasks: Vec<MaintenanceTask>,
    failing: HashSet<TaskId>,
    updates: Vec<(TaskId, TaskStatus)>,
}

impl InMemoryTaskService {
    pub fn new(tasks: Vec<MaintenanceTask>) -> Self {
        Self {
            state: Arc::new(RwLock::new(ServiceState {
                tasks,
                ..ServiceState::default()
            })),
        }
    }

    /// Makes every update or delete of `id` fail
    pub async fn fail_for(&self, id: TaskId) {
        self.state.write().await.failing.insert(id);
    }

    /// Updates a task as the backend would on its own (e.g. crew completion
    /// or due-date re-evaluation)
    pub async fn set_status(&self, id: TaskId, status: TaskStatus) -> Result<()> {
        let mut state = self.state.write().await;
        let task = state
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| BoardError::TaskNotFound(id.to_string()))?;
        task.status = status;
        Ok(())
    }

    /// Status updates received so far, in call order
    pub async fn updates(&self) -> Vec<(TaskId, TaskStatus)> {
        self.state.read().await.updates.clone()
    }
}

#[async_trait]
impl TaskService for InMemoryTaskService {
    async fn fetch_tasks(&self) -> Result<Vec<MaintenanceTask>> {
        Ok(self.state.read().await.tasks.clone())
    }

    async fn update_task_status(&self, id: TaskId, status: TaskStatus) -> Result<()> {
        let mut state = self.state.write().await;
        state.updates.push((id, status));

        if state.failing.contains(&id) {
            return Err(BoardError::Backend(format!("update of task {id} rejected")));
        }

        let task = state
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| BoardError::TaskNotFound(id.to_string()))?;

        // started_at is set on first start and kept when moved back to pending
        if status == TaskStatus::InProgress && task.started_at.is_none() {
            task.started_at = Some(Utc::now());
        }
        task.status = status;
        Ok(())
    }

    async fn delete_task(&self, id: TaskId) -> Result<()> {
        let mut state = self.state.write().await;

        if state.failing.contains(&id) {
            return Err(BoardError::Backend(format!("delete of task {id} rejected")));
        }

        let before = state.tasks.len();
        state.tasks.retain(|task| task.id != id);
        if state.tasks.len() == before {
            return Err(BoardError::TaskNotFound(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(id: u64) -> MaintenanceTask {
        MaintenanceTask::new(TaskId::new(id), "Steering gear", Utc::now())
    }

    #[tokio::test]
    async fn test_update_sets_started_at_once() {
        let service = InMemoryTaskService::new(vec![pending(1)]);

        service
            .update_task_status(TaskId::new(1), TaskStatus::InProgress)
            .await
            .unwrap();
        let started = service.fetch_tasks().await.unwrap()[0].started_at;
        assert!(started.is_some());

        service
            .update_task_status(TaskId::new(1), TaskStatus::Pending)
            .await
            .unwrap();
        let tasks = service.fetch_tasks().await.unwrap();
        assert_eq!(tasks[0].status, TaskStatus::Pending);
        assert_eq!(tasks[0].started_at, started);
    }

    #[tokio::test]
    async fn test_failing_task_is_left_untouched() {
        let service = InMemoryTaskService::new(vec![pending(1)]);
        service.fail_for(TaskId::new(1)).await;

        assert!(service
            .update_task_status(TaskId::new(1), TaskStatus::InProgress)
            .await
            .is_err());
        assert!(service.delete_task(TaskId::new(1)).await.is_err());

        let tasks = service.fetch_tasks().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].status, TaskStatus::Pending);
        assert_eq!(service.updates().await.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_unknown_task() {
        let service = InMemoryTaskService::new(Vec::new());
        assert!(matches!(
            service.delete_task(TaskId::new(5)).await,
            Err(BoardError::TaskNotFound(_))
        ));
    }
}
