//! One planner's board: cached backend tasks, the custom board, the current
//! drag gesture and open selection menus, wired to a task service.

use crate::{
    controller::{
        confirm_transition, Acknowledgement, DragController, DropOutcome, DropTarget,
        PendingTransition, TransitionOutcome,
    },
    domain::{build_board, Board, Card, CardId, ColumnId, CustomColumnId, CustomTask, Domain, MaintenanceTask},
    error::{BoardError, Result},
    selection::{delete_selected, BulkDeleteReport, BulkSelection},
    service::TaskService,
    storage::CustomStateStorage,
    store::CustomBoardStore,
};
use std::{collections::HashSet, sync::Arc};
use tracing::{debug, warn};

pub struct BoardSession<S, T: ?Sized> {
    store: CustomBoardStore<S>,
    service: Arc<T>,
    tasks: Vec<MaintenanceTask>,
    drag: DragController,
    selection: BulkSelection,
}

impl<S, T> BoardSession<S, T>
where
    S: CustomStateStorage,
    T: TaskService + ?Sized,
{
    /// Creates a session with an empty task cache; call [`refresh`](Self::refresh)
    /// or [`set_tasks`](Self::set_tasks) to fill it
    pub fn new(store: CustomBoardStore<S>, service: Arc<T>) -> Self {
        Self {
            store,
            service,
            tasks: Vec::new(),
            drag: DragController::new(),
            selection: BulkSelection::new(),
        }
    }

    /// Replaces the task cache with the service's current task list. On
    /// failure the previous cache is kept.
    pub async fn refresh(&mut self) -> Result<usize> {
        match self.service.fetch_tasks().await {
            Ok(tasks) => {
                debug!(tasks = tasks.len(), "maintenance tasks refreshed");
                self.tasks = tasks;
                Ok(self.tasks.len())
            }
            Err(err) => {
                warn!(error = %err, "failed to refresh maintenance tasks");
                Err(err)
            }
        }
    }

    /// Replaces the task cache with tasks pushed by the caller
    pub fn set_tasks(&mut self, tasks: Vec<MaintenanceTask>) {
        self.tasks = tasks;
    }

    pub fn tasks(&self) -> &[MaintenanceTask] {
        &self.tasks
    }

    pub fn store(&self) -> &CustomBoardStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut CustomBoardStore<S> {
        &mut self.store
    }

    pub fn selection(&self) -> &BulkSelection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut BulkSelection {
        &mut self.selection
    }

    /// Current board, rebuilt from the task cache and the custom board
    pub fn board(&self) -> Board {
        build_board(&self.tasks, self.store.columns(), self.store.tasks())
    }

    pub fn begin_drag(&mut self, card: &CardId) -> Result<Domain> {
        let board = self.board();
        self.drag.begin(card, &board)
    }

    /// Card shown in the drag overlay
    pub fn dragging(&self) -> Option<&Card> {
        self.drag.dragging()
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    pub fn end_drag(&mut self, target: Option<DropTarget>) -> Result<DropOutcome> {
        let board = self.board();
        self.drag.end(target, &board, &mut self.store)
    }

    /// Sends an acknowledged status change to the task service. The cache is
    /// left alone; the new placement shows up on the next refresh.
    pub async fn confirm_transition(
        &self,
        pending: &PendingTransition,
        acknowledgement: Acknowledgement,
    ) -> Result<TransitionOutcome> {
        confirm_transition(pending, acknowledgement, self.service.as_ref()).await
    }

    /// Deletes a custom column and its tasks once the user has confirmed
    pub fn delete_column(
        &mut self,
        id: &CustomColumnId,
        acknowledgement: Acknowledgement,
    ) -> Result<Vec<CustomTask>> {
        if acknowledgement == Acknowledgement::Declined {
            return Ok(Vec::new());
        }
        let removed = self.store.delete_column(id)?;
        self.selection.close_menu(&ColumnId::Custom(id.clone()));
        Ok(removed)
    }

    /// Deletes the cards selected in `column` once the user has confirmed.
    /// Backend cards that were deleted leave the task cache right away.
    pub async fn delete_selected(
        &mut self,
        column: &ColumnId,
        acknowledgement: Acknowledgement,
    ) -> Result<BulkDeleteReport> {
        let board = self.board();
        let column = board
            .column(column)
            .ok_or_else(|| BoardError::CustomColumnNotFound(column.to_string()))?;

        let report = delete_selected(
            &mut self.selection,
            column,
            acknowledgement,
            &mut self.store,
            self.service.as_ref(),
        )
        .await?;

        let deleted: HashSet<CardId> = report.deleted.iter().copied().collect();
        self.tasks
            .retain(|task| !deleted.contains(&CardId::Backend(task.id)));

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewCustomTask, TaskId, TaskStatus};
    use crate::service::MockTaskService;
    use crate::storage::InMemoryStorage;
    use chrono::Utc;

    fn task(id: u64, status: TaskStatus) -> MaintenanceTask {
        MaintenanceTask::new(TaskId::new(id), format!("Equipment {id}"), Utc::now()).with_status(status)
    }

    fn session(service: MockTaskService) -> BoardSession<InMemoryStorage, MockTaskService> {
        let store = CustomBoardStore::open(InMemoryStorage::new()).unwrap();
        BoardSession::new(store, Arc::new(service))
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_cache() {
        let mut service = MockTaskService::new();
        service
            .expect_fetch_tasks()
            .times(1)
            .returning(|| Err(BoardError::Backend("offline".to_string())));
        let mut session = session(service);
        session.set_tasks(vec![task(1, TaskStatus::Pending)]);

        assert!(session.refresh().await.is_err());
        assert_eq!(session.tasks().len(), 1);
    }

    #[tokio::test]
    async fn test_same_column_drop_never_calls_service() {
        let mut service = MockTaskService::new();
        service.expect_update_task_status().times(0);
        let mut session = session(service);
        session.set_tasks(vec![task(1, TaskStatus::InProgress), task(2, TaskStatus::InProgress)]);

        session.begin_drag(&CardId::Backend(TaskId::new(1))).unwrap();
        let outcome = session
            .end_drag(Some(DropTarget::Card(CardId::Backend(TaskId::new(2)))))
            .unwrap();

        assert!(matches!(outcome, DropOutcome::Reordered { .. }));
        assert!(outcome.notice().is_none());
    }

    #[tokio::test]
    async fn test_failed_update_leaves_task_in_place() {
        let mut service = MockTaskService::new();
        service
            .expect_update_task_status()
            .times(1)
            .returning(|_, _| Err(BoardError::Backend("conflict".to_string())));
        let mut session = session(service);
        session.set_tasks(vec![task(1, TaskStatus::Pending)]);
        let before = session.board();

        session.begin_drag(&CardId::Backend(TaskId::new(1))).unwrap();
        let DropOutcome::AwaitingConfirmation(pending) = session
            .end_drag(Some(DropTarget::Column(ColumnId::Status(TaskStatus::InProgress))))
            .unwrap()
        else {
            panic!("expected confirmation");
        };

        assert!(session
            .confirm_transition(&pending, Acknowledgement::Accepted)
            .await
            .is_err());
        assert_eq!(session.board(), before);
    }

    #[tokio::test]
    async fn test_delete_column_requires_acknowledgement() {
        let mut session = session(MockTaskService::new());
        let column = session.store_mut().create_column("Drydock Prep").unwrap();
        session
            .store_mut()
            .create_task(&column.id, NewCustomTask::new("Inspect rudder"))
            .unwrap();

        assert!(session
            .delete_column(&column.id, Acknowledgement::Declined)
            .unwrap()
            .is_empty());
        assert_eq!(session.store().columns().len(), 1);

        let removed = session
            .delete_column(&column.id, Acknowledgement::Accepted)
            .unwrap();
        assert_eq!(removed.len(), 1);
        assert!(session.store().columns().is_empty());
        assert!(session.store().tasks().is_empty());
    }

    #[tokio::test]
    async fn test_delete_selected_on_unknown_column() {
        let mut session = session(MockTaskService::new());
        let missing = ColumnId::Custom(CustomColumnId::from("col-gone"));
        assert!(session
            .delete_selected(&missing, Acknowledgement::Accepted)
            .await
            .is_err());
    }
}
