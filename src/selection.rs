//! Per-column multi-select and confirm-then-delete.

use crate::{
    controller::Acknowledgement,
    domain::{CardId, Column, ColumnId, CustomTaskId},
    error::Result,
    service::TaskService,
    storage::CustomStateStorage,
    store::CustomBoardStore,
};
use std::collections::{BTreeSet, HashMap};
use tracing::{info, warn};

/// Selection sets keyed by the column whose menu owns them
#[derive(Debug, Default)]
pub struct BulkSelection {
    menus: HashMap<ColumnId, BTreeSet<CardId>>,
}

impl BulkSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens (or reopens) a column's menu with an empty selection
    pub fn open_menu(&mut self, column: &ColumnId) {
        self.menus.insert(column.clone(), BTreeSet::new());
    }

    /// Closes a column's menu and forgets its selection
    pub fn close_menu(&mut self, column: &ColumnId) {
        self.menus.remove(column);
    }

    pub fn is_open(&self, column: &ColumnId) -> bool {
        self.menus.contains_key(column)
    }

    /// Flips selection of `card`; returns whether it is now selected.
    /// Does nothing while the column's menu is closed.
    pub fn toggle(&mut self, column: &ColumnId, card: CardId) -> bool {
        let Some(selected) = self.menus.get_mut(column) else {
            return false;
        };
        if selected.remove(&card) {
            false
        } else {
            selected.insert(card);
            true
        }
    }

    /// Selects every card currently in `column`; returns whether the menu
    /// was open. Does nothing while the column's menu is closed.
    pub fn select_all(&mut self, column: &Column) -> bool {
        let Some(selected) = self.menus.get_mut(&column.id) else {
            return false;
        };
        *selected = column.card_ids().into_iter().collect();
        true
    }

    pub fn clear(&mut self, column: &ColumnId) {
        if let Some(selected) = self.menus.get_mut(column) {
            selected.clear();
        }
    }

    pub fn selected(&self, column: &ColumnId) -> Vec<CardId> {
        self.menus
            .get(column)
            .map(|selected| selected.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn is_selected(&self, column: &ColumnId, card: &CardId) -> bool {
        self.menus
            .get(column)
            .map(|selected| selected.contains(card))
            .unwrap_or(false)
    }

    fn deselect(&mut self, column: &ColumnId, card: &CardId) {
        if let Some(selected) = self.menus.get_mut(column) {
            selected.remove(card);
        }
    }
}

/// Per-item result of a bulk delete
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BulkDeleteReport {
    pub deleted: Vec<CardId>,
    pub failed: Vec<(CardId, String)>,
}

impl BulkDeleteReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Deletes the cards selected in `column`.
///
/// Custom columns go through [`CustomBoardStore::delete_tasks`] in one write.
/// Backend columns call the task service once per card and keep going after
/// a failure; deleted cards leave the selection, failed ones stay selected.
pub async fn delete_selected<S, T>(
    selection: &mut BulkSelection,
    column: &Column,
    acknowledgement: Acknowledgement,
    store: &mut CustomBoardStore<S>,
    service: &T,
) -> Result<BulkDeleteReport>
where
    S: CustomStateStorage,
    T: TaskService + ?Sized,
{
    if acknowledgement == Acknowledgement::Declined {
        return Ok(BulkDeleteReport::default());
    }

    // Board order, restricted to what is still on the board
    let targets: Vec<CardId> = column
        .card_ids()
        .into_iter()
        .filter(|card| selection.is_selected(&column.id, card))
        .collect();

    match &column.id {
        ColumnId::Custom(_) => {
            let ids: Vec<CustomTaskId> = targets
                .iter()
                .filter_map(|card| match card {
                    CardId::Custom(id) => Some(*id),
                    CardId::Backend(_) => None,
                })
                .collect();
            store.delete_tasks(&ids)?;

            for card in &targets {
                selection.deselect(&column.id, card);
            }
            info!(column = %column.id, deleted = targets.len(), "bulk delete of custom tasks");
            Ok(BulkDeleteReport {
                deleted: targets,
                failed: Vec::new(),
            })
        }
        ColumnId::Status(_) => {
            let mut report = BulkDeleteReport::default();
            for card in targets {
                let CardId::Backend(task_id) = card else {
                    continue;
                };
                match service.delete_task(task_id).await {
                    Ok(()) => {
                        selection.deselect(&column.id, &card);
                        report.deleted.push(card);
                    }
                    Err(err) => {
                        warn!(task = %task_id, error = %err, "bulk delete item failed");
                        report.failed.push((card, err.to_string()));
                    }
                }
            }
            info!(
                column = %column.id,
                deleted = report.deleted.len(),
                failed = report.failed.len(),
                "bulk delete of maintenance tasks"
            );
            Ok(report)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{build_board, MaintenanceTask, NewCustomTask, TaskId, TaskStatus};
    use crate::service::{InMemoryTaskService, MockTaskService};
    use crate::storage::InMemoryStorage;
    use chrono::Utc;

    fn store() -> CustomBoardStore<InMemoryStorage> {
        CustomBoardStore::open(InMemoryStorage::new()).unwrap()
    }

    fn pending(id: u64) -> MaintenanceTask {
        MaintenanceTask::new(TaskId::new(id), format!("Equipment {id}"), Utc::now())
    }

    const PENDING: ColumnId = ColumnId::Status(TaskStatus::Pending);

    #[test]
    fn test_reopening_menu_clears_selection() {
        let mut selection = BulkSelection::new();
        let card = CardId::Backend(TaskId::new(1));

        selection.open_menu(&PENDING);
        assert!(selection.toggle(&PENDING, card));
        assert!(selection.is_selected(&PENDING, &card));

        selection.open_menu(&PENDING);
        assert!(selection.selected(&PENDING).is_empty());

        selection.toggle(&PENDING, card);
        selection.close_menu(&PENDING);
        assert!(!selection.is_open(&PENDING));
        assert!(!selection.is_selected(&PENDING, &card));
    }

    #[test]
    fn test_toggle_requires_open_menu() {
        let mut selection = BulkSelection::new();
        assert!(!selection.toggle(&PENDING, CardId::Backend(TaskId::new(1))));
        assert!(selection.selected(&PENDING).is_empty());
    }

    #[test]
    fn test_select_all_requires_open_menu() {
        let board = build_board(&[pending(1), pending(2)], &[], &[]);
        let column = board.column(&PENDING).unwrap();
        let mut selection = BulkSelection::new();

        assert!(!selection.select_all(column));
        assert!(!selection.is_open(&PENDING));
        assert!(selection.selected(&PENDING).is_empty());
    }

    #[test]
    fn test_select_all_takes_current_cards() {
        let board = build_board(&[pending(1), pending(2)], &[], &[]);
        let column = board.column(&PENDING).unwrap();
        let mut selection = BulkSelection::new();

        selection.open_menu(&PENDING);
        assert!(selection.select_all(column));
        assert_eq!(selection.selected(&PENDING), column.card_ids());

        assert!(!selection.toggle(&PENDING, CardId::Backend(TaskId::new(1))));
        assert_eq!(selection.selected(&PENDING).len(), 1);

        selection.clear(&PENDING);
        assert!(selection.selected(&PENDING).is_empty());
    }

    #[tokio::test]
    async fn test_partial_backend_failure_keeps_failed_card_selected() {
        let service = InMemoryTaskService::new(vec![pending(1), pending(2), pending(3)]);
        service.fail_for(TaskId::new(2)).await;
        let board = build_board(&service.fetch_tasks().await.unwrap(), &[], &[]);
        let column = board.column(&PENDING).unwrap();
        let mut selection = BulkSelection::new();
        selection.open_menu(&PENDING);
        selection.select_all(column);
        let mut store = store();

        let report = delete_selected(&mut selection, column, Acknowledgement::Accepted, &mut store, &service)
            .await
            .unwrap();

        assert_eq!(
            report.deleted,
            vec![CardId::Backend(TaskId::new(1)), CardId::Backend(TaskId::new(3))]
        );
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, CardId::Backend(TaskId::new(2)));
        assert!(!report.is_complete());
        assert_eq!(selection.selected(&PENDING), vec![CardId::Backend(TaskId::new(2))]);

        let remaining = service.fetch_tasks().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, TaskId::new(2));
    }

    #[tokio::test]
    async fn test_backend_delete_only_touches_selected_cards() {
        let board = build_board(&[pending(1), pending(2)], &[], &[]);
        let column = board.column(&PENDING).unwrap();
        let mut selection = BulkSelection::new();
        selection.open_menu(&PENDING);
        selection.toggle(&PENDING, CardId::Backend(TaskId::new(2)));

        let mut service = MockTaskService::new();
        service
            .expect_delete_task()
            .withf(|id| *id == TaskId::new(2))
            .times(1)
            .returning(|_| Ok(()));

        let report = delete_selected(&mut selection, column, Acknowledgement::Accepted, &mut store(), &service)
            .await
            .unwrap();
        assert_eq!(report.deleted, vec![CardId::Backend(TaskId::new(2))]);
    }

    #[tokio::test]
    async fn test_declined_delete_does_nothing() {
        let board = build_board(&[pending(1)], &[], &[]);
        let column = board.column(&PENDING).unwrap();
        let mut selection = BulkSelection::new();
        selection.open_menu(&PENDING);
        selection.select_all(column);

        let mut service = MockTaskService::new();
        service.expect_delete_task().times(0);

        let report = delete_selected(&mut selection, column, Acknowledgement::Declined, &mut store(), &service)
            .await
            .unwrap();
        assert_eq!(report, BulkDeleteReport::default());
        assert_eq!(selection.selected(&PENDING).len(), 1);
    }

    #[tokio::test]
    async fn test_custom_bulk_delete_uses_store() {
        let mut store = store();
        let spares = store.create_column("Spares").unwrap();
        let a = store.create_task(&spares.id, NewCustomTask::new("a")).unwrap();
        let b = store.create_task(&spares.id, NewCustomTask::new("b")).unwrap();
        let c = store.create_task(&spares.id, NewCustomTask::new("c")).unwrap();
        let board = build_board(&[], store.columns(), store.tasks());
        let column_id = ColumnId::Custom(spares.id.clone());
        let column = board.column(&column_id).unwrap();

        let mut selection = BulkSelection::new();
        selection.open_menu(&column_id);
        selection.toggle(&column_id, CardId::Custom(a.id));
        selection.toggle(&column_id, CardId::Custom(c.id));

        let mut service = MockTaskService::new();
        service.expect_delete_task().times(0);

        let report = delete_selected(&mut selection, column, Acknowledgement::Accepted, &mut store, &service)
            .await
            .unwrap();

        assert_eq!(report.deleted.len(), 2);
        assert!(selection.selected(&column_id).is_empty());
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.column(&spares.id).unwrap().task_ids, vec![b.id]);
    }
}
