use crate::domain::{
    card::{Card, CardId, ColumnId, Domain},
    custom::{CustomColumn, CustomTask, CustomTaskId},
    task::{MaintenanceTask, TaskStatus},
};
use serde::Serialize;
use std::collections::HashMap;

/// A rendered board column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    pub cards: Vec<Card>,
}

impl Column {
    pub fn domain(&self) -> Domain {
        self.id.domain()
    }

    pub fn card_ids(&self) -> Vec<CardId> {
        self.cards.iter().map(Card::id).collect()
    }

    pub fn contains(&self, card: &CardId) -> bool {
        self.cards.iter().any(|c| &c.id() == card)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// The merged board: backend status columns first, then custom columns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Board {
    pub columns: Vec<Column>,
}

impl Board {
    pub fn column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|col| &col.id == id)
    }

    pub fn find_card(&self, id: &CardId) -> Option<&Card> {
        self.columns
            .iter()
            .flat_map(|col| col.cards.iter())
            .find(|card| &card.id() == id)
    }

    /// Column holding the card. Custom columns are checked first.
    pub fn column_of(&self, id: &CardId) -> Option<&ColumnId> {
        let (custom, backend): (Vec<&Column>, Vec<&Column>) = self
            .columns
            .iter()
            .partition(|col| col.domain() == Domain::Custom);

        custom
            .into_iter()
            .chain(backend)
            .find(|col| col.contains(id))
            .map(|col| &col.id)
    }

    /// Number of cards per column, in board order
    pub fn card_counts(&self) -> Vec<(ColumnId, usize)> {
        self.columns
            .iter()
            .map(|col| (col.id.clone(), col.len()))
            .collect()
    }
}

/// Merges backend tasks and the custom board into one board.
///
/// Backend tasks keep the order they were received in. Custom cards follow
/// each column's `task_ids` order; ids without a matching task are skipped.
pub fn build_board(
    tasks: &[MaintenanceTask],
    custom_columns: &[CustomColumn],
    custom_tasks: &[CustomTask],
) -> Board {
    let mut columns: Vec<Column> = TaskStatus::ALL
        .into_iter()
        .map(|status| Column {
            id: ColumnId::Status(status),
            title: status.to_string(),
            cards: tasks
                .iter()
                .filter(|task| task.status == status)
                .cloned()
                .map(Card::Backend)
                .collect(),
        })
        .collect();

    let by_id: HashMap<CustomTaskId, &CustomTask> =
        custom_tasks.iter().map(|task| (task.id, task)).collect();

    columns.extend(custom_columns.iter().map(|col| Column {
        id: ColumnId::Custom(col.id.clone()),
        title: col.title.clone(),
        cards: col
            .task_ids
            .iter()
            .filter_map(|id| by_id.get(id))
            .map(|task| Card::Custom((*task).clone()))
            .collect(),
    }));

    Board { columns }
}
