//! Custom Board Store: the only owner of custom columns and custom tasks.
//!
//! Every mutation is applied to a copy of the current snapshot, written
//! through [`CustomStateStorage`], and only then committed in memory. A
//! failed write therefore leaves the store exactly at the last saved state.

use crate::{
    domain::{
        CustomBoardState, CustomColumn, CustomColumnId, CustomTask, CustomTaskId, NewCustomTask,
    },
    error::{BoardError, Result},
    storage::CustomStateStorage,
};
use chrono::Utc;
use std::collections::HashSet;
use tracing::{debug, info, warn};

pub struct CustomBoardStore<S> {
    storage: S,
    state: CustomBoardState,
    last_task_id: Option<CustomTaskId>,
}

impl<S: CustomStateStorage> CustomBoardStore<S> {
    /// Loads the saved custom board from `storage`
    pub fn open(storage: S) -> Result<Self> {
        let mut state = storage.load()?;

        let repair = state.repair();
        if !repair.is_clean() {
            warn!(
                dropped_ids = repair.dropped_ids,
                orphaned_tasks = repair.orphaned_tasks,
                "repaired inconsistent custom board"
            );
        }

        let last_task_id = state.last_task_id();
        debug!(
            columns = state.columns.len(),
            tasks = state.tasks.len(),
            "custom board loaded"
        );

        Ok(Self {
            storage,
            state,
            last_task_id,
        })
    }

    pub fn state(&self) -> &CustomBoardState {
        &self.state
    }

    pub fn columns(&self) -> &[CustomColumn] {
        &self.state.columns
    }

    pub fn tasks(&self) -> &[CustomTask] {
        &self.state.tasks
    }

    pub fn column(&self, id: &CustomColumnId) -> Option<&CustomColumn> {
        self.state.column(id)
    }

    pub fn task(&self, id: CustomTaskId) -> Option<&CustomTask> {
        self.state.task(id)
    }

    pub fn column_containing(&self, task_id: CustomTaskId) -> Option<&CustomColumn> {
        self.state.column_containing(task_id)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Creates an empty column
    pub fn create_column(&mut self, title: &str) -> Result<CustomColumn> {
        let title = non_empty(title, "Column")?;
        let column = CustomColumn::new(title);

        let mut draft = self.state.clone();
        draft.columns.push(column.clone());
        self.commit(draft)?;

        info!(column = %column.id, title = %column.title, "custom column created");
        Ok(column)
    }

    /// Deletes a column together with every task it holds. Returns the
    /// removed tasks.
    pub fn delete_column(&mut self, id: &CustomColumnId) -> Result<Vec<CustomTask>> {
        let column = self
            .column(id)
            .ok_or_else(|| BoardError::CustomColumnNotFound(id.to_string()))?;
        let doomed: HashSet<CustomTaskId> = column.task_ids.iter().copied().collect();

        let mut draft = self.state.clone();
        let (removed, kept): (Vec<CustomTask>, Vec<CustomTask>) = draft
            .tasks
            .into_iter()
            .partition(|task| doomed.contains(&task.id));
        draft.tasks = kept;
        draft.columns.retain(|col| &col.id != id);
        self.commit(draft)?;

        info!(column = %id, tasks = removed.len(), "custom column deleted");
        Ok(removed)
    }

    /// Creates a task at the end of `column_id`
    pub fn create_task(&mut self, column_id: &CustomColumnId, input: NewCustomTask) -> Result<CustomTask> {
        let title = non_empty(&input.title, "Task")?;
        if self.column(column_id).is_none() {
            return Err(BoardError::CustomColumnNotFound(column_id.to_string()));
        }

        let id = CustomTaskId::next_after(self.last_task_id, Utc::now())?;
        self.last_task_id = Some(id);

        let task = CustomTask {
            id,
            title,
            description: input.description.trim().to_string(),
            tag: input.tag,
            created_at: Utc::now(),
        };

        let mut draft = self.state.clone();
        draft.tasks.push(task.clone());
        if let Some(column) = draft.columns.iter_mut().find(|col| &col.id == column_id) {
            column.task_ids.push(id);
        }
        self.commit(draft)?;

        info!(task = %task.id, column = %column_id, "custom task created");
        Ok(task)
    }

    /// Moves a task to the end of `target`, removing it from every other column
    pub fn move_task(&mut self, task_id: CustomTaskId, target: &CustomColumnId) -> Result<()> {
        if self.task(task_id).is_none() {
            return Err(BoardError::CustomTaskNotFound(task_id.to_string()));
        }
        if self.column(target).is_none() {
            return Err(BoardError::CustomColumnNotFound(target.to_string()));
        }

        let mut draft = self.state.clone();
        for column in &mut draft.columns {
            column.task_ids.retain(|id| *id != task_id);
            if &column.id == target {
                column.task_ids.push(task_id);
            }
        }
        self.commit(draft)?;

        info!(task = %task_id, column = %target, "custom task moved");
        Ok(())
    }

    /// Deletes a single task
    pub fn delete_task(&mut self, task_id: CustomTaskId) -> Result<()> {
        if self.task(task_id).is_none() {
            return Err(BoardError::CustomTaskNotFound(task_id.to_string()));
        }
        self.delete_tasks(&[task_id]).map(|_| ())
    }

    /// Deletes every listed task in a single write. Unknown ids are ignored.
    /// Returns the number of tasks removed.
    pub fn delete_tasks(&mut self, task_ids: &[CustomTaskId]) -> Result<usize> {
        let doomed: HashSet<CustomTaskId> = task_ids.iter().copied().collect();

        let mut draft = self.state.clone();
        let before = draft.tasks.len();
        draft.tasks.retain(|task| !doomed.contains(&task.id));
        let removed = before - draft.tasks.len();
        for column in &mut draft.columns {
            column.task_ids.retain(|id| !doomed.contains(id));
        }
        self.commit(draft)?;

        info!(removed, "custom tasks deleted");
        Ok(removed)
    }

    fn commit(&mut self, draft: CustomBoardState) -> Result<()> {
        if let Err(err) = self.storage.save(&draft) {
            warn!(error = %err, "failed to persist custom board; change discarded");
            return Err(err);
        }
        self.state = draft;
        Ok(())
    }
}

fn non_empty(title: &str, what: &'static str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(BoardError::EmptyTitle { what });
    }
    Ok(trimmed.to_string())
}
