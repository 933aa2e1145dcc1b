use chrono::NaiveDate;
use uuid::Uuid;

use crate::model::board::Board;
use crate::model::task::Task;

/// Error type for task operations
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("task title must not be empty")]
    EmptyTitle,
    #[error("task not found: {0}")]
    NotFound(Uuid),
    #[error("category not found: {0}")]
    CategoryNotFound(Uuid),
}

/// Add a single task to a board cell. Titles are trimmed; empty titles
/// and unknown categories are rejected before any mutation.
pub fn add_task(
    board: &mut Board,
    category_id: Uuid,
    date: NaiveDate,
    title: &str,
) -> Result<Uuid, TaskError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(TaskError::EmptyTitle);
    }
    if board.category(category_id).is_none() {
        return Err(TaskError::CategoryNotFound(category_id));
    }
    let task = Task::new(category_id, date, title);
    let id = task.id;
    board.tasks.insert(id, task);
    Ok(id)
}

/// Batch-paste: one task per non-empty line of `text`, all into the
/// same cell. Rejected outright when no line carries a title.
pub fn paste_tasks(
    board: &mut Board,
    category_id: Uuid,
    date: NaiveDate,
    text: &str,
) -> Result<Vec<Uuid>, TaskError> {
    if board.category(category_id).is_none() {
        return Err(TaskError::CategoryNotFound(category_id));
    }
    let titles: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if titles.is_empty() {
        return Err(TaskError::EmptyTitle);
    }
    let mut ids = Vec::with_capacity(titles.len());
    for title in titles {
        let task = Task::new(category_id, date, title);
        ids.push(task.id);
        board.tasks.insert(task.id, task);
    }
    Ok(ids)
}

/// Replace a task wholesale (same id)
pub fn replace_task(board: &mut Board, updated: Task) -> Result<(), TaskError> {
    let task = board
        .task_mut(updated.id)
        .ok_or(TaskError::NotFound(updated.id))?;
    *task = updated;
    Ok(())
}

/// Flip completion state. Returns the new state.
pub fn toggle_completed(board: &mut Board, id: Uuid) -> Result<bool, TaskError> {
    let task = board.task_mut(id).ok_or(TaskError::NotFound(id))?;
    task.completed = !task.completed;
    Ok(task.completed)
}

/// Drag-move: re-home a task to another category/date cell
pub fn move_task(
    board: &mut Board,
    id: Uuid,
    category_id: Uuid,
    date: NaiveDate,
) -> Result<(), TaskError> {
    if board.category(category_id).is_none() {
        return Err(TaskError::CategoryNotFound(category_id));
    }
    let task = board.task_mut(id).ok_or(TaskError::NotFound(id))?;
    task.category_id = category_id;
    task.date = date;
    Ok(())
}

/// Remove a task, returning it for compensation/undo bookkeeping
pub fn remove_task(board: &mut Board, id: Uuid) -> Result<Task, TaskError> {
    board
        .tasks
        .shift_remove(&id)
        .ok_or(TaskError::NotFound(id))
}
