use uuid::Uuid;

use crate::model::board::Board;
use crate::model::category::{Category, Palette};
use crate::model::task::Task;

/// Error type for category operations
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CategoryError {
    #[error("category title must not be empty")]
    EmptyTitle,
    #[error("category not found: {0}")]
    NotFound(Uuid),
    #[error("invalid category index: {0}")]
    InvalidIndex(usize),
}

/// Append a category. Without an explicit color the palette cycles
/// deterministically with the category count.
pub fn add_category(
    board: &mut Board,
    title: &str,
    color: Option<Palette>,
) -> Result<Uuid, CategoryError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CategoryError::EmptyTitle);
    }
    let color = color.unwrap_or(Palette::ALL[board.categories.len() % Palette::ALL.len()]);
    let category = Category::new(title, color, board.next_position());
    let id = category.id;
    board.categories.push(category);
    Ok(id)
}

/// Replace a category wholesale (same id)
pub fn replace_category(board: &mut Board, updated: Category) -> Result<(), CategoryError> {
    let category = board
        .category_mut(updated.id)
        .ok_or(CategoryError::NotFound(updated.id))?;
    *category = updated;
    board.sort_categories();
    Ok(())
}

pub fn toggle_collapsed(board: &mut Board, id: Uuid) -> Result<bool, CategoryError> {
    let category = board.category_mut(id).ok_or(CategoryError::NotFound(id))?;
    category.collapsed = !category.collapsed;
    Ok(category.collapsed)
}

/// Cascade delete: the category and every task homed in it go in one
/// step. Returns what was removed (category, its index, its tasks) so
/// the caller can drive the backend and build its compensation.
pub fn remove_category(
    board: &mut Board,
    id: Uuid,
) -> Result<(Category, usize, Vec<Task>), CategoryError> {
    let index = board
        .categories
        .iter()
        .position(|c| c.id == id)
        .ok_or(CategoryError::NotFound(id))?;
    let category = board.categories.remove(index);
    let doomed: Vec<Uuid> = board
        .tasks
        .values()
        .filter(|t| t.category_id == id)
        .map(|t| t.id)
        .collect();
    let mut removed_tasks = Vec::with_capacity(doomed.len());
    for task_id in doomed {
        if let Some(task) = board.tasks.shift_remove(&task_id) {
            removed_tasks.push(task);
        }
    }
    Ok((category, index, removed_tasks))
}

/// Drag-reorder: move the category at `from` to `to`, then reassign
/// every position to its new array index (dense, zero-based).
pub fn reorder_categories(board: &mut Board, from: usize, to: usize) -> Result<(), CategoryError> {
    let len = board.categories.len();
    if from >= len {
        return Err(CategoryError::InvalidIndex(from));
    }
    if to >= len {
        return Err(CategoryError::InvalidIndex(to));
    }
    let category = board.categories.remove(from);
    board.categories.insert(to, category);
    for (index, category) in board.categories.iter_mut().enumerate() {
        category.position = index as u32;
    }
    Ok(())
}
