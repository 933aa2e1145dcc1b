use chrono::NaiveDate;
use indexmap::IndexMap;
use uuid::Uuid;

use super::category::Category;
use super::task::Task;

/// The aggregate root: everything the undo history snapshots.
///
/// Holds domain data only — transient view flags (open modals, drag
/// state, search text) live with the presentation layer so that undo
/// never resurrects UI chrome.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    /// Categories in render order (`position`, ties by insertion order)
    pub categories: Vec<Category>,
    /// All tasks, addressable by id. Unordered as far as views are
    /// concerned; iteration order is deterministic.
    pub tasks: IndexMap<Uuid, Task>,
}

impl Board {
    pub fn new(categories: Vec<Category>, tasks: Vec<Task>) -> Self {
        let mut board = Board {
            categories,
            tasks: tasks.into_iter().map(|t| (t.id, t)).collect(),
        };
        board.sort_categories();
        board
    }

    pub fn category(&self, id: Uuid) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn category_mut(&mut self, id: Uuid) -> Option<&mut Category> {
        self.categories.iter_mut().find(|c| c.id == id)
    }

    pub fn task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.get(&id)
    }

    pub fn task_mut(&mut self, id: Uuid) -> Option<&mut Task> {
        self.tasks.get_mut(&id)
    }

    /// Stable sort by position, so equal positions keep insertion order.
    pub fn sort_categories(&mut self) {
        self.categories.sort_by_key(|c| c.position);
    }

    /// Tasks visible to the views: those whose category still exists.
    /// Orphaned tasks are hidden, never deleted.
    pub fn visible_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks
            .values()
            .filter(|t| self.category(t.category_id).is_some())
    }

    /// The visible tasks in one matrix cell
    pub fn cell_tasks(&self, category_id: Uuid, date: NaiveDate) -> Vec<&Task> {
        self.visible_tasks()
            .filter(|t| t.category_id == category_id && t.date == date)
            .collect()
    }

    /// All members of a series, the given task included
    pub fn series_members(&self, series_id: Uuid) -> Vec<&Task> {
        self.tasks
            .values()
            .filter(|t| t.series_id == Some(series_id))
            .collect()
    }

    /// Count of incomplete visible tasks in a category (row badge)
    pub fn open_count(&self, category_id: Uuid) -> usize {
        self.visible_tasks()
            .filter(|t| t.category_id == category_id && !t.completed)
            .count()
    }

    /// The next dense position for an appended category
    pub fn next_position(&self) -> u32 {
        self.categories.len() as u32
    }
}
