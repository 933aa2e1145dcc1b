use std::cell::RefCell;

use uuid::Uuid;

use crate::model::category::Category;
use crate::model::task::Task;

use super::backend::{Backend, PersistError};
use super::wire::{CategoryPatch, CategoryRow, TaskPatch, TaskRow};

/// Backend keeping its rows in memory. Backs throwaway boards and the
/// test suite; single-threaded by design (interior mutability via
/// `RefCell`), matching the event-driven execution model.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    tables: RefCell<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    tasks: Vec<TaskRow>,
    categories: Vec<CategoryRow>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the store, bypassing the insert path
    pub fn seeded(categories: &[Category], tasks: &[Task]) -> Self {
        let backend = Self::new();
        {
            let mut tables = backend.tables.borrow_mut();
            tables.categories = categories.iter().map(CategoryRow::from_domain).collect();
            tables.tasks = tasks.iter().map(TaskRow::from_domain).collect();
        }
        backend
    }

    pub fn task_count(&self) -> usize {
        self.tables.borrow().tasks.len()
    }

    pub fn category_count(&self) -> usize {
        self.tables.borrow().categories.len()
    }
}

impl Backend for MemoryBackend {
    fn list_tasks(&self) -> Result<Vec<Task>, PersistError> {
        self.tables
            .borrow()
            .tasks
            .iter()
            .cloned()
            .map(|row| row.into_domain().map_err(PersistError::from))
            .collect()
    }

    fn list_categories(&self) -> Result<Vec<Category>, PersistError> {
        let mut rows = self.tables.borrow().categories.clone();
        rows.sort_by_key(|row| row.position);
        Ok(rows.into_iter().map(CategoryRow::into_domain).collect())
    }

    fn insert_tasks(&self, tasks: &[Task]) -> Result<(), PersistError> {
        let mut tables = self.tables.borrow_mut();
        tables.tasks.extend(tasks.iter().map(TaskRow::from_domain));
        Ok(())
    }

    fn insert_categories(&self, categories: &[Category]) -> Result<(), PersistError> {
        let mut tables = self.tables.borrow_mut();
        tables
            .categories
            .extend(categories.iter().map(CategoryRow::from_domain));
        Ok(())
    }

    fn update_task(&self, id: Uuid, patch: &TaskPatch) -> Result<(), PersistError> {
        let mut tables = self.tables.borrow_mut();
        let row = tables
            .tasks
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(PersistError::RowNotFound(id))?;
        patch.apply_to(row);
        Ok(())
    }

    fn update_category(&self, id: Uuid, patch: &CategoryPatch) -> Result<(), PersistError> {
        let mut tables = self.tables.borrow_mut();
        let row = tables
            .categories
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(PersistError::RowNotFound(id))?;
        patch.apply_to(row);
        Ok(())
    }

    fn delete_task(&self, id: Uuid) -> Result<(), PersistError> {
        let mut tables = self.tables.borrow_mut();
        let before = tables.tasks.len();
        tables.tasks.retain(|row| row.id != id);
        if tables.tasks.len() == before {
            return Err(PersistError::RowNotFound(id));
        }
        Ok(())
    }

    fn delete_category(&self, id: Uuid) -> Result<(), PersistError> {
        let mut tables = self.tables.borrow_mut();
        let before = tables.categories.len();
        tables.categories.retain(|row| row.id != id);
        if tables.categories.len() == before {
            return Err(PersistError::RowNotFound(id));
        }
        Ok(())
    }

    fn upsert_categories(&self, categories: &[Category]) -> Result<(), PersistError> {
        let mut tables = self.tables.borrow_mut();
        for category in categories {
            let row = CategoryRow::from_domain(category);
            match tables.categories.iter_mut().find(|r| r.id == row.id) {
                Some(existing) => *existing = row,
                None => tables.categories.push(row),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::category::Palette;
    use crate::util::dates::parse_key;

    fn d(key: &str) -> chrono::NaiveDate {
        parse_key(key).unwrap()
    }

    #[test]
    fn insert_then_list_round_trips() {
        let backend = MemoryBackend::new();
        let category = Category::new("Design", Palette::Blue, 0);
        let task = Task::new(category.id, d("2024-01-10"), "Wireframes");
        backend.insert_categories(std::slice::from_ref(&category)).unwrap();
        backend.insert_tasks(std::slice::from_ref(&task)).unwrap();

        assert_eq!(backend.list_categories().unwrap(), vec![category]);
        assert_eq!(backend.list_tasks().unwrap(), vec![task]);
    }

    #[test]
    fn listing_orders_categories_by_position() {
        let a = Category::new("Second", Palette::Gray, 1);
        let b = Category::new("First", Palette::Gray, 0);
        let backend = MemoryBackend::seeded(&[a, b], &[]);
        let titles: Vec<String> = backend
            .list_categories()
            .unwrap()
            .into_iter()
            .map(|c| c.title)
            .collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[test]
    fn update_missing_row_is_an_error() {
        let backend = MemoryBackend::new();
        let err = backend
            .update_task(Uuid::new_v4(), &TaskPatch::default())
            .unwrap_err();
        assert!(matches!(err, PersistError::RowNotFound(_)));
    }

    #[test]
    fn upsert_replaces_existing_and_appends_new() {
        let mut category = Category::new("Design", Palette::Blue, 0);
        let backend = MemoryBackend::seeded(std::slice::from_ref(&category), &[]);
        category.position = 5;
        let fresh = Category::new("Marketing", Palette::Orange, 1);
        backend
            .upsert_categories(&[category.clone(), fresh.clone()])
            .unwrap();
        assert_eq!(backend.category_count(), 2);
        let listed = backend.list_categories().unwrap();
        assert_eq!(listed, vec![fresh, category]);
    }

    #[test]
    fn delete_removes_the_row() {
        let category = Category::new("Design", Palette::Blue, 0);
        let task = Task::new(category.id, d("2024-01-10"), "Wireframes");
        let backend =
            MemoryBackend::seeded(std::slice::from_ref(&category), std::slice::from_ref(&task));
        backend.delete_task(task.id).unwrap();
        backend.delete_category(category.id).unwrap();
        assert_eq!(backend.task_count(), 0);
        assert_eq!(backend.category_count(), 0);
        assert!(backend.delete_task(task.id).is_err());
    }
}
