use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;
use uuid::Uuid;

use crate::model::category::Category;
use crate::model::task::Task;

use super::backend::{Backend, PersistError};
use super::wire::{CategoryPatch, CategoryRow, TaskPatch, TaskRow};

/// Backend persisting the board as a single JSON document on disk.
/// Saves are atomic: written to a temp file, then renamed over the
/// target, so a crash mid-write never truncates the board.
#[derive(Debug)]
pub struct JsonBackend {
    path: PathBuf,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    categories: Vec<CategoryRow>,
    #[serde(default)]
    tasks: Vec<TaskRow>,
}

impl JsonBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonBackend { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Document, PersistError> {
        if !self.path.exists() {
            return Ok(Document::default());
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(Document::default());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, doc: &Document) -> Result<(), PersistError> {
        debug!(
            file = %self.path.display(),
            categories = doc.categories.len(),
            tasks = doc.tasks.len(),
            "saving board document"
        );
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let temp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(temp.as_file(), doc)?;
        temp.persist(&self.path)
            .map_err(|err| PersistError::Io(err.error))?;
        Ok(())
    }

    fn mutate(&self, f: impl FnOnce(&mut Document) -> Result<(), PersistError>) -> Result<(), PersistError> {
        let mut doc = self.load()?;
        f(&mut doc)?;
        self.save(&doc)
    }
}

impl Backend for JsonBackend {
    fn list_tasks(&self) -> Result<Vec<Task>, PersistError> {
        self.load()?
            .tasks
            .into_iter()
            .map(|row| row.into_domain().map_err(PersistError::from))
            .collect()
    }

    fn list_categories(&self) -> Result<Vec<Category>, PersistError> {
        let mut rows = self.load()?.categories;
        rows.sort_by_key(|row| row.position);
        Ok(rows.into_iter().map(CategoryRow::into_domain).collect())
    }

    fn insert_tasks(&self, tasks: &[Task]) -> Result<(), PersistError> {
        self.mutate(|doc| {
            doc.tasks.extend(tasks.iter().map(TaskRow::from_domain));
            Ok(())
        })
    }

    fn insert_categories(&self, categories: &[Category]) -> Result<(), PersistError> {
        self.mutate(|doc| {
            doc.categories
                .extend(categories.iter().map(CategoryRow::from_domain));
            Ok(())
        })
    }

    fn update_task(&self, id: Uuid, patch: &TaskPatch) -> Result<(), PersistError> {
        self.mutate(|doc| {
            let row = doc
                .tasks
                .iter_mut()
                .find(|row| row.id == id)
                .ok_or(PersistError::RowNotFound(id))?;
            patch.apply_to(row);
            Ok(())
        })
    }

    fn update_category(&self, id: Uuid, patch: &CategoryPatch) -> Result<(), PersistError> {
        self.mutate(|doc| {
            let row = doc
                .categories
                .iter_mut()
                .find(|row| row.id == id)
                .ok_or(PersistError::RowNotFound(id))?;
            patch.apply_to(row);
            Ok(())
        })
    }

    fn delete_task(&self, id: Uuid) -> Result<(), PersistError> {
        self.mutate(|doc| {
            let before = doc.tasks.len();
            doc.tasks.retain(|row| row.id != id);
            if doc.tasks.len() == before {
                return Err(PersistError::RowNotFound(id));
            }
            Ok(())
        })
    }

    fn delete_category(&self, id: Uuid) -> Result<(), PersistError> {
        self.mutate(|doc| {
            let before = doc.categories.len();
            doc.categories.retain(|row| row.id != id);
            if doc.categories.len() == before {
                return Err(PersistError::RowNotFound(id));
            }
            Ok(())
        })
    }

    fn upsert_categories(&self, categories: &[Category]) -> Result<(), PersistError> {
        self.mutate(|doc| {
            for category in categories {
                let row = CategoryRow::from_domain(category);
                match doc.categories.iter_mut().find(|r| r.id == row.id) {
                    Some(existing) => *existing = row,
                    None => doc.categories.push(row),
                }
            }
            Ok(())
        })
    }
}
