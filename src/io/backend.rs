use uuid::Uuid;

use crate::model::category::Category;
use crate::model::task::Task;

use super::wire::{CategoryPatch, TaskPatch, WireError};

/// Failure at the persistence boundary. Handlers catch these, roll the
/// optimistic change back, and hand the error to the embedder; they are
/// never retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("store io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("store returned malformed data: {0}")]
    Codec(#[from] serde_json::Error),
    #[error(transparent)]
    Wire(#[from] WireError),
    #[error("row not found: {0}")]
    RowNotFound(Uuid),
    #[error("store rejected request: {0}")]
    Rejected(String),
}

/// Row-level store for the two board collections.
///
/// Implementations are remote services or local files; the planner
/// treats every call as fallible and compensates on error. Listing
/// returns categories ordered by `position`.
pub trait Backend {
    fn list_tasks(&self) -> Result<Vec<Task>, PersistError>;
    fn list_categories(&self) -> Result<Vec<Category>, PersistError>;

    fn insert_tasks(&self, tasks: &[Task]) -> Result<(), PersistError>;
    fn insert_categories(&self, categories: &[Category]) -> Result<(), PersistError>;

    fn update_task(&self, id: Uuid, patch: &TaskPatch) -> Result<(), PersistError>;
    fn update_category(&self, id: Uuid, patch: &CategoryPatch) -> Result<(), PersistError>;

    fn delete_task(&self, id: Uuid) -> Result<(), PersistError>;
    fn delete_category(&self, id: Uuid) -> Result<(), PersistError>;

    /// Bulk write used by category reorder: insert-or-replace each row
    fn upsert_categories(&self, categories: &[Category]) -> Result<(), PersistError>;
}
