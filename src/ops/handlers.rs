use chrono::NaiveDate;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::history::UndoableStore;
use crate::io::backend::{Backend, PersistError};
use crate::io::wire::{CategoryPatch, TaskPatch};
use crate::model::board::Board;
use crate::model::category::{Category, Palette};
use crate::model::task::{Repeat, Task};

use super::category_ops::{self, CategoryError};
use super::recurrence::{self, Scope, UpdateResolution};
use super::task_ops::{self, TaskError};

/// Handler-level error. Validation errors mean nothing was mutated;
/// a `Persist` error means the optimistic change was already rolled
/// back — the board is consistent either way, the embedder only has a
/// notification to show.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error(transparent)]
    Category(#[from] CategoryError),
    #[error("change rolled back: {0}")]
    Persist(#[from] PersistError),
}

/// Where a new task should be categorized
#[derive(Debug, Clone)]
pub enum TargetCategory {
    Existing(Uuid),
    /// Create a category in the same step (the add-task modal's inline
    /// "new category" path); both land in one undo snapshot.
    New {
        title: String,
        color: Option<Palette>,
    },
}

/// A series edit awaiting the user's scope decision. Nothing has been
/// mutated yet; hand it back via [`Planner::apply_scoped`].
#[derive(Debug, Clone)]
pub struct PendingUpdate {
    pub original: Task,
    pub updated: Task,
}

/// What `update_task` did with an edit
#[derive(Debug)]
pub enum UpdateOutcome {
    Applied,
    /// Ask the user for single/future and call `apply_scoped`
    ScopePrompt(PendingUpdate),
}

/// The board session: undoable state plus its persistence backend.
///
/// Every handler follows the same shape — validate against the current
/// board, apply one optimistic `set`, call the backend, and on failure
/// issue a compensating `set` with the targeted inverse of the change.
pub struct Planner<B: Backend> {
    store: UndoableStore<Board>,
    backend: B,
}

impl<B: Backend> Planner<B> {
    pub fn new(initial: Board, backend: B) -> Self {
        Planner {
            store: UndoableStore::new(initial),
            backend,
        }
    }

    pub fn with_history_limit(initial: Board, backend: B, limit: usize) -> Self {
        Planner {
            store: UndoableStore::with_limit(initial, limit),
            backend,
        }
    }

    /// Fetch the whole board from the backend. Orphaned tasks are kept
    /// as-is; the views simply never show them.
    pub fn load(backend: B) -> Result<Self, PlanError> {
        let categories = backend.list_categories()?;
        let tasks = backend.list_tasks()?;
        info!(
            categories = categories.len(),
            tasks = tasks.len(),
            "loaded board"
        );
        Ok(Self::new(Board::new(categories, tasks), backend))
    }

    pub fn board(&self) -> &Board {
        self.store.get()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn can_undo(&self) -> bool {
        self.store.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.store.can_redo()
    }

    /// Local undo; the backend is not rewound
    pub fn undo(&mut self) -> bool {
        self.store.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.store.redo()
    }

    /// The optimistic-commit helper every mutating handler runs
    /// through: `next` becomes current, `persist` runs against the
    /// backend, and on failure `revert` is applied as a compensating
    /// update before the error is handed back.
    fn commit(
        &mut self,
        next: Board,
        revert: impl FnOnce(&mut Board),
        persist: impl FnOnce(&B) -> Result<(), PersistError>,
    ) -> Result<(), PlanError> {
        self.store.set(next);
        if let Err(err) = persist(&self.backend) {
            warn!(error = %err, "persistence failed, rolling back");
            self.store.update(revert);
            return Err(PlanError::Persist(err));
        }
        Ok(())
    }

    // -----------------------------------------------------------------
    // Task handlers
    // -----------------------------------------------------------------

    /// Add a single task, optionally creating its category inline
    pub fn add_task(
        &mut self,
        title: &str,
        date: NaiveDate,
        target: TargetCategory,
    ) -> Result<Uuid, PlanError> {
        debug!(%date, "add task");
        let mut next = self.board().clone();

        let mut new_category: Option<Category> = None;
        let category_id = match target {
            TargetCategory::Existing(id) => id,
            TargetCategory::New { title, color } => {
                let id = category_ops::add_category(&mut next, &title, color)?;
                new_category = next.category(id).cloned();
                id
            }
        };

        let task_id = task_ops::add_task(&mut next, category_id, date, title)?;
        let created = next
            .task(task_id)
            .cloned()
            .ok_or(TaskError::NotFound(task_id))?;

        let new_category_id = new_category.as_ref().map(|c| c.id);
        self.commit(
            next,
            move |board| {
                board.tasks.shift_remove(&task_id);
                if let Some(id) = new_category_id {
                    board.categories.retain(|c| c.id != id);
                }
            },
            move |backend| {
                if let Some(category) = &new_category {
                    backend.insert_categories(std::slice::from_ref(category))?;
                }
                backend.insert_tasks(std::slice::from_ref(&created))
            },
        )?;
        Ok(task_id)
    }

    /// Batch-paste several titles into one cell as one undo step
    pub fn paste_tasks(
        &mut self,
        category_id: Uuid,
        date: NaiveDate,
        text: &str,
    ) -> Result<Vec<Uuid>, PlanError> {
        let mut next = self.board().clone();
        let ids = task_ops::paste_tasks(&mut next, category_id, date, text)?;
        let created: Vec<Task> = ids.iter().filter_map(|id| next.task(*id).cloned()).collect();
        debug!(count = ids.len(), %date, "paste tasks");

        let revert_ids = ids.clone();
        self.commit(
            next,
            move |board| {
                for id in &revert_ids {
                    board.tasks.shift_remove(id);
                }
            },
            move |backend| backend.insert_tasks(&created),
        )?;
        Ok(ids)
    }

    /// Edit a task. Series-bound edits touching a tracked field come
    /// back as a `ScopePrompt` without mutating anything.
    pub fn update_task(&mut self, updated: Task) -> Result<UpdateOutcome, PlanError> {
        let original = self
            .board()
            .task(updated.id)
            .cloned()
            .ok_or(TaskError::NotFound(updated.id))?;

        if let UpdateResolution::ScopePrompt = recurrence::resolve_update(&original, &updated) {
            debug!(id = %updated.id, "series edit needs scope decision");
            return Ok(UpdateOutcome::ScopePrompt(PendingUpdate { original, updated }));
        }

        let patch = TaskPatch::diff(&original, &updated);
        if patch.is_empty() {
            return Ok(UpdateOutcome::Applied);
        }
        let mut next = self.board().clone();
        task_ops::replace_task(&mut next, updated)?;

        let id = original.id;
        self.commit(
            next,
            move |board| {
                let _ = task_ops::replace_task(board, original);
            },
            move |backend| backend.update_task(id, &patch),
        )?;
        Ok(UpdateOutcome::Applied)
    }

    /// Resolve a scope prompt returned by [`Planner::update_task`]
    pub fn apply_scoped(&mut self, pending: PendingUpdate, scope: Scope) -> Result<(), PlanError> {
        let PendingUpdate { original, updated } = pending;
        debug!(id = %original.id, ?scope, "apply scoped series edit");
        match scope {
            Scope::Single => {
                let mut next = self.board().clone();
                recurrence::apply_single(&mut next, updated.clone())?;

                let mut detached = updated;
                detached.series_id = None;
                let patch = TaskPatch::diff(&original, &detached);
                let id = original.id;
                self.commit(
                    next,
                    move |board| {
                        let _ = task_ops::replace_task(board, original);
                    },
                    move |backend| backend.update_task(id, &patch),
                )
            }
            Scope::Future => {
                let mut next = self.board().clone();
                let prior: Vec<Task> = original
                    .series_id
                    .map(|sid| {
                        next.series_members(sid)
                            .into_iter()
                            .cloned()
                            .collect()
                    })
                    .unwrap_or_default();

                let plan = recurrence::apply_future(&mut next, &original, updated)?;

                let id = original.id;
                let edited_after = next.task(id).cloned().ok_or(TaskError::NotFound(id))?;
                let edited_patch = TaskPatch::diff(&original, &edited_after);
                let sibling_patches: Vec<(Uuid, TaskPatch)> = plan
                    .updated
                    .iter()
                    .filter_map(|sid| {
                        let after = next.task(*sid)?;
                        let before = prior.iter().find(|t| t.id == *sid)?;
                        Some((*sid, TaskPatch::diff(before, after)))
                    })
                    .collect();
                let created_tasks: Vec<Task> = plan
                    .created
                    .iter()
                    .filter_map(|cid| next.task(*cid).cloned())
                    .collect();
                let created_ids = plan.created.clone();
                let deleted_ids: Vec<Uuid> = plan.deleted.iter().map(|t| t.id).collect();
                let deleted_tasks = plan.deleted;
                let restore_edited = original;

                self.commit(
                    next,
                    move |board| {
                        for cid in &created_ids {
                            board.tasks.shift_remove(cid);
                        }
                        for task in deleted_tasks {
                            board.tasks.insert(task.id, task);
                        }
                        for task in prior {
                            board.tasks.insert(task.id, task);
                        }
                        let _ = task_ops::replace_task(board, restore_edited);
                    },
                    move |backend| {
                        if !edited_patch.is_empty() {
                            backend.update_task(id, &edited_patch)?;
                        }
                        for (sid, patch) in &sibling_patches {
                            if !patch.is_empty() {
                                backend.update_task(*sid, patch)?;
                            }
                        }
                        for did in &deleted_ids {
                            backend.delete_task(*did)?;
                        }
                        if !created_tasks.is_empty() {
                            backend.insert_tasks(&created_tasks)?;
                        }
                        Ok(())
                    },
                )
            }
        }
    }

    /// Expand a task into a recurring series at the given cadence.
    /// No-op for `Repeat::None`.
    pub fn generate_repeats(&mut self, task_id: Uuid, cadence: Repeat) -> Result<(), PlanError> {
        let base = self
            .board()
            .task(task_id)
            .cloned()
            .ok_or(TaskError::NotFound(task_id))?;
        let Some(expansion) = recurrence::expand_series(&base, cadence) else {
            return Ok(());
        };
        info!(id = %task_id, ?cadence, series = %expansion.series_id, "generate series");

        let mut next = self.board().clone();
        task_ops::replace_task(&mut next, expansion.base.clone())?;
        for sibling in &expansion.siblings {
            next.tasks.insert(sibling.id, sibling.clone());
        }

        let base_patch = TaskPatch::diff(&base, &expansion.base);
        let sibling_ids: Vec<Uuid> = expansion.siblings.iter().map(|t| t.id).collect();
        let siblings = expansion.siblings;
        self.commit(
            next,
            move |board| {
                for sid in &sibling_ids {
                    board.tasks.shift_remove(sid);
                }
                let _ = task_ops::replace_task(board, base);
            },
            move |backend| {
                backend.insert_tasks(&siblings)?;
                if !base_patch.is_empty() {
                    backend.update_task(task_id, &base_patch)?;
                }
                Ok(())
            },
        )
    }

    /// Flip a task's completion state. Returns the new state.
    pub fn toggle_completed(&mut self, id: Uuid) -> Result<bool, PlanError> {
        let mut next = self.board().clone();
        let now = task_ops::toggle_completed(&mut next, id)?;
        let patch = TaskPatch {
            is_completed: Some(now),
            ..Default::default()
        };
        self.commit(
            next,
            move |board| {
                if let Some(task) = board.task_mut(id) {
                    task.completed = !now;
                }
            },
            move |backend| backend.update_task(id, &patch),
        )?;
        Ok(now)
    }

    /// Drag-drop: re-home a task into another category/date cell
    pub fn move_task(
        &mut self,
        id: Uuid,
        category_id: Uuid,
        date: NaiveDate,
    ) -> Result<(), PlanError> {
        let original = self.board().task(id).cloned().ok_or(TaskError::NotFound(id))?;
        if original.category_id == category_id && original.date == date {
            return Ok(());
        }
        debug!(%id, %date, "move task");
        let mut next = self.board().clone();
        task_ops::move_task(&mut next, id, category_id, date)?;
        let after = next.task(id).cloned().ok_or(TaskError::NotFound(id))?;
        let patch = TaskPatch::diff(&original, &after);
        self.commit(
            next,
            move |board| {
                let _ = task_ops::replace_task(board, original);
            },
            move |backend| backend.update_task(id, &patch),
        )
    }

    pub fn delete_task(&mut self, id: Uuid) -> Result<(), PlanError> {
        debug!(%id, "delete task");
        let mut next = self.board().clone();
        let removed = task_ops::remove_task(&mut next, id)?;
        self.commit(
            next,
            move |board| {
                board.tasks.insert(removed.id, removed);
            },
            move |backend| backend.delete_task(id),
        )
    }

    // -----------------------------------------------------------------
    // Category handlers
    // -----------------------------------------------------------------

    pub fn add_category(
        &mut self,
        title: &str,
        color: Option<Palette>,
    ) -> Result<Uuid, PlanError> {
        let mut next = self.board().clone();
        let id = category_ops::add_category(&mut next, title, color)?;
        let created = next
            .category(id)
            .cloned()
            .ok_or(CategoryError::NotFound(id))?;
        debug!(%id, "add category");
        self.commit(
            next,
            move |board| board.categories.retain(|c| c.id != id),
            move |backend| backend.insert_categories(std::slice::from_ref(&created)),
        )?;
        Ok(id)
    }

    pub fn update_category(&mut self, updated: Category) -> Result<(), PlanError> {
        let original = self
            .board()
            .category(updated.id)
            .cloned()
            .ok_or(CategoryError::NotFound(updated.id))?;
        let patch = CategoryPatch::diff(&original, &updated);
        let id = original.id;
        let mut next = self.board().clone();
        category_ops::replace_category(&mut next, updated)?;
        self.commit(
            next,
            move |board| {
                let _ = category_ops::replace_category(board, original);
            },
            move |backend| backend.update_category(id, &patch),
        )
    }

    pub fn toggle_collapsed(&mut self, id: Uuid) -> Result<bool, PlanError> {
        let mut next = self.board().clone();
        let now = category_ops::toggle_collapsed(&mut next, id)?;
        let patch = CategoryPatch {
            collapsed: Some(now),
            ..Default::default()
        };
        self.commit(
            next,
            move |board| {
                if let Some(category) = board.category_mut(id) {
                    category.collapsed = !now;
                }
            },
            move |backend| backend.update_category(id, &patch),
        )?;
        Ok(now)
    }

    /// Delete a category and every task homed in it, atomically from
    /// the undo perspective: one snapshot covers both collections.
    pub fn delete_category(&mut self, id: Uuid) -> Result<(), PlanError> {
        let mut next = self.board().clone();
        let (category, index, tasks) = category_ops::remove_category(&mut next, id)?;
        info!(%id, cascaded = tasks.len(), "delete category");

        let task_ids: Vec<Uuid> = tasks.iter().map(|t| t.id).collect();
        self.commit(
            next,
            move |board| {
                let at = index.min(board.categories.len());
                board.categories.insert(at, category);
                for task in tasks {
                    board.tasks.insert(task.id, task);
                }
            },
            move |backend| {
                for tid in &task_ids {
                    backend.delete_task(*tid)?;
                }
                backend.delete_category(id)
            },
        )
    }

    /// Drag-reorder a category row; all positions are reassigned dense
    /// zero-based in the same step.
    pub fn reorder_categories(&mut self, from: usize, to: usize) -> Result<(), PlanError> {
        let prior = self.board().categories.clone();
        let mut next = self.board().clone();
        category_ops::reorder_categories(&mut next, from, to)?;
        let reordered = next.categories.clone();
        debug!(from, to, "reorder categories");
        self.commit(
            next,
            move |board| board.categories = prior,
            move |backend| backend.upsert_categories(&reordered),
        )
    }
}
