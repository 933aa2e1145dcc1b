use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Repeat cadence of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Repeat {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

impl Repeat {
    /// Whether this cadence generates a series at all
    pub fn is_recurring(self) -> bool {
        self != Repeat::None
    }
}

/// A single scheduled task on the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: Uuid,
    /// Owning category. A task whose category no longer exists is kept
    /// but hidden from every view.
    pub category_id: Uuid,
    /// The calendar day this task is bucketed under
    pub date: NaiveDate,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub repeat: Repeat,
    /// Groups a task with its recurrence siblings. `None` for one-off
    /// tasks and for tasks detached from their series.
    pub series_id: Option<Uuid>,
}

impl Task {
    /// Create a fresh one-off task with a new id
    pub fn new(category_id: Uuid, date: NaiveDate, title: impl Into<String>) -> Self {
        Task {
            id: Uuid::new_v4(),
            category_id,
            date,
            title: title.into(),
            description: String::new(),
            completed: false,
            repeat: Repeat::None,
            series_id: None,
        }
    }

    /// Whether this task participates in a recurrence series — it either
    /// carries a series id or a non-`none` cadence.
    pub fn in_series(&self) -> bool {
        self.series_id.is_some() || self.repeat.is_recurring()
    }
}
