use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::model::category::{Category, Palette};
use crate::model::task::{Repeat, Task};
use crate::util::dates::{format_key, parse_key};

/// Error mapping a backend row into the domain model
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("row {id} has malformed date: {value:?}")]
    BadDate { id: Uuid, value: String },
}

/// A task row as the backend stores it. Field names are the backend's
/// flattened convention; dates travel as `YYYY-MM-DD` text. These names
/// stop at this boundary — the domain model never sees them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRow {
    pub id: Uuid,
    pub category_id: Uuid,
    pub date: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub is_completed: bool,
    #[serde(default)]
    pub repeat: Repeat,
    #[serde(default)]
    pub series_id: Option<Uuid>,
}

impl TaskRow {
    pub fn from_domain(task: &Task) -> Self {
        TaskRow {
            id: task.id,
            category_id: task.category_id,
            date: format_key(task.date),
            title: task.title.clone(),
            description: task.description.clone(),
            is_completed: task.completed,
            repeat: task.repeat,
            series_id: task.series_id,
        }
    }

    pub fn into_domain(self) -> Result<Task, WireError> {
        let date = parse_key(&self.date).ok_or(WireError::BadDate {
            id: self.id,
            value: self.date.clone(),
        })?;
        Ok(Task {
            id: self.id,
            category_id: self.category_id,
            date,
            title: self.title,
            description: self.description,
            completed: self.is_completed,
            repeat: self.repeat,
            series_id: self.series_id,
        })
    }
}

/// A category row as the backend stores it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRow {
    pub id: Uuid,
    pub title: String,
    pub color: String,
    #[serde(default)]
    pub collapsed: bool,
    #[serde(default)]
    pub position: u32,
}

impl CategoryRow {
    pub fn from_domain(category: &Category) -> Self {
        CategoryRow {
            id: category.id,
            title: category.title.clone(),
            color: category.color.name().to_string(),
            collapsed: category.collapsed,
            position: category.position,
        }
    }

    /// Unknown color names are tolerated — the row is kept with the
    /// default palette entry rather than rejected.
    pub fn into_domain(self) -> Category {
        let color = Palette::from_name(&self.color).unwrap_or_else(|| {
            warn!(id = %self.id, color = %self.color, "unknown palette name, using gray");
            Palette::Gray
        });
        Category {
            id: self.id,
            title: self.title,
            color,
            collapsed: self.collapsed,
            position: self.position,
        }
    }
}

/// Partial task update. Unset fields are omitted from the serialized
/// payload; `series_id` is doubly optional so "clear the series" is
/// expressible as an explicit null.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat: Option<Repeat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_id: Option<Option<Uuid>>,
}

impl TaskPatch {
    /// The fields of `updated` that differ from `original`
    pub fn diff(original: &Task, updated: &Task) -> Self {
        TaskPatch {
            title: (original.title != updated.title).then(|| updated.title.clone()),
            description: (original.description != updated.description)
                .then(|| updated.description.clone()),
            date: (original.date != updated.date).then(|| format_key(updated.date)),
            category_id: (original.category_id != updated.category_id)
                .then_some(updated.category_id),
            is_completed: (original.completed != updated.completed).then_some(updated.completed),
            repeat: (original.repeat != updated.repeat).then_some(updated.repeat),
            series_id: (original.series_id != updated.series_id).then_some(updated.series_id),
        }
    }

    /// A patch carrying every mutable field of `task`
    pub fn full(task: &Task) -> Self {
        TaskPatch {
            title: Some(task.title.clone()),
            description: Some(task.description.clone()),
            date: Some(format_key(task.date)),
            category_id: Some(task.category_id),
            is_completed: Some(task.completed),
            repeat: Some(task.repeat),
            series_id: Some(task.series_id),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.category_id.is_none()
            && self.is_completed.is_none()
            && self.repeat.is_none()
            && self.series_id.is_none()
    }

    /// Apply onto a stored row (used by the local backends)
    pub fn apply_to(&self, row: &mut TaskRow) {
        if let Some(title) = &self.title {
            row.title = title.clone();
        }
        if let Some(description) = &self.description {
            row.description = description.clone();
        }
        if let Some(date) = &self.date {
            row.date = date.clone();
        }
        if let Some(category_id) = self.category_id {
            row.category_id = category_id;
        }
        if let Some(is_completed) = self.is_completed {
            row.is_completed = is_completed;
        }
        if let Some(repeat) = self.repeat {
            row.repeat = repeat;
        }
        if let Some(series_id) = self.series_id {
            row.series_id = series_id;
        }
    }
}

/// Partial category update
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

impl CategoryPatch {
    pub fn diff(original: &Category, updated: &Category) -> Self {
        CategoryPatch {
            title: (original.title != updated.title).then(|| updated.title.clone()),
            color: (original.color != updated.color).then(|| updated.color.name().to_string()),
            collapsed: (original.collapsed != updated.collapsed).then_some(updated.collapsed),
            position: (original.position != updated.position).then_some(updated.position),
        }
    }

    pub fn apply_to(&self, row: &mut CategoryRow) {
        if let Some(title) = &self.title {
            row.title = title.clone();
        }
        if let Some(color) = &self.color {
            row.color = color.clone();
        }
        if let Some(collapsed) = self.collapsed {
            row.collapsed = collapsed;
        }
        if let Some(position) = self.position {
            row.position = position;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::dates::parse_key;

    fn fixed_task() -> Task {
        Task {
            id: Uuid::parse_str("11111111-1111-4111-8111-111111111111").unwrap(),
            category_id: Uuid::parse_str("22222222-2222-4222-8222-222222222222").unwrap(),
            date: parse_key("2024-03-07").unwrap(),
            title: "Ship the release".into(),
            description: String::new(),
            completed: false,
            repeat: Repeat::Weekly,
            series_id: Some(Uuid::parse_str("33333333-3333-4333-8333-333333333333").unwrap()),
        }
    }

    #[test]
    fn task_row_round_trips_through_domain() {
        let task = fixed_task();
        let row = TaskRow::from_domain(&task);
        assert_eq!(row.date, "2024-03-07");
        assert!(row.is_completed == task.completed);
        assert_eq!(row.clone().into_domain().unwrap(), task);
    }

    #[test]
    fn task_row_wire_shape_is_stable() {
        let row = TaskRow::from_domain(&fixed_task());
        insta::assert_snapshot!(
            serde_json::to_string(&row).unwrap(),
            @r#"{"id":"11111111-1111-4111-8111-111111111111","category_id":"22222222-2222-4222-8222-222222222222","date":"2024-03-07","title":"Ship the release","description":"","is_completed":false,"repeat":"weekly","series_id":"33333333-3333-4333-8333-333333333333"}"#
        );
    }

    #[test]
    fn bad_date_is_a_wire_error() {
        let mut row = TaskRow::from_domain(&fixed_task());
        row.date = "07/03/2024".into();
        assert!(matches!(
            row.into_domain(),
            Err(WireError::BadDate { .. })
        ));
    }

    #[test]
    fn unknown_color_falls_back_to_gray() {
        let row = CategoryRow {
            id: Uuid::new_v4(),
            title: "Design".into(),
            color: "mauve".into(),
            collapsed: false,
            position: 0,
        };
        assert_eq!(row.into_domain().color, Palette::Gray);
    }

    #[test]
    fn category_row_preserves_symbolic_color() {
        let category = Category::new("Design", Palette::Violet, 3);
        let row = CategoryRow::from_domain(&category);
        assert_eq!(row.color, "violet");
        assert_eq!(row.into_domain(), category);
    }

    #[test]
    fn patch_serializes_only_set_fields() {
        let patch = TaskPatch {
            is_completed: Some(true),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&patch).unwrap(),
            r#"{"is_completed":true}"#
        );
    }

    #[test]
    fn clearing_a_series_serializes_as_null() {
        let patch = TaskPatch {
            series_id: Some(None),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&patch).unwrap(),
            r#"{"series_id":null}"#
        );
    }

    #[test]
    fn diff_captures_only_changed_fields() {
        let original = fixed_task();
        let mut updated = original.clone();
        updated.title = "Ship it".into();
        updated.completed = true;
        let patch = TaskPatch::diff(&original, &updated);
        assert_eq!(patch.title.as_deref(), Some("Ship it"));
        assert_eq!(patch.is_completed, Some(true));
        assert!(patch.date.is_none());
        assert!(patch.series_id.is_none());

        let empty = TaskPatch::diff(&original, &original);
        assert!(empty.is_empty());
    }

    #[test]
    fn patch_applies_onto_row() {
        let mut row = TaskRow::from_domain(&fixed_task());
        let patch = TaskPatch {
            date: Some("2024-03-09".into()),
            series_id: Some(None),
            ..Default::default()
        };
        patch.apply_to(&mut row);
        assert_eq!(row.date, "2024-03-09");
        assert_eq!(row.series_id, None);
        assert_eq!(row.title, "Ship the release");
    }
}
