use uuid::Uuid;

use crate::model::board::Board;
use crate::model::task::{Repeat, Task};
use crate::util::dates::{day_offset, shift_days, step_cadence};

use super::task_ops::{replace_task, TaskError};

/// Number of sibling tasks generated per series expansion
pub const SERIES_LEN: u32 = 12;

/// How far a series edit propagates — the user's answer to the scope
/// prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Only the edited task; it detaches from its series
    Single,
    /// The edited task and every sibling from its date onward
    Future,
}

/// What `resolve_update` decided about an edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateResolution {
    /// Apply to the single task, no prompt needed
    Direct,
    /// The task is series-bound and a tracked field changed — the
    /// caller must ask the user for a `Scope`
    ScopePrompt,
}

/// A generated series: the base task with its recurrence fields set,
/// plus twelve future siblings.
#[derive(Debug, Clone)]
pub struct SeriesExpansion {
    pub series_id: Uuid,
    pub base: Task,
    pub siblings: Vec<Task>,
}

/// The board changes a future-scope edit produced, in backend terms
#[derive(Debug, Clone, Default)]
pub struct FuturePlan {
    /// Siblings rewritten in place (shifted and/or content-synced)
    pub updated: Vec<Uuid>,
    /// Siblings removed from the board (series truncation)
    pub deleted: Vec<Task>,
    /// Fresh siblings inserted by a cadence change
    pub created: Vec<Uuid>,
}

/// Expand `base` into a series of `SERIES_LEN` future siblings stepped
/// by `cadence`. The series id is reused when the base already has one,
/// so a cadence change continues the existing series. Siblings copy the
/// base's content, start incomplete, and step from the base's date —
/// offset `i` is `i` cadence units after the base, not cumulative.
///
/// Returns `None` for `Repeat::None`. Each call makes a fresh batch;
/// callers must not invoke it twice for one logical edit.
pub fn expand_series(base: &Task, cadence: Repeat) -> Option<SeriesExpansion> {
    if !cadence.is_recurring() {
        return None;
    }
    let series_id = base.series_id.unwrap_or_else(Uuid::new_v4);

    let mut updated_base = base.clone();
    updated_base.repeat = cadence;
    updated_base.series_id = Some(series_id);

    let siblings = (1..=SERIES_LEN)
        .filter_map(|offset| step_cadence(base.date, cadence, offset))
        .map(|date| Task {
            id: Uuid::new_v4(),
            category_id: base.category_id,
            date,
            title: base.title.clone(),
            description: base.description.clone(),
            completed: false,
            repeat: cadence,
            series_id: Some(series_id),
        })
        .collect();

    Some(SeriesExpansion {
        series_id,
        base: updated_base,
        siblings,
    })
}

/// Decide whether an edit needs a scope prompt. Only edits that touch a
/// tracked field (title, description, date, repeat, category) on a
/// series-bound task do; everything else applies directly.
pub fn resolve_update(original: &Task, updated: &Task) -> UpdateResolution {
    if original.in_series() && tracked_fields_changed(original, updated) {
        UpdateResolution::ScopePrompt
    } else {
        UpdateResolution::Direct
    }
}

fn tracked_fields_changed(original: &Task, updated: &Task) -> bool {
    original.title != updated.title
        || original.description != updated.description
        || original.date != updated.date
        || original.repeat != updated.repeat
        || original.category_id != updated.category_id
}

/// Single-scope application: the edit lands on this task alone and the
/// task detaches from its series so later series edits skip it.
pub fn apply_single(board: &mut Board, updated: Task) -> Result<(), TaskError> {
    let mut detached = updated;
    detached.series_id = None;
    replace_task(board, detached)
}

/// Future-scope application.
///
/// Cadence unchanged: every sibling dated on or after the original date
/// shifts by the edit's day offset and takes the updated content;
/// sibling dates keep their relative spacing. Cadence changed: siblings
/// dated strictly later than the original date are dropped, and a
/// non-`none` new cadence regenerates a fresh run from the updated
/// task. Siblings dated before the original date are never touched.
///
/// A shift may push a sibling past its neighbor; the series is not
/// re-sorted or deduplicated.
pub fn apply_future(
    board: &mut Board,
    original: &Task,
    updated: Task,
) -> Result<FuturePlan, TaskError> {
    if board.task(original.id).is_none() {
        return Err(TaskError::NotFound(original.id));
    }
    let mut plan = FuturePlan::default();

    if original.repeat != updated.repeat {
        // Truncate everything strictly after the edited occurrence
        if let Some(series_id) = original.series_id {
            let doomed: Vec<Uuid> = board
                .tasks
                .values()
                .filter(|t| {
                    t.series_id == Some(series_id) && t.id != original.id && t.date > original.date
                })
                .map(|t| t.id)
                .collect();
            for id in doomed {
                if let Some(task) = board.tasks.shift_remove(&id) {
                    plan.deleted.push(task);
                }
            }
        }

        if let Some(expansion) = expand_series(&updated, updated.repeat) {
            // Regrow the series from the edited task at the new cadence
            for sibling in expansion.siblings {
                plan.created.push(sibling.id);
                board.tasks.insert(sibling.id, sibling);
            }
            replace_task(board, expansion.base)?;
        } else {
            let mut terminated = updated;
            terminated.series_id = None;
            replace_task(board, terminated)?;
        }
        return Ok(plan);
    }

    // Cadence unchanged: shift and content-sync the tail of the series
    let offset = day_offset(original.date, updated.date);
    if let Some(series_id) = original.series_id {
        let tail: Vec<Uuid> = board
            .tasks
            .values()
            .filter(|t| {
                t.series_id == Some(series_id) && t.id != original.id && t.date >= original.date
            })
            .map(|t| t.id)
            .collect();
        for id in tail {
            if let Some(task) = board.tasks.get_mut(&id) {
                if offset != 0 {
                    task.date = shift_days(task.date, offset);
                }
                task.title = updated.title.clone();
                task.description = updated.description.clone();
                task.category_id = updated.category_id;
                task.repeat = updated.repeat;
                plan.updated.push(id);
            }
        }
    }
    replace_task(board, updated)?;
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::category::{Category, Palette};
    use crate::util::dates::parse_key;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn d(key: &str) -> NaiveDate {
        parse_key(key).unwrap()
    }

    fn seeded_board() -> (Board, Uuid) {
        let category = Category::new("Design", Palette::Blue, 0);
        let id = category.id;
        (Board::new(vec![category], vec![]), id)
    }

    /// Board pre-loaded with a weekly series: base plus 12 siblings
    fn board_with_weekly_series(base_date: &str) -> (Board, Task) {
        let (mut board, cat) = seeded_board();
        let base = Task::new(cat, d(base_date), "Standup");
        let expansion = expand_series(&base, Repeat::Weekly).unwrap();
        board.tasks.insert(expansion.base.id, expansion.base.clone());
        for sibling in &expansion.siblings {
            board.tasks.insert(sibling.id, sibling.clone());
        }
        (board, expansion.base)
    }

    #[test]
    fn weekly_expansion_steps_seven_days() {
        let base = Task::new(Uuid::new_v4(), d("2024-01-01"), "Standup");
        let expansion = expand_series(&base, Repeat::Weekly).unwrap();

        assert_eq!(expansion.siblings.len(), 12);
        assert_eq!(expansion.siblings[0].date, d("2024-01-08"));
        assert_eq!(expansion.siblings[1].date, d("2024-01-15"));
        assert_eq!(expansion.siblings[11].date, d("2024-03-25"));
        assert!(expansion.siblings.iter().all(|s| !s.completed));
        assert!(expansion
            .siblings
            .iter()
            .all(|s| s.series_id == Some(expansion.series_id)));
        assert_eq!(expansion.base.repeat, Repeat::Weekly);
        assert_eq!(expansion.base.series_id, Some(expansion.series_id));
    }

    #[test]
    fn daily_expansion_steps_one_day() {
        let base = Task::new(Uuid::new_v4(), d("2024-02-27"), "Journal");
        let expansion = expand_series(&base, Repeat::Daily).unwrap();
        assert_eq!(expansion.siblings[0].date, d("2024-02-28"));
        // Crosses the leap day
        assert_eq!(expansion.siblings[2].date, d("2024-03-01"));
        assert_eq!(expansion.siblings[11].date, d("2024-03-10"));
    }

    #[test]
    fn monthly_expansion_clamps_day_of_month() {
        let base = Task::new(Uuid::new_v4(), d("2024-01-31"), "Invoice");
        let expansion = expand_series(&base, Repeat::Monthly).unwrap();
        assert_eq!(expansion.siblings[0].date, d("2024-02-29"));
        assert_eq!(expansion.siblings[1].date, d("2024-03-31"));
        assert_eq!(expansion.siblings[2].date, d("2024-04-30"));
    }

    #[test]
    fn none_cadence_does_not_expand() {
        let base = Task::new(Uuid::new_v4(), d("2024-01-01"), "One-off");
        assert!(expand_series(&base, Repeat::None).is_none());
    }

    #[test]
    fn expansion_keeps_an_existing_series_id() {
        let mut base = Task::new(Uuid::new_v4(), d("2024-01-01"), "Standup");
        let existing = Uuid::new_v4();
        base.series_id = Some(existing);
        let expansion = expand_series(&base, Repeat::Daily).unwrap();
        assert_eq!(expansion.series_id, existing);
    }

    #[test]
    fn untracked_edit_on_series_task_applies_directly() {
        let (_, base) = board_with_weekly_series("2024-01-01");
        let mut updated = base.clone();
        updated.completed = true;
        assert_eq!(resolve_update(&base, &updated), UpdateResolution::Direct);
    }

    #[test]
    fn tracked_edit_on_series_task_prompts() {
        let (_, base) = board_with_weekly_series("2024-01-01");
        for field in ["title", "date", "category", "repeat"] {
            let mut updated = base.clone();
            match field {
                "title" => updated.title = "Renamed".into(),
                "date" => updated.date = d("2024-01-03"),
                "category" => updated.category_id = Uuid::new_v4(),
                _ => updated.repeat = Repeat::Daily,
            }
            assert_eq!(
                resolve_update(&base, &updated),
                UpdateResolution::ScopePrompt,
                "field: {field}"
            );
        }
    }

    #[test]
    fn one_off_edits_never_prompt() {
        let one_off = Task::new(Uuid::new_v4(), d("2024-01-01"), "Errand");
        let mut updated = one_off.clone();
        updated.title = "Renamed".into();
        updated.date = d("2024-01-05");
        assert_eq!(resolve_update(&one_off, &updated), UpdateResolution::Direct);
    }

    #[test]
    fn single_scope_detaches_from_series() {
        let (mut board, base) = board_with_weekly_series("2024-01-01");
        let mut updated = base.clone();
        updated.title = "Solo standup".into();
        apply_single(&mut board, updated).unwrap();

        let edited = board.task(base.id).unwrap();
        assert_eq!(edited.title, "Solo standup");
        assert_eq!(edited.series_id, None);
        // Siblings untouched
        let siblings = board.series_members(base.series_id.unwrap());
        assert_eq!(siblings.len(), 12);
        assert!(siblings.iter().all(|s| s.title == "Standup"));
    }

    #[test]
    fn future_shift_moves_tail_and_keeps_head() {
        // Edit the fifth occurrence (2024-02-01 in a weekly series
        // based at 2024-01-04), moving it two days later.
        let (mut board, base) = board_with_weekly_series("2024-01-04");
        let series_id = base.series_id.unwrap();
        let pivot_id = board
            .tasks
            .values()
            .find(|t| t.date == d("2024-02-01"))
            .unwrap()
            .id;
        let pivot = board.task(pivot_id).unwrap().clone();

        let mut updated = pivot.clone();
        updated.date = d("2024-02-03");
        updated.title = "Moved standup".into();
        let plan = apply_future(&mut board, &pivot, updated).unwrap();

        // Siblings before 2024-02-01 are untouched
        for key in ["2024-01-11", "2024-01-18", "2024-01-25"] {
            let t = board
                .tasks
                .values()
                .find(|t| t.date == d(key))
                .unwrap_or_else(|| panic!("missing head sibling {key}"));
            assert_eq!(t.title, "Standup");
        }
        assert_eq!(board.task(base.id).unwrap().date, d("2024-01-04"));

        // Tail shifted by +2 with spacing preserved and content synced
        let edited = board.task(pivot_id).unwrap();
        assert_eq!(edited.date, d("2024-02-03"));
        for key in ["2024-02-10", "2024-02-17", "2024-02-24"] {
            let t = board
                .tasks
                .values()
                .find(|t| t.date == d(key) && t.series_id == Some(series_id))
                .unwrap_or_else(|| panic!("missing shifted sibling at {key}"));
            assert_eq!(t.title, "Moved standup");
        }
        // Eight tail siblings after the pivot were rewritten
        assert_eq!(plan.updated.len(), 8);
        assert!(plan.deleted.is_empty());
        assert!(plan.created.is_empty());
    }

    #[test]
    fn future_content_edit_without_date_change_leaves_dates_alone() {
        let (mut board, base) = board_with_weekly_series("2024-01-01");
        let mut updated = base.clone();
        updated.title = "Renamed".into();
        let plan = apply_future(&mut board, &base, updated).unwrap();

        assert_eq!(plan.updated.len(), 12);
        let dates: Vec<NaiveDate> = {
            let mut members: Vec<&Task> = board.series_members(base.series_id.unwrap());
            members.sort_by_key(|t| t.date);
            members.iter().map(|t| t.date).collect()
        };
        assert_eq!(dates[0], d("2024-01-01"));
        assert_eq!(dates[1], d("2024-01-08"));
        assert!(board
            .series_members(base.series_id.unwrap())
            .iter()
            .all(|t| t.title == "Renamed"));
    }

    #[test]
    fn cadence_change_to_none_truncates_later_siblings() {
        let (mut board, base) = board_with_weekly_series("2024-01-01");
        let series_id = base.series_id.unwrap();
        let mut updated = base.clone();
        updated.repeat = Repeat::None;
        let plan = apply_future(&mut board, &base, updated).unwrap();

        assert_eq!(plan.deleted.len(), 12);
        assert!(plan.created.is_empty());
        let edited = board.task(base.id).unwrap();
        assert_eq!(edited.series_id, None);
        assert_eq!(edited.repeat, Repeat::None);
        assert!(board.series_members(series_id).is_empty());
        assert_eq!(board.tasks.len(), 1);
    }

    #[test]
    fn cadence_change_regrows_a_fresh_run() {
        let (mut board, base) = board_with_weekly_series("2024-01-01");
        let series_id = base.series_id.unwrap();
        let mut updated = base.clone();
        updated.repeat = Repeat::Daily;
        let plan = apply_future(&mut board, &base, updated).unwrap();

        assert_eq!(plan.deleted.len(), 12);
        assert_eq!(plan.created.len(), 12);
        // The regrown run continues the same series at the new cadence
        let mut members: Vec<&Task> = board.series_members(series_id);
        members.sort_by_key(|t| t.date);
        assert_eq!(members.len(), 13);
        assert_eq!(members[1].date, d("2024-01-02"));
        assert_eq!(members[12].date, d("2024-01-13"));
        assert!(members.iter().all(|t| t.repeat == Repeat::Daily));
    }

    #[test]
    fn cadence_change_keeps_earlier_siblings() {
        // Edit a mid-series occurrence: earlier siblings survive the
        // truncation untouched.
        let (mut board, base) = board_with_weekly_series("2024-01-01");
        let series_id = base.series_id.unwrap();
        let pivot = board
            .tasks
            .values()
            .find(|t| t.date == d("2024-02-05"))
            .unwrap()
            .clone();
        let mut updated = pivot.clone();
        updated.repeat = Repeat::None;
        let plan = apply_future(&mut board, &pivot, updated).unwrap();

        // 7 siblings strictly after 2024-02-05 were deleted
        assert_eq!(plan.deleted.len(), 7);
        // Base + 4 earlier siblings remain in the series
        assert_eq!(board.series_members(series_id).len(), 5);
        assert_eq!(board.task(base.id).unwrap().title, "Standup");
    }

    #[test]
    fn shift_past_a_neighbor_does_not_resort() {
        // Pulling a mid-series occurrence backward lands the shifted
        // tail among the untouched head siblings. The series is left
        // interleaved; nothing is re-sorted or deduplicated.
        let (mut board, base) = board_with_weekly_series("2024-01-04");
        let series_id = base.series_id.unwrap();
        let pivot = board
            .tasks
            .values()
            .find(|t| t.date == d("2024-02-01"))
            .unwrap()
            .clone();
        let mut updated = pivot.clone();
        updated.date = d("2024-01-20");
        apply_future(&mut board, &pivot, updated).unwrap();

        let members = board.series_members(series_id);
        assert_eq!(members.len(), 13);
        assert_eq!(board.task(pivot.id).unwrap().date, d("2024-01-20"));
        // Untouched head sibling now sits after the pivot...
        assert!(members.iter().any(|t| t.date == d("2024-01-25")));
        // ...and the former 2024-02-08 sibling moved to 2024-01-27
        assert!(members.iter().any(|t| t.date == d("2024-01-27")));
    }
}
