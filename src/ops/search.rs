use chrono::NaiveDate;
use regex::Regex;

use crate::model::board::Board;
use crate::model::task::Task;

/// Which field of a task matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Title,
    Description,
}

/// A search hit, ordered by task date for the dropdown
#[derive(Debug, Clone)]
pub struct SearchHit<'a> {
    pub task: &'a Task,
    pub field: MatchField,
}

/// Search visible tasks' titles and descriptions. One hit per task —
/// a title match wins over a description match. Results come back in
/// date order so the dropdown reads chronologically.
pub fn search_tasks<'a>(board: &'a Board, re: &Regex) -> Vec<SearchHit<'a>> {
    let mut hits: Vec<SearchHit<'a>> = board
        .visible_tasks()
        .filter_map(|task| {
            if re.is_match(&task.title) {
                Some(SearchHit {
                    task,
                    field: MatchField::Title,
                })
            } else if re.is_match(&task.description) {
                Some(SearchHit {
                    task,
                    field: MatchField::Description,
                })
            } else {
                None
            }
        })
        .collect();
    hits.sort_by_key(|hit| hit.task.date);
    hits
}

/// Incomplete visible tasks dated before `today`, oldest first
pub fn overdue_tasks(board: &Board, today: NaiveDate) -> Vec<&Task> {
    let mut tasks: Vec<&Task> = board
        .visible_tasks()
        .filter(|t| !t.completed && t.date < today)
        .collect();
    tasks.sort_by_key(|t| t.date);
    tasks
}

/// (completed, total) for one day's visible tasks — the progress meter
pub fn day_progress(board: &Board, date: NaiveDate) -> (usize, usize) {
    let mut completed = 0;
    let mut total = 0;
    for task in board.visible_tasks().filter(|t| t.date == date) {
        total += 1;
        if task.completed {
            completed += 1;
        }
    }
    (completed, total)
}
