use chrono::{Days, NaiveDate};

use crate::util::dates::{monday_of, week_window, WINDOW_DAYS};

/// Index of the reference week's Monday inside the 21-day window
const REFERENCE_INDEX: usize = 7;

/// What the consuming view owes the controller before scrolling resumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPhase {
    /// Nothing pending; scroll notifications are live
    Idle,
    /// The view must set its scroll offset to `jump_offset()`
    JumpPending,
    /// The view must adjust its scroll offset by the delta returned from
    /// `note_scroll_center` so the recentering stays invisible
    MaintainPending,
}

/// Sliding three-week window over the calendar matrix.
///
/// Materializes 21 days around a Monday-normalized reference date and
/// recenters itself when the scroll position drifts into the outer
/// weeks, giving the illusion of an infinite horizontal calendar with a
/// fixed-size DOM.
#[derive(Debug, Clone)]
pub struct WeekWindow {
    /// Always a Monday
    reference: NaiveDate,
    day_width: f64,
    phase: WindowPhase,
}

impl WeekWindow {
    /// A window centered on `anchor`'s week. Starts in `JumpPending` so
    /// the view aligns its initial scroll position.
    pub fn new(anchor: NaiveDate, day_width: f64) -> Self {
        WeekWindow {
            reference: monday_of(anchor),
            day_width,
            phase: WindowPhase::JumpPending,
        }
    }

    /// The Monday anchoring the current reference week
    pub fn reference(&self) -> NaiveDate {
        self.reference
    }

    pub fn day_width(&self) -> f64 {
        self.day_width
    }

    pub fn phase(&self) -> WindowPhase {
        self.phase
    }

    /// The 21 materialized days: [Monday − 7, Monday + 13]
    pub fn days(&self) -> Vec<NaiveDate> {
        week_window(self.reference)
    }

    /// Index of `date` within the window, if materialized
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.days().iter().position(|d| *d == date)
    }

    /// Explicit navigation: date pick, "today", search-result jump.
    /// The view must then reset its scroll offset to `jump_offset()`.
    pub fn jump_to(&mut self, date: NaiveDate) {
        self.reference = monday_of(date);
        self.phase = WindowPhase::JumpPending;
    }

    pub fn next_week(&mut self) {
        let next = self
            .reference
            .checked_add_days(Days::new(7))
            .unwrap_or(self.reference);
        self.jump_to(next);
    }

    pub fn prev_week(&mut self) {
        let prev = self
            .reference
            .checked_sub_days(Days::new(7))
            .unwrap_or(self.reference);
        self.jump_to(prev);
    }

    /// Scroll offset that puts the reference week's Monday at the start
    /// of the visible area (day index 7)
    pub fn jump_offset(&self) -> f64 {
        REFERENCE_INDEX as f64 * self.day_width
    }

    /// Passive-scroll notification: `center_px` is the pixel under the
    /// viewport's horizontal center. Drifting into the first or last
    /// week slides the reference one week over and returns the scroll
    /// delta the view must apply (±7 day-widths) so nothing visibly
    /// moves. Ignored while a pending phase awaits service.
    pub fn note_scroll_center(&mut self, center_px: f64) -> Option<f64> {
        if self.phase != WindowPhase::Idle || self.day_width <= 0.0 {
            return None;
        }
        let index = (center_px / self.day_width).floor();
        if index < 0.0 || index >= WINDOW_DAYS as f64 {
            return None;
        }
        if (index as usize) < REFERENCE_INDEX {
            self.reference = self
                .reference
                .checked_sub_days(Days::new(7))
                .unwrap_or(self.reference);
            self.phase = WindowPhase::MaintainPending;
            Some(7.0 * self.day_width)
        } else if index as usize >= 2 * REFERENCE_INDEX {
            self.reference = self
                .reference
                .checked_add_days(Days::new(7))
                .unwrap_or(self.reference);
            self.phase = WindowPhase::MaintainPending;
            Some(-7.0 * self.day_width)
        } else {
            None
        }
    }

    /// The view applied the pending scroll change; go live again.
    pub fn settle(&mut self) {
        self.phase = WindowPhase::Idle;
    }

    /// Change the day width keeping the day under the viewport center
    /// fixed. Returns the scroll offset the view should apply.
    pub fn rezoom(&mut self, new_width: f64, scroll_left: f64, viewport_width: f64) -> f64 {
        let center_index = if self.day_width > 0.0 {
            (scroll_left + viewport_width / 2.0) / self.day_width
        } else {
            REFERENCE_INDEX as f64
        };
        self.day_width = new_width;
        center_index * new_width - viewport_width / 2.0
    }
}
