use chrono::{Datelike, Days, Months, NaiveDate};

use crate::model::task::Repeat;

/// Canonical date-key format. Lexicographic order on keys equals
/// chronological order on dates.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Number of days materialized by the week window: the reference week
/// plus one week on either side.
pub const WINDOW_DAYS: usize = 21;

/// Parse a `YYYY-MM-DD` date key. Returns `None` for anything else.
pub fn parse_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, DATE_KEY_FORMAT).ok()
}

/// Format a date as its canonical `YYYY-MM-DD` key.
pub fn format_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// The Monday of the week containing `date` (Monday maps to itself).
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    let back = date.weekday().num_days_from_monday() as u64;
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

/// The 21-day window around `reference`: [Monday − 7, Monday + 13].
pub fn week_window(reference: NaiveDate) -> Vec<NaiveDate> {
    let start = monday_of(reference)
        .checked_sub_days(Days::new(7))
        .unwrap_or(reference);
    (0..WINDOW_DAYS as u64)
        .filter_map(|i| start.checked_add_days(Days::new(i)))
        .collect()
}

/// Step `base` forward by `offset` repetitions of `cadence`.
///
/// Monthly stepping is calendar arithmetic: the day-of-month is clamped
/// when the target month is shorter (Jan 31 + 1 month = Feb 28/29).
/// Returns `None` for `Repeat::None` or on date overflow.
pub fn step_cadence(base: NaiveDate, cadence: Repeat, offset: u32) -> Option<NaiveDate> {
    match cadence {
        Repeat::None => None,
        Repeat::Daily => base.checked_add_days(Days::new(offset as u64)),
        Repeat::Weekly => base.checked_add_days(Days::new(7 * offset as u64)),
        Repeat::Monthly => base.checked_add_months(Months::new(offset)),
    }
}

/// Signed whole-day offset from `from` to `to`.
pub fn day_offset(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// Shift a date by a signed number of days, saturating on overflow.
pub fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days as u64))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}
