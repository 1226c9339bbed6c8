//! Birthday countdown
//!
//! Whole days remaining until a target moment, alongside today's long-form
//! date (`It's Friday — October 16th 2026 and you have N days remaining`).

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Whole days from `now` until `target`, rounded down; 0 once passed
#[must_use]
pub fn days_until(target: NaiveDateTime, now: NaiveDateTime) -> i64 {
    let remaining = target.signed_duration_since(now);
    if remaining <= chrono::Duration::zero() {
        0
    } else {
        remaining.num_days()
    }
}

/// English ordinal suffix for a day of the month
#[must_use]
pub fn ordinal_suffix(day: u32) -> &'static str {
    if (11..=13).contains(&(day % 100)) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Long-form date line, e.g. `Friday — February 15th 2030`
#[must_use]
pub fn date_line(date: NaiveDate) -> String {
    let day = date.day();
    format!(
        "{} — {} {day}{} {}",
        date.format("%A"),
        date.format("%B"),
        ordinal_suffix(day),
        date.year()
    )
}

/// Countdown snapshot for display
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Countdown {
    /// Whole days remaining
    pub days_left: i64,
    /// Long-form date of the day the countdown was taken
    pub date_line: String,
}

impl Countdown {
    /// Compute the countdown to `target` as seen at `now`
    ///
    /// The date line names `now`, not the target.
    #[must_use]
    pub fn at(target: NaiveDateTime, now: NaiveDateTime) -> Self {
        Self {
            days_left: days_until(target, now),
            date_line: date_line(now.date()),
        }
    }

    /// Compute the countdown against the local wall clock
    #[must_use]
    pub fn now(target: NaiveDateTime) -> Self {
        Self::at(target, Local::now().naive_local())
    }
}
