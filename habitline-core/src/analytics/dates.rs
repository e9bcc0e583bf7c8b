//! Calendar helpers for streak and missed-period arithmetic
//!
//! Weekly math uses ISO 8601 weeks: Monday-start, identified by an
//! (ISO year, ISO week number) pair. The ISO year can differ from the
//! calendar year near January 1.

use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeSet;

/// Parse raw completion date strings into sorted, de-duplicated dates.
///
/// Each entry's first whitespace-separated token must parse as
/// YYYY-MM-DD. Any malformed entry poisons the whole history and yields
/// an empty list, so downstream analytics treat the habit as having no
/// completions rather than computing streaks from partial data.
pub fn normalize_dates(raw: &[String]) -> Vec<NaiveDate> {
    let mut dates = BTreeSet::new();
    for entry in raw {
        let token = entry.split_whitespace().next().unwrap_or("");
        match NaiveDate::parse_from_str(token, "%Y-%m-%d") {
            Ok(date) => {
                dates.insert(date);
            }
            Err(_) => {
                tracing::warn!(entry = %entry, "Malformed completion date, discarding history");
                return Vec::new();
            }
        }
    }
    dates.into_iter().collect()
}

/// ISO (year, week number) pair for a date
pub fn iso_week(date: NaiveDate) -> (i32, u32) {
    let week = date.iso_week();
    (week.year(), week.week())
}

/// Monday of the ISO week containing the date
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Monday and Sunday of a given ISO week, if the week exists
pub fn week_bounds(year: i32, week: u32) -> Option<(NaiveDate, NaiveDate)> {
    let monday = NaiveDate::from_isoywd_opt(year, week, chrono::Weekday::Mon)?;
    Some((monday, monday + Duration::days(6)))
}

/// Number of ISO weeks in a year (52 or 53).
///
/// December 28 always falls in the last ISO week of its year.
pub fn last_iso_week(year: i32) -> u32 {
    NaiveDate::from_ymd_opt(year, 12, 28)
        .map(|d| d.iso_week().week())
        .unwrap_or(52)
}

/// Whether `next` is the ISO week immediately after `prev`.
///
/// Handles the year boundary, including 53-week years.
pub fn weeks_adjacent(prev: (i32, u32), next: (i32, u32)) -> bool {
    if next.0 == prev.0 {
        next.1 == prev.1 + 1
    } else {
        next.0 == prev.0 + 1 && next.1 == 1 && prev.1 == last_iso_week(prev.0)
    }
}
