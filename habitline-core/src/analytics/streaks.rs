//! Current and longest streak computation
//!
//! A daily streak is a run of consecutive calendar dates with completions.
//! A weekly streak is a run of adjacent ISO weeks each containing at least
//! one completion; multiple completions within a week count once.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

use crate::analytics::dates::{iso_week, normalize_dates, weeks_adjacent};
use crate::error::Result;
use crate::store::Store;
use crate::types::{LongestStreak, Periodicity};

/// Length of the streak running up to the evaluation date.
///
/// Returns 0 when the habit is unregistered, has no completions, or the
/// streak is broken (daily: last completion more than one day before
/// `today`; weekly: last completion before the week preceding `today`'s).
pub fn current_streak(store: &Store, name: &str, today: NaiveDate) -> Result<u32> {
    let Some(periodicity) = store.get_periodicity(name)? else {
        return Ok(0);
    };

    let dates = normalize_dates(&store.load_completion_dates(name)?);
    let Some(&last) = dates.last() else {
        return Ok(0);
    };

    match periodicity {
        Periodicity::Daily => {
            if (today - last).num_days() > 1 {
                return Ok(0);
            }
            let mut streak = 1;
            for pair in dates.windows(2).rev() {
                if (pair[1] - pair[0]).num_days() == 1 {
                    streak += 1;
                } else {
                    break;
                }
            }
            Ok(streak)
        }
        Periodicity::Weekly => {
            let current = iso_week(today);
            let last_week = iso_week(last);
            if last_week != current && !weeks_adjacent(last_week, current) {
                return Ok(0);
            }

            let weeks: Vec<(i32, u32)> = dates
                .iter()
                .map(|&d| iso_week(d))
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();

            let mut streak = 1;
            for pair in weeks.windows(2).rev() {
                if weeks_adjacent(pair[0], pair[1]) {
                    streak += 1;
                } else {
                    break;
                }
            }
            Ok(streak)
        }
    }
}

/// Longest streak over the habit's entire history.
///
/// Independent of the evaluation date. Ties keep the earliest run.
/// Returns None when the habit is unregistered or has no completions.
pub fn longest_streak(store: &Store, name: &str) -> Result<Option<LongestStreak>> {
    let Some(periodicity) = store.get_periodicity(name)? else {
        return Ok(None);
    };

    let dates = normalize_dates(&store.load_completion_dates(name)?);
    if dates.is_empty() {
        return Ok(None);
    }

    Ok(match periodicity {
        Periodicity::Daily => Some(daily_longest(&dates)),
        Periodicity::Weekly => weekly_longest(&dates),
    })
}

fn daily_longest(dates: &[NaiveDate]) -> LongestStreak {
    let mut max_len: u32 = 1;
    let mut max_end = 0usize;
    let mut cur: u32 = 1;

    for (i, pair) in dates.windows(2).enumerate() {
        if (pair[1] - pair[0]).num_days() == 1 {
            cur += 1;
        } else {
            cur = 1;
        }
        // Strictly greater keeps the earliest run on ties
        if cur > max_len {
            max_len = cur;
            max_end = i + 1;
        }
    }

    let start = max_end + 1 - max_len as usize;
    LongestStreak {
        length: max_len,
        start: dates[start],
        end: dates[max_end],
    }
}

fn weekly_longest(dates: &[NaiveDate]) -> Option<LongestStreak> {
    // Group completions by ISO week; the BTreeMap key order is the
    // chronological week order since ISO weeks sort as (year, week)
    let mut by_week: BTreeMap<(i32, u32), Vec<NaiveDate>> = BTreeMap::new();
    for &date in dates {
        by_week.entry(iso_week(date)).or_default().push(date);
    }

    let weeks: Vec<(i32, u32)> = by_week.keys().copied().collect();

    let mut max_len: u32 = 1;
    let mut max_end = 0usize;
    let mut cur: u32 = 1;

    for (i, pair) in weeks.windows(2).enumerate() {
        if weeks_adjacent(pair[0], pair[1]) {
            cur += 1;
        } else {
            cur = 1;
        }
        if cur > max_len {
            max_len = cur;
            max_end = i + 1;
        }
    }

    let window = &weeks[max_end + 1 - max_len as usize..=max_end];
    let start = window
        .iter()
        .flat_map(|w| by_week[w].iter())
        .min()
        .copied()?;
    let end = window
        .iter()
        .flat_map(|w| by_week[w].iter())
        .max()
        .copied()?;

    Some(LongestStreak {
        length: max_len,
        start,
        end,
    })
}
