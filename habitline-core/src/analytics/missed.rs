//! Missed-period detection
//!
//! Walks the calendar from a habit's creation date to the evaluation date
//! and collects every period unit with no completion. The period containing
//! the evaluation date is included when still empty, so "missed" means
//! "empty so far", not "irrecoverably missed".

use chrono::{Duration, NaiveDate};
use std::collections::BTreeSet;

use crate::analytics::dates::{iso_week, normalize_dates, week_start};
use crate::error::Result;
use crate::store::Store;
use crate::types::{MissedPeriod, Periodicity};

/// Every period since the habit's creation with zero completions,
/// in chronological order.
pub fn missed_periods(store: &Store, name: &str, today: NaiveDate) -> Result<Vec<MissedPeriod>> {
    let Some(periodicity) = store.get_periodicity(name)? else {
        return Ok(Vec::new());
    };
    let Some(created) = store.get_creation_date(name)? else {
        return Ok(Vec::new());
    };
    if created > today {
        return Ok(Vec::new());
    }

    let dates = normalize_dates(&store.load_completion_dates(name)?);

    let missed = match periodicity {
        Periodicity::Daily => {
            let completed: BTreeSet<NaiveDate> = dates.into_iter().collect();
            let mut missed = Vec::new();
            let mut day = created;
            while day <= today {
                if !completed.contains(&day) {
                    missed.push(MissedPeriod::Day(day));
                }
                let Some(next) = day.succ_opt() else { break };
                day = next;
            }
            missed
        }
        Periodicity::Weekly => {
            let completed: BTreeSet<(i32, u32)> = dates.into_iter().map(iso_week).collect();
            let mut missed = Vec::new();
            let mut monday = week_start(created);
            while monday <= today {
                if !completed.contains(&iso_week(monday)) {
                    missed.push(MissedPeriod::Week {
                        start: monday,
                        end: monday + Duration::days(6),
                    });
                }
                monday += Duration::days(7);
            }
            missed
        }
    };

    Ok(missed)
}

/// Number of missed periods since creation
pub fn count_missed_periods(store: &Store, name: &str, today: NaiveDate) -> Result<usize> {
    Ok(missed_periods(store, name, today)?.len())
}
