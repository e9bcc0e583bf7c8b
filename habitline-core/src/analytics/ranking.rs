//! Cross-habit rankings
//!
//! Aggregates are resilient: a habit with corrupt data is logged and
//! skipped rather than failing the whole report.

use chrono::{Duration, NaiveDate};

use crate::analytics::dates::{normalize_dates, week_start};
use crate::analytics::streaks::longest_streak;
use crate::error::Result;
use crate::store::Store;
use crate::types::{
    ChallengeOutcome, HabitDifficulty, Periodicity, PeriodicityBests, StreakRecord,
};

/// Rank habits by completion ratio since creation and return the worst.
///
/// Ties keep the habit registered first. Habits with unparseable
/// periodicity or creation data, or created after the evaluation date,
/// are skipped.
pub fn most_challenging_habit(store: &Store, today: NaiveDate) -> Result<ChallengeOutcome> {
    let names = store.list_habit_names()?;
    if names.is_empty() {
        return Ok(ChallengeOutcome::NoHabits);
    }

    let mut stats: Vec<HabitDifficulty> = Vec::new();
    for name in names {
        if !store.habit_exists(&name)? {
            continue;
        }
        let periodicity = match store.get_periodicity(&name) {
            Ok(Some(p)) => p,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!(habit = %name, error = %e, "Skipping habit in challenge ranking");
                continue;
            }
        };
        let Some(created) = store.get_creation_date(&name)? else {
            continue;
        };
        if created > today {
            continue;
        }

        let dates = normalize_dates(&store.load_completion_dates(&name)?);

        let (completed, total) = match periodicity {
            Periodicity::Daily => {
                let total = (today - created).num_days() as u32 + 1;
                let completed = dates
                    .iter()
                    .filter(|&&d| d >= created && d <= today)
                    .count() as u32;
                (completed, total)
            }
            Periodicity::Weekly => {
                let first_monday = week_start(created);
                let total = ((today - first_monday).num_days() / 7) as u32 + 1;
                let mut completed = 0;
                let mut monday = first_monday;
                while monday <= today {
                    let sunday = monday + Duration::days(6);
                    if dates.iter().any(|&d| d >= monday && d <= sunday) {
                        completed += 1;
                    }
                    monday += Duration::days(7);
                }
                (completed, total)
            }
        };

        let ratio = if total == 0 {
            0.0
        } else {
            completed as f64 / total as f64
        };

        stats.push(HabitDifficulty {
            name,
            periodicity,
            completed,
            total,
            ratio,
        });
    }

    if stats.is_empty() {
        return Ok(ChallengeOutcome::NoValidHabits);
    }

    // Stable sort preserves registration order among equal ratios
    stats.sort_by(|a, b| a.ratio.partial_cmp(&b.ratio).unwrap_or(std::cmp::Ordering::Equal));
    let worst = stats.remove(0);

    if worst.ratio >= 1.0 {
        Ok(ChallengeOutcome::AllCompleted)
    } else {
        Ok(ChallengeOutcome::MostChallenging(worst))
    }
}

/// Best longest streak per periodicity across all habits.
///
/// A later habit replaces the incumbent only with a strictly greater
/// length, so ties keep the habit registered first.
pub fn longest_streaks_by_periodicity(store: &Store) -> Result<PeriodicityBests> {
    let mut bests = PeriodicityBests::default();

    for name in store.list_habit_names()? {
        if !store.habit_exists(&name)? {
            continue;
        }
        let periodicity = match store.get_periodicity(&name) {
            Ok(Some(p)) => p,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!(habit = %name, error = %e, "Skipping habit in streak ranking");
                continue;
            }
        };
        let streak = match longest_streak(store, &name) {
            Ok(Some(s)) => s,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!(habit = %name, error = %e, "Skipping habit in streak ranking");
                continue;
            }
        };

        let slot = match periodicity {
            Periodicity::Daily => &mut bests.daily,
            Periodicity::Weekly => &mut bests.weekly,
        };
        let better = match slot {
            Some(record) => streak.length > record.length,
            None => true,
        };
        if better {
            *slot = Some(StreakRecord {
                habit: name,
                length: streak.length,
                start: streak.start,
                end: streak.end,
            });
        }
    }

    Ok(bests)
}

/// Two-line report of the best daily and weekly streaks
pub fn longest_streaks_report(store: &Store) -> Result<String> {
    if store.list_habit_names()?.is_empty() {
        return Ok("No Habits Found.".to_string());
    }

    let bests = longest_streaks_by_periodicity(store)?;

    let daily = match &bests.daily {
        Some(r) => format!(
            "Longest daily streak: '{}' with {} days ({} to {})",
            r.habit, r.length, r.start, r.end
        ),
        None => "No daily habits with streaks found.".to_string(),
    };
    let weekly = match &bests.weekly {
        Some(r) => format!(
            "Longest weekly streak: '{}' with {} weeks ({} to {})",
            r.habit, r.length, r.start, r.end
        ),
        None => "No weekly habits with streaks found.".to_string(),
    };

    Ok(format!("{}\n{}", daily, weekly))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn noon(date: NaiveDate) -> NaiveDateTime {
        date.and_hms_opt(12, 0, 0).unwrap()
    }

    fn store() -> Store {
        let store = Store::open_in_memory().unwrap();
        store.migrate().unwrap();
        store
    }

    #[test]
    fn test_empty_registry() {
        let store = store();
        assert_eq!(
            most_challenging_habit(&store, d(2025, 4, 28)).unwrap(),
            ChallengeOutcome::NoHabits
        );
        assert_eq!(
            longest_streaks_report(&store).unwrap(),
            "No Habits Found."
        );
    }

    #[test]
    fn test_worst_ratio_wins() {
        let store = store();
        // Created Apr 1, evaluated Apr 4: 4 tracked days each
        for (name, done) in [
            ("Good", vec![d(2025, 4, 1), d(2025, 4, 2), d(2025, 4, 3)]),
            ("Bad", vec![d(2025, 4, 1)]),
        ] {
            store
                .add_habit(name, None, Periodicity::Daily, noon(d(2025, 4, 1)))
                .unwrap();
            for date in done {
                store.mark_completed(name, noon(date)).unwrap();
            }
        }

        let outcome = most_challenging_habit(&store, d(2025, 4, 4)).unwrap();
        let ChallengeOutcome::MostChallenging(worst) = outcome else {
            panic!("expected a most-challenging habit");
        };
        assert_eq!(worst.name, "Bad");
        assert_eq!(worst.completed, 1);
        assert_eq!(worst.total, 4);
        assert_eq!(worst.ratio_percent(), "25.0");
    }

    #[test]
    fn test_tie_keeps_first_registered() {
        let store = store();
        for name in ["First", "Second"] {
            store
                .add_habit(name, None, Periodicity::Daily, noon(d(2025, 4, 1)))
                .unwrap();
            store.mark_completed(name, noon(d(2025, 4, 1))).unwrap();
        }

        let outcome = most_challenging_habit(&store, d(2025, 4, 2)).unwrap();
        let ChallengeOutcome::MostChallenging(worst) = outcome else {
            panic!("expected a most-challenging habit");
        };
        assert_eq!(worst.name, "First");
    }

    #[test]
    fn test_all_perfect() {
        let store = store();
        store
            .add_habit("Reading", None, Periodicity::Daily, noon(d(2025, 4, 1)))
            .unwrap();
        store.mark_completed("Reading", noon(d(2025, 4, 1))).unwrap();
        store.mark_completed("Reading", noon(d(2025, 4, 2))).unwrap();

        assert_eq!(
            most_challenging_habit(&store, d(2025, 4, 2)).unwrap(),
            ChallengeOutcome::AllCompleted
        );
    }

    #[test]
    fn test_future_habit_skipped() {
        let store = store();
        store
            .add_habit("Later", None, Periodicity::Daily, noon(d(2025, 6, 1)))
            .unwrap();

        assert_eq!(
            most_challenging_habit(&store, d(2025, 4, 28)).unwrap(),
            ChallengeOutcome::NoValidHabits
        );
    }

    #[test]
    fn test_corrupt_periodicity_skipped() {
        let store = store();
        store
            .add_habit("Broken", None, Periodicity::Daily, noon(d(2025, 4, 1)))
            .unwrap();
        store
            .add_habit("Fine", None, Periodicity::Daily, noon(d(2025, 4, 1)))
            .unwrap();
        store.mark_completed("Fine", noon(d(2025, 4, 1))).unwrap();
        store
            .connection()
            .execute(
                "UPDATE habits SET periodicity = 'fortnightly' WHERE name = 'Broken'",
                [],
            )
            .unwrap();

        let outcome = most_challenging_habit(&store, d(2025, 4, 2)).unwrap();
        let ChallengeOutcome::MostChallenging(worst) = outcome else {
            panic!("expected a most-challenging habit");
        };
        assert_eq!(worst.name, "Fine");

        let bests = longest_streaks_by_periodicity(&store).unwrap();
        assert_eq!(bests.daily.unwrap().habit, "Fine");
    }

    #[test]
    fn test_bests_strictly_greater_keeps_first() {
        let store = store();
        for name in ["Early", "Late"] {
            store
                .add_habit(name, None, Periodicity::Daily, noon(d(2025, 4, 1)))
                .unwrap();
            store.mark_completed(name, noon(d(2025, 4, 1))).unwrap();
            store.mark_completed(name, noon(d(2025, 4, 2))).unwrap();
        }

        let bests = longest_streaks_by_periodicity(&store).unwrap();
        let daily = bests.daily.unwrap();
        assert_eq!(daily.habit, "Early");
        assert_eq!(daily.length, 2);
        assert!(bests.weekly.is_none());
    }

    #[test]
    fn test_report_lines() {
        let store = store();
        store
            .add_habit("Reading", None, Periodicity::Daily, noon(d(2025, 4, 1)))
            .unwrap();
        store.mark_completed("Reading", noon(d(2025, 4, 1))).unwrap();
        store.mark_completed("Reading", noon(d(2025, 4, 2))).unwrap();

        let report = longest_streaks_report(&store).unwrap();
        assert_eq!(
            report,
            "Longest daily streak: 'Reading' with 2 days (2025-04-01 to 2025-04-02)\n\
             No weekly habits with streaks found."
        );
    }
}
