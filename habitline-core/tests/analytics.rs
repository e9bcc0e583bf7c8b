//! End-to-end analytics tests over the seeded sample store
//!
//! The sample data covers April 2025 (Tue Apr 1 through Mon Apr 28) with
//! five habits spanning both periodicities, so every expected value below
//! can be checked against a calendar.

use chrono::{NaiveDate, NaiveDateTime};
use habitline_core::analytics::{
    count_missed_periods, current_streak, longest_streak, longest_streaks_by_periodicity,
    longest_streaks_report, missed_periods, most_challenging_habit,
};
use habitline_core::store::sample::seed_sample_data;
use habitline_core::{ChallengeOutcome, MissedPeriod, Periodicity, Store};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn noon(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(12, 0, 0).unwrap()
}

fn seeded() -> Store {
    let store = Store::open_in_memory().unwrap();
    store.migrate().unwrap();
    seed_sample_data(&store).unwrap();
    store
}

/// The last day of the sample window
const TODAY: (i32, u32, u32) = (2025, 4, 28);

fn today() -> NaiveDate {
    d(TODAY.0, TODAY.1, TODAY.2)
}

#[test]
fn daily_habit_with_perfect_history() {
    let store = seeded();

    assert_eq!(current_streak(&store, "Daily_Reading", today()).unwrap(), 28);

    let longest = longest_streak(&store, "Daily_Reading").unwrap().unwrap();
    assert_eq!(longest.length, 28);
    assert_eq!(longest.start, d(2025, 4, 1));
    assert_eq!(longest.end, d(2025, 4, 28));

    assert_eq!(count_missed_periods(&store, "Daily_Reading", today()).unwrap(), 0);
}

#[test]
fn weekday_habit_streaks_and_misses() {
    let store = seeded();

    // Apr 28 is a Monday; Friday Apr 25 is three days back, so the
    // current streak is just today's completion.
    assert_eq!(current_streak(&store, "Meditation", today()).unwrap(), 1);

    // First full Mon-Fri run wins over the later equal-length runs
    let longest = longest_streak(&store, "Meditation").unwrap().unwrap();
    assert_eq!(longest.length, 5);
    assert_eq!(longest.start, d(2025, 4, 7));
    assert_eq!(longest.end, d(2025, 4, 11));

    // Four weekends in the window
    let missed = missed_periods(&store, "Meditation", today()).unwrap();
    assert_eq!(missed.len(), 8);
    assert_eq!(missed[0], MissedPeriod::Day(d(2025, 4, 5)));
    assert_eq!(missed[7], MissedPeriod::Day(d(2025, 4, 27)));

    // Missed plus completed partitions the tracked window
    assert_eq!(missed.len() + 20, 28);
}

#[test]
fn alternating_habit_never_chains() {
    let store = seeded();

    // Last completion Apr 27, one day before the evaluation date
    assert_eq!(current_streak(&store, "Water_Intake", today()).unwrap(), 1);

    let longest = longest_streak(&store, "Water_Intake").unwrap().unwrap();
    assert_eq!(longest.length, 1);
    assert_eq!(longest.start, d(2025, 4, 1));

    assert_eq!(count_missed_periods(&store, "Water_Intake", today()).unwrap(), 14);
}

#[test]
fn weekend_habit_pairs() {
    let store = seeded();

    // Sat Apr 26 + Sun Apr 27, evaluated Mon Apr 28
    assert_eq!(current_streak(&store, "Evening_Walk", today()).unwrap(), 2);

    let longest = longest_streak(&store, "Evening_Walk").unwrap().unwrap();
    assert_eq!(longest.length, 2);
    assert_eq!(longest.start, d(2025, 4, 5));
    assert_eq!(longest.end, d(2025, 4, 6));
}

#[test]
fn weekly_habit_streak_and_missed_creation_week() {
    let store = seeded();

    // Completions every Monday from Apr 7; evaluated in the week of Apr 28
    assert_eq!(current_streak(&store, "Weekly_Workout", today()).unwrap(), 4);

    let longest = longest_streak(&store, "Weekly_Workout").unwrap().unwrap();
    assert_eq!(longest.length, 4);
    assert_eq!(longest.start, d(2025, 4, 7));
    assert_eq!(longest.end, d(2025, 4, 28));

    // Created Tue Apr 1: the creation week (Mar 31 - Apr 6) has no completion
    let missed = missed_periods(&store, "Weekly_Workout", today()).unwrap();
    assert_eq!(
        missed,
        vec![MissedPeriod::Week {
            start: d(2025, 3, 31),
            end: d(2025, 4, 6),
        }]
    );
}

#[test]
fn most_challenging_is_the_weekend_walker() {
    let store = seeded();

    let outcome = most_challenging_habit(&store, today()).unwrap();
    let ChallengeOutcome::MostChallenging(worst) = outcome else {
        panic!("expected a most-challenging habit");
    };
    assert_eq!(worst.name, "Evening_Walk");
    assert_eq!(worst.periodicity, Periodicity::Daily);
    assert_eq!(worst.completed, 8);
    assert_eq!(worst.total, 28);
    assert_eq!(worst.ratio_percent(), "28.6");

    let report = ChallengeOutcome::MostChallenging(worst).report();
    assert!(report.contains("Most challenging habit: 'Evening_Walk'"));
    assert!(report.contains("Completed: 8 out of 28 days since habit creation"));
    assert!(report.contains("Completion ratio: 28.6%"));
}

#[test]
fn bests_split_by_periodicity() {
    let store = seeded();

    let bests = longest_streaks_by_periodicity(&store).unwrap();

    let daily = bests.daily.unwrap();
    assert_eq!(daily.habit, "Daily_Reading");
    assert_eq!(daily.length, 28);

    let weekly = bests.weekly.unwrap();
    assert_eq!(weekly.habit, "Weekly_Workout");
    assert_eq!(weekly.length, 4);

    let report = longest_streaks_report(&store).unwrap();
    assert_eq!(
        report,
        "Longest daily streak: 'Daily_Reading' with 28 days (2025-04-01 to 2025-04-28)\n\
         Longest weekly streak: 'Weekly_Workout' with 4 weeks (2025-04-07 to 2025-04-28)"
    );
}

#[test]
fn streak_breaks_after_a_full_missed_day() {
    let store = seeded();

    // Two days after the last completion the daily streak is gone
    let later = d(2025, 4, 30);
    assert_eq!(current_streak(&store, "Daily_Reading", later).unwrap(), 0);

    // But the longest streak is unaffected by the evaluation date
    let longest = longest_streak(&store, "Daily_Reading").unwrap().unwrap();
    assert_eq!(longest.length, 28);
}

#[test]
fn future_habit_is_invisible_to_analytics() {
    let store = Store::open_in_memory().unwrap();
    store.migrate().unwrap();
    store
        .add_habit("Later", None, Periodicity::Daily, noon(d(2025, 6, 1)))
        .unwrap();

    assert!(missed_periods(&store, "Later", d(2025, 4, 28))
        .unwrap()
        .is_empty());
    assert_eq!(
        most_challenging_habit(&store, d(2025, 4, 28)).unwrap(),
        ChallengeOutcome::NoValidHabits
    );
}

#[test]
fn empty_store_sentinels() {
    let store = Store::open_in_memory().unwrap();
    store.migrate().unwrap();

    assert_eq!(
        most_challenging_habit(&store, today()).unwrap(),
        ChallengeOutcome::NoHabits
    );
    assert_eq!(
        most_challenging_habit(&store, today()).unwrap().report(),
        "No Habits Found."
    );
    assert_eq!(longest_streaks_report(&store).unwrap(), "No Habits Found.");
}

#[test]
fn corrupt_periodicity_fails_single_but_not_aggregate() {
    let store = seeded();
    store
        .connection()
        .execute(
            "UPDATE habits SET periodicity = 'hourly' WHERE name = 'Daily_Reading'",
            [],
        )
        .unwrap();

    assert!(current_streak(&store, "Daily_Reading", today()).is_err());
    assert!(longest_streak(&store, "Daily_Reading").is_err());
    assert!(missed_periods(&store, "Daily_Reading", today()).is_err());

    // Aggregates skip the corrupt habit and keep going
    let bests = longest_streaks_by_periodicity(&store).unwrap();
    assert_eq!(bests.daily.unwrap().habit, "Meditation");

    let outcome = most_challenging_habit(&store, today()).unwrap();
    assert!(matches!(outcome, ChallengeOutcome::MostChallenging(_)));
}

#[test]
fn weekly_streak_survives_year_boundary() {
    let store = Store::open_in_memory().unwrap();
    store.migrate().unwrap();
    store
        .add_habit("Review", None, Periodicity::Weekly, noon(d(2024, 12, 23)))
        .unwrap();
    // 2024-W52 then 2025-W01 (which starts Dec 30 2024)
    store.mark_completed("Review", noon(d(2024, 12, 28))).unwrap();
    store.mark_completed("Review", noon(d(2025, 1, 3))).unwrap();

    assert_eq!(current_streak(&store, "Review", d(2025, 1, 4)).unwrap(), 2);
}

#[test]
fn on_disk_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("habits.db");

    {
        let store = Store::open(&path).unwrap();
        store.migrate().unwrap();
        store
            .add_habit("Reading", None, Periodicity::Daily, noon(d(2025, 4, 1)))
            .unwrap();
        store.mark_completed("Reading", noon(d(2025, 4, 1))).unwrap();
    }

    let store = Store::open(&path).unwrap();
    store.migrate().unwrap();
    assert_eq!(current_streak(&store, "Reading", d(2025, 4, 1)).unwrap(), 1);
}
