//! Predefined sample data
//!
//! Seeds five habits with four weeks of completion history (April 2025),
//! covering both periodicities and a spread of completion patterns. Used
//! by the CLI `seed` command and by acceptance tests.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};

use crate::error::Result;
use crate::store::Store;
use crate::types::Periodicity;

const SAMPLE_START: (i32, u32, u32) = (2025, 4, 1);
const SAMPLE_END: (i32, u32, u32) = (2025, 4, 28);

/// Replace the store contents with the predefined sample data
pub fn seed_sample_data(store: &Store) -> Result<()> {
    store.clear_all()?;

    let start = date(SAMPLE_START);
    let end = date(SAMPLE_END);
    let created = start.and_hms_opt(8, 0, 0).unwrap();

    let habits: [(&str, &str, Periodicity, NaiveTime, fn(NaiveDate) -> bool); 5] = [
        (
            "Weekly_Workout",
            "One gym session per week",
            Periodicity::Weekly,
            time(8, 30),
            |d| d.weekday() == Weekday::Mon,
        ),
        (
            "Daily_Reading",
            "Read at least 20 pages",
            Periodicity::Daily,
            time(9, 0),
            |_| true,
        ),
        (
            "Meditation",
            "Ten minutes of morning meditation",
            Periodicity::Daily,
            time(7, 10),
            |d| d.weekday().number_from_monday() <= 5,
        ),
        (
            "Water_Intake",
            "Two liters of water",
            Periodicity::Daily,
            time(12, 0),
            |d| (d - date(SAMPLE_START)).num_days() % 2 == 0,
        ),
        (
            "Evening_Walk",
            "Half-hour walk after dinner",
            Periodicity::Daily,
            time(18, 0),
            |d| matches!(d.weekday(), Weekday::Sat | Weekday::Sun),
        ),
    ];

    for (name, description, periodicity, at, done_on) in habits {
        store.add_habit(name, Some(description), periodicity, created)?;

        let mut day = start;
        while day <= end {
            if done_on(day) {
                store.mark_completed(name, day.and_time(at))?;
            }
            let Some(next) = day.succ_opt() else { break };
            day = next;
        }
    }

    tracing::info!("Seeded sample data for {} habits", habits.len());
    Ok(())
}

fn date((y, m, d): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}
