//! habitline - personal habit tracker
//!
//! Track daily and weekly habits, then analyze streaks, missed periods,
//! and which habit you struggle with most.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};
use habitline_core::analytics::{
    current_streak, longest_streak, longest_streaks_report, missed_periods,
    most_challenging_habit,
};
use habitline_core::store::sample::seed_sample_data;
use habitline_core::{Config, MissedPeriod, Periodicity, Store};

#[derive(Parser, Debug)]
#[command(name = "habitline")]
#[command(about = "Habit tracker with streak and difficulty analytics")]
#[command(version)]
struct Cli {
    /// Override the directory holding the habit database
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a new habit
    Add {
        /// Habit name
        name: String,

        /// How often the habit recurs
        #[arg(long, default_value = "daily")]
        periodicity: String,

        /// Free-form description
        #[arg(long)]
        description: Option<String>,
    },

    /// Record a completion for a habit
    Done {
        /// Habit name
        name: String,

        /// Completion date (YYYY-MM-DD, default: today)
        #[arg(long)]
        on: Option<NaiveDate>,

        /// Completion time (HH:MM, default: now)
        #[arg(long)]
        at: Option<String>,
    },

    /// List registered habits
    List,

    /// Delete a habit and its history
    Delete {
        /// Habit name
        name: String,
    },

    /// Delete a habit's completion history but keep the habit
    ClearHistory {
        /// Habit name
        name: String,
    },

    /// Replace the store with predefined sample data
    Seed,

    /// Show the completion history of a habit
    History {
        /// Habit name
        name: String,
    },

    /// Show current and longest streak for a habit
    Streak {
        /// Habit name
        name: String,
    },

    /// List missed periods for a habit
    Missed {
        /// Habit name
        name: String,
    },

    /// Full analytics report across all habits
    Report {
        /// Export format (json)
        #[arg(long)]
        export: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = habitline_core::logging::init(&config.logging).ok();

    let db_path = match &cli.data_dir {
        Some(dir) => dir.join("habits.db"),
        None => config.database_path(),
    };
    tracing::info!(path = %db_path.display(), "Opening habit store");

    let store = Store::open(&db_path).context("failed to open habit store")?;
    store.migrate().context("failed to run store migrations")?;

    let today = Local::now().date_naive();

    match cli.command {
        Command::Add {
            name,
            periodicity,
            description,
        } => {
            let periodicity: Periodicity = periodicity
                .parse()
                .context("invalid periodicity")?;
            let added = store
                .add_habit(
                    &name,
                    description.as_deref(),
                    periodicity,
                    Local::now().naive_local(),
                )
                .context("failed to add habit")?;
            if added {
                println!("Added {} habit '{}'.", periodicity, name);
            } else {
                println!("Habit '{}' already exists.", name);
            }
        }

        Command::Done { name, on, at } => {
            let at = parse_completion_time(on, at.as_deref())?;
            let recorded = store
                .mark_completed(&name, at)
                .context("failed to record completion")?;
            if recorded {
                println!("Completed '{}' on {}.", name, at.date());
            } else {
                println!("'{}' was already completed on {}.", name, at.date());
            }
        }

        Command::List => {
            let habits = store.list_habits().context("failed to list habits")?;
            if habits.is_empty() {
                println!("No Habits Found.");
            } else {
                for habit in habits {
                    let description = habit.description.as_deref().unwrap_or("-");
                    println!(
                        "{:<20} {:<8} since {}  {}",
                        habit.name,
                        habit.periodicity,
                        habit.created_at.date(),
                        description
                    );
                }
            }
        }

        Command::Delete { name } => {
            if store.delete_habit(&name).context("failed to delete habit")? {
                println!("Deleted '{}'.", name);
            } else {
                println!("No habit named '{}'.", name);
            }
        }

        Command::ClearHistory { name } => {
            store
                .clear_history(&name)
                .context("failed to clear history")?;
            println!("Cleared completion history for '{}'.", name);
        }

        Command::Seed => {
            seed_sample_data(&store).context("failed to seed sample data")?;
            println!("Seeded sample habits.");
        }

        Command::History { name } => {
            let completions = store
                .load_completions(&name)
                .context("failed to load completions")?;
            if completions.is_empty() {
                println!("No completions recorded for '{}'.", name);
            } else {
                for completion in &completions {
                    match completion.time {
                        Some(time) => println!("{} {}", completion.date, time.format("%H:%M")),
                        None => println!("{}", completion.date),
                    }
                }
                println!("{} completion(s).", completions.len());
            }
        }

        Command::Streak { name } => {
            let current = current_streak(&store, &name, today)
                .context("failed to compute current streak")?;
            println!("Current streak: {}", current);

            match longest_streak(&store, &name).context("failed to compute longest streak")? {
                Some(longest) => println!(
                    "Longest streak: {} ({} to {})",
                    longest.length, longest.start, longest.end
                ),
                None => println!("Longest streak: none"),
            }
        }

        Command::Missed { name } => {
            let missed = missed_periods(&store, &name, today)
                .context("failed to compute missed periods")?;
            if missed.is_empty() {
                println!("No missed periods for '{}'.", name);
            } else {
                println!("Missed {} period(s):", missed.len());
                for period in missed {
                    println!("  {}", period);
                }
            }
        }

        Command::Report { export } => match export.as_deref() {
            Some("json") => print_json_report(&store, today)?,
            Some(other) => anyhow::bail!("Unknown export format: {}. Use 'json'", other),
            None => {
                let challenge = most_challenging_habit(&store, today)
                    .context("failed to rank habits")?;
                println!("{}", challenge.report());
                println!();
                println!(
                    "{}",
                    longest_streaks_report(&store).context("failed to build streak report")?
                );
            }
        },
    }

    Ok(())
}

/// Combine optional date and time arguments into a completion timestamp
fn parse_completion_time(on: Option<NaiveDate>, at: Option<&str>) -> Result<NaiveDateTime> {
    let date = on.unwrap_or_else(|| Local::now().date_naive());
    let time = match at {
        Some(text) => NaiveTime::parse_from_str(text, "%H:%M")
            .context("invalid time, expected HH:MM")?,
        None => Local::now().time(),
    };
    Ok(date.and_time(time))
}

fn print_json_report(store: &Store, today: NaiveDate) -> Result<()> {
    let challenge = most_challenging_habit(store, today).context("failed to rank habits")?;
    let bests = habitline_core::analytics::longest_streaks_by_periodicity(store)
        .context("failed to rank streaks")?;

    let mut habits = Vec::new();
    for habit in store.list_habits().context("failed to list habits")? {
        let missed = missed_periods(store, &habit.name, today)
            .context("failed to compute missed periods")?;
        habits.push(serde_json::json!({
            "name": habit.name,
            "periodicity": habit.periodicity,
            "created_at": habit.created_at.format("%Y-%m-%d %H:%M").to_string(),
            "current_streak": current_streak(store, &habit.name, today)?,
            "longest_streak": longest_streak(store, &habit.name)?,
            "missed_count": missed.len(),
            "missed": missed.iter().map(missed_json).collect::<Vec<_>>(),
        }));
    }

    let json = serde_json::json!({
        "evaluated_at": today,
        "habits": habits,
        "most_challenging": challenge,
        "longest_streaks": bests,
    });

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn missed_json(period: &MissedPeriod) -> serde_json::Value {
    match period {
        MissedPeriod::Day(date) => serde_json::json!({"kind": "day", "date": date}),
        MissedPeriod::Week { start, end } => {
            serde_json::json!({"kind": "week", "start": start, "end": end})
        }
    }
}
