//! Core domain types for habitline
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Habit** | A recurring activity tracked by name, with a periodicity and creation date |
//! | **Periodicity** | The cadence a habit recurs at: daily or weekly |
//! | **Completion** | A record that a habit was done on a calendar date (at most one per date) |
//! | **Streak** | A maximal run of consecutive period units each containing a completion |
//! | **Missed period** | An elapsed period unit (day or ISO week) with zero completions |
//! | **Evaluation date** | The "today" that current-streak and missed-period math is anchored to |
//!
//! Weekly habits are measured in ISO 8601 weeks (Monday through Sunday),
//! identified by an (ISO year, ISO week number) pair.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::Error;

// ============================================
// Periodicity
// ============================================

/// Cadence at which a habit is expected to recur
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Periodicity {
    Daily,
    Weekly,
}

impl Periodicity {
    /// Returns the identifier used in database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Periodicity::Daily => "daily",
            Periodicity::Weekly => "weekly",
        }
    }

    /// Singular noun for one period unit ("day" / "week")
    pub fn period_noun(&self) -> &'static str {
        match self {
            Periodicity::Daily => "day",
            Periodicity::Weekly => "week",
        }
    }
}

impl std::fmt::Display for Periodicity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Periodicity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Periodicity::Daily),
            "weekly" => Ok(Periodicity::Weekly),
            _ => Err(Error::InvalidPeriodicity(s.to_string())),
        }
    }
}

// ============================================
// Habits and completions
// ============================================

/// A tracked habit as stored in the registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    /// Unique name (existence checks are case-insensitive)
    pub name: String,
    /// Free-form description
    pub description: Option<String>,
    /// Daily or weekly cadence
    pub periodicity: Periodicity,
    /// When the habit was created (time of day is stored but irrelevant to analytics)
    pub created_at: NaiveDateTime,
}

/// A single completion record for a habit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    /// Calendar date of the completion (unique per habit)
    pub date: NaiveDate,
    /// Time of day, if recorded
    pub time: Option<NaiveTime>,
}

// ============================================
// Streaks
// ============================================

/// The longest run of consecutive completed periods for a habit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongestStreak {
    /// Number of consecutive period units
    pub length: u32,
    /// First completion date in the run
    pub start: NaiveDate,
    /// Last completion date in the run
    pub end: NaiveDate,
}

/// Best streak for one habit, used in cross-habit rankings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakRecord {
    /// Habit name
    pub habit: String,
    /// Streak length in period units
    pub length: u32,
    /// First completion date in the run
    pub start: NaiveDate,
    /// Last completion date in the run
    pub end: NaiveDate,
}

/// Longest streaks split by periodicity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodicityBests {
    /// Best streak among daily habits, if any has a nonzero streak
    pub daily: Option<StreakRecord>,
    /// Best streak among weekly habits, if any has a nonzero streak
    pub weekly: Option<StreakRecord>,
}

// ============================================
// Missed periods
// ============================================

/// An elapsed period unit with zero completions.
///
/// Daily habits miss single dates; weekly habits miss whole Monday-Sunday
/// spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MissedPeriod {
    /// A missed calendar day
    Day(NaiveDate),
    /// A missed ISO week, reported by its Monday and Sunday
    Week { start: NaiveDate, end: NaiveDate },
}

impl std::fmt::Display for MissedPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissedPeriod::Day(date) => write!(f, "{}", date),
            MissedPeriod::Week { start, end } => write!(f, "{} to {}", start, end),
        }
    }
}

// ============================================
// Challenge ranking
// ============================================

/// Completion statistics for one habit since its creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitDifficulty {
    /// Habit name
    pub name: String,
    /// Daily or weekly cadence
    pub periodicity: Periodicity,
    /// Periods since creation containing at least one completion
    pub completed: u32,
    /// Total periods elapsed since creation (inclusive)
    pub total: u32,
    /// completed / total (0 when total is 0)
    pub ratio: f64,
}

impl HabitDifficulty {
    /// Completion ratio as a percentage with one decimal place (e.g. "28.6")
    pub fn ratio_percent(&self) -> String {
        format!("{:.1}", self.ratio * 100.0)
    }
}

/// Outcome of the most-challenging-habit ranking.
///
/// The aggregate never fails outright; empty or fully-perfect registries
/// degrade to sentinel variants with fixed report strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChallengeOutcome {
    /// The habit registry is empty
    NoHabits,
    /// No habit passed validity filtering
    NoValidHabits,
    /// Every valid habit has a 100% completion ratio
    AllCompleted,
    /// The habit with the lowest completion ratio
    MostChallenging(HabitDifficulty),
}

impl ChallengeOutcome {
    /// Human-readable report; the wording is part of the observable contract.
    pub fn report(&self) -> String {
        match self {
            ChallengeOutcome::NoHabits => "No Habits Found.".to_string(),
            ChallengeOutcome::NoValidHabits => "No valid habits to analyze.".to_string(),
            ChallengeOutcome::AllCompleted => {
                "You didn't struggle with any habit, all habits have 100% completion ratio."
                    .to_string()
            }
            ChallengeOutcome::MostChallenging(worst) => format!(
                "Most challenging habit: '{}'\n\
                 - Periodicity: {}\n\
                 - Completed: {} out of {} {}s since habit creation\n\
                 - Completion ratio: {}%",
                worst.name,
                worst.periodicity,
                worst.completed,
                worst.total,
                worst.periodicity.period_noun(),
                worst.ratio_percent(),
            ),
        }
    }
}
