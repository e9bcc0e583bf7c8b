//! # habitline-core
//!
//! Core library for habitline, a personal habit tracker with streak and
//! difficulty analytics.
//!
//! ## Architecture
//!
//! - [`store`] - SQLite-backed habit registry and completion history
//! - [`analytics`] - streaks, missed periods, and cross-habit rankings
//! - [`config`] - XDG-based configuration loading
//! - [`logging`] - tracing setup with rotating file output
//!
//! Analytics functions take the evaluation date ("today") explicitly so
//! callers control the clock and results stay reproducible.

pub mod analytics;
pub mod config;
pub mod error;
pub mod logging;
pub mod store;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use store::Store;
pub use types::{
    ChallengeOutcome, Completion, Habit, HabitDifficulty, LongestStreak, MissedPeriod,
    Periodicity, PeriodicityBests, StreakRecord,
};
