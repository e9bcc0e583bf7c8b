//! Habit analytics
//!
//! Pure computations over the store: streaks, missed periods, and
//! cross-habit rankings. Every operation that depends on "today" takes
//! the evaluation date as a parameter so results are reproducible.

pub mod dates;
pub mod missed;
pub mod ranking;
pub mod streaks;

pub use missed::{count_missed_periods, missed_periods};
pub use ranking::{longest_streaks_by_periodicity, longest_streaks_report, most_challenging_habit};
pub use streaks::{current_streak, longest_streak};
