//! SQLite-backed habit store
//!
//! The store holds the habit registry and per-habit completion history.
//! Schema changes go through embedded migrations in [`schema`].

pub mod repo;
pub mod sample;
pub mod schema;

pub use repo::Store;
