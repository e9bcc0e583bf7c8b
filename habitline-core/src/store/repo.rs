//! Habit store repository layer
//!
//! All registry and completion-history operations go through [`Store`].
//! Writes are idempotent where the operation is naturally so (adding an
//! existing habit, completing an already-completed date); the bool return
//! says whether a row was actually inserted.

use crate::error::{Error, Result};
use crate::types::{Completion, Habit, Periodicity};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

/// Timestamp format used in the habits table
const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Database handle with connection pooling (single connection for now)
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open or create a store at the given path
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory store (used by tests)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run pending schema migrations
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        super::schema::run_migrations(&conn)
    }

    /// Access the underlying connection (for maintenance and tests)
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }

    // ============================================
    // Writes
    // ============================================

    /// Add a habit to the registry. Returns false if the name already exists.
    pub fn add_habit(
        &self,
        name: &str,
        description: Option<&str>,
        periodicity: Periodicity,
        created_at: NaiveDateTime,
    ) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO habits (name, description, periodicity, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                name,
                description,
                periodicity.as_str(),
                created_at.format(CREATED_AT_FORMAT).to_string()
            ],
        )?;
        Ok(inserted > 0)
    }

    /// Record a completion for a habit. Returns false if the habit was
    /// already completed on that date.
    pub fn mark_completed(&self, name: &str, at: NaiveDateTime) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let habit_id: Option<i64> = conn
            .query_row("SELECT id FROM habits WHERE name = ?1", [name], |r| {
                r.get(0)
            })
            .optional()?;

        let Some(habit_id) = habit_id else {
            return Err(Error::HabitNotFound(name.to_string()));
        };

        let inserted = conn.execute(
            "INSERT OR IGNORE INTO completions (habit_id, date, time) VALUES (?1, ?2, ?3)",
            params![
                habit_id,
                at.date().to_string(),
                at.time().format("%H:%M").to_string()
            ],
        )?;
        Ok(inserted > 0)
    }

    /// Delete a habit and its completion history. Returns false if no
    /// habit with that name existed.
    pub fn delete_habit(&self, name: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM habits WHERE name = ?1", [name])?;
        Ok(deleted > 0)
    }

    /// Delete a habit's completion history but keep the habit registered
    pub fn clear_history(&self, name: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "DELETE FROM completions
             WHERE habit_id IN (SELECT id FROM habits WHERE name = ?1)",
            [name],
        )?;
        Ok(())
    }

    /// Remove every habit and completion record
    pub fn clear_all(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            "DELETE FROM completions;
             DELETE FROM habits;",
        )?;
        Ok(())
    }

    // ============================================
    // Queries
    // ============================================

    /// All habit names in registration order
    pub fn list_habit_names(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT name FROM habits ORDER BY id ASC")?;
        let names = stmt
            .query_map([], |r| r.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(names)
    }

    /// Case-insensitive registry membership check
    pub fn habit_exists(&self, name: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let count: i32 = conn.query_row(
            "SELECT COUNT(*) FROM habits WHERE LOWER(name) = LOWER(?1)",
            [name],
            |r| r.get(0),
        )?;
        Ok(count > 0)
    }

    /// Periodicity of a habit, by exact name.
    ///
    /// Returns Ok(None) when the habit is not registered, and an error when
    /// the stored periodicity text is neither "daily" nor "weekly".
    pub fn get_periodicity(&self, name: &str) -> Result<Option<Periodicity>> {
        let conn = self.conn.lock().unwrap();
        let raw: Option<String> = conn
            .query_row(
                "SELECT periodicity FROM habits WHERE name = ?1",
                [name],
                |r| r.get(0),
            )
            .optional()?;

        match raw {
            Some(text) => Ok(Some(text.parse()?)),
            None => Ok(None),
        }
    }

    /// Creation date of a habit.
    ///
    /// Returns Ok(None) when the habit is not registered or the stored
    /// timestamp does not parse.
    pub fn get_creation_date(&self, name: &str) -> Result<Option<NaiveDate>> {
        let conn = self.conn.lock().unwrap();
        let raw: Option<String> = conn
            .query_row(
                "SELECT created_at FROM habits WHERE name = ?1",
                [name],
                |r| r.get(0),
            )
            .optional()?;

        Ok(raw
            .and_then(|text| NaiveDateTime::parse_from_str(&text, CREATED_AT_FORMAT).ok())
            .map(|dt| dt.date()))
    }

    /// Raw completion date strings for a habit, oldest first
    pub fn load_completion_dates(&self, name: &str) -> Result<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT c.date FROM completions c
             JOIN habits h ON h.id = c.habit_id
             WHERE h.name = ?1
             ORDER BY c.date ASC",
        )?;
        let dates = stmt
            .query_map([name], |r| r.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(dates)
    }

    /// Full completion records for a habit, oldest first
    pub fn load_completions(&self, name: &str) -> Result<Vec<Completion>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT c.date, c.time FROM completions c
             JOIN habits h ON h.id = c.habit_id
             WHERE h.name = ?1
             ORDER BY c.date ASC",
        )?;
        let rows = stmt
            .query_map([name], |r| {
                Ok((r.get::<_, String>(0)?, r.get::<_, Option<String>>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut completions = Vec::with_capacity(rows.len());
        for (date, time) in rows {
            let Ok(date) = date.parse::<NaiveDate>() else {
                continue;
            };
            let time = time.and_then(|t| chrono::NaiveTime::parse_from_str(&t, "%H:%M").ok());
            completions.push(Completion { date, time });
        }
        Ok(completions)
    }

    /// Full habit record by exact name
    pub fn get_habit(&self, name: &str) -> Result<Option<Habit>> {
        let conn = self.conn.lock().unwrap();
        let row: Option<(String, Option<String>, String, String)> = conn
            .query_row(
                "SELECT name, description, periodicity, created_at
                 FROM habits WHERE name = ?1",
                [name],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
            )
            .optional()?;

        row.map(Self::habit_from_row).transpose()
    }

    /// All registered habits in registration order
    pub fn list_habits(&self) -> Result<Vec<Habit>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT name, description, periodicity, created_at
             FROM habits ORDER BY id ASC",
        )?;
        let rows = stmt
            .query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter().map(Self::habit_from_row).collect()
    }

    fn habit_from_row(
        (name, description, periodicity, created_at): (String, Option<String>, String, String),
    ) -> Result<Habit> {
        let periodicity: Periodicity = periodicity.parse()?;
        let created_at = NaiveDateTime::parse_from_str(&created_at, CREATED_AT_FORMAT)
            .map_err(|e| Error::Config(format!("bad created_at for '{}': {}", name, e)))?;
        Ok(Habit {
            name,
            description,
            periodicity,
            created_at,
        })
    }
}
