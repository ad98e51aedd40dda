//! SQLite-backed persistence.
//!
//! One database file holds:
//! - habit records and categories
//! - mood journal entries and water logs
//! - user accounts
//! - a key-value table for flags, session state, and persisted reminder
//!   registrations
//!
//! Stored at `~/.config/habitflow/habitflow.db`.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::StorageError;
use crate::habit::{Category, Habit};
use crate::mood::MoodEntry;
use crate::reminder::{habit_name_key, ReminderTime};
use crate::users::User;
use crate::water::WaterLog;

use super::data_dir;

const DATE_FMT: &str = "%Y-%m-%d";

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database, creating the file and schema if needed.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        let path = data_dir()
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?
            .join("habitflow.db");
        let conn = Connection::open(&path).map_err(|source| StorageError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS habits (
                    id               INTEGER PRIMARY KEY,
                    name             TEXT NOT NULL,
                    schedule         TEXT NOT NULL DEFAULT '',
                    date             TEXT NOT NULL,
                    completed        INTEGER NOT NULL DEFAULT 0,
                    reminder_time    TEXT,
                    reminder_enabled INTEGER NOT NULL DEFAULT 0
                );

                CREATE TABLE IF NOT EXISTS categories (
                    id         TEXT PRIMARY KEY,
                    name       TEXT NOT NULL,
                    entry_count INTEGER NOT NULL DEFAULT 0,
                    is_custom  INTEGER NOT NULL DEFAULT 1,
                    is_premium INTEGER NOT NULL DEFAULT 0,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS mood_entries (
                    id    INTEGER PRIMARY KEY AUTOINCREMENT,
                    mood  TEXT NOT NULL,
                    emoji TEXT NOT NULL DEFAULT '',
                    note  TEXT NOT NULL DEFAULT '',
                    at    TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS water_logs (
                    id        INTEGER PRIMARY KEY AUTOINCREMENT,
                    amount_ml INTEGER NOT NULL,
                    at        TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS users (
                    id            TEXT PRIMARY KEY,
                    email         TEXT NOT NULL,
                    username      TEXT NOT NULL DEFAULT '',
                    password_hash TEXT NOT NULL,
                    created_at    TEXT NOT NULL,
                    preferences   TEXT NOT NULL DEFAULT '{}'
                );

                CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );

                CREATE UNIQUE INDEX IF NOT EXISTS idx_users_email ON users(lower(email));
                CREATE INDEX IF NOT EXISTS idx_habits_date ON habits(date);
                CREATE INDEX IF NOT EXISTS idx_mood_entries_at ON mood_entries(at);
                CREATE INDEX IF NOT EXISTS idx_water_logs_at ON water_logs(at);",
            )
            .map_err(|e| StorageError::MigrationFailed(e.to_string()))
    }

    // ── Habits ───────────────────────────────────────────────────────

    /// Insert a habit. Also mirrors the name into the kv table so the
    /// reminder scheduler can build notification bodies without a join.
    pub fn create_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO habits (id, name, schedule, date, completed, reminder_time, reminder_enabled)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                habit.id,
                habit.name,
                habit.schedule,
                habit.date.format(DATE_FMT).to_string(),
                habit.completed,
                habit.reminder_time.map(|t| t.to_string()),
                habit.reminder_enabled,
            ],
        )?;
        self.kv_set(&habit_name_key(habit.id), &habit.name)?;
        Ok(())
    }

    pub fn get_habit(&self, id: i64) -> Result<Option<Habit>, StorageError> {
        let habit = self
            .conn
            .prepare(
                "SELECT id, name, schedule, date, completed, reminder_time, reminder_enabled
                 FROM habits WHERE id = ?1",
            )?
            .query_row(params![id], row_to_habit)
            .optional()?;
        Ok(habit)
    }

    /// Habits for one day, or all habits when `date` is `None`.
    pub fn list_habits(&self, date: Option<NaiveDate>) -> Result<Vec<Habit>, StorageError> {
        let mut out = Vec::new();
        match date {
            Some(d) => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, name, schedule, date, completed, reminder_time, reminder_enabled
                     FROM habits WHERE date = ?1 ORDER BY id",
                )?;
                let rows = stmt.query_map(params![d.format(DATE_FMT).to_string()], row_to_habit)?;
                for row in rows {
                    out.push(row?);
                }
            }
            None => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, name, schedule, date, completed, reminder_time, reminder_enabled
                     FROM habits ORDER BY date, id",
                )?;
                let rows = stmt.query_map([], row_to_habit)?;
                for row in rows {
                    out.push(row?);
                }
            }
        }
        Ok(out)
    }

    pub fn set_habit_completed(&self, id: i64, completed: bool) -> Result<(), StorageError> {
        let changed = self.conn.execute(
            "UPDATE habits SET completed = ?2 WHERE id = ?1",
            params![id, completed],
        )?;
        if changed == 0 {
            return Err(StorageError::NotFound {
                entity: "habit",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Update the reminder fields for a habit.
    pub fn set_habit_reminder(
        &self,
        id: i64,
        time: Option<ReminderTime>,
        enabled: bool,
    ) -> Result<(), StorageError> {
        let changed = self.conn.execute(
            "UPDATE habits SET reminder_time = ?2, reminder_enabled = ?3 WHERE id = ?1",
            params![id, time.map(|t| t.to_string()), enabled],
        )?;
        if changed == 0 {
            return Err(StorageError::NotFound {
                entity: "habit",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    pub fn delete_habit(&self, id: i64) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM habits WHERE id = ?1", params![id])?;
        self.kv_remove(&habit_name_key(id))?;
        Ok(())
    }

    // ── Categories ───────────────────────────────────────────────────

    /// Insert the built-in categories if they are not present yet.
    pub fn seed_default_categories(&self) -> Result<(), StorageError> {
        for cat in Category::defaults() {
            self.conn.execute(
                "INSERT OR IGNORE INTO categories
                     (id, name, entry_count, is_custom, is_premium, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    cat.id,
                    cat.name,
                    cat.entry_count,
                    cat.is_custom,
                    cat.is_premium,
                    cat.created_at.to_rfc3339(),
                    cat.updated_at.to_rfc3339(),
                ],
            )?;
        }
        Ok(())
    }

    pub fn create_category(&self, cat: &Category) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO categories
                 (id, name, entry_count, is_custom, is_premium, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                cat.id,
                cat.name,
                cat.entry_count,
                cat.is_custom,
                cat.is_premium,
                cat.created_at.to_rfc3339(),
                cat.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn list_categories(&self) -> Result<Vec<Category>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, entry_count, is_custom, is_premium, created_at, updated_at
             FROM categories ORDER BY is_custom, name",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Category {
                id: row.get(0)?,
                name: row.get(1)?,
                entry_count: row.get(2)?,
                is_custom: row.get(3)?,
                is_premium: row.get(4)?,
                created_at: parse_ts(row.get::<_, String>(5)?),
                updated_at: parse_ts(row.get::<_, String>(6)?),
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn get_category(&self, id: &str) -> Result<Option<Category>, StorageError> {
        let cat = self
            .conn
            .prepare(
                "SELECT id, name, entry_count, is_custom, is_premium, created_at, updated_at
                 FROM categories WHERE id = ?1",
            )?
            .query_row(params![id], |row| {
                Ok(Category {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    entry_count: row.get(2)?,
                    is_custom: row.get(3)?,
                    is_premium: row.get(4)?,
                    created_at: parse_ts(row.get::<_, String>(5)?),
                    updated_at: parse_ts(row.get::<_, String>(6)?),
                })
            })
            .optional()?;
        Ok(cat)
    }

    pub fn delete_category(&self, id: &str) -> Result<(), StorageError> {
        let changed = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(StorageError::NotFound {
                entity: "category",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    // ── Mood journal ─────────────────────────────────────────────────

    pub fn log_mood(
        &self,
        mood: &str,
        emoji: &str,
        note: &str,
        at: DateTime<Utc>,
    ) -> Result<i64, StorageError> {
        self.conn.execute(
            "INSERT INTO mood_entries (mood, emoji, note, at) VALUES (?1, ?2, ?3, ?4)",
            params![mood, emoji, note, at.to_rfc3339()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Most recent entries first.
    pub fn list_moods(&self, limit: Option<u32>) -> Result<Vec<MoodEntry>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, mood, emoji, note, at FROM mood_entries
             ORDER BY at DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit.map(i64::from).unwrap_or(-1)], |row| {
            Ok(MoodEntry {
                id: row.get(0)?,
                mood: row.get(1)?,
                emoji: row.get(2)?,
                note: row.get(3)?,
                at: parse_ts(row.get::<_, String>(4)?),
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn delete_mood(&self, id: i64) -> Result<(), StorageError> {
        let changed = self
            .conn
            .execute("DELETE FROM mood_entries WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(StorageError::NotFound {
                entity: "mood entry",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    // ── Water ────────────────────────────────────────────────────────

    pub fn log_water(&self, amount_ml: u32, at: DateTime<Utc>) -> Result<i64, StorageError> {
        self.conn.execute(
            "INSERT INTO water_logs (amount_ml, at) VALUES (?1, ?2)",
            params![amount_ml, at.to_rfc3339()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Total millilitres logged on a calendar day (UTC).
    pub fn water_total_for_day(&self, date: NaiveDate) -> Result<u32, StorageError> {
        let day = date.format(DATE_FMT).to_string();
        let total: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(amount_ml), 0) FROM water_logs
             WHERE at >= ?1 AND at < ?2",
            params![
                format!("{day}T00:00:00+00:00"),
                format!(
                    "{}T00:00:00+00:00",
                    (date + chrono::Duration::days(1)).format(DATE_FMT)
                )
            ],
            |row| row.get(0),
        )?;
        Ok(total.max(0) as u32)
    }

    pub fn list_water(&self, limit: Option<u32>) -> Result<Vec<WaterLog>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, amount_ml, at FROM water_logs ORDER BY at DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit.map(i64::from).unwrap_or(-1)], |row| {
            Ok(WaterLog {
                id: row.get(0)?,
                amount_ml: row.get(1)?,
                at: parse_ts(row.get::<_, String>(2)?),
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    // ── Users ────────────────────────────────────────────────────────

    pub fn create_user(&self, user: &User) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO users (id, email, username, password_hash, created_at, preferences)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user.id.to_string(),
                user.email,
                user.username,
                user.password_hash,
                user.created_at.to_rfc3339(),
                serde_json::to_string(&user.preferences)
                    .map_err(|e| StorageError::QueryFailed(e.to_string()))?,
            ],
        )?;
        Ok(())
    }

    /// Case-insensitive email lookup.
    pub fn user_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        let user = self
            .conn
            .prepare(
                "SELECT id, email, username, password_hash, created_at, preferences
                 FROM users WHERE lower(email) = lower(?1)",
            )?
            .query_row(params![email], row_to_user)
            .optional()?;
        Ok(user)
    }

    pub fn update_user(&self, user: &User) -> Result<(), StorageError> {
        let changed = self.conn.execute(
            "UPDATE users SET email = ?2, username = ?3, password_hash = ?4, preferences = ?5
             WHERE id = ?1",
            params![
                user.id.to_string(),
                user.email,
                user.username,
                user.password_hash,
                serde_json::to_string(&user.preferences)
                    .map_err(|e| StorageError::QueryFailed(e.to_string()))?,
            ],
        )?;
        if changed == 0 {
            return Err(StorageError::NotFound {
                entity: "user",
                id: user.id.to_string(),
            });
        }
        Ok(())
    }

    pub fn delete_user(&self, id: &str) -> Result<(), StorageError> {
        let changed = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(StorageError::NotFound {
                entity: "user",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    // ── Key-value ────────────────────────────────────────────────────

    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let result = self
            .conn
            .prepare("SELECT value FROM kv WHERE key = ?1")?
            .query_row(params![key], |row| row.get::<_, String>(0))
            .optional()?;
        Ok(result)
    }

    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn kv_remove(&self, key: &str) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

fn row_to_habit(row: &rusqlite::Row<'_>) -> rusqlite::Result<Habit> {
    let date_str: String = row.get(3)?;
    let time_str: Option<String> = row.get(5)?;
    Ok(Habit {
        id: row.get(0)?,
        name: row.get(1)?,
        schedule: row.get(2)?,
        date: NaiveDate::parse_from_str(&date_str, DATE_FMT).unwrap_or_default(),
        completed: row.get(4)?,
        reminder_time: time_str.and_then(|s| s.parse().ok()),
        reminder_enabled: row.get(6)?,
    })
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let prefs: String = row.get(5)?;
    Ok(User {
        id: row.get::<_, String>(0)?.parse().unwrap_or_default(),
        email: row.get(1)?,
        username: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: parse_ts(row.get::<_, String>(4)?),
        preferences: serde_json::from_str(&prefs).unwrap_or_default(),
    })
}

fn parse_ts(s: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}
