//! # Habitflow Core Library
//!
//! Core business logic for the Habitflow habit tracker. All operations are
//! available through a standalone CLI binary; any GUI would be a thin layer
//! over this same library.
//!
//! ## Architecture
//!
//! - **Reminder scheduling**: a per-habit wall-clock state machine over a
//!   one-shot timer primitive; platform services (timer, notifier, clock)
//!   are constructor-injected trait objects
//! - **Storage**: SQLite for habit/mood/water/user records plus a
//!   key-value table, TOML for configuration
//! - **Domain**: habits, categories, mood journal, water intake, health
//!   calculations, user accounts
//!
//! ## Key Components
//!
//! - [`ReminderScheduler`]: schedule/fire/cancel daily reminders
//! - [`Database`]: record persistence and the kv store
//! - [`Config`]: application configuration

pub mod error;
pub mod habit;
pub mod health;
pub mod mood;
pub mod reminder;
pub mod storage;
pub mod users;
pub mod water;

pub use error::{AuthError, ConfigError, CoreError, ScheduleError, StorageError, ValidationError};
pub use habit::{Category, Habit};
pub use mood::{MoodEntry, MoodOption, MOOD_OPTIONS};
pub use reminder::{
    Clock, Notifier, ReminderScheduler, ReminderState, ReminderTime, ScheduledReminder,
    SystemClock, TimerError, TimerService,
};
pub use storage::{Config, Database, KvStore};
pub use users::{Accounts, User};
pub use water::{WaterLog, WaterProgress};
