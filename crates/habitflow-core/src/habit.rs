//! Habit and category models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::reminder::ReminderTime;

/// A habit instance on a given calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    /// Stable identifier; doubles as the reminder's scheduling key.
    pub id: i64,
    pub name: String,
    /// Free-form cadence label, e.g. "Everyday" or "Weekdays".
    pub schedule: String,
    /// The calendar day this instance belongs to.
    pub date: NaiveDate,
    #[serde(default)]
    pub completed: bool,
    /// Daily reminder time of day, if one is set.
    #[serde(default)]
    pub reminder_time: Option<ReminderTime>,
    #[serde(default)]
    pub reminder_enabled: bool,
}

impl Habit {
    pub fn new(id: i64, name: &str, schedule: &str, date: NaiveDate) -> Result<Self, ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::Empty("habit name"));
        }
        Ok(Self {
            id,
            name: name.trim().to_string(),
            schedule: schedule.to_string(),
            date,
            completed: false,
            reminder_time: None,
            reminder_enabled: false,
        })
    }

    /// Whether this habit should currently have a pending reminder.
    pub fn wants_reminder(&self) -> bool {
        self.reminder_enabled && self.reminder_time.is_some()
    }
}

/// A habit category. Built-in categories ship with the app; custom ones are
/// user-created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub entry_count: u32,
    #[serde(default)]
    pub is_custom: bool,
    #[serde(default)]
    pub is_premium: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn custom(id: &str, name: &str) -> Result<Self, ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::Empty("category name"));
        }
        let now = Utc::now();
        Ok(Self {
            id: id.to_string(),
            name: name.trim().to_string(),
            entry_count: 0,
            is_custom: true,
            is_premium: false,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn has_entries(&self) -> bool {
        self.entry_count > 0
    }

    /// Premium built-ins are locked; custom categories are always editable.
    pub fn can_edit(&self) -> bool {
        self.is_custom || !self.is_premium
    }

    /// The built-in category set.
    pub fn defaults() -> Vec<Category> {
        let builtin = |id: &str, name: &str, premium: bool| {
            let now = Utc::now();
            Category {
                id: id.to_string(),
                name: name.to_string(),
                entry_count: 0,
                is_custom: false,
                is_premium: premium,
                created_at: now,
                updated_at: now,
            }
        };
        vec![
            builtin("default_quit", "Quit a bad habit", true),
            builtin("default_art", "Art", false),
            builtin("default_task", "Task", false),
            builtin("default_meditation", "Meditation", false),
            builtin("default_study", "Study", false),
        ]
    }
}
