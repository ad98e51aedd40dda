//! Water intake tracking.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Default daily intake goal in millilitres.
pub const DEFAULT_DAILY_GOAL_ML: u32 = 2000;

/// Scheduling tag for the daily drink reminder. Habit ids are positive
/// epoch-millis values, so the water reminder uses a reserved negative tag.
pub const REMINDER_TAG: i64 = -1;

/// KV key holding the drink reminder's "HH:MM" time of day.
pub const REMINDER_TIME_KEY: &str = "water.reminder_time";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterLog {
    pub id: i64,
    pub amount_ml: u32,
    pub at: DateTime<Utc>,
}

/// Progress of today's intake against the daily goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterProgress {
    pub total_ml: u32,
    pub goal_ml: u32,
    pub remaining_ml: u32,
    pub progress_pct: f64,
    pub goal_reached: bool,
}

impl WaterProgress {
    pub fn new(total_ml: u32, goal_ml: u32) -> Result<Self, ValidationError> {
        if goal_ml == 0 {
            return Err(ValidationError::InvalidValue {
                field: "goal_ml".into(),
                message: "daily goal must be positive".into(),
            });
        }
        Ok(Self {
            total_ml,
            goal_ml,
            remaining_ml: goal_ml.saturating_sub(total_ml),
            progress_pct: (total_ml as f64 / goal_ml as f64 * 100.0).min(100.0),
            goal_reached: total_ml >= goal_ml,
        })
    }
}

/// The next midnight after `now` -- when the daily total resets.
pub fn next_reset(now: NaiveDateTime) -> NaiveDateTime {
    (now.date() + Duration::days(1)).and_hms_opt(0, 0, 0).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn progress_caps_at_100_pct() {
        let p = WaterProgress::new(2500, 2000).unwrap();
        assert!(p.goal_reached);
        assert_eq!(p.remaining_ml, 0);
        assert_eq!(p.progress_pct, 100.0);
    }

    #[test]
    fn partial_progress() {
        let p = WaterProgress::new(500, 2000).unwrap();
        assert!(!p.goal_reached);
        assert_eq!(p.remaining_ml, 1500);
        assert_eq!(p.progress_pct, 25.0);
    }

    #[test]
    fn zero_goal_is_rejected() {
        assert!(WaterProgress::new(0, 0).is_err());
    }

    #[test]
    fn reset_is_next_midnight() {
        let now = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap();
        let reset = next_reset(now);
        assert_eq!(
            reset,
            NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }
}
