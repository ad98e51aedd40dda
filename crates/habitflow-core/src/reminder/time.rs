//! Reminder time-of-day and next-fire-time math.
//!
//! The date math is pure (`NaiveDateTime` in, `NaiveDateTime` out) and kept
//! apart from the side-effecting timer registration so it can be tested
//! without a device clock.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// A validated wall-clock time of day for a daily reminder.
///
/// Persisted as `"HH:MM"` (24-hour), the same format the habit records use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderTime {
    pub hour: u32,
    pub minute: u32,
}

impl ReminderTime {
    /// Validate hour/minute. Out-of-range input is rejected, never clamped.
    pub fn new(hour: u32, minute: u32) -> Result<Self, ScheduleError> {
        if hour > 23 || minute > 59 {
            return Err(ScheduleError::InvalidTime { hour, minute });
        }
        Ok(Self { hour, minute })
    }

    fn as_naive(&self) -> NaiveTime {
        // Safe: fields are range-checked at construction.
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or_default()
    }
}

impl fmt::Display for ReminderTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ReminderTime {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (h, m) = s
            .split_once(':')
            .ok_or_else(|| ScheduleError::ParseTime(s.to_string()))?;
        let hour: u32 = h
            .parse()
            .map_err(|_| ScheduleError::ParseTime(s.to_string()))?;
        let minute: u32 = m
            .parse()
            .map_err(|_| ScheduleError::ParseTime(s.to_string()))?;
        Self::new(hour, minute)
    }
}

/// Next instant at which a daily reminder for `time` should fire.
///
/// Today at `hour:minute`, or tomorrow if that instant is at or before
/// `now`. Always derived from the current clock reading -- a stale stored
/// instant is never trusted, so a backwards clock move cannot produce
/// back-to-back firing storms.
pub fn next_fire_time(now: NaiveDateTime, time: ReminderTime) -> NaiveDateTime {
    let today = now.date().and_time(time.as_naive());
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn fires_today_when_time_has_not_passed() {
        let now = at(2024, 1, 1, 8, 0, 0);
        let t = ReminderTime::new(9, 0).unwrap();
        assert_eq!(next_fire_time(now, t), at(2024, 1, 1, 9, 0, 0));
    }

    #[test]
    fn fires_tomorrow_when_time_has_passed() {
        let now = at(2024, 1, 1, 10, 0, 0);
        let t = ReminderTime::new(9, 0).unwrap();
        assert_eq!(next_fire_time(now, t), at(2024, 1, 2, 9, 0, 0));
    }

    #[test]
    fn exact_match_advances_to_tomorrow() {
        // "at or before now" -- firing at now would be in the past by the
        // time the registration lands.
        let now = at(2024, 1, 1, 9, 0, 0);
        let t = ReminderTime::new(9, 0).unwrap();
        assert_eq!(next_fire_time(now, t), at(2024, 1, 2, 9, 0, 0));
    }

    #[test]
    fn crosses_month_boundary() {
        let now = at(2024, 1, 31, 23, 30, 0);
        let t = ReminderTime::new(6, 15).unwrap();
        assert_eq!(next_fire_time(now, t), at(2024, 2, 1, 6, 15, 0));
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(ReminderTime::new(24, 0).is_err());
        assert!(ReminderTime::new(0, 60).is_err());
        assert!(ReminderTime::new(23, 59).is_ok());
    }

    #[test]
    fn parses_and_displays_hh_mm() {
        let t: ReminderTime = "07:05".parse().unwrap();
        assert_eq!(t, ReminderTime::new(7, 5).unwrap());
        assert_eq!(t.to_string(), "07:05");
        assert!("7".parse::<ReminderTime>().is_err());
        assert!("24:00".parse::<ReminderTime>().is_err());
        assert!("ab:cd".parse::<ReminderTime>().is_err());
    }

    proptest! {
        // For any valid time of day, the next fire instant is strictly in
        // the future and less than 24h + 1min away.
        #[test]
        fn next_fire_is_future_and_within_a_day(hour in 0u32..24, minute in 0u32..60, now_min in 0i64..(365 * 24 * 60)) {
            let base = at(2024, 1, 1, 0, 0, 0);
            let now = base + Duration::minutes(now_min);
            let t = ReminderTime::new(hour, minute).unwrap();
            let fire = next_fire_time(now, t);
            prop_assert!(fire > now);
            prop_assert!(fire - now < Duration::hours(24) + Duration::minutes(1));
            prop_assert_eq!(fire.time(), t.as_naive());
        }
    }
}
