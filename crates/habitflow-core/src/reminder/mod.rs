//! Daily habit reminders.
//!
//! Split into the pure time math ([`time`]), the platform trait seams
//! ([`platform`]), and the scheduling state machine ([`scheduler`]).

pub mod platform;
pub mod scheduler;
pub mod time;

pub use platform::{Clock, Notifier, RegistrationHandle, SystemClock, TimerError, TimerService};
pub use scheduler::{habit_name_key, ReminderScheduler, ReminderState, ScheduledReminder};
pub use time::{next_fire_time, ReminderTime};
