//! Habit management commands.

use chrono::{Local, NaiveDate, Utc};
use clap::Subcommand;

use habitflow_core::{Database, Habit, ReminderTime};

use super::reminder::open_host;

#[derive(Subcommand)]
pub enum HabitAction {
    /// Add a habit for today (or a given date)
    Add {
        /// Habit name
        name: String,
        /// Cadence label, e.g. "Everyday"
        #[arg(long, default_value = "Everyday")]
        schedule: String,
        /// Date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Daily reminder time, HH:MM
        #[arg(long)]
        remind: Option<String>,
    },
    /// List habits
    List {
        /// Date to list (YYYY-MM-DD); omit for all
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a habit completed
    Done {
        /// Habit ID
        id: i64,
    },
    /// Mark a habit not completed
    Undo {
        /// Habit ID
        id: i64,
    },
    /// Delete a habit (cancels its reminder)
    Delete {
        /// Habit ID
        id: i64,
    },
    /// Set the daily reminder for a habit
    Remind {
        /// Habit ID
        id: i64,
        /// Time of day, HH:MM
        time: String,
    },
    /// Disable the reminder for a habit
    Unremind {
        /// Habit ID
        id: i64,
    },
}

pub fn run(action: HabitAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        HabitAction::Add {
            name,
            schedule,
            date,
            remind,
        } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let reminder: Option<ReminderTime> = remind.as_deref().map(str::parse).transpose()?;
            // Epoch-millis ids, like the records the app has always written.
            let id = Utc::now().timestamp_millis();
            let mut habit = Habit::new(id, &name, &schedule, date)?;
            habit.reminder_time = reminder;
            habit.reminder_enabled = reminder.is_some();

            let host = open_host()?;
            {
                let db = host.db.lock().unwrap_or_else(|e| e.into_inner());
                db.create_habit(&habit)?;
            }
            if let Some(time) = reminder {
                host.scheduler.schedule(id, time.hour, time.minute)?;
            }
            println!("{}", serde_json::to_string_pretty(&habit)?);
        }
        HabitAction::List { date, json } => {
            let db = Database::open()?;
            let habits = db.list_habits(date)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&habits)?);
            } else if habits.is_empty() {
                println!("no habits");
            } else {
                for h in habits {
                    let mark = if h.completed { "x" } else { " " };
                    let reminder = match (h.reminder_enabled, h.reminder_time) {
                        (true, Some(t)) => format!("  ⏰ {t}"),
                        _ => String::new(),
                    };
                    println!("[{mark}] {}  {} ({}){reminder}", h.id, h.name, h.date);
                }
            }
        }
        HabitAction::Done { id } => {
            let db = Database::open()?;
            db.set_habit_completed(id, true)?;
            println!("habit {id} completed");
        }
        HabitAction::Undo { id } => {
            let db = Database::open()?;
            db.set_habit_completed(id, false)?;
            println!("habit {id} reset");
        }
        HabitAction::Delete { id } => {
            let host = open_host()?;
            host.scheduler.cancel(id);
            {
                let db = host.db.lock().unwrap_or_else(|e| e.into_inner());
                db.delete_habit(id)?;
            }
            println!("habit {id} deleted");
        }
        HabitAction::Remind { id, time } => {
            return super::reminder::run(super::reminder::ReminderAction::Set {
                habit_id: id,
                time,
            });
        }
        HabitAction::Unremind { id } => {
            return super::reminder::run(super::reminder::ReminderAction::Cancel { habit_id: id });
        }
    }
    Ok(())
}
