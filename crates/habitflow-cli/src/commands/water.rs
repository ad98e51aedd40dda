//! Water intake commands.

use chrono::{Local, Utc};
use clap::Subcommand;

use habitflow_core::reminder::habit_name_key;
use habitflow_core::water::{self, next_reset, WaterProgress};
use habitflow_core::{Config, Database, ReminderTime};

use super::reminder::open_host;

#[derive(Subcommand)]
pub enum WaterAction {
    /// Record a drink
    Log {
        /// Amount in millilitres (defaults to the configured cup size)
        amount_ml: Option<u32>,
    },
    /// Today's intake against the daily goal
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show or change the daily goal
    Goal {
        /// New goal in millilitres
        goal_ml: Option<u32>,
    },
    /// Recent log entries
    History {
        /// Maximum entries to show
        #[arg(long, default_value = "20")]
        limit: u32,
    },
    /// Set a daily drink reminder
    Remind {
        /// Time of day, HH:MM
        time: String,
    },
    /// Cancel the drink reminder
    Unremind,
}

pub fn run(action: WaterAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load_or_default();
    match action {
        WaterAction::Log { amount_ml } => {
            let db = Database::open()?;
            let amount = amount_ml.unwrap_or(config.water.cup_ml);
            if amount == 0 {
                return Err("amount must be positive".into());
            }
            db.log_water(amount, Utc::now())?;
            let total = db.water_total_for_day(Local::now().date_naive())?;
            let progress = WaterProgress::new(total, config.water.daily_goal_ml)?;
            println!(
                "logged {amount} ml: {} / {} ml ({:.0}%)",
                progress.total_ml, progress.goal_ml, progress.progress_pct
            );
        }
        WaterAction::Status { json } => {
            let db = Database::open()?;
            let total = db.water_total_for_day(Local::now().date_naive())?;
            let progress = WaterProgress::new(total, config.water.daily_goal_ml)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&progress)?);
            } else {
                println!(
                    "{} / {} ml ({:.0}%), resets {}",
                    progress.total_ml,
                    progress.goal_ml,
                    progress.progress_pct,
                    next_reset(Local::now().naive_local()).format("%Y-%m-%d %H:%M")
                );
            }
        }
        WaterAction::Goal { goal_ml } => match goal_ml {
            Some(goal) => {
                if goal == 0 {
                    return Err("goal must be positive".into());
                }
                config.water.daily_goal_ml = goal;
                config.save()?;
                println!("daily goal set to {goal} ml");
            }
            None => println!("daily goal: {} ml", config.water.daily_goal_ml),
        },
        WaterAction::Remind { time } => {
            let time: ReminderTime = time.parse()?;
            let host = open_host()?;
            {
                let db = host.db.lock().unwrap_or_else(|e| e.into_inner());
                db.kv_set(&habit_name_key(water::REMINDER_TAG), "a glass of water")?;
                db.kv_set(water::REMINDER_TIME_KEY, &time.to_string())?;
            }
            host.scheduler
                .schedule(water::REMINDER_TAG, time.hour, time.minute)?;
            println!("water reminder set for {time} daily");
        }
        WaterAction::Unremind => {
            let host = open_host()?;
            host.scheduler.cancel(water::REMINDER_TAG);
            let db = host.db.lock().unwrap_or_else(|e| e.into_inner());
            db.kv_remove(water::REMINDER_TIME_KEY)?;
            db.kv_remove(&habit_name_key(water::REMINDER_TAG))?;
            println!("water reminder cancelled");
        }
        WaterAction::History { limit } => {
            let db = Database::open()?;
            let logs = db.list_water(Some(limit))?;
            if logs.is_empty() {
                println!("no water logs");
            } else {
                for log in logs {
                    println!(
                        "{}  {} ml",
                        log.at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                        log.amount_ml
                    );
                }
            }
        }
    }
    Ok(())
}
