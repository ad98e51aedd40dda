//! Reminder scheduling commands.
//!
//! The CLI is a polled host for the scheduler: registrations are persisted
//! in the kv table so they survive between invocations, and `reminder tick`
//! restores them and fires the due ones. A daemon or GUI shell would drive
//! the same scheduler from a real timer callback instead.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{Local, TimeZone};
use clap::Subcommand;
use serde::{Deserialize, Serialize};

use habitflow_core::reminder::{
    Notifier, RegistrationHandle, SystemClock, TimerError, TimerService,
};
use habitflow_core::water;
use habitflow_core::{Config, Database, ReminderScheduler, ReminderTime};

const REGISTRATIONS_KEY: &str = "reminder.registrations";
const NEXT_HANDLE_KEY: &str = "reminder.next_handle";
const ACTIVE_KEY: &str = "reminders.active";

#[derive(Subcommand)]
pub enum ReminderAction {
    /// Set the daily reminder for a habit
    Set {
        /// Habit ID
        habit_id: i64,
        /// Time of day, HH:MM (24-hour)
        time: String,
    },
    /// Cancel the reminder for a habit
    Cancel {
        /// Habit ID
        habit_id: i64,
    },
    /// List pending reminders
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fire all reminders whose trigger time has been reached
    Tick,
    /// Turn all reminders on or off
    Active {
        /// "on" or "off"
        state: String,
    },
}

/// One persisted timer registration, keyed by habit id.
#[derive(Serialize, Deserialize)]
struct PersistedReg {
    handle: u64,
    fire_at_epoch_ms: i64,
    exact: bool,
}

fn lock(db: &Mutex<Database>) -> std::sync::MutexGuard<'_, Database> {
    db.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Timer service backed by the kv table. "Exact" permission comes from
/// config; when disabled, exact requests are denied so the scheduler
/// exercises its degrade path, just like a host without the permission.
struct KvTimer {
    db: Arc<Mutex<Database>>,
    allow_exact: bool,
}

impl KvTimer {
    fn load(db: &Database) -> BTreeMap<i64, PersistedReg> {
        db.kv_get(REGISTRATIONS_KEY)
            .ok()
            .flatten()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    fn store(db: &Database, regs: &BTreeMap<i64, PersistedReg>) {
        if let Ok(json) = serde_json::to_string(regs) {
            let _ = db.kv_set(REGISTRATIONS_KEY, &json);
        }
    }
}

impl TimerService for KvTimer {
    fn register_one_shot(
        &self,
        fire_at_epoch_ms: i64,
        tag: i64,
        exact: bool,
    ) -> Result<RegistrationHandle, TimerError> {
        if exact && !self.allow_exact {
            return Err(TimerError::ExactSchedulingDenied);
        }
        let db = lock(&self.db);
        let handle: u64 = db
            .kv_get(NEXT_HANDLE_KEY)
            .ok()
            .flatten()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1);
        db.kv_set(NEXT_HANDLE_KEY, &(handle + 1).to_string())
            .map_err(|e| TimerError::Rejected(e.to_string()))?;

        let mut regs = Self::load(&db);
        regs.insert(
            tag,
            PersistedReg {
                handle,
                fire_at_epoch_ms,
                exact,
            },
        );
        Self::store(&db, &regs);
        Ok(RegistrationHandle(handle))
    }

    fn cancel(&self, handle: RegistrationHandle) {
        let db = lock(&self.db);
        let mut regs = Self::load(&db);
        regs.retain(|_, reg| reg.handle != handle.0);
        Self::store(&db, &regs);
    }
}

/// Prints notifications to the terminal.
struct TermNotifier;

impl Notifier for TermNotifier {
    fn notify(&self, _id: i64, title: &str, body: &str) {
        println!("🔔 {title}: {body}");
    }
}

pub(crate) struct Host {
    pub db: Arc<Mutex<Database>>,
    pub scheduler: ReminderScheduler,
}

/// Open the database and rebuild the scheduler from persisted
/// registrations. Fire times are kept as persisted, so a wake-up missed
/// between invocations fires on the next tick.
pub(crate) fn open_host() -> Result<Host, Box<dyn std::error::Error>> {
    let db = Arc::new(Mutex::new(Database::open()?));
    let config = Config::load_or_default();
    let timer = Arc::new(KvTimer {
        db: db.clone(),
        allow_exact: config.reminders.exact,
    });
    let scheduler = ReminderScheduler::new(
        timer,
        Arc::new(TermNotifier),
        db.clone(),
        Arc::new(SystemClock),
    );

    let persisted: Vec<(i64, ReminderTime, i64)> = {
        let guard = lock(&db);
        let mut regs = KvTimer::load(&guard);
        let habits = guard.list_habits(None)?;
        let water_time: Option<ReminderTime> = guard
            .kv_get(water::REMINDER_TIME_KEY)
            .ok()
            .flatten()
            .and_then(|s| s.parse().ok());
        let time_for = |id: i64| {
            if id == water::REMINDER_TAG {
                water_time
            } else {
                habits
                    .iter()
                    .find(|h| h.id == id)
                    .and_then(|h| h.reminder_time)
            }
        };
        // Drop registrations whose habit was deleted or lost its reminder.
        regs.retain(|id, _| time_for(*id).is_some());
        KvTimer::store(&guard, &regs);
        regs.iter()
            .filter_map(|(id, reg)| Some((*id, time_for(*id)?, reg.fire_at_epoch_ms)))
            .collect()
    };
    tracing::debug!(count = persisted.len(), "restoring persisted registrations");
    for (id, time, fire_at_ms) in persisted {
        if let Some(fire_at) = Local.timestamp_millis_opt(fire_at_ms).single() {
            scheduler.restore(id, time, fire_at)?;
        }
    }
    Ok(Host { db, scheduler })
}

fn reminders_active(db: &Mutex<Database>) -> bool {
    lock(db)
        .kv_get(ACTIVE_KEY)
        .ok()
        .flatten()
        .map(|v| v != "false")
        .unwrap_or(true)
}

pub fn run(action: ReminderAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ReminderAction::Set { habit_id, time } => {
            let time: ReminderTime = time.parse()?;
            let host = open_host()?;
            {
                let db = lock(&host.db);
                if db.get_habit(habit_id)?.is_none() {
                    return Err(format!("no habit with id {habit_id}").into());
                }
                db.set_habit_reminder(habit_id, Some(time), true)?;
            }
            if !reminders_active(&host.db) {
                eprintln!("note: reminders are globally off (reminder active on)");
            }
            host.scheduler.schedule(habit_id, time.hour, time.minute)?;
            let pending = host.scheduler.pending(habit_id);
            println!("{}", serde_json::to_string_pretty(&pending)?);
        }
        ReminderAction::Cancel { habit_id } => {
            let host = open_host()?;
            host.scheduler.cancel(habit_id);
            let db = lock(&host.db);
            if db.get_habit(habit_id)?.is_some() {
                db.set_habit_reminder(habit_id, None, false)?;
            }
            println!("reminder cancelled for habit {habit_id}");
        }
        ReminderAction::List { json } => {
            let host = open_host()?;
            let snapshot = host.scheduler.snapshot();
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else if snapshot.is_empty() {
                println!("no pending reminders");
            } else {
                for r in snapshot {
                    let fire_at = Local
                        .timestamp_millis_opt(r.fire_at_epoch_ms)
                        .single()
                        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_default();
                    let exact = if r.exact { "exact" } else { "inexact" };
                    println!(
                        "habit {}  {:02}:{:02} daily  next {fire_at} ({exact})",
                        r.habit_id, r.hour, r.minute
                    );
                }
            }
        }
        ReminderAction::Tick => {
            let host = open_host()?;
            if !reminders_active(&host.db) {
                println!("reminders are off");
                return Ok(());
            }
            let fired = host.scheduler.tick();
            if fired.is_empty() {
                println!("nothing due");
            } else {
                println!("fired: {fired:?}");
            }
        }
        ReminderAction::Active { state } => {
            let on = match state.as_str() {
                "on" => true,
                "off" => false,
                other => return Err(format!("expected 'on' or 'off', got '{other}'").into()),
            };
            let db = Database::open()?;
            db.kv_set(ACTIVE_KEY, if on { "true" } else { "false" })?;
            println!("reminders {}", if on { "on" } else { "off" });
        }
    }
    Ok(())
}
