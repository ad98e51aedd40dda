//! Daily habit-reminder scheduling and delivery.
//!
//! The scheduler is a per-habit state machine driven entirely by its
//! callers -- no internal thread. The underlying timer primitive is a
//! one-shot wake-up, so daily recurrence is simulated by re-registering
//! inside the firing callback.
//!
//! ## State transitions (per habit id)
//!
//! ```text
//! Unscheduled -> Pending(fire_at)      on schedule
//! Pending     -> Firing                when the wake-up lands
//! Firing      -> Pending(+1 day)       via the re-arm step in on_fire
//! Pending     -> Unscheduled           on cancel
//! ```
//!
//! At most one pending registration exists per habit id: scheduling always
//! cancels the prior registration for the same id first.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Local, LocalResult, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;
use crate::storage::KvStore;

use super::platform::{Clock, Notifier, RegistrationHandle, TimerError, TimerService};
use super::time::{next_fire_time, ReminderTime};

/// Observable per-habit scheduling state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderState {
    Unscheduled,
    Pending,
    /// Only observable from another thread while `on_fire` is delivering.
    Firing,
}

/// A pending registration, derived on demand -- never persisted by the
/// scheduler itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledReminder {
    pub habit_id: i64,
    pub fire_at_epoch_ms: i64,
    pub hour: u32,
    pub minute: u32,
    /// Always true for daily habit reminders.
    pub recurring: bool,
    /// False when the timer service degraded the registration to inexact.
    pub exact: bool,
}

struct Entry {
    handle: RegistrationHandle,
    time: ReminderTime,
    fire_at: DateTime<Local>,
    exact: bool,
}

enum Slot {
    Pending(Entry),
    Firing { time: ReminderTime },
}

/// Computes trigger times, registers one-shot wake-ups, and keeps a daily
/// recurrence alive until explicitly cancelled.
///
/// Stateless between calls apart from the registration table; the
/// key-value store remains the source of truth for what *should* be
/// scheduled.
pub struct ReminderScheduler {
    timer: Arc<dyn TimerService>,
    notifier: Arc<dyn Notifier>,
    store: Arc<dyn KvStore>,
    clock: Arc<dyn Clock>,
    // Coarse lock: schedule/cancel are near-instant and rare.
    entries: Mutex<HashMap<i64, Slot>>,
}

impl ReminderScheduler {
    pub fn new(
        timer: Arc<dyn TimerService>,
        notifier: Arc<dyn Notifier>,
        store: Arc<dyn KvStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            timer,
            notifier,
            store,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn table(&self) -> std::sync::MutexGuard<'_, HashMap<i64, Slot>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Schedule (or re-schedule) the daily reminder for a habit.
    ///
    /// Computes the next trigger from the current clock reading, cancels
    /// any prior registration for the same id, and registers a one-shot
    /// wake-up. If exact scheduling is denied the registration degrades to
    /// inexact rather than failing.
    pub fn schedule(&self, habit_id: i64, hour: u32, minute: u32) -> Result<(), ScheduleError> {
        let time = ReminderTime::new(hour, minute)?;
        let now = self.clock.now();
        let fire_at = resolve_local(next_fire_time(now.naive_local(), time), now);
        self.register(habit_id, time, fire_at)
    }

    /// Adopt a previously persisted registration after a host restart.
    ///
    /// Keeps the persisted `fire_at` instead of recomputing, so a wake-up
    /// missed while the host was down fires once, late, on the next tick.
    pub fn restore(
        &self,
        habit_id: i64,
        time: ReminderTime,
        fire_at: DateTime<Local>,
    ) -> Result<(), ScheduleError> {
        self.register(habit_id, time, fire_at)
    }

    /// Deliver the reminder for a habit and re-arm it for the next day.
    ///
    /// Invoked by the timer service's callback (or by [`tick`](Self::tick)
    /// on polled hosts). A stale callback for a cancelled habit is ignored.
    /// Delivery happens before re-arming; a re-arm failure is logged and
    /// leaves the habit unscheduled, but never suppresses the
    /// already-delivered notification.
    pub fn on_fire(&self, habit_id: i64) {
        let time = {
            let mut table = self.table();
            match table.remove(&habit_id) {
                Some(Slot::Pending(entry)) => {
                    let time = entry.time;
                    table.insert(habit_id, Slot::Firing { time });
                    time
                }
                Some(firing @ Slot::Firing { .. }) => {
                    // Duplicate callback while already delivering.
                    table.insert(habit_id, firing);
                    return;
                }
                None => return,
            }
        };

        let name = self
            .store
            .get(&habit_name_key(habit_id))
            .unwrap_or_else(|| "your habit".to_string());
        self.notifier
            .notify(habit_id, "Habit Reminder", &format!("Time for: {name}"));

        if let Err(e) = self.rearm(habit_id, time) {
            tracing::error!(
                habit_id,
                error = %e,
                "failed to re-arm daily reminder; it will not fire again until rescheduled"
            );
        }
    }

    /// Cancel the reminder for a habit. No-op when nothing is pending.
    pub fn cancel(&self, habit_id: i64) {
        let mut table = self.table();
        match table.remove(&habit_id) {
            Some(Slot::Pending(entry)) => {
                self.timer.cancel(entry.handle);
                tracing::debug!(habit_id, "reminder cancelled");
            }
            Some(Slot::Firing { .. }) => {
                // Mid-delivery: removing the slot prevents the re-arm.
                tracing::debug!(habit_id, "reminder cancelled during delivery");
            }
            None => {}
        }
    }

    /// Fire every pending reminder whose trigger time has been reached.
    ///
    /// Polled hosts (CLI, tests) call this instead of wiring a platform
    /// callback. Returns the habit ids that fired.
    pub fn tick(&self) -> Vec<i64> {
        let now = self.clock.now();
        let mut due: Vec<i64> = {
            let table = self.table();
            table
                .iter()
                .filter_map(|(id, slot)| match slot {
                    Slot::Pending(entry) if entry.fire_at <= now => Some(*id),
                    _ => None,
                })
                .collect()
        };
        due.sort_unstable();
        for id in &due {
            self.on_fire(*id);
        }
        due
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self, habit_id: i64) -> ReminderState {
        match self.table().get(&habit_id) {
            None => ReminderState::Unscheduled,
            Some(Slot::Pending(_)) => ReminderState::Pending,
            Some(Slot::Firing { .. }) => ReminderState::Firing,
        }
    }

    pub fn pending(&self, habit_id: i64) -> Option<ScheduledReminder> {
        match self.table().get(&habit_id) {
            Some(Slot::Pending(entry)) => Some(to_scheduled(habit_id, entry)),
            _ => None,
        }
    }

    /// All pending registrations, ordered by habit id.
    pub fn snapshot(&self) -> Vec<ScheduledReminder> {
        let table = self.table();
        let mut out: Vec<ScheduledReminder> = table
            .iter()
            .filter_map(|(id, slot)| match slot {
                Slot::Pending(entry) => Some(to_scheduled(*id, entry)),
                _ => None,
            })
            .collect();
        out.sort_unstable_by_key(|r| r.habit_id);
        out
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn register(
        &self,
        habit_id: i64,
        time: ReminderTime,
        fire_at: DateTime<Local>,
    ) -> Result<(), ScheduleError> {
        let mut table = self.table();
        if let Some(Slot::Pending(prev)) = table.remove(&habit_id) {
            self.timer.cancel(prev.handle);
        }
        let (handle, exact) = self.register_one_shot(habit_id, fire_at)?;
        table.insert(
            habit_id,
            Slot::Pending(Entry {
                handle,
                time,
                fire_at,
                exact,
            }),
        );
        tracing::debug!(habit_id, %time, fire_at = %fire_at, exact, "reminder armed");
        Ok(())
    }

    /// Re-arm after delivery. Skipped if the habit was cancelled while the
    /// notification was being delivered; a registration failure drops the
    /// habit back to unscheduled.
    fn rearm(&self, habit_id: i64, time: ReminderTime) -> Result<(), ScheduleError> {
        let now = self.clock.now();
        let fire_at = resolve_local(next_fire_time(now.naive_local(), time), now);

        let mut table = self.table();
        match table.get(&habit_id) {
            Some(Slot::Firing { .. }) => {}
            _ => {
                tracing::debug!(habit_id, "cancelled during delivery; not re-arming");
                return Ok(());
            }
        }
        match self.register_one_shot(habit_id, fire_at) {
            Ok((handle, exact)) => {
                table.insert(
                    habit_id,
                    Slot::Pending(Entry {
                        handle,
                        time,
                        fire_at,
                        exact,
                    }),
                );
                tracing::debug!(habit_id, fire_at = %fire_at, "reminder re-armed");
                Ok(())
            }
            Err(e) => {
                table.remove(&habit_id);
                Err(e)
            }
        }
    }

    fn register_one_shot(
        &self,
        habit_id: i64,
        fire_at: DateTime<Local>,
    ) -> Result<(RegistrationHandle, bool), ScheduleError> {
        let fire_at_ms = fire_at.timestamp_millis();
        match self.timer.register_one_shot(fire_at_ms, habit_id, true) {
            Ok(handle) => Ok((handle, true)),
            Err(TimerError::ExactSchedulingDenied) => {
                tracing::warn!(habit_id, "exact scheduling denied; degrading to inexact");
                match self.timer.register_one_shot(fire_at_ms, habit_id, false) {
                    Ok(handle) => Ok((handle, false)),
                    Err(e) => Err(ScheduleError::RegistrationRejected {
                        habit_id,
                        message: e.to_string(),
                    }),
                }
            }
            Err(e) => Err(ScheduleError::RegistrationRejected {
                habit_id,
                message: e.to_string(),
            }),
        }
    }
}

/// KV key mirroring a habit's display name for notification bodies.
pub fn habit_name_key(habit_id: i64) -> String {
    format!("habit.{habit_id}.name")
}

fn to_scheduled(habit_id: i64, entry: &Entry) -> ScheduledReminder {
    ScheduledReminder {
        habit_id,
        fire_at_epoch_ms: entry.fire_at.timestamp_millis(),
        hour: entry.time.hour,
        minute: entry.time.minute,
        recurring: true,
        exact: entry.exact,
    }
}

/// Map a local wall-clock instant to a concrete timestamp. Ambiguous
/// (fall-back) instants take the earlier mapping; an instant skipped by
/// spring-forward shifts one hour later. `now` is the caller's clock
/// reading, used only as the last-resort base when even the shifted
/// instant does not exist.
fn resolve_local(naive: NaiveDateTime, now: DateTime<Local>) -> DateTime<Local> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => match Local.from_local_datetime(&(naive + Duration::hours(1))) {
            LocalResult::Single(dt) => dt,
            LocalResult::Ambiguous(earliest, _) => earliest,
            LocalResult::None => now + Duration::hours(1),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct FakeTimer {
        next_handle: AtomicU64,
        /// (handle, fire_at_ms, tag, exact) for live registrations.
        live: Mutex<Vec<(RegistrationHandle, i64, i64, bool)>>,
        deny_exact: bool,
        /// Reject everything after this many successful registrations.
        reject_after: Option<u64>,
        accepted: AtomicU64,
    }

    impl FakeTimer {
        fn new() -> Self {
            Self {
                next_handle: AtomicU64::new(1),
                live: Mutex::new(Vec::new()),
                deny_exact: false,
                reject_after: None,
                accepted: AtomicU64::new(0),
            }
        }

        fn deny_exact() -> Self {
            Self {
                deny_exact: true,
                ..Self::new()
            }
        }

        fn reject_after(n: u64) -> Self {
            Self {
                reject_after: Some(n),
                ..Self::new()
            }
        }

        fn live_count(&self) -> usize {
            self.live.lock().unwrap().len()
        }
    }

    impl TimerService for FakeTimer {
        fn register_one_shot(
            &self,
            fire_at_epoch_ms: i64,
            tag: i64,
            exact: bool,
        ) -> Result<RegistrationHandle, TimerError> {
            if exact && self.deny_exact {
                return Err(TimerError::ExactSchedulingDenied);
            }
            if let Some(limit) = self.reject_after {
                if self.accepted.load(Ordering::SeqCst) >= limit {
                    return Err(TimerError::Rejected("service unavailable".into()));
                }
            }
            self.accepted.fetch_add(1, Ordering::SeqCst);
            let handle = RegistrationHandle(self.next_handle.fetch_add(1, Ordering::SeqCst));
            self.live
                .lock()
                .unwrap()
                .push((handle, fire_at_epoch_ms, tag, exact));
            Ok(handle)
        }

        fn cancel(&self, handle: RegistrationHandle) {
            self.live.lock().unwrap().retain(|(h, ..)| *h != handle);
        }
    }

    #[derive(Default)]
    struct FakeNotifier {
        delivered: Mutex<Vec<(i64, String, String)>>,
    }

    impl Notifier for FakeNotifier {
        fn notify(&self, id: i64, title: &str, body: &str) {
            self.delivered
                .lock()
                .unwrap()
                .push((id, title.to_string(), body.to_string()));
        }
    }

    struct FakeClock {
        now: Mutex<DateTime<Local>>,
    }

    impl FakeClock {
        fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> Self {
            Self {
                now: Mutex::new(local(y, mo, d, h, mi)),
            }
        }

        fn set(&self, dt: DateTime<Local>) {
            *self.now.lock().unwrap() = dt;
        }
    }

    impl Clock for FakeClock {
        fn now(&self) -> DateTime<Local> {
            *self.now.lock().unwrap()
        }
    }

    #[derive(Default)]
    struct MemoryKv {
        map: Mutex<HashMap<String, String>>,
    }

    impl KvStore for MemoryKv {
        fn get(&self, key: &str) -> Option<String> {
            self.map.lock().unwrap().get(key).cloned()
        }
        fn set(&self, key: &str, value: &str) {
            self.map
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
        }
        fn remove(&self, key: &str) {
            self.map.lock().unwrap().remove(key);
        }
    }

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .single()
            .expect("unambiguous local time")
    }

    struct Fixture {
        timer: Arc<FakeTimer>,
        notifier: Arc<FakeNotifier>,
        clock: Arc<FakeClock>,
        kv: Arc<MemoryKv>,
        scheduler: ReminderScheduler,
    }

    fn fixture_with_timer(timer: FakeTimer, clock: FakeClock) -> Fixture {
        let timer = Arc::new(timer);
        let notifier = Arc::new(FakeNotifier::default());
        let clock = Arc::new(clock);
        let kv = Arc::new(MemoryKv::default());
        let scheduler = ReminderScheduler::new(
            timer.clone(),
            notifier.clone(),
            kv.clone(),
            clock.clone(),
        );
        Fixture {
            timer,
            notifier,
            clock,
            kv,
            scheduler,
        }
    }

    fn fixture(clock: FakeClock) -> Fixture {
        fixture_with_timer(FakeTimer::new(), clock)
    }

    #[test]
    fn schedules_for_today_when_time_is_ahead() {
        let f = fixture(FakeClock::at(2024, 1, 1, 8, 0));
        f.scheduler.schedule(42, 9, 0).unwrap();
        let pending = f.scheduler.pending(42).unwrap();
        assert_eq!(
            pending.fire_at_epoch_ms,
            local(2024, 1, 1, 9, 0).timestamp_millis()
        );
        assert!(pending.recurring);
        assert!(pending.exact);
    }

    #[test]
    fn schedules_for_tomorrow_when_time_has_passed() {
        let f = fixture(FakeClock::at(2024, 1, 1, 10, 0));
        f.scheduler.schedule(42, 9, 0).unwrap();
        let pending = f.scheduler.pending(42).unwrap();
        assert_eq!(
            pending.fire_at_epoch_ms,
            local(2024, 1, 2, 9, 0).timestamp_millis()
        );
    }

    #[test]
    fn rejects_invalid_time_without_registering() {
        let f = fixture(FakeClock::at(2024, 1, 1, 8, 0));
        assert!(matches!(
            f.scheduler.schedule(1, 24, 0),
            Err(ScheduleError::InvalidTime { .. })
        ));
        assert!(matches!(
            f.scheduler.schedule(1, 9, 60),
            Err(ScheduleError::InvalidTime { .. })
        ));
        assert_eq!(f.timer.live_count(), 0);
        assert_eq!(f.scheduler.state(1), ReminderState::Unscheduled);
    }

    #[test]
    fn rescheduling_keeps_a_single_registration() {
        let f = fixture(FakeClock::at(2024, 1, 1, 8, 0));
        f.scheduler.schedule(42, 9, 0).unwrap();
        f.scheduler.schedule(42, 9, 0).unwrap();
        f.scheduler.schedule(42, 18, 30).unwrap();
        assert_eq!(f.timer.live_count(), 1);
        assert_eq!(f.scheduler.snapshot().len(), 1);
        let pending = f.scheduler.pending(42).unwrap();
        assert_eq!((pending.hour, pending.minute), (18, 30));
    }

    #[test]
    fn fire_delivers_then_rearms_next_day() {
        let f = fixture(FakeClock::at(2024, 1, 1, 8, 0));
        f.scheduler.schedule(42, 9, 0).unwrap();

        f.clock.set(local(2024, 1, 1, 9, 0));
        f.scheduler.on_fire(42);

        let delivered = f.notifier.delivered.lock().unwrap();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].0, 42);
        assert_eq!(delivered[0].1, "Habit Reminder");
        drop(delivered);

        let pending = f.scheduler.pending(42).unwrap();
        assert_eq!(
            pending.fire_at_epoch_ms,
            local(2024, 1, 2, 9, 0).timestamp_millis()
        );
        assert_eq!(f.timer.live_count(), 1);
    }

    #[test]
    fn recurrence_advances_one_day_per_fire_without_drift() {
        let f = fixture(FakeClock::at(2024, 1, 1, 8, 0));
        f.scheduler.schedule(7, 9, 30).unwrap();

        for day in 1..=4u32 {
            f.clock.set(local(2024, 1, day, 9, 30));
            f.scheduler.on_fire(7);
            let pending = f.scheduler.pending(7).unwrap();
            assert_eq!(
                pending.fire_at_epoch_ms,
                local(2024, 1, day + 1, 9, 30).timestamp_millis(),
                "day {day}"
            );
            assert_eq!((pending.hour, pending.minute), (9, 30));
        }
        assert_eq!(f.notifier.delivered.lock().unwrap().len(), 4);
    }

    #[test]
    fn cancel_prevents_firing() {
        let f = fixture(FakeClock::at(2024, 1, 1, 8, 0));
        f.scheduler.schedule(42, 9, 0).unwrap();
        f.scheduler.cancel(42);

        assert_eq!(f.timer.live_count(), 0);
        assert_eq!(f.scheduler.state(42), ReminderState::Unscheduled);

        f.clock.set(local(2024, 1, 1, 12, 0));
        assert!(f.scheduler.tick().is_empty());
        assert!(f.notifier.delivered.lock().unwrap().is_empty());
    }

    #[test]
    fn cancel_is_idempotent() {
        let f = fixture(FakeClock::at(2024, 1, 1, 8, 0));
        f.scheduler.cancel(99);
        f.scheduler.schedule(99, 9, 0).unwrap();
        f.scheduler.cancel(99);
        f.scheduler.cancel(99);
        assert_eq!(f.scheduler.state(99), ReminderState::Unscheduled);
    }

    #[test]
    fn same_time_habits_are_independent() {
        let f = fixture(FakeClock::at(2024, 1, 1, 8, 0));
        f.scheduler.schedule(1, 9, 0).unwrap();
        f.scheduler.schedule(2, 9, 0).unwrap();
        assert_eq!(f.timer.live_count(), 2);

        f.scheduler.cancel(1);
        assert_eq!(f.scheduler.state(1), ReminderState::Unscheduled);
        assert_eq!(f.scheduler.state(2), ReminderState::Pending);
        assert_eq!(f.timer.live_count(), 1);
    }

    #[test]
    fn exact_denial_degrades_to_inexact() {
        let f = fixture_with_timer(FakeTimer::deny_exact(), FakeClock::at(2024, 1, 1, 8, 0));
        f.scheduler.schedule(42, 9, 0).unwrap();
        let pending = f.scheduler.pending(42).unwrap();
        assert!(!pending.exact);
        assert_eq!(f.timer.live_count(), 1);
    }

    #[test]
    fn rearm_failure_does_not_suppress_delivery() {
        // First registration succeeds; the re-arm after firing is refused.
        let f = fixture_with_timer(FakeTimer::reject_after(1), FakeClock::at(2024, 1, 1, 8, 0));
        f.scheduler.schedule(42, 9, 0).unwrap();

        f.clock.set(local(2024, 1, 1, 9, 0));
        f.scheduler.on_fire(42);

        assert_eq!(f.notifier.delivered.lock().unwrap().len(), 1);
        assert_eq!(f.scheduler.state(42), ReminderState::Unscheduled);
    }

    #[test]
    fn stale_fire_for_cancelled_habit_is_ignored() {
        let f = fixture(FakeClock::at(2024, 1, 1, 8, 0));
        f.scheduler.on_fire(42);
        assert!(f.notifier.delivered.lock().unwrap().is_empty());
    }

    #[test]
    fn tick_fires_only_due_reminders() {
        let f = fixture(FakeClock::at(2024, 1, 1, 8, 0));
        f.scheduler.schedule(1, 9, 0).unwrap();
        f.scheduler.schedule(2, 20, 0).unwrap();

        f.clock.set(local(2024, 1, 1, 9, 5));
        assert_eq!(f.scheduler.tick(), vec![1]);
        assert_eq!(f.notifier.delivered.lock().unwrap().len(), 1);

        // Habit 1 re-armed for tomorrow, habit 2 still pending today.
        assert_eq!(f.scheduler.tick(), Vec::<i64>::new());
    }

    #[test]
    fn notification_body_uses_stored_habit_name() {
        let f = fixture(FakeClock::at(2024, 1, 1, 8, 0));
        f.kv.set(&habit_name_key(42), "Morning run");
        f.scheduler.schedule(42, 9, 0).unwrap();

        f.clock.set(local(2024, 1, 1, 9, 0));
        f.scheduler.on_fire(42);

        let delivered = f.notifier.delivered.lock().unwrap();
        assert_eq!(delivered[0].2, "Time for: Morning run");
    }

    #[test]
    fn notification_body_falls_back_without_a_name() {
        let f = fixture(FakeClock::at(2024, 1, 1, 8, 0));
        f.scheduler.schedule(42, 9, 0).unwrap();
        f.clock.set(local(2024, 1, 1, 9, 0));
        f.scheduler.on_fire(42);
        let delivered = f.notifier.delivered.lock().unwrap();
        assert_eq!(delivered[0].2, "Time for: your habit");
    }

    #[test]
    fn restore_keeps_persisted_instant_and_fires_late() {
        // Wake-up was missed while the host was down; it fires on the next
        // tick and recurrence realigns to the captured time of day.
        let f = fixture(FakeClock::at(2024, 1, 2, 11, 0));
        let time = ReminderTime::new(9, 0).unwrap();
        f.scheduler.restore(42, time, local(2024, 1, 2, 9, 0)).unwrap();

        assert_eq!(f.scheduler.tick(), vec![42]);
        assert_eq!(f.notifier.delivered.lock().unwrap().len(), 1);
        let pending = f.scheduler.pending(42).unwrap();
        assert_eq!(
            pending.fire_at_epoch_ms,
            local(2024, 1, 3, 9, 0).timestamp_millis()
        );
    }

    #[test]
    fn resolve_local_maps_ordinary_instants_independent_of_clock() {
        // The clock argument only matters for the unreachable-instant
        // fallback; a resolvable wall-clock time maps to itself no matter
        // what the clock says.
        let naive = local(2024, 1, 1, 9, 0).naive_local();
        assert_eq!(
            resolve_local(naive, local(2024, 1, 1, 8, 0)),
            local(2024, 1, 1, 9, 0)
        );
        assert_eq!(
            resolve_local(naive, local(2030, 6, 15, 23, 59)),
            local(2024, 1, 1, 9, 0)
        );
    }

    #[test]
    fn snapshot_lists_pending_by_habit_id() {
        let f = fixture(FakeClock::at(2024, 1, 1, 8, 0));
        f.scheduler.schedule(3, 9, 0).unwrap();
        f.scheduler.schedule(1, 9, 0).unwrap();
        f.scheduler.schedule(2, 9, 0).unwrap();
        let ids: Vec<i64> = f.scheduler.snapshot().iter().map(|r| r.habit_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
