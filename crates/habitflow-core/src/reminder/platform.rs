//! Trait seams for the platform services the scheduler depends on.
//!
//! The scheduler itself has zero platform dependencies -- the host injects
//! a timer service, a notifier, and a clock. Tests inject fakes; the CLI
//! injects a kv-backed timer and a terminal notifier.

use chrono::{DateTime, Local};
use thiserror::Error;

/// Opaque handle returned by a timer registration, used only to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistrationHandle(pub u64);

/// Timer service failures.
#[derive(Error, Debug)]
pub enum TimerError {
    /// Exact wake-ups are not permitted for this caller. The scheduler
    /// retries with an inexact registration rather than failing.
    #[error("Exact scheduling not permitted")]
    ExactSchedulingDenied,

    /// The registration was refused outright.
    #[error("Registration rejected: {0}")]
    Rejected(String),
}

/// One-shot wake-up service (the host platform's alarm facility).
///
/// Guarantees at-or-after firing while the host is alive; may defer for
/// power saving. Recurring reminders are simulated by re-registering a
/// one-shot after each firing.
pub trait TimerService: Send + Sync {
    /// Register a one-shot wake-up at `fire_at_epoch_ms`, tagged with the
    /// habit id. `exact` requests exact timing; implementations without
    /// that permission return [`TimerError::ExactSchedulingDenied`].
    fn register_one_shot(
        &self,
        fire_at_epoch_ms: i64,
        tag: i64,
        exact: bool,
    ) -> Result<RegistrationHandle, TimerError>;

    /// Cancel a pending registration. Cancelling an already-fired or
    /// unknown handle is a no-op.
    fn cancel(&self, handle: RegistrationHandle);
}

/// Fire-and-forget notification delivery. Duplicate notifications for the
/// same id are coalesced by the platform, not here.
pub trait Notifier: Send + Sync {
    fn notify(&self, id: i64, title: &str, body: &str);
}

/// Wall-clock source. Local time because reminder times are local
/// wall-clock times of day.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// The real system clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
