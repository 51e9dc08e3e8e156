//! Elapsed-time tick sources.
//!
//! A timer emits [`TimerId`]s roughly once per second until cancelled. The
//! session stamps each timer it starts with a fresh id, so a tick that was
//! already queued when its timer got cancelled can be recognised and dropped.

mod interval;

pub use interval::{IntervalTimer, TICK_PERIOD};

use std::fmt;

/// Identifies one started timer within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

/// Starts and cancels tick sources.
pub trait TimerService {
    /// Owned token for a running timer. Passing it to
    /// [`TimerService::cancel`] consumes it, so a timer cannot be cancelled twice.
    type Handle;

    /// Begin emitting `id` on a fixed cadence.
    fn start(&mut self, id: TimerId) -> Self::Handle;

    /// Stop emitting.
    fn cancel(&mut self, handle: Self::Handle);
}
