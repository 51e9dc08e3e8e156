use crate::timer::{TimerId, TimerService};

use std::time::Duration;

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{debug, instrument};

/// Default cadence for elapsed-second ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// [`TimerService`] backed by a tokio interval task per started timer.
///
/// Ticks are delivered on the channel given at construction; the event loop
/// that owns the session drains it. Must be used from within a tokio runtime.
pub struct IntervalTimer {
    tick_tx: mpsc::UnboundedSender<TimerId>,
    period: Duration,
}

impl IntervalTimer {
    /// Timer ticking once per [`TICK_PERIOD`].
    pub fn new(tick_tx: mpsc::UnboundedSender<TimerId>) -> Self {
        Self::with_period(tick_tx, TICK_PERIOD)
    }

    /// Timer ticking once per `period`.
    pub fn with_period(tick_tx: mpsc::UnboundedSender<TimerId>, period: Duration) -> Self {
        Self { tick_tx, period }
    }
}

impl TimerService for IntervalTimer {
    type Handle = JoinHandle<()>;

    #[instrument(skip(self))]
    fn start(&mut self, id: TimerId) -> JoinHandle<()> {
        let tick_tx = self.tick_tx.clone();
        let period = self.period;

        debug!(timer = %id, period_ms = period.as_millis(), "Timer started");

        tokio::spawn(async move {
            // First tick one full period after start, not immediately.
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                if tick_tx.send(id).is_err() {
                    break;
                }
            }
        })
    }

    #[instrument(skip(self, handle))]
    fn cancel(&mut self, handle: JoinHandle<()>) {
        handle.abort();
        debug!("Timer cancelled");
    }
}
