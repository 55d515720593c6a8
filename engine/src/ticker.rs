//! Periodic tick sources for the audit engine.
//!
//! The engine never sleeps or spawns on its own. It asks a [`Ticker`] to
//! start or stop a fixed-period schedule and, when polled, drains the ticks
//! that fired in the meantime. Each tick carries the [`RunId`] it was
//! scheduled for.
//!
//! - [`TokioTicker`] is the production source (a tokio interval task).
//! - [`ManualTicker`] is a virtual clock: time only moves when a test calls
//!   [`ManualTicker::advance`].

use std::collections::VecDeque;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

use shieldguard_types::RunId;

/// Periods shorter than this are clamped so a zero period cannot spin.
pub const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

pub trait Ticker {
    /// Begin firing ticks for `run` every `period`. Replaces any schedule
    /// that is already running.
    fn start(&mut self, run: RunId, period: Duration);

    /// Cancel the schedule and discard ticks that fired but were not drained.
    fn stop(&mut self);

    fn is_running(&self) -> bool;

    /// Take every tick fired since the previous call, oldest first.
    fn drain_fired(&mut self) -> Vec<RunId>;
}

// ============================================================================
// Virtual clock
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct Schedule {
    run: RunId,
    period: Duration,
    /// Time elapsed since the last fired tick.
    carry: Duration,
}

/// Deterministic ticker driven by explicit [`advance`](Self::advance) calls.
#[derive(Debug, Default)]
pub struct ManualTicker {
    schedule: Option<Schedule>,
    fired: VecDeque<RunId>,
    starts: usize,
    stops: usize,
}

impl ManualTicker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the virtual clock forward, firing one tick per whole period.
    ///
    /// Returns the number of ticks fired. Nothing fires while stopped.
    pub fn advance(&mut self, by: Duration) -> usize {
        let Some(schedule) = self.schedule.as_mut() else {
            return 0;
        };

        schedule.carry += by;
        let mut fired = 0;
        while schedule.carry >= schedule.period {
            schedule.carry -= schedule.period;
            self.fired.push_back(schedule.run);
            fired += 1;
        }
        fired
    }

    /// Advance by exactly one period of the running schedule.
    pub fn fire(&mut self) -> bool {
        match self.schedule {
            Some(schedule) => self.advance(schedule.period) == 1,
            None => false,
        }
    }

    #[must_use]
    pub fn period(&self) -> Option<Duration> {
        self.schedule.map(|s| s.period)
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.fired.len()
    }

    /// Number of times a schedule was started.
    #[must_use]
    pub fn starts(&self) -> usize {
        self.starts
    }

    /// Number of times a running schedule was cancelled.
    #[must_use]
    pub fn stops(&self) -> usize {
        self.stops
    }
}

impl Ticker for ManualTicker {
    fn start(&mut self, run: RunId, period: Duration) {
        self.stop();
        self.schedule = Some(Schedule {
            run,
            period: period.max(MIN_TICK_PERIOD),
            carry: Duration::ZERO,
        });
        self.starts += 1;
    }

    fn stop(&mut self) {
        if self.schedule.take().is_some() {
            self.stops += 1;
        }
        self.fired.clear();
    }

    fn is_running(&self) -> bool {
        self.schedule.is_some()
    }

    fn drain_fired(&mut self) -> Vec<RunId> {
        self.fired.drain(..).collect()
    }
}

// ============================================================================
// Tokio interval
// ============================================================================

/// Ticker backed by a spawned tokio interval task.
///
/// Ticks are delivered over an unbounded channel and picked up by
/// [`drain_fired`](Ticker::drain_fired), so the engine applies them on the
/// caller's thread. The task is aborted on [`stop`](Ticker::stop) and on drop.
#[derive(Debug)]
pub struct TokioTicker {
    tx: mpsc::UnboundedSender<RunId>,
    rx: mpsc::UnboundedReceiver<RunId>,
    task: Option<JoinHandle<()>>,
}

impl Default for TokioTicker {
    fn default() -> Self {
        Self::new()
    }
}

impl TokioTicker {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx, task: None }
    }
}

impl Ticker for TokioTicker {
    fn start(&mut self, run: RunId, period: Duration) {
        self.stop();

        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::error!("Cannot schedule audit ticks outside a tokio runtime: {e}");
                return;
            }
        };

        let period = period.max(MIN_TICK_PERIOD);
        let tx = self.tx.clone();
        self.task = Some(handle.spawn(async move {
            // First tick one full period after start, like a browser interval.
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(run).is_err() {
                    break;
                }
            }
        }));
        tracing::debug!(%run, ?period, "Audit ticker started");
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!("Audit ticker stopped");
        }
        while self.rx.try_recv().is_ok() {}
    }

    fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    fn drain_fired(&mut self) -> Vec<RunId> {
        let mut fired = Vec::new();
        while let Ok(run) = self.rx.try_recv() {
            fired.push(run);
        }
        fired
    }
}

impl Drop for TokioTicker {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
