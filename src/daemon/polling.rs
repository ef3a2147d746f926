use crate::core::models::CycleOutcome;
use crate::core::settings::{OverlapPolicy, PollingSettings};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};

#[async_trait]
pub trait Cycle: Send + Sync + 'static {
    async fn run_cycle(&self) -> CycleOutcome;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
}

/// Decrements the in-flight counter even if the cycle task panics.
struct InFlight(Arc<AtomicUsize>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Runs a cycle once at startup and then on every tick of a fixed-period timer.
///
/// Ticks are anchored to the scheduler start (`start + n * interval`) and keep
/// firing whether or not the previous cycle finished. What happens to a tick
/// that lands on a running cycle is governed by [`OverlapPolicy`].
pub struct Scheduler<C: Cycle> {
    cycle: Arc<C>,
    interval: Duration,
    overlap: OverlapPolicy,
    in_flight: Arc<AtomicUsize>,
    skipped: AtomicU64,
}

impl<C: Cycle> Scheduler<C> {
    pub fn new(cycle: C, settings: &PollingSettings) -> Self {
        Self {
            cycle: Arc::new(cycle),
            interval: settings.interval(),
            overlap: settings.overlap,
            in_flight: Arc::new(AtomicUsize::new(0)),
            skipped: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> SchedulerState {
        if self.in_flight.load(Ordering::Acquire) > 0 {
            SchedulerState::Running
        } else {
            SchedulerState::Idle
        }
    }

    pub fn skipped_ticks(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }

    /// Never returns. The process is stopped from outside.
    pub async fn run(&self) {
        let start = Instant::now();
        let mut ticker = time::interval_at(start + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(
            interval_secs = self.interval.as_secs(),
            overlap = ?self.overlap,
            "Scheduler started"
        );

        let startup_finished = {
            let _guard = self.enter();
            self.cycle.run_cycle().await;
            Instant::now()
        };

        let mut tick: u64 = 0;
        loop {
            let deadline = ticker.tick().await;
            tick += 1;

            // The startup cycle is awaited inline, so ticks that came due while it
            // ran are delivered late. They overlapped it.
            if self.overlap == OverlapPolicy::Skip && deadline < startup_finished {
                let missed = self.missed_since(deadline, startup_finished);
                self.skipped.fetch_add(missed, Ordering::Relaxed);
                tracing::warn!(
                    tick,
                    missed,
                    skipped = self.skipped_ticks(),
                    "Startup cycle overran the interval, skipping ticks"
                );
                continue;
            }

            self.dispatch(tick);
        }
    }

    /// Number of schedule points in `deadline..=until`.
    fn missed_since(&self, deadline: Instant, until: Instant) -> u64 {
        let behind = until.saturating_duration_since(deadline);
        (behind.as_nanos() / self.interval.as_nanos()) as u64 + 1
    }

    fn enter(&self) -> InFlight {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        InFlight(Arc::clone(&self.in_flight))
    }

    fn dispatch(&self, tick: u64) {
        let guard = match self.overlap {
            OverlapPolicy::Skip => {
                // Only this task starts cycles, so nothing can slip in between.
                if self.state() == SchedulerState::Running {
                    self.skipped.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(
                        tick,
                        skipped = self.skipped_ticks(),
                        "Previous cycle still running, skipping tick"
                    );
                    return;
                }
                self.enter()
            }
            OverlapPolicy::Concurrent => {
                let guard = self.enter();
                let in_flight = self.in_flight.load(Ordering::Acquire);
                if in_flight > 1 {
                    tracing::debug!(tick, in_flight, "Starting overlapping cycle");
                }
                guard
            }
        };

        tracing::debug!(tick, "Tick fired");
        let cycle = Arc::clone(&self.cycle);
        tokio::spawn(async move {
            let _guard = guard;
            cycle.run_cycle().await;
        });
    }
}
