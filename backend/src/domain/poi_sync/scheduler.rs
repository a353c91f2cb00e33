//! Timer driving the sync cycle: one delayed kick-off, then a fixed interval.
//!
//! Each trigger spawns its own cycle task so a slow cycle never delays the
//! timer; the service itself skips a trigger that overlaps a running cycle.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep};
use tracing::{debug, info};

use super::PoiSyncService;

/// Default wait before the first cycle, giving position data time to arrive.
pub const DEFAULT_STARTUP_DELAY: Duration = Duration::from_secs(15);

/// Default period between cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Shortest period the timer accepts; shorter intervals are raised to it.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// When cycles run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoiSyncSchedule {
    /// Delay before the first cycle.
    pub startup_delay: Duration,
    /// Period between later cycles.
    pub interval: Duration,
}

impl Default for PoiSyncSchedule {
    fn default() -> Self {
        Self {
            startup_delay: DEFAULT_STARTUP_DELAY,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Spawns the timer task.
pub struct PoiSyncScheduler {
    service: Arc<PoiSyncService>,
    schedule: PoiSyncSchedule,
}

impl PoiSyncScheduler {
    /// Scheduler for `service`.
    pub fn new(service: Arc<PoiSyncService>, schedule: PoiSyncSchedule) -> Self {
        Self { service, schedule }
    }

    /// Start the timer on the current tokio runtime.
    pub fn spawn(self) -> SchedulerHandle {
        let (shutdown, stop) = watch::channel(false);
        let task = tokio::spawn(self.run(stop));
        SchedulerHandle { shutdown, task }
    }

    async fn run(self, mut stop: watch::Receiver<bool>) {
        let PoiSyncSchedule {
            startup_delay,
            interval,
        } = self.schedule;
        let interval = interval.max(MIN_POLL_INTERVAL);
        info!(
            startup_delay_secs = startup_delay.as_secs(),
            interval_secs = interval.as_secs(),
            "POI sync scheduler started"
        );

        tokio::select! {
            () = sleep(startup_delay) => {}
            _ = stop.changed() => return,
        }
        self.trigger();

        let mut ticker = interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = ticker.tick() => self.trigger(),
                _ = stop.changed() => break,
            }
        }
        info!("POI sync scheduler stopped");
    }

    fn trigger(&self) {
        debug!("POI sync cycle triggered");
        let service = Arc::clone(&self.service);
        tokio::spawn(async move {
            service.run_cycle().await;
        });
    }
}

/// Running scheduler.
#[derive(Debug)]
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Whether the timer task is still alive.
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop the timer and wait for it to exit. Cycles already started finish
    /// on their own.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(error) = self.task.await {
            tracing::warn!(%error, "POI sync scheduler task ended abnormally");
        }
    }
}
