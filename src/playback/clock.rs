use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

/// Cancellable periodic driver for automatic playback.
///
/// The first tick fires one period after [`start`](Self::start). The tick callback runs
/// to completion before the next one is scheduled; returning `false` ends the task.
/// [`stop`](Self::stop) (or dropping the clock) cancels any pending tick.
pub struct PlaybackClock {
    period: Duration,
    task: Option<JoinHandle<()>>,
}

impl PlaybackClock {
    pub fn new(period: Duration) -> Self {
        Self { period, task: None }
    }

    /// Whether a tick task is scheduled and has not finished
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Spawn the tick task on `runtime`, replacing any running one
    pub fn start<F>(&mut self, runtime: &Handle, mut on_tick: F)
    where
        F: FnMut() -> bool + Send + 'static,
    {
        self.stop();

        let period = self.period;
        let first = Instant::now() + period;

        self.task = Some(runtime.spawn(async move {
            let mut interval = time::interval_at(first, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Burst);

            loop {
                interval.tick().await;
                if !on_tick() {
                    debug!("Playback clock finished");
                    break;
                }
            }
        }));
    }

    /// Cancel the pending tick, if any
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for PlaybackClock {
    fn drop(&mut self) {
        self.stop();
    }
}
