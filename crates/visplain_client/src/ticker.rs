use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Owned periodic timer. Dropping the handle stops the timer.
#[derive(Debug)]
pub struct ProgressTicker {
    task: JoinHandle<()>,
}

impl ProgressTicker {
    /// Calls `on_tick` every `period`, first after one full period.
    /// The timer also stops on its own once `on_tick` returns `false`.
    pub fn spawn<F>(runtime: &Handle, period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let period = period.max(Duration::from_millis(1));
        let task = runtime.spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if !on_tick() {
                    break;
                }
            }
        });
        Self { task }
    }

    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.task.abort();
    }
}
