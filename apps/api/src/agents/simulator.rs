use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::errors::AgentResult;

/// Default delay between two checklist steps
pub const DEFAULT_STEP_INTERVAL: Duration = Duration::from_millis(800);

/// Where a tick left the task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// More steps remain
    Running,
    /// The task finished on this tick
    Finished,
}

/// Applies one simulator tick to a session
///
/// Implemented by the console so every tick goes through the same
/// single-writer path as operator actions.
#[async_trait]
pub trait TaskDriver: Send + Sync + 'static {
    async fn tick(&self, session_id: Uuid, task_id: Uuid) -> AgentResult<TickOutcome>;
}

struct TaskHandle {
    task_id: Uuid,
    token: CancellationToken,
}

/// Drives processing tasks with one interval timer per task
///
/// Each tick advances exactly one checklist step. Tasks are registered per
/// session; cancelling the handle stops the timer before its next tick.
#[derive(Clone)]
pub struct ProcessingSimulator {
    interval: Duration,
    tasks: Arc<Mutex<HashMap<Uuid, TaskHandle>>>,
}

impl Default for ProcessingSimulator {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_INTERVAL)
    }
}

impl ProcessingSimulator {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            tasks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Starts driving `task_id` on `session_id`
    ///
    /// A handle still registered for the session is cancelled first.
    pub async fn spawn(&self, session_id: Uuid, task_id: Uuid, driver: Arc<dyn TaskDriver>) {
        let token = CancellationToken::new();
        let previous = self.tasks.lock().await.insert(
            session_id,
            TaskHandle {
                task_id,
                token: token.clone(),
            },
        );
        if let Some(previous) = previous {
            warn!(
                session_id = %session_id,
                task_id = %previous.task_id,
                "Superseding processing task"
            );
            previous.token.cancel();
        }

        info!(session_id = %session_id, task_id = %task_id, "Processing task started");

        let period = self.interval;
        let tasks = self.tasks.clone();
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!(
                            session_id = %session_id,
                            task_id = %task_id,
                            "Processing task cancelled"
                        );
                        break;
                    }
                    _ = ticker.tick() => {
                        match driver.tick(session_id, task_id).await {
                            Ok(TickOutcome::Running) => {
                                debug!(
                                    session_id = %session_id,
                                    task_id = %task_id,
                                    "Step advanced"
                                );
                            }
                            Ok(TickOutcome::Finished) => {
                                info!(
                                    session_id = %session_id,
                                    task_id = %task_id,
                                    "Processing task finished"
                                );
                                break;
                            }
                            Err(e) => {
                                warn!(
                                    session_id = %session_id,
                                    task_id = %task_id,
                                    error = %e,
                                    "Dropping processing task"
                                );
                                break;
                            }
                        }
                    }
                }
            }

            let mut tasks = tasks.lock().await;
            if tasks.get(&session_id).map(|h| h.task_id) == Some(task_id) {
                tasks.remove(&session_id);
            }
        });
    }

    /// Cancels whatever task is registered for the session
    ///
    /// # Returns
    /// The id of the cancelled task, if one was registered
    pub async fn cancel(&self, session_id: Uuid) -> Option<Uuid> {
        let handle = self.tasks.lock().await.remove(&session_id)?;
        handle.token.cancel();
        Some(handle.task_id)
    }

    /// Whether a timer is still registered for the session
    pub async fn is_running(&self, session_id: Uuid) -> bool {
        self.tasks.lock().await.contains_key(&session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingDriver {
        ticks: AtomicUsize,
        finish_after: usize,
    }

    #[async_trait]
    impl TaskDriver for CountingDriver {
        async fn tick(&self, _session_id: Uuid, _task_id: Uuid) -> AgentResult<TickOutcome> {
            let ticks = self.ticks.fetch_add(1, Ordering::SeqCst) + 1;
            if ticks >= self.finish_after {
                Ok(TickOutcome::Finished)
            } else {
                Ok(TickOutcome::Running)
            }
        }
    }

    fn driver(finish_after: usize) -> Arc<CountingDriver> {
        Arc::new(CountingDriver {
            ticks: AtomicUsize::new(0),
            finish_after,
        })
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_interval_until_finished() {
        let simulator = ProcessingSimulator::new(Duration::from_millis(100));
        let driver = driver(3);
        let session_id = Uuid::new_v4();

        simulator.spawn(session_id, Uuid::new_v4(), driver.clone()).await;

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(driver.ticks.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(driver.ticks.load(Ordering::SeqCst), 3);
        assert!(!simulator.is_running(session_id).await);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_ticks() {
        let simulator = ProcessingSimulator::new(Duration::from_millis(100));
        let driver = driver(10);
        let session_id = Uuid::new_v4();
        let task_id = Uuid::new_v4();

        simulator.spawn(session_id, task_id, driver.clone()).await;
        tokio::time::sleep(Duration::from_millis(250)).await;

        assert_eq!(simulator.cancel(session_id).await, Some(task_id));
        tokio::time::sleep(Duration::from_millis(1000)).await;

        assert_eq!(driver.ticks.load(Ordering::SeqCst), 2);
        assert_eq!(simulator.cancel(session_id).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn respawn_supersedes_previous_task() {
        let simulator = ProcessingSimulator::new(Duration::from_millis(100));
        let first = driver(10);
        let second = driver(10);
        let session_id = Uuid::new_v4();

        simulator.spawn(session_id, Uuid::new_v4(), first.clone()).await;
        tokio::time::sleep(Duration::from_millis(150)).await;
        simulator.spawn(session_id, Uuid::new_v4(), second.clone()).await;
        tokio::time::sleep(Duration::from_millis(350)).await;

        assert_eq!(first.ticks.load(Ordering::SeqCst), 1);
        assert_eq!(second.ticks.load(Ordering::SeqCst), 3);
        assert!(simulator.is_running(session_id).await);
    }
}
