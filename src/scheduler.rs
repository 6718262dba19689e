//! Recurring task scheduling
//!
//! The provider does not own its timing. It hands one named job to a
//! [`Scheduler`], which decides when the job runs, how long a run may take
//! and what happens when a run fails.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// The closure a scheduler invokes on each run
pub type TaskFn = Arc<dyn Fn() -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// When and for how long a recurring task runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleDefinition {
    pub frequency: Duration,
    pub timeout: Duration,
    pub initial_delay: Duration,
}

/// Capability for registering recurring jobs
#[cfg_attr(test, mockall::automock)]
pub trait Scheduler: Send + Sync {
    fn schedule_task(&self, id: &str, schedule: &ScheduleDefinition, task: TaskFn);
}

/// Scheduler backed by tokio tasks, one per registered job
#[derive(Default)]
pub struct TokioScheduler {
    handles: Mutex<Vec<(String, JoinHandle<()>)>>,
}

impl TokioScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered jobs that have not finished
    pub fn active_jobs(&self) -> usize {
        self.handles
            .lock()
            .map(|h| h.iter().filter(|(_, handle)| !handle.is_finished()).count())
            .unwrap_or(0)
    }

    /// Abort every registered job
    pub fn shutdown(&self) {
        if let Ok(mut handles) = self.handles.lock() {
            for (id, handle) in handles.drain(..) {
                debug!(job = %id, "Aborting scheduled job");
                handle.abort();
            }
        }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_task(&self, id: &str, schedule: &ScheduleDefinition, task: TaskFn) {
        let job_id = id.to_string();
        let schedule = schedule.clone();

        if schedule.frequency.is_zero() {
            error!(job = %job_id, "Refusing to schedule job with zero frequency");
            return;
        }

        info!(
            job = %job_id,
            frequency_secs = schedule.frequency.as_secs(),
            timeout_secs = schedule.timeout.as_secs(),
            "Scheduling recurring job"
        );

        let handle = tokio::spawn(run_job(job_id.clone(), schedule, task));

        match self.handles.lock() {
            Ok(mut handles) => handles.push((job_id, handle)),
            Err(_) => warn!(job = %job_id, "Scheduler handle registry poisoned, job untracked"),
        }
    }
}

async fn run_job(id: String, schedule: ScheduleDefinition, task: TaskFn) {
    if !schedule.initial_delay.is_zero() {
        tokio::time::sleep(schedule.initial_delay).await;
    }

    let mut ticker = tokio::time::interval(schedule.frequency);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        debug!(job = %id, "Running scheduled job");

        match tokio::time::timeout(schedule.timeout, task()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(job = %id, error = %e, "Scheduled job failed"),
            Err(_) => error!(
                job = %id,
                timeout_secs = schedule.timeout.as_secs(),
                "Scheduled job timed out"
            ),
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}
