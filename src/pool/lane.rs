//! Lane executors with per-lane concurrency policies

use crate::bank::Task;
use crate::core::{BankError, BoxedJob, ClosureJob, Job, Result};
use crate::pool::worker::{LaneWorker, WorkerStats};
use crate::sync::AdmissionGate;
use crossbeam_channel::{self as channel, Sender};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// How many units of a lane may run at once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum LanePolicy {
    /// Up to `max_running` units run simultaneously; start order is best effort.
    Concurrent {
        /// Admission gate capacity
        max_running: usize,
    },
    /// One unit at a time, in submission order.
    Serial,
}

impl LanePolicy {
    /// The fixed policy for a task kind.
    pub fn for_task(task: Task) -> Self {
        match task.lane_capacity() {
            1 => LanePolicy::Serial,
            max_running => LanePolicy::Concurrent { max_running },
        }
    }

    /// Admission gate capacity for this policy.
    pub fn max_running(&self) -> usize {
        match self {
            LanePolicy::Concurrent { max_running } => *max_running,
            LanePolicy::Serial => 1,
        }
    }
}

/// Point-in-time statistics for one lane.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LaneStats {
    /// Jobs accepted by the lane.
    pub jobs_submitted: u64,
    /// Jobs that ran to completion.
    pub jobs_processed: u64,
    /// Jobs that returned an error.
    pub jobs_failed: u64,
    /// Jobs that panicked.
    pub jobs_panicked: u64,
    /// Highest number of jobs that held a permit at the same time.
    pub peak_running: usize,
    /// Time spent inside jobs, summed over all workers.
    pub total_processing_time: Duration,
}

/// An executor for one task kind.
///
/// Jobs go into an unbounded FIFO channel drained by the lane's workers.
/// Every worker needs a permit from the lane's [`AdmissionGate`] before it
/// runs a job, so no more than [`LanePolicy::max_running`] jobs execute at
/// once no matter how many workers the lane has. A serial lane always has a
/// single worker, which keeps execution in submission order.
///
/// # Example
///
/// ```rust
/// use bank_manager::bank::Task;
/// use bank_manager::pool::Lane;
///
/// # fn main() -> bank_manager::Result<()> {
/// let mut lane = Lane::start(Task::Loan, 1, "bank")?;
/// lane.execute(|| Ok(()))?;
/// let stats = lane.shutdown()?;
/// assert_eq!(stats.jobs_processed, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Lane {
    task: Task,
    policy: LanePolicy,
    sender: Option<Sender<BoxedJob>>,
    workers: Vec<LaneWorker>,
    gate: Arc<AdmissionGate>,
    jobs_submitted: AtomicU64,
}

impl Lane {
    /// Spawns the workers for `task`'s lane.
    ///
    /// `workers` is ignored for serial lanes, which always run one worker.
    ///
    /// # Errors
    ///
    /// Returns an error if `workers` is 0 or a worker thread fails to spawn.
    pub fn start(task: Task, workers: usize, thread_name_prefix: &str) -> Result<Self> {
        let policy = LanePolicy::for_task(task);
        let worker_count = match policy {
            LanePolicy::Serial => 1,
            LanePolicy::Concurrent { .. } => workers,
        };
        if worker_count == 0 {
            return Err(BankError::invalid_config(
                "workers",
                format!("{} lane needs at least one worker", task.lane_name()),
            ));
        }

        let (sender, receiver) = channel::unbounded();
        let gate = Arc::new(AdmissionGate::new(task.lane_name(), policy.max_running()));

        let mut spawned = Vec::with_capacity(worker_count);
        for id in 0..worker_count {
            match LaneWorker::new(
                id,
                task,
                receiver.clone(),
                Arc::clone(&gate),
                thread_name_prefix,
            ) {
                Ok(worker) => spawned.push(worker),
                Err(e) => {
                    // Disconnect before the spawned workers are joined on drop.
                    drop(sender);
                    return Err(e);
                }
            }
        }

        log::debug!(
            "{} lane started: {:?} with {} workers",
            task.lane_name(),
            policy,
            worker_count
        );

        Ok(Self {
            task,
            policy,
            sender: Some(sender),
            workers: spawned,
            gate,
            jobs_submitted: AtomicU64::new(0),
        })
    }

    /// Queues a job on the lane.
    pub fn submit<J: Job + 'static>(&self, job: J) -> Result<()> {
        self.submit_boxed(Box::new(job))
    }

    /// Queues an already boxed job on the lane.
    pub fn submit_boxed(&self, job: BoxedJob) -> Result<()> {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| BankError::lane_closed(self.task.lane_name()))?;
        sender
            .send(job)
            .map_err(|_| BankError::lane_closed(self.task.lane_name()))?;
        self.jobs_submitted.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Queues a closure on the lane.
    pub fn execute<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        self.submit(ClosureJob::new(f))
    }

    /// The task kind this lane serves.
    pub fn task(&self) -> Task {
        self.task
    }

    /// The lane's concurrency policy.
    pub fn policy(&self) -> LanePolicy {
        self.policy
    }

    /// Number of worker threads.
    pub fn num_workers(&self) -> usize {
        self.workers.len()
    }

    /// Jobs currently holding a permit.
    pub fn running(&self) -> usize {
        self.gate.running()
    }

    /// Current statistics.
    pub fn stats(&self) -> LaneStats {
        let workers: Vec<_> = self.workers.iter().map(LaneWorker::stats).collect();
        self.collect_stats(&workers)
    }

    fn collect_stats(&self, workers: &[Arc<WorkerStats>]) -> LaneStats {
        let mut stats = LaneStats {
            jobs_submitted: self.jobs_submitted.load(Ordering::Relaxed),
            peak_running: self.gate.peak(),
            ..LaneStats::default()
        };
        for ws in workers {
            stats.jobs_processed += ws.get_jobs_processed();
            stats.jobs_failed += ws.get_jobs_failed();
            stats.jobs_panicked += ws.get_jobs_panicked();
            stats.total_processing_time += ws.get_total_processing_time();
        }
        stats
    }

    /// Stops accepting jobs, waits for the queued ones to run, and joins
    /// the workers.
    pub fn shutdown(&mut self) -> Result<LaneStats> {
        // Dropping the only sender lets the workers drain and exit.
        self.sender.take();

        let worker_stats: Vec<_> = self.workers.iter().map(LaneWorker::stats).collect();
        for worker in std::mem::take(&mut self.workers) {
            worker.join()?;
        }
        let stats = self.collect_stats(&worker_stats);

        log::debug!(
            "{} lane shut down: {} processed, peak {} running",
            self.task.lane_name(),
            stats.jobs_processed,
            stats.peak_running
        );
        Ok(stats)
    }
}

impl Drop for Lane {
    fn drop(&mut self) {
        if self.sender.is_some() || !self.workers.is_empty() {
            if let Err(e) = self.shutdown() {
                log::error!(
                    "Failed to shut down {} lane during drop: {}",
                    self.task.lane_name(),
                    e
                );
            }
        }
    }
}
