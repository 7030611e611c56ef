//! Lane worker thread implementation

use crate::bank::Task;
use crate::core::{BankError, BoxedJob, Result};
use crate::sync::AdmissionGate;
use crossbeam_channel::Receiver;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[cfg(feature = "tracing")]
use tracing::{span, Level};

/// Statistics for a lane worker thread
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Total number of jobs processed
    pub jobs_processed: AtomicU64,
    /// Total number of jobs that failed
    pub jobs_failed: AtomicU64,
    /// Total number of jobs that panicked
    pub jobs_panicked: AtomicU64,
    /// Total time spent processing jobs (microseconds)
    pub total_processing_time_us: AtomicU64,
}

impl WorkerStats {
    /// Create new worker statistics
    pub fn new() -> Self {
        Self::default()
    }

    fn increment_processed(&self) {
        self.jobs_processed.fetch_add(1, Ordering::Relaxed);
    }

    fn increment_failed(&self) {
        self.jobs_failed.fetch_add(1, Ordering::Relaxed);
    }

    fn increment_panicked(&self) {
        self.jobs_panicked.fetch_add(1, Ordering::Relaxed);
    }

    fn add_processing_time(&self, elapsed: Duration) {
        self.total_processing_time_us
            .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
    }

    /// Get total jobs processed
    pub fn get_jobs_processed(&self) -> u64 {
        self.jobs_processed.load(Ordering::Relaxed)
    }

    /// Get total jobs failed
    pub fn get_jobs_failed(&self) -> u64 {
        self.jobs_failed.load(Ordering::Relaxed)
    }

    /// Get total jobs panicked
    pub fn get_jobs_panicked(&self) -> u64 {
        self.jobs_panicked.load(Ordering::Relaxed)
    }

    /// Get total time spent inside jobs
    pub fn get_total_processing_time(&self) -> Duration {
        Duration::from_micros(self.total_processing_time_us.load(Ordering::Relaxed))
    }
}

/// A worker thread that pulls jobs from its lane and runs each one under an
/// admission permit.
#[derive(Debug)]
pub struct LaneWorker {
    id: usize,
    lane: Task,
    thread: Option<thread::JoinHandle<()>>,
    stats: Arc<WorkerStats>,
}

impl LaneWorker {
    /// Create and start a new worker
    ///
    /// # Arguments
    ///
    /// * `id` - Identifier of this worker within its lane
    /// * `lane` - The task kind the lane serves
    /// * `jobs` - Receiving end of the lane's job channel
    /// * `gate` - Admission gate shared by every worker of the lane
    /// * `thread_name_prefix` - Prefix for the thread name
    ///
    /// # Shutdown Behavior
    ///
    /// Workers exit once every sender of `jobs` is dropped and the channel
    /// is drained, so all submitted jobs run before the worker stops.
    pub fn new(
        id: usize,
        lane: Task,
        jobs: Receiver<BoxedJob>,
        gate: Arc<AdmissionGate>,
        thread_name_prefix: &str,
    ) -> Result<Self> {
        let stats = Arc::new(WorkerStats::new());
        let stats_clone = Arc::clone(&stats);

        let thread = thread::Builder::new()
            .name(format!("{}-{}-{}", thread_name_prefix, lane.lane_name(), id))
            .spawn(move || {
                Self::run(id, lane, jobs, gate, stats_clone);
            })
            .map_err(|e| {
                BankError::spawn_with_source(lane.lane_name(), id, e.to_string(), e)
            })?;

        Ok(Self {
            id,
            lane,
            thread: Some(thread),
            stats,
        })
    }

    /// Get worker ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Get the lane this worker serves
    pub fn lane(&self) -> Task {
        self.lane
    }

    /// Get worker statistics
    pub fn stats(&self) -> Arc<WorkerStats> {
        Arc::clone(&self.stats)
    }

    /// Join the worker thread
    pub fn join(mut self) -> Result<()> {
        if let Some(thread) = self.thread.take() {
            thread
                .join()
                .map_err(|_| BankError::join(self.lane.lane_name(), self.id, "Worker panicked"))?;
        }
        Ok(())
    }

    fn run(
        id: usize,
        lane: Task,
        jobs: Receiver<BoxedJob>,
        gate: Arc<AdmissionGate>,
        stats: Arc<WorkerStats>,
    ) {
        #[cfg(feature = "tracing")]
        let worker_span = span!(Level::DEBUG, "lane_worker", lane = lane.lane_name(), id = id);
        #[cfg(feature = "tracing")]
        let _guard = worker_span.enter();

        log::debug!("{} worker {} started", lane.lane_name(), id);

        for mut job in jobs.iter() {
            let permit = match gate.acquire() {
                Ok(permit) => permit,
                Err(e) => {
                    log::error!("{} worker {}: {}; dropping job", lane.lane_name(), id, e);
                    stats.increment_failed();
                    continue;
                }
            };

            #[cfg(feature = "tracing")]
            crate::telemetry::metrics::record_worker_busy(lane, id);

            Self::execute_job(id, lane, &mut job, &stats);
            drop(permit);

            #[cfg(feature = "tracing")]
            crate::telemetry::metrics::record_worker_idle(lane, id);
        }

        log::debug!(
            "{} worker {} shutting down after {} jobs ({} failed, {} panicked)",
            lane.lane_name(),
            id,
            stats.get_jobs_processed(),
            stats.get_jobs_failed(),
            stats.get_jobs_panicked()
        );
    }

    /// Execute a single job with panic protection
    fn execute_job(id: usize, lane: Task, job: &mut BoxedJob, stats: &WorkerStats) {
        let start = Instant::now();
        let panic_result = catch_unwind(AssertUnwindSafe(|| job.execute()));
        let elapsed = start.elapsed();

        match panic_result {
            Ok(Ok(())) => {
                stats.increment_processed();
                #[cfg(feature = "tracing")]
                crate::telemetry::metrics::record_completion(lane, elapsed, true);
            }
            Ok(Err(e)) => {
                log::warn!(
                    "{} worker {}: {} failed after {:?}: {}",
                    lane.lane_name(),
                    id,
                    job.job_type(),
                    elapsed,
                    e
                );
                #[cfg(feature = "tracing")]
                crate::telemetry::metrics::record_completion(lane, elapsed, false);
                stats.increment_failed();
            }
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                log::error!(
                    "{} worker {}: {} panicked: {}",
                    lane.lane_name(),
                    id,
                    job.job_type(),
                    panic_msg
                );
                #[cfg(feature = "tracing")]
                crate::telemetry::metrics::record_panic(lane, elapsed);
                stats.increment_panicked();
            }
        }

        stats.add_processing_time(elapsed);
    }
}

impl Drop for LaneWorker {
    fn drop(&mut self) {
        if let Some(thread) = self.thread.take() {
            // Only reached when the lane was not shut down; the channel is
            // already disconnected by then, so the thread is finishing.
            if thread.join().is_err() {
                log::error!(
                    "{} worker {} panicked during shutdown",
                    self.lane.lane_name(),
                    self.id
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ClosureJob;
    use crossbeam_channel as channel;

    fn spawn_worker(lane: Task, capacity: usize) -> (channel::Sender<BoxedJob>, LaneWorker) {
        let (tx, rx) = channel::unbounded();
        let gate = Arc::new(AdmissionGate::new(lane.lane_name(), capacity));
        let worker = LaneWorker::new(0, lane, rx, gate, "test").expect("Failed to create worker");
        (tx, worker)
    }

    #[test]
    fn test_worker_creation() {
        let (tx, worker) = spawn_worker(Task::Loan, 1);
        assert_eq!(worker.id(), 0);
        assert_eq!(worker.lane(), Task::Loan);

        drop(tx);
        worker.join().expect("Failed to join worker");
    }

    #[test]
    fn test_worker_runs_all_jobs_before_exit() {
        let (tx, worker) = spawn_worker(Task::Deposit, 2);
        let stats = worker.stats();

        for _ in 0..5 {
            tx.send(Box::new(ClosureJob::new(|| Ok(()))))
                .expect("Failed to send job");
        }
        tx.send(Box::new(ClosureJob::new(|| {
            Err(BankError::other("teller error"))
        })))
        .expect("Failed to send job");

        drop(tx);
        worker.join().expect("Failed to join worker");

        assert_eq!(stats.get_jobs_processed(), 5);
        assert_eq!(stats.get_jobs_failed(), 1);
        assert_eq!(stats.get_jobs_panicked(), 0);
    }

    #[test]
    fn test_worker_panic_handling() {
        let (tx, worker) = spawn_worker(Task::Loan, 1);
        let stats = worker.stats();

        tx.send(Box::new(ClosureJob::new(|| {
            panic!("Intentional panic for testing");
        })))
        .expect("Failed to send panicking job");
        tx.send(Box::new(ClosureJob::new(|| Ok(()))))
            .expect("Failed to send normal job");

        drop(tx);
        worker.join().expect("Failed to join worker");

        // The worker kept going after the panic.
        assert_eq!(stats.get_jobs_panicked(), 1);
        assert_eq!(stats.get_jobs_processed(), 1);
    }
}
