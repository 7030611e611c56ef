//! Structured events for the bank's lanes, emitted through `tracing`.
//!
//! Only compiled with the `tracing` feature. Field names follow the
//! `counter.*` / `gauge.*` / `histogram.*` convention so a metrics layer
//! can pick them up without further mapping.
//!
//! ```rust,ignore
//! use tracing_subscriber::{fmt, prelude::*, EnvFilter};
//!
//! tracing_subscriber::registry()
//!     .with(fmt::layer())
//!     .with(EnvFilter::new("bank_manager=trace"))
//!     .init();
//! ```

/// Metric-style events for dispatch, lane workers and bank sessions.
pub mod metrics {
    use crate::bank::Task;
    use std::time::Duration;

    /// Records a unit dispatched to `lane`.
    #[inline]
    pub fn record_dispatch(lane: Task, queue_depth: usize) {
        tracing::trace!(
            counter.units_dispatched = 1,
            gauge.queue_depth = queue_depth as i64,
            lane = lane.lane_name(),
            "unit dispatched"
        );
    }

    /// Records a unit that finished, successfully or not.
    #[inline]
    pub fn record_completion(lane: Task, duration: Duration, success: bool) {
        let duration_ms = duration.as_millis() as u64;
        if success {
            tracing::trace!(
                counter.units_completed = 1,
                histogram.unit_duration_ms = duration_ms,
                lane = lane.lane_name(),
                "unit completed"
            );
        } else {
            tracing::trace!(
                counter.units_failed = 1,
                histogram.unit_duration_ms = duration_ms,
                lane = lane.lane_name(),
                "unit failed"
            );
        }
    }

    /// Records a unit that panicked.
    #[inline]
    pub fn record_panic(lane: Task, duration: Duration) {
        tracing::trace!(
            counter.units_panicked = 1,
            histogram.unit_duration_ms = duration.as_millis() as u64,
            lane = lane.lane_name(),
            "unit panicked"
        );
    }

    /// Records a lane worker holding a permit.
    #[inline]
    pub fn record_worker_busy(lane: Task, worker_id: usize) {
        tracing::trace!(
            gauge.workers_busy = 1,
            lane = lane.lane_name(),
            worker_id = worker_id,
            "worker busy"
        );
    }

    /// Records a lane worker releasing its permit.
    #[inline]
    pub fn record_worker_idle(lane: Task, worker_id: usize) {
        tracing::trace!(
            gauge.workers_busy = -1i64,
            lane = lane.lane_name(),
            worker_id = worker_id,
            "worker idle"
        );
    }

    /// Records the start of a session.
    #[inline]
    pub fn record_bank_open(bank_name: &str, waiting: usize) {
        tracing::info!(bank = bank_name, waiting = waiting, "bank opened");
    }

    /// Records the end of a session.
    #[inline]
    pub fn record_bank_close(customers: u64, elapsed: Duration) {
        tracing::info!(
            customers = customers,
            elapsed_ms = elapsed.as_millis() as u64,
            "bank closed"
        );
    }
}
