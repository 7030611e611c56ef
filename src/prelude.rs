//! Convenient re-exports for common types and traits

pub use crate::bank::{
    Bank, BankConfig, BankObserver, BankState, BankSummary, Clerk, Customer, LoggingObserver,
    NoopObserver, Task,
};
pub use crate::core::{BankError, BoxedJob, ClosureJob, Job, Result};
pub use crate::pool::{Lane, LanePolicy, LaneStats, WorkerStats};
pub use crate::queue::ThreadSafeQueue;
pub use crate::sync::{AdmissionGate, CompletionTracker};
