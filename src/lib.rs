//! # Bank Manager
//!
//! A bank branch simulation built on a small threading toolkit: a shared
//! customer queue, two execution lanes with fixed concurrency caps, and a
//! dispatcher that drains the queue and reports once all work is done.
//!
//! ## Features
//!
//! - **Thread-safe queue**: FIFO under a single lock, shared by the dispatcher and the lanes
//! - **Lanes**: deposits run at most two at a time, loans run strictly one at a time
//! - **Admission gate**: permit-based cap independent of the number of lane threads
//! - **Completion barrier**: the summary is reported only after every dispatched unit finished
//! - **Panic isolation**: a failing observer cannot take down a lane worker
//! - **Observers**: start, finish and summary notifications for a presentation layer
//!
//! ## Quick Start
//!
//! ```rust
//! use bank_manager::prelude::*;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # fn main() -> Result<()> {
//! let config = BankConfig::new()
//!     .with_initial_customers(10)
//!     .with_processing_time(Duration::from_millis(5));
//! let bank = Bank::new(config, Arc::new(LoggingObserver))?;
//!
//! let summary = bank.open()?;
//! println!("{}", summary.closing_message());
//! assert_eq!(summary.total_customers, 10);
//! # Ok(())
//! # }
//! ```
//!
//! ## Choosing the customers
//!
//! ```rust
//! use bank_manager::prelude::*;
//! use std::time::Duration;
//!
//! # fn main() -> Result<()> {
//! let config = BankConfig::new()
//!     .with_initial_customers(0)
//!     .with_processing_time(Duration::ZERO);
//! let bank = Bank::with_config(config)?;
//!
//! bank.seed_with([Task::Deposit, Task::Loan, Task::Deposit]);
//! assert_eq!(bank.queue_len(), 3);
//!
//! let summary = bank.open()?;
//! assert_eq!(summary.deposit.jobs_processed + summary.loan.jobs_processed, 3);
//! assert!(summary.deposit.peak_running <= 2);
//! assert!(summary.loan.peak_running <= 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Running arbitrary work on a lane
//!
//! ```rust
//! use bank_manager::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let mut lane = Lane::start(Task::Loan, 1, "demo")?;
//! for i in 0..3 {
//!     lane.execute(move || {
//!         println!("loan step {}", i);
//!         Ok(())
//!     })?;
//! }
//! let stats = lane.shutdown()?;
//! assert_eq!(stats.jobs_processed, 3);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bank;
pub mod core;
pub mod pool;
pub mod prelude;
pub mod queue;
pub mod sync;

#[cfg(feature = "tracing")]
pub mod telemetry;

pub use bank::{Bank, BankConfig, BankObserver, BankSummary, Customer, Task};
pub use core::{BankError, BoxedJob, ClosureJob, Job, Result};
pub use queue::ThreadSafeQueue;
