//! Core types and traits shared by the queue, lanes and dispatcher

pub mod error;
pub mod job;

pub use error::{BankError, Result};
pub use job::{BoxedJob, ClosureJob, Job};
