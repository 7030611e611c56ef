//! Lane executors and their worker threads

pub mod lane;
pub mod worker;

pub use lane::{Lane, LanePolicy, LaneStats};
pub use worker::{LaneWorker, WorkerStats};
