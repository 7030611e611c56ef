//! Synchronization primitives used by the dispatcher and its lanes
//!
//! - [`AdmissionGate`]: counting permit gate that caps concurrent units per lane
//! - [`CompletionTracker`]: wait-group style join barrier over dispatched units

mod completion;
mod gate;

pub use completion::{CompletionToken, CompletionTracker};
pub use gate::{AdmissionGate, Permit};
