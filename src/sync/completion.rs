//! Join barrier for dispatched work.

use crossbeam_utils::sync::WaitGroup;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Counts outstanding work units and blocks until all of them finish.
///
/// Every unit registers before it is submitted and receives a
/// [`CompletionToken`]; dropping the token deregisters it, even when the
/// unit unwinds.
///
/// # Example
///
/// ```rust
/// use bank_manager::sync::CompletionTracker;
/// use std::thread;
///
/// let tracker = CompletionTracker::new();
/// for _ in 0..3 {
///     let token = tracker.register();
///     thread::spawn(move || drop(token));
/// }
/// let in_flight = tracker.counter();
/// tracker.wait();
/// assert_eq!(in_flight.load(std::sync::atomic::Ordering::Acquire), 0);
/// ```
#[derive(Debug)]
pub struct CompletionTracker {
    group: WaitGroup,
    in_flight: Arc<AtomicUsize>,
}

impl Default for CompletionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionTracker {
    /// Creates a tracker with its own in-flight counter.
    pub fn new() -> Self {
        Self::with_counter(Arc::new(AtomicUsize::new(0)))
    }

    /// Creates a tracker that reports into an existing counter.
    pub fn with_counter(in_flight: Arc<AtomicUsize>) -> Self {
        Self {
            group: WaitGroup::new(),
            in_flight,
        }
    }

    /// Registers one unit of work.
    pub fn register(&self) -> CompletionToken {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        CompletionToken {
            _group: self.group.clone(),
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    /// Units registered and not yet finished.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// The shared in-flight counter.
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.in_flight)
    }

    /// Blocks until every token has been dropped.
    pub fn wait(self) {
        self.group.wait();
    }
}

/// Proof of registration with a [`CompletionTracker`].
#[derive(Debug)]
pub struct CompletionToken {
    _group: WaitGroup,
    in_flight: Arc<AtomicUsize>,
}

impl Drop for CompletionToken {
    fn drop(&mut self) {
        // Runs before `_group` is released, so waiters see zero.
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_wait_with_nothing_registered_returns() {
        let tracker = CompletionTracker::new();
        assert_eq!(tracker.in_flight(), 0);
        tracker.wait();
    }

    #[test]
    fn test_register_and_drop() {
        let tracker = CompletionTracker::new();
        let a = tracker.register();
        let b = tracker.register();
        assert_eq!(tracker.in_flight(), 2);

        drop(a);
        assert_eq!(tracker.in_flight(), 1);
        drop(b);
        assert_eq!(tracker.in_flight(), 0);
    }

    #[test]
    fn test_wait_blocks_until_all_done() {
        let tracker = CompletionTracker::new();
        let finished = Arc::new(AtomicBool::new(false));

        let token = tracker.register();
        let flag = Arc::clone(&finished);
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            flag.store(true, Ordering::SeqCst);
            drop(token);
        });

        let counter = tracker.counter();
        tracker.wait();
        assert!(finished.load(Ordering::SeqCst));
        assert_eq!(counter.load(Ordering::Acquire), 0);
        handle.join().unwrap();
    }

    #[test]
    fn test_token_released_on_panic() {
        let tracker = CompletionTracker::new();
        let token = tracker.register();

        let handle = thread::spawn(move || {
            let _token = token;
            panic!("unit failed");
        });
        assert!(handle.join().is_err());

        assert_eq!(tracker.in_flight(), 0);
        tracker.wait();
    }
}
