//! The clerk performs the simulated work for one customer at a time.

use crate::bank::{BankObserver, Customer};
use std::fmt;
use std::thread;
use std::time::Duration;

type CompletionCallback = Box<dyn Fn(&Customer) + Send + Sync>;

/// Serves customers by blocking the calling thread for a fixed time.
///
/// The clerk has no reference to its bank. Whoever builds it may pass a
/// completion callback, which is how the bank counts served customers.
pub struct Clerk {
    processing_time: Duration,
    on_complete: Option<CompletionCallback>,
}

impl fmt::Debug for Clerk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clerk")
            .field("processing_time", &self.processing_time)
            .field("on_complete", &self.on_complete.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl Clerk {
    /// Creates a clerk with no completion callback.
    pub fn new(processing_time: Duration) -> Self {
        Self {
            processing_time,
            on_complete: None,
        }
    }

    /// Creates a clerk that calls `on_complete` after each customer.
    pub fn with_completion<F>(processing_time: Duration, on_complete: F) -> Self
    where
        F: Fn(&Customer) + Send + Sync + 'static,
    {
        Self {
            processing_time,
            on_complete: Some(Box::new(on_complete)),
        }
    }

    /// Time spent on each customer.
    pub fn processing_time(&self) -> Duration {
        self.processing_time
    }

    /// Serves `customer`: notifies `observer` that work started, sleeps for
    /// the processing time, notifies that work finished, then reports the
    /// completion.
    pub fn work(&self, customer: &Customer, observer: &dyn BankObserver) {
        observer.on_start(customer);
        log::debug!("Clerk serving customer {}", customer);

        thread::sleep(self.processing_time);

        observer.on_finish(customer);
        if let Some(on_complete) = &self.on_complete {
            on_complete(customer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::Task;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Instant;

    #[derive(Default)]
    struct EventLog {
        events: Mutex<Vec<String>>,
    }

    impl BankObserver for EventLog {
        fn on_start(&self, customer: &Customer) {
            self.events.lock().push(format!("start {}", customer.turn()));
        }

        fn on_finish(&self, customer: &Customer) {
            self.events.lock().push(format!("finish {}", customer.turn()));
        }
    }

    #[test]
    fn test_work_fires_start_then_finish() {
        let clerk = Clerk::new(Duration::from_millis(1));
        let log = EventLog::default();

        clerk.work(&Customer::new(4, Task::Deposit), &log);

        assert_eq!(*log.events.lock(), vec!["start 4", "finish 4"]);
    }

    #[test]
    fn test_work_takes_processing_time() {
        let clerk = Clerk::new(Duration::from_millis(30));
        let start = Instant::now();
        clerk.work(&Customer::new(1, Task::Loan), &crate::bank::NoopObserver);
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_completion_callback_runs_after_finish() {
        let served = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&served);
        let clerk = Clerk::with_completion(Duration::ZERO, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        clerk.work(&Customer::new(1, Task::Deposit), &crate::bank::NoopObserver);
        clerk.work(&Customer::new(2, Task::Loan), &crate::bank::NoopObserver);

        assert_eq!(served.load(Ordering::SeqCst), 2);
    }
}
