//! The bank: owns the customer queue and drains it through two lanes.

use crate::bank::{
    create_batch, create_batch_with, BankConfig, BankObserver, BankSummary, Clerk, Customer,
    NoopObserver, Task, TicketMachine,
};
use crate::core::{BankError, Job, Result};
use crate::pool::{Lane, LaneStats};
use crate::queue::ThreadSafeQueue;
use crate::sync::{CompletionToken, CompletionTracker};
use chrono::Utc;
use crossbeam_channel::{self as channel, Sender};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Coarse lifecycle state of a bank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum BankState {
    /// Not draining; customers may wait in the queue.
    Closed,
    /// `open()` is draining the queue.
    Open,
}

/// One dispatched unit: claims whichever customer is at the head when it
/// runs, which is not necessarily the one the dispatcher peeked.
struct ServiceJob {
    queue: Arc<ThreadSafeQueue<Customer>>,
    clerk: Arc<Clerk>,
    observer: Arc<dyn BankObserver>,
    routed_as: Task,
    claimed: Option<Sender<()>>,
    _token: CompletionToken,
}

impl Job for ServiceJob {
    fn execute(&mut self) -> Result<()> {
        let customer = self.queue.dequeue();
        if let Some(claimed) = self.claimed.take() {
            // The dispatcher may have stopped listening; nothing to do then.
            let _ = claimed.send(());
        }

        match customer {
            Some(customer) => {
                if customer.task() != self.routed_as {
                    log::debug!(
                        "customer {} claimed by the {} lane",
                        customer,
                        self.routed_as.lane_name()
                    );
                }
                self.clerk.work(&customer, self.observer.as_ref());
            }
            None => log::trace!("{} unit found the queue empty", self.routed_as.lane_name()),
        }
        Ok(())
    }

    fn job_type(&self) -> &str {
        "ServiceJob"
    }
}

/// A bank branch with a deposit lane and a loan lane.
///
/// Customers wait in a [`ThreadSafeQueue`]. [`open`](Bank::open) drains the
/// queue: it peeks the head to choose a lane, submits a unit to that lane,
/// and the unit dequeues a customer once the lane admits it. Deposits run
/// up to two at once; loans run one at a time in submission order. When the
/// queue is empty and every unit has finished, the bank closes and reports a
/// [`BankSummary`] to its observer.
///
/// # Example
///
/// ```rust
/// use bank_manager::prelude::*;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// # fn main() -> bank_manager::Result<()> {
/// let config = BankConfig::new()
///     .with_initial_customers(6)
///     .with_processing_time(Duration::from_millis(5));
/// let bank = Bank::new(config, Arc::new(LoggingObserver))?;
///
/// let summary = bank.open()?;
/// assert_eq!(summary.total_customers, 6);
/// assert_eq!(bank.queue_len(), 0);
/// # Ok(())
/// # }
/// ```
pub struct Bank {
    config: BankConfig,
    queue: Arc<ThreadSafeQueue<Customer>>,
    clerk: Arc<Clerk>,
    observer: Arc<dyn BankObserver>,
    tickets: Mutex<TicketMachine>,
    open: AtomicBool,
    served: Arc<AtomicU64>,
    in_flight: Arc<AtomicUsize>,
}

impl std::fmt::Debug for Bank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bank")
            .field("config", &self.config)
            .field("state", &self.state())
            .field("waiting", &self.queue.len())
            .field("in_flight", &self.in_flight())
            .field("served", &self.total_processed())
            .finish()
    }
}

impl Bank {
    /// Creates a bank and seeds `config.initial_customers` customers.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: BankConfig, observer: Arc<dyn BankObserver>) -> Result<Self> {
        config.validate()?;

        let served = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&served);
        let clerk = Clerk::with_completion(config.processing_time, move |_| {
            counter.fetch_add(1, Ordering::AcqRel);
        });

        let bank = Self {
            queue: Arc::new(ThreadSafeQueue::new()),
            clerk: Arc::new(clerk),
            observer,
            tickets: Mutex::new(TicketMachine::new()),
            open: AtomicBool::new(false),
            served,
            in_flight: Arc::new(AtomicUsize::new(0)),
            config,
        };
        bank.seed(bank.config.initial_customers);
        Ok(bank)
    }

    /// Creates a bank that reports to nobody.
    pub fn with_config(config: BankConfig) -> Result<Self> {
        Self::new(config, Arc::new(NoopObserver))
    }

    /// Appends `count` customers with random tasks and returns them.
    pub fn seed(&self, count: usize) -> Vec<Customer> {
        self.admit(count, |start| create_batch(count, start))
    }

    /// Appends one customer per task, in order, and returns them.
    pub fn seed_with<I>(&self, tasks: I) -> Vec<Customer>
    where
        I: IntoIterator<Item = Task>,
    {
        let tasks: Vec<Task> = tasks.into_iter().collect();
        let count = tasks.len();
        self.admit(count, |start| {
            let mut tasks = tasks.into_iter();
            create_batch_with(count, start, |_| tasks.next().unwrap_or(Task::Deposit))
        })
    }

    fn admit<F>(&self, count: usize, make_batch: F) -> Vec<Customer>
    where
        F: FnOnce(u64) -> Vec<Customer>,
    {
        // Holding the ticket lock keeps turn order equal to queue order.
        let mut tickets = self.tickets.lock();
        let batch = make_batch(tickets.issue(count));
        self.queue.extend(batch.iter().copied());
        drop(tickets);

        log::debug!("{}: {} customers joined the queue", self.config.name, batch.len());
        batch
    }

    /// Removes every waiting customer. Customers already claimed by a lane
    /// are still served.
    pub fn reset(&self) {
        self.queue.clear();
        log::debug!("{}: queue cleared", self.config.name);
    }

    /// Clears the queue and restarts turn numbering at 1.
    pub fn reset_turns(&self) {
        let mut tickets = self.tickets.lock();
        self.queue.clear();
        tickets.reset();
        log::debug!("{}: queue cleared and turns reset", self.config.name);
    }

    /// Removes and returns the next waiting customer.
    pub fn dequeue(&self) -> Option<Customer> {
        self.queue.dequeue()
    }

    /// Waiting customers in service order.
    pub fn waiting_customers(&self) -> Vec<Customer> {
        self.queue.snapshot()
    }

    /// Number of waiting customers.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Units dispatched and not yet finished.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Customers served since the bank was created.
    pub fn total_processed(&self) -> u64 {
        self.served.load(Ordering::Acquire)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> BankState {
        if self.open.load(Ordering::Acquire) {
            BankState::Open
        } else {
            BankState::Closed
        }
    }

    /// The configuration the bank was built with.
    pub fn config(&self) -> &BankConfig {
        &self.config
    }

    /// Drains the queue through the lanes, waits for every unit, closes,
    /// and returns the summary that was sent to the observer.
    ///
    /// An empty queue closes immediately with zero customers.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyOpen` if another call is draining, or an error if a
    /// lane cannot be started.
    pub fn open(&self) -> Result<BankSummary> {
        if self
            .open
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(BankError::already_open(&self.config.name));
        }

        let session_id = Uuid::new_v4();
        let started = Instant::now();
        let served_before = self.total_processed();
        log::info!(
            "{} opened (session {}): {} customers waiting",
            self.config.name,
            session_id,
            self.queue.len()
        );
        #[cfg(feature = "tracing")]
        crate::telemetry::metrics::record_bank_open(&self.config.name, self.queue.len());

        let (deposit, loan) = match self.drain() {
            Ok(stats) => stats,
            Err(e) => {
                log::error!("{} failed while draining: {}", self.config.name, e);
                self.open.store(false, Ordering::Release);
                return Err(e);
            }
        };

        let summary = BankSummary {
            session_id,
            bank_name: self.config.name.clone(),
            total_customers: self.total_processed() - served_before,
            total_processing_time: started.elapsed(),
            deposit,
            loan,
            closed_at: Utc::now(),
        };
        self.close(&summary);
        Ok(summary)
    }

    fn drain(&self) -> Result<(LaneStats, LaneStats)> {
        let tracker = CompletionTracker::with_counter(Arc::clone(&self.in_flight));
        let mut deposit = Lane::start(
            Task::Deposit,
            self.config.deposit_workers,
            &self.config.thread_name_prefix,
        )?;
        let mut loan = Lane::start(Task::Loan, 1, &self.config.thread_name_prefix)?;

        while !self.queue.is_empty() {
            let Some(head) = self.queue.peek() else {
                // Emptied between the check and the peek.
                break;
            };
            let lane = match head.task() {
                Task::Deposit => &deposit,
                Task::Loan => &loan,
            };

            let (claimed_tx, claimed_rx) = channel::bounded(1);
            lane.submit(ServiceJob {
                queue: Arc::clone(&self.queue),
                clerk: Arc::clone(&self.clerk),
                observer: Arc::clone(&self.observer),
                routed_as: head.task(),
                claimed: Some(claimed_tx),
                _token: tracker.register(),
            })?;
            #[cfg(feature = "tracing")]
            crate::telemetry::metrics::record_dispatch(head.task(), self.queue.len());

            // Wait for the unit's dequeue attempt before peeking again, so
            // no more units are dispatched than there are customers. A
            // disconnect means the unit was dropped without running.
            let _ = claimed_rx.recv();
        }

        tracker.wait();
        Ok((deposit.shutdown()?, loan.shutdown()?))
    }

    fn close(&self, summary: &BankSummary) {
        self.open.store(false, Ordering::Release);
        log::info!(
            "{} closed (session {}): {} customers in {:?}",
            summary.bank_name,
            summary.session_id,
            summary.total_customers,
            summary.total_processing_time
        );
        #[cfg(feature = "tracing")]
        crate::telemetry::metrics::record_bank_close(
            summary.total_customers,
            summary.total_processing_time,
        );
        self.observer.on_summary(summary);
    }
}
