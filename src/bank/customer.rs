//! Customers, their task kinds, and turn numbering.
//!
//! A [`Customer`] is an immutable pair of a turn number and a [`Task`]. Turn
//! numbers come from a [`TicketMachine`] so that batches seeded at different
//! times never reuse a number within one session.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of work a customer came in for.
///
/// Each task kind is served by its own lane with a fixed concurrency policy:
/// deposits run up to two at a time, loans strictly one at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Task {
    /// Served on the deposit lane, up to two at once.
    Deposit,
    /// Served on the loan lane, one at a time.
    Loan,
}

impl Task {
    /// Every task kind, in lane order.
    pub const ALL: [Task; 2] = [Task::Deposit, Task::Loan];

    /// Picks a task kind uniformly at random.
    pub fn random() -> Self {
        if fastrand::bool() {
            Task::Deposit
        } else {
            Task::Loan
        }
    }

    /// Maximum number of customers of this kind served simultaneously.
    pub const fn lane_capacity(&self) -> usize {
        match self {
            Task::Deposit => 2,
            Task::Loan => 1,
        }
    }

    /// Lowercase lane name used for thread names and logs.
    pub const fn lane_name(&self) -> &'static str {
        match self {
            Task::Deposit => "deposit",
            Task::Loan => "loan",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Task::Deposit => write!(f, "Deposit"),
            Task::Loan => write!(f, "Loan"),
        }
    }
}

/// A customer waiting in, or being served from, the bank queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Customer {
    turn: u64,
    task: Task,
}

impl Customer {
    /// Creates a customer with an explicit turn and task.
    pub fn new(turn: u64, task: Task) -> Self {
        Self { turn, task }
    }

    /// The customer's 1-based position number.
    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// The customer's task kind.
    pub fn task(&self) -> Task {
        self.task
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.turn, self.task)
    }
}

/// Creates `count` customers numbered `start_turn..start_turn + count`, each
/// with an independently random task.
pub fn create_batch(count: usize, start_turn: u64) -> Vec<Customer> {
    create_batch_with(count, start_turn, |_| Task::random())
}

/// Creates `count` customers numbered from `start_turn`, asking `assign` for
/// the task of each turn in order.
pub fn create_batch_with<F>(count: usize, start_turn: u64, mut assign: F) -> Vec<Customer>
where
    F: FnMut(u64) -> Task,
{
    (start_turn..start_turn + count as u64)
        .map(|turn| Customer::new(turn, assign(turn)))
        .collect()
}

/// Hands out turn numbers, starting at 1.
#[derive(Debug, Default, Clone)]
pub struct TicketMachine {
    issued: u64,
}

impl TicketMachine {
    /// Creates a machine that has issued nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves `count` consecutive turns and returns the first one.
    pub fn issue(&mut self, count: usize) -> u64 {
        let start = self.issued + 1;
        self.issued += count as u64;
        start
    }

    /// The last turn handed out, or 0 if none.
    pub fn current(&self) -> u64 {
        self.issued
    }

    /// Starts numbering from 1 again.
    pub fn reset(&mut self) {
        self.issued = 0;
    }
}
