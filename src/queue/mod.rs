//! Mutex-guarded FIFO shared between the dispatcher and the lanes.
//!
//! [`ThreadSafeQueue`] is the sole owner of customers that have not been
//! handed to a lane yet. Every operation takes the single internal lock, so
//! each call is linearizable on its own, but nothing spans two calls: a
//! `peek()` followed by a `dequeue()` may observe different heads when other
//! threads are mutating the queue in between.
//!
//! # Example
//!
//! ```rust
//! use bank_manager::queue::ThreadSafeQueue;
//!
//! let queue = ThreadSafeQueue::new();
//! queue.enqueue(1);
//! queue.enqueue(2);
//!
//! assert_eq!(queue.peek(), Some(1));
//! assert_eq!(queue.dequeue(), Some(1));
//! assert_eq!(queue.dequeue(), Some(2));
//! assert_eq!(queue.dequeue(), None);
//! ```

use parking_lot::Mutex;
use std::collections::VecDeque;

/// A FIFO queue whose operations are mutually exclusive under one lock.
#[derive(Debug)]
pub struct ThreadSafeQueue<T> {
    items: Mutex<VecDeque<T>>,
}

impl<T> Default for ThreadSafeQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ThreadSafeQueue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
        }
    }

    /// Appends a value to the tail.
    pub fn enqueue(&self, value: T) {
        self.items.lock().push_back(value);
    }

    /// Appends every value in order while holding the lock once, so a batch
    /// is never interleaved with another producer's values.
    pub fn extend<I>(&self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.items.lock().extend(values);
    }

    /// Removes and returns the head, or `None` when the queue is empty.
    ///
    /// Never blocks waiting for a value.
    pub fn dequeue(&self) -> Option<T> {
        self.items.lock().pop_front()
    }

    /// Empties the queue.
    pub fn clear(&self) {
        self.items.lock().clear();
    }

    /// Snapshot of emptiness; may be stale as soon as it returns.
    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Snapshot of the number of waiting values.
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }
}

impl<T: Clone> ThreadSafeQueue<T> {
    /// Returns a copy of the head without removing it.
    pub fn peek(&self) -> Option<T> {
        self.items.lock().front().cloned()
    }

    /// Copies every waiting value in service order.
    pub fn snapshot(&self) -> Vec<T> {
        self.items.lock().iter().cloned().collect()
    }
}
