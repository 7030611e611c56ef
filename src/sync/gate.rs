//! Counting admission gate backed by a buffered permit channel.

use crate::core::{BankError, Result};
use crossbeam_channel::{self as channel, Receiver, Sender};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Limits how many units of a lane may run at the same time.
///
/// The gate owns a bounded channel holding `capacity` permits. Acquiring
/// takes a permit out (blocking while none is left) and dropping the
/// returned [`Permit`] puts it back.
///
/// # Example
///
/// ```rust
/// use bank_manager::sync::AdmissionGate;
///
/// # fn main() -> bank_manager::Result<()> {
/// let gate = AdmissionGate::new("deposit", 2);
/// let first = gate.acquire()?;
/// let second = gate.acquire()?;
/// assert!(gate.try_acquire().is_none());
///
/// drop(first);
/// assert!(gate.try_acquire().is_some());
/// # drop(second);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AdmissionGate {
    lane: String,
    capacity: usize,
    permits_tx: Sender<()>,
    permits_rx: Receiver<()>,
    running: AtomicUsize,
    peak: AtomicUsize,
}

impl AdmissionGate {
    /// Creates a gate holding `capacity` permits.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(lane: impl Into<String>, capacity: usize) -> Self {
        assert!(capacity > 0, "gate capacity must be greater than 0");
        let (permits_tx, permits_rx) = channel::bounded(capacity);
        for _ in 0..capacity {
            // The channel was sized for exactly this many permits.
            let _ = permits_tx.try_send(());
        }
        Self {
            lane: lane.into(),
            capacity,
            permits_tx,
            permits_rx,
            running: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Blocks until a permit is available.
    pub fn acquire(&self) -> Result<Permit<'_>> {
        self.permits_rx
            .recv()
            .map_err(|_| BankError::admission_closed(&self.lane))?;
        Ok(self.admit())
    }

    /// Takes a permit if one is free right now.
    pub fn try_acquire(&self) -> Option<Permit<'_>> {
        self.permits_rx.try_recv().ok().map(|()| self.admit())
    }

    fn admit(&self) -> Permit<'_> {
        let running = self.running.fetch_add(1, Ordering::AcqRel) + 1;
        self.peak.fetch_max(running, Ordering::AcqRel);
        Permit { gate: self }
    }

    /// Total number of permits.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits currently held.
    pub fn running(&self) -> usize {
        self.running.load(Ordering::Acquire)
    }

    /// Highest number of permits ever held at once.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::Acquire)
    }

    /// Permits currently free.
    pub fn available(&self) -> usize {
        self.permits_rx.len()
    }
}

/// A held admission permit, returned to its gate on drop.
#[derive(Debug)]
pub struct Permit<'a> {
    gate: &'a AdmissionGate,
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        self.gate.running.fetch_sub(1, Ordering::AcqRel);
        // A permit is only out while the channel has room for it.
        let _ = self.gate.permits_tx.try_send(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_gate_starts_full() {
        let gate = AdmissionGate::new("deposit", 2);
        assert_eq!(gate.capacity(), 2);
        assert_eq!(gate.available(), 2);
        assert_eq!(gate.running(), 0);
        assert_eq!(gate.peak(), 0);
    }

    #[test]
    fn test_permit_returned_on_drop() {
        let gate = AdmissionGate::new("loan", 1);
        {
            let _permit = gate.acquire().expect("permit");
            assert_eq!(gate.running(), 1);
            assert!(gate.try_acquire().is_none());
        }
        assert_eq!(gate.running(), 0);
        assert_eq!(gate.available(), 1);
        assert!(gate.try_acquire().is_some());
    }

    #[test]
    #[should_panic(expected = "gate capacity must be greater than 0")]
    fn test_zero_capacity_panics() {
        let _ = AdmissionGate::new("deposit", 0);
    }

    #[test]
    fn test_concurrent_holders_never_exceed_capacity() {
        let gate = Arc::new(AdmissionGate::new("deposit", 2));
        let mut handles = Vec::new();

        for _ in 0..8 {
            let gate = Arc::clone(&gate);
            handles.push(thread::spawn(move || {
                let _permit = gate.acquire().expect("permit");
                assert!(gate.running() <= 2);
                thread::sleep(Duration::from_millis(10));
            }));
        }
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(gate.peak(), 2);
        assert_eq!(gate.running(), 0);
        assert_eq!(gate.available(), 2);
    }
}
