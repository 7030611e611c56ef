//! Outbound notifications from the bank to a presentation layer.

use crate::bank::{BankSummary, Customer};

/// Receives per-customer progress and the closing summary.
///
/// `on_start` and `on_finish` are called from lane worker threads, possibly
/// from several at once, so implementations must be thread safe. Every
/// method has a no-op default.
pub trait BankObserver: Send + Sync {
    /// A clerk started serving `customer`.
    fn on_start(&self, _customer: &Customer) {}

    /// A clerk finished serving `customer`.
    fn on_finish(&self, _customer: &Customer) {}

    /// The queue drained and all dispatched work completed.
    fn on_summary(&self, _summary: &BankSummary) {}
}

/// An observer that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl BankObserver for NoopObserver {}

/// An observer that reports progress through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingObserver;

impl BankObserver for LoggingObserver {
    fn on_start(&self, customer: &Customer) {
        log::info!("Customer {} started {}", customer.turn(), customer.task());
    }

    fn on_finish(&self, customer: &Customer) {
        log::info!("Customer {} finished {}", customer.turn(), customer.task());
    }

    fn on_summary(&self, summary: &BankSummary) {
        log::info!("{}", summary.closing_message());
    }
}
