//! The bank domain: customers, the clerk, observers and the dispatcher.

mod clerk;
pub mod config;
mod customer;
mod dispatcher;
mod observer;
mod summary;

pub use clerk::Clerk;
pub use config::BankConfig;
pub use customer::{create_batch, create_batch_with, Customer, Task, TicketMachine};
pub use dispatcher::{Bank, BankState};
pub use observer::{BankObserver, LoggingObserver, NoopObserver};
pub use summary::BankSummary;
