//! Configuration for a bank.
//!
//! [`BankConfig`] controls how many customers are waiting when the bank is
//! built, how long a clerk spends on each customer and how many threads back
//! the deposit lane. The lane concurrency caps themselves are fixed by
//! [`Task::lane_capacity`](crate::bank::Task::lane_capacity) and cannot be
//! configured.

use crate::core::{BankError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for a [`Bank`](crate::bank::Bank).
///
/// # Example
///
/// ```rust
/// use bank_manager::bank::BankConfig;
/// use std::time::Duration;
///
/// let config = BankConfig::new()
///     .with_name("downtown")
///     .with_initial_customers(20)
///     .with_processing_time(Duration::from_millis(100))
///     .with_deposit_workers(3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankConfig {
    /// Name used in logs and errors.
    pub name: String,
    /// Customers seeded when the bank is created.
    pub initial_customers: usize,
    /// How long a clerk spends on one customer.
    pub processing_time: Duration,
    /// Worker threads competing for the deposit lane's permits.
    pub deposit_workers: usize,
    /// Thread name prefix for lane workers.
    pub thread_name_prefix: String,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl BankConfig {
    /// Creates a configuration with the defaults of the console bank:
    /// 10 customers, 700ms per customer, 4 deposit workers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: "bank".to_string(),
            initial_customers: 10,
            processing_time: Duration::from_millis(700),
            deposit_workers: 4,
            thread_name_prefix: "bank".to_string(),
        }
    }

    /// Set the bank name
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Set the number of customers seeded at construction
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_initial_customers(mut self, count: usize) -> Self {
        self.initial_customers = count;
        self
    }

    /// Set the time a clerk spends on each customer
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_processing_time(mut self, processing_time: Duration) -> Self {
        self.processing_time = processing_time;
        self
    }

    /// Set the number of deposit lane worker threads
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_deposit_workers(mut self, workers: usize) -> Self {
        self.deposit_workers = workers;
        self
    }

    /// Set the lane worker thread name prefix
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.deposit_workers == 0 {
            return Err(BankError::invalid_config(
                "deposit_workers",
                "Number of deposit workers must be greater than 0",
            ));
        }
        if self.name.trim().is_empty() {
            return Err(BankError::invalid_config("name", "Bank name must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BankConfig::default();
        assert_eq!(config.initial_customers, 10);
        assert_eq!(config.processing_time, Duration::from_millis(700));
        assert_eq!(config.deposit_workers, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let config = BankConfig::new()
            .with_name("branch")
            .with_initial_customers(0)
            .with_processing_time(Duration::from_millis(5))
            .with_deposit_workers(2)
            .with_thread_name_prefix("teller");

        assert_eq!(config.name, "branch");
        assert_eq!(config.initial_customers, 0);
        assert_eq!(config.processing_time, Duration::from_millis(5));
        assert_eq!(config.deposit_workers, 2);
        assert_eq!(config.thread_name_prefix, "teller");
    }

    #[test]
    fn test_validate_rejects_zero_deposit_workers() {
        let config = BankConfig::new().with_deposit_workers(0);
        assert!(matches!(
            config.validate(),
            Err(BankError::InvalidConfig { ref parameter, .. }) if parameter == "deposit_workers"
        ));
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let config = BankConfig::new().with_name("  ");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_partial() {
        let config = BankConfig::from_json_str(
            r#"{"name": "uptown", "initial_customers": 3, "processing_time": {"secs": 0, "nanos": 5000000}}"#,
        )
        .expect("valid config");

        assert_eq!(config.name, "uptown");
        assert_eq!(config.initial_customers, 3);
        assert_eq!(config.processing_time, Duration::from_millis(5));
        assert_eq!(config.deposit_workers, 4);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(
            BankConfig::from_json_str("{ not json"),
            Err(BankError::ConfigParse(_))
        ));
        assert!(matches!(
            BankConfig::from_json_str(r#"{"deposit_workers": 0}"#),
            Err(BankError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_from_json_file_missing() {
        let result = BankConfig::from_json_file("/nonexistent/bank.json");
        assert!(matches!(result, Err(BankError::ConfigIo(_))));
    }

    #[test]
    fn test_json_roundtrip_preserves_config() {
        let config = BankConfig::new().with_name("roundtrip").with_deposit_workers(7);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(BankConfig::from_json_str(&json).unwrap(), config);
    }
}
