//! Error types for the bank simulation

/// Result type for bank operations
pub type Result<T> = std::result::Result<T, BankError>;

/// Errors that can occur while running the bank.
///
/// Races on the customer queue (an empty peek or an empty dequeue inside a
/// lane) are not errors and never surface here.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BankError {
    /// The bank is already draining its queue
    #[error("Bank '{bank_name}' is already open")]
    AlreadyOpen {
        /// Name of the bank
        bank_name: String,
    },

    /// Failed to spawn a lane worker thread
    #[error("Failed to spawn {lane} worker #{worker_id}: {message}")]
    SpawnError {
        /// Lane the worker belongs to
        lane: String,
        /// ID of the worker that failed to spawn
        worker_id: usize,
        /// Error message
        message: String,
        /// Source IO error
        #[source]
        source: Option<std::io::Error>,
    },

    /// Failed to join a lane worker thread
    #[error("Failed to join {lane} worker #{worker_id}: {message}")]
    JoinError {
        /// Lane the worker belongs to
        lane: String,
        /// ID of the worker that failed to join
        worker_id: usize,
        /// Error message
        message: String,
    },

    /// A job was submitted to a lane that has been shut down
    #[error("Lane '{lane}' is closed")]
    LaneClosed {
        /// Name of the lane
        lane: String,
    },

    /// The admission gate lost its permit channel
    #[error("Admission gate for lane '{lane}' is closed")]
    AdmissionClosed {
        /// Name of the lane
        lane: String,
    },

    /// Invalid configuration with parameter
    #[error("Invalid configuration for '{parameter}': {message}")]
    InvalidConfig {
        /// Configuration parameter name
        parameter: String,
        /// Error message
        message: String,
    },

    /// Configuration file could not be read
    #[error("Failed to read configuration: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// Configuration could not be parsed
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// General error
    #[error("{0}")]
    Other(String),
}

impl BankError {
    /// Create an already open error
    pub fn already_open(bank_name: impl Into<String>) -> Self {
        BankError::AlreadyOpen {
            bank_name: bank_name.into(),
        }
    }

    /// Create a spawn error with source
    pub fn spawn_with_source(
        lane: impl Into<String>,
        worker_id: usize,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        BankError::SpawnError {
            lane: lane.into(),
            worker_id,
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a join error
    pub fn join(lane: impl Into<String>, worker_id: usize, message: impl Into<String>) -> Self {
        BankError::JoinError {
            lane: lane.into(),
            worker_id,
            message: message.into(),
        }
    }

    /// Create a lane closed error
    pub fn lane_closed(lane: impl Into<String>) -> Self {
        BankError::LaneClosed { lane: lane.into() }
    }

    /// Create an admission closed error
    pub fn admission_closed(lane: impl Into<String>) -> Self {
        BankError::AdmissionClosed { lane: lane.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        BankError::InvalidConfig {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        BankError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = BankError::already_open("main_branch");
        assert!(matches!(err, BankError::AlreadyOpen { .. }));

        let err = BankError::lane_closed("deposit");
        assert!(matches!(err, BankError::LaneClosed { .. }));

        let err = BankError::invalid_config("deposit_workers", "must be greater than 0");
        assert!(matches!(err, BankError::InvalidConfig { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = BankError::already_open("main_branch");
        assert_eq!(err.to_string(), "Bank 'main_branch' is already open");

        let err = BankError::join("loan", 0, "Worker panicked");
        assert_eq!(
            err.to_string(),
            "Failed to join loan worker #0: Worker panicked"
        );

        let err = BankError::admission_closed("deposit");
        assert_eq!(
            err.to_string(),
            "Admission gate for lane 'deposit' is closed"
        );
    }

    #[test]
    fn test_spawn_error_with_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = BankError::spawn_with_source("deposit", 3, "Cannot create thread", io_err);

        assert!(matches!(err, BankError::SpawnError { .. }));
        assert!(err.to_string().contains("deposit worker #3"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_config_parse_error_conversion() {
        let parse_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: BankError = parse_err.into();
        assert!(matches!(err, BankError::ConfigParse(_)));
    }
}
