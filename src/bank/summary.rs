//! Closing report produced when the bank finishes draining its queue.

use crate::pool::LaneStats;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

/// Totals for one `open()` session.
#[derive(Clone, Debug, Serialize)]
pub struct BankSummary {
    /// Identifier of the session, also present in log lines.
    pub session_id: Uuid,
    /// Name of the bank.
    pub bank_name: String,
    /// Customers served during the session.
    pub total_customers: u64,
    /// Wall time from the start of `open()` to the join barrier.
    pub total_processing_time: Duration,
    /// Deposit lane statistics.
    pub deposit: LaneStats,
    /// Loan lane statistics.
    pub loan: LaneStats,
    /// When the bank closed.
    pub closed_at: DateTime<Utc>,
}

impl BankSummary {
    /// Total processing time in seconds.
    pub fn processing_time_secs(&self) -> f64 {
        self.total_processing_time.as_secs_f64()
    }

    /// The console closing message.
    pub fn closing_message(&self) -> String {
        format!(
            "Business closed. {} customers were served today; total processing time {:.2} seconds.",
            self.total_customers,
            self.processing_time_secs()
        )
    }

    /// Renders the summary as pretty JSON.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BankSummary {
        BankSummary {
            session_id: Uuid::nil(),
            bank_name: "bank".to_string(),
            total_customers: 10,
            total_processing_time: Duration::from_millis(4_250),
            deposit: LaneStats::default(),
            loan: LaneStats::default(),
            closed_at: Utc::now(),
        }
    }

    #[test]
    fn test_closing_message() {
        assert_eq!(
            sample().closing_message(),
            "Business closed. 10 customers were served today; total processing time 4.25 seconds."
        );
    }

    #[test]
    fn test_to_json_contains_totals() {
        let json = sample().to_json().expect("serializable");
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total_customers"], 10);
        assert_eq!(value["bank_name"], "bank");
        assert!(value["deposit"]["peak_running"].is_number());
    }
}
