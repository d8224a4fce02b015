//! Domain models for PayTrackr

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Category assigned when an ingested record carries none
pub const DEFAULT_CATEGORY: &str = "Other";

/// A transaction record as supplied by the caller, before validation
///
/// `date` and `amount` are kept as raw strings so a malformed value can be
/// reported against the record instead of failing the whole document parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    pub id: String,
    pub date: String,
    pub merchant: String,
    pub amount: String,
    pub category: Option<String>,
    pub recurring: Option<bool>,
}

/// A validated payment transaction
///
/// Immutable input to the aggregation engine; identity is `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    /// Calendar date of the charge (no timezone shifting applied)
    pub date: NaiveDate,
    pub merchant: String,
    /// Signed amount in currency units, two-decimal precision
    pub amount: Decimal,
    pub category: String,
    /// Whether this charge belongs to a subscription-like recurring series.
    /// Set at ingestion (see `RecurringMatcher`), never derived here.
    pub recurring: bool,
}

/// Counts of transactions partitioned by the recurring flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringSummary {
    pub recurring: usize,
    pub non_recurring: usize,
}

impl RecurringSummary {
    pub fn total(&self) -> usize {
        self.recurring + self.non_recurring
    }
}

/// Spending total and share for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAggregate {
    pub category: String,
    pub total: Decimal,
    /// Share of the grand total, 0-100; 0.0 for an empty collection
    pub percentage: f64,
}

/// Spending total and share for one merchant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantAggregate {
    pub merchant: String,
    pub total: Decimal,
    pub percentage: f64,
}

/// Spending total for one calendar month
///
/// `year`/`month` carry the sort identity; `label` is the lossy display
/// name ("Jan", "Feb") the dashboard charts use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrendPoint {
    pub year: i32,
    /// 1-based calendar month
    pub month: u32,
    pub label: String,
    pub total: Decimal,
}

/// Merchants selected by the card-update simulator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardUpdateResult {
    /// First-seen order of each merchant's first recurring charge, deduplicated
    pub affected_merchants: Vec<String>,
}

/// Estimated next charge date for an affected merchant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextPayment {
    pub merchant: String,
    pub expected: NaiveDate,
}

/// Full impact analysis for a simulated card replacement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardUpdateReport {
    pub affected_merchants: Vec<String>,
    /// One entry per affected merchant, in the same order
    pub next_payments: Vec<NextPayment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_serde_round_trip() {
        let tx = Transaction {
            id: "t1".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            merchant: "Netflix".to_string(),
            amount: "15.99".parse().unwrap(),
            category: "Entertainment".to_string(),
            recurring: true,
        };

        let json = serde_json::to_string(&tx).unwrap();
        assert!(json.contains("\"date\":\"2025-03-01\""));
        assert!(json.contains("\"amount\":\"15.99\""));

        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tx);
    }

    #[test]
    fn test_recurring_summary_total() {
        let summary = RecurringSummary {
            recurring: 3,
            non_recurring: 2,
        };
        assert_eq!(summary.total(), 5);
        assert_eq!(RecurringSummary::default().total(), 0);
    }
}
