//! Spending aggregates for the dashboard views
//!
//! Pure reductions over an immutable transaction slice: recurring split,
//! category and merchant breakdowns, monthly trend. The dashboard computes
//! one [`AnalyticsSnapshot`] per refresh and passes it down to every view
//! as plain data, so no view re-derives its own numbers. Nothing here keeps
//! state between calls; identical input always yields identical output.

use std::collections::BTreeMap;

use chrono::Datelike;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{
    CategoryAggregate, MerchantAggregate, MonthlyTrendPoint, RecurringSummary, Transaction,
};

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Count transactions by the recurring flag
///
/// `recurring + non_recurring` always equals the input length.
pub fn summarize_recurring(transactions: &[Transaction]) -> RecurringSummary {
    let recurring = transactions.iter().filter(|t| t.recurring).count();
    RecurringSummary {
        recurring,
        non_recurring: transactions.len() - recurring,
    }
}

/// Total and share of spending per category
///
/// Keys are the exact category strings (case-sensitive, untrimmed); callers
/// pre-normalize if they want merging. Sorted descending by total, ties by
/// ascending category name.
pub fn aggregate_by_category(transactions: &[Transaction]) -> Vec<CategoryAggregate> {
    totals_by_key(transactions, |t| &t.category)
        .into_iter()
        .map(|(category, total, percentage)| CategoryAggregate {
            category,
            total,
            percentage,
        })
        .collect()
}

/// Total and share of spending per merchant
///
/// Same keying, ordering and percentage rules as [`aggregate_by_category`].
pub fn aggregate_by_merchant(transactions: &[Transaction]) -> Vec<MerchantAggregate> {
    totals_by_key(transactions, |t| &t.merchant)
        .into_iter()
        .map(|(merchant, total, percentage)| MerchantAggregate {
            merchant,
            total,
            percentage,
        })
        .collect()
}

/// Spending per calendar month, one point per populated month
///
/// Buckets by the transaction's year and month (no timezone shifting) and
/// sorts by the numeric year-month, so December 2023 precedes January 2024
/// even though the display labels would sort the other way.
pub fn monthly_trend(transactions: &[Transaction]) -> Vec<MonthlyTrendPoint> {
    let mut totals: BTreeMap<(i32, u32), Decimal> = BTreeMap::new();
    for tx in transactions {
        *totals
            .entry((tx.date.year(), tx.date.month()))
            .or_insert(Decimal::ZERO) += tx.amount;
    }

    totals
        .into_iter()
        .map(|((year, month), total)| MonthlyTrendPoint {
            year,
            month,
            label: MONTH_LABELS[(month - 1) as usize].to_string(),
            total,
        })
        .collect()
}

/// Group amounts by key, then derive each key's share of the grand total
///
/// Amounts accumulate in `Decimal`, so a thousand one-cent charges sum to
/// exactly ten dollars. Percentages are computed once, after all totals are
/// known, from the grand total of the same input; a zero grand total (empty
/// input included) reports 0.0 rather than NaN.
fn totals_by_key<'a, F>(transactions: &'a [Transaction], key: F) -> Vec<(String, Decimal, f64)>
where
    F: Fn(&'a Transaction) -> &'a str,
{
    let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
    for tx in transactions {
        *totals.entry(key(tx)).or_insert(Decimal::ZERO) += tx.amount;
    }

    let grand_total: Decimal = totals.values().copied().sum();

    let mut rows: Vec<(String, Decimal, f64)> = totals
        .into_iter()
        .map(|(key, total)| {
            let percentage = if grand_total.is_zero() {
                0.0
            } else {
                (total / grand_total * Decimal::from(100))
                    .to_f64()
                    .unwrap_or(0.0)
            };
            (key.to_string(), total, percentage)
        })
        .collect();

    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    rows
}

/// All dashboard aggregates for one transaction snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub transaction_count: usize,
    pub recurring: RecurringSummary,
    pub categories: Vec<CategoryAggregate>,
    pub merchants: Vec<MerchantAggregate>,
    pub monthly: Vec<MonthlyTrendPoint>,
}

impl AnalyticsSnapshot {
    /// Compute every aggregate in one pass over the snapshot
    pub fn compute(transactions: &[Transaction]) -> Self {
        let snapshot = Self {
            transaction_count: transactions.len(),
            recurring: summarize_recurring(transactions),
            categories: aggregate_by_category(transactions),
            merchants: aggregate_by_merchant(transactions),
            monthly: monthly_trend(transactions),
        };
        debug!(
            transactions = snapshot.transaction_count,
            categories = snapshot.categories.len(),
            merchants = snapshot.merchants.len(),
            months = snapshot.monthly.len(),
            "Computed analytics snapshot"
        );
        snapshot
    }
}
