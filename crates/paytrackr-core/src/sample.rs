//! Built-in demo dataset
//!
//! The dashboard's "load sample data" action seeds this fixed collection:
//! two months of Netflix and Spotify charges plus a one-off Amazon order,
//! with the default recurring classification already applied.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::classify::RecurringMatcher;
use crate::models::Transaction;

/// The demo transaction collection, identical on every call
pub fn sample_transactions() -> Vec<Transaction> {
    let tx = |id: &str, date: (i32, u32, u32), merchant: &str, amount: Decimal, category: &str| {
        Transaction {
            id: id.to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2)
                .expect("sample dates are valid"),
            merchant: merchant.to_string(),
            amount,
            category: category.to_string(),
            recurring: false,
        }
    };

    let mut transactions = vec![
        tx("s1", (2025, 3, 1), "Netflix", Decimal::new(1599, 2), "Entertainment"),
        tx("s2", (2025, 3, 15), "Spotify", Decimal::new(999, 2), "Entertainment"),
        tx("s3", (2025, 4, 1), "Netflix", Decimal::new(1599, 2), "Entertainment"),
        tx("s4", (2025, 4, 15), "Spotify", Decimal::new(999, 2), "Entertainment"),
        tx("s5", (2025, 4, 20), "Amazon", Decimal::new(10000, 2), "Shopping"),
    ];

    RecurringMatcher::default().apply(&mut transactions);
    transactions
}
