//! PayTrackr Core Library
//!
//! The transaction analytics aggregation engine behind the PayTrackr
//! dashboard:
//! - CSV/JSON transaction ingest with per-record validation
//! - Recurring-merchant classification at ingestion
//! - Spending aggregates: recurring split, category and merchant
//!   breakdowns, monthly trend
//! - Card-update simulation with explicit selection policies and
//!   next-payment estimation
//! - Built-in demo dataset
//!
//! Everything is a pure, synchronous transform over a caller-supplied
//! transaction collection; the HTTP shell and the dashboard views consume
//! the plain serializable values produced here.

pub mod aggregate;
pub mod card_update;
pub mod classify;
pub mod error;
pub mod ingest;
pub mod models;
pub mod sample;

pub use aggregate::{
    aggregate_by_category, aggregate_by_merchant, monthly_trend, summarize_recurring,
    AnalyticsSnapshot,
};
pub use card_update::{CardUpdateSimulator, SelectionPolicy};
pub use classify::{RecurringMatcher, DEFAULT_RECURRING_PATTERNS};
pub use error::{Error, Result, ValidationField};
pub use models::{
    CardUpdateReport, CardUpdateResult, CategoryAggregate, MerchantAggregate, MonthlyTrendPoint,
    NextPayment, RawTransaction, RecurringSummary, Transaction,
};
pub use sample::sample_transactions;
