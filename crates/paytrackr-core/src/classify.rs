//! Recurring-merchant classification at ingestion time
//!
//! The engine never derives the recurring flag itself; it is stamped onto
//! transactions when they enter the system. The matcher keeps a list of
//! merchant patterns (case-insensitive substring match) and flags any
//! transaction whose merchant matches one of them.

use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Transaction;

/// Merchant patterns shipped by default, matching the known subscription
/// services the dashboard demos with
pub const DEFAULT_RECURRING_PATTERNS: [&str; 4] =
    ["netflix", "spotify", "hulu", "amazon prime"];

/// Flags transactions as recurring by merchant pattern
#[derive(Debug)]
pub struct RecurringMatcher {
    patterns: Vec<Regex>,
}

impl RecurringMatcher {
    /// Build a matcher from merchant patterns (matched case-insensitively
    /// as substrings of the merchant name)
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| compile_pattern(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Add a merchant pattern to an existing matcher
    pub fn add_pattern(&mut self, pattern: &str) -> Result<()> {
        self.patterns.push(compile_pattern(pattern)?);
        Ok(())
    }

    /// Whether a merchant name matches any recurring pattern
    pub fn is_recurring(&self, merchant: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(merchant))
    }

    /// Stamp the recurring flag on every transaction whose merchant matches
    pub fn apply(&self, transactions: &mut [Transaction]) {
        let mut flagged = 0usize;
        for tx in transactions.iter_mut() {
            if self.is_recurring(&tx.merchant) {
                tx.recurring = true;
                flagged += 1;
            }
        }
        debug!(
            flagged,
            total = transactions.len(),
            "Applied recurring-merchant classification"
        );
    }
}

impl Default for RecurringMatcher {
    fn default() -> Self {
        // Escaped literals always compile
        Self::new(DEFAULT_RECURRING_PATTERNS).expect("default patterns compile")
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(&regex::escape(pattern.trim()))
        .case_insensitive(true)
        .build()
        .map_err(|e| Error::Ingest(format!("Invalid merchant pattern: {}", e)))
}
