//! Transaction ingest: CSV/JSON parsing and record validation
//!
//! The dashboard shell hands this module uploaded CSV files or JSON arrays.
//! Column and key names are matched case-insensitively (`Date`, `MERCHANT`,
//! ... all work), mirroring the column normalization the rest of the
//! pipeline expects. Parsing produces [`RawTransaction`]s; [`validate`]
//! turns them into engine-ready [`Transaction`]s, failing fast on the first
//! malformed `date` or `amount` with the offending record id and field.

use std::collections::HashMap;
use std::io::Read;

use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result, ValidationField};
use crate::models::{RawTransaction, Transaction, DEFAULT_CATEGORY};

/// Parse a CSV document into raw transaction records
///
/// Requires `date`, `merchant` and `amount` columns (any casing). `id`,
/// `category` and `recurring` are optional; missing ids are assigned from
/// the 1-based row number.
pub fn from_csv<R: Read>(reader: R) -> Result<Vec<RawTransaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let columns: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, name)| (name.trim().to_lowercase(), i))
        .collect();

    let required = |name: &str| -> Result<usize> {
        columns
            .get(name)
            .copied()
            .ok_or_else(|| Error::Ingest(format!("Missing column: {}", name)))
    };
    let date_col = required("date")?;
    let merchant_col = required("merchant")?;
    let amount_col = required("amount")?;

    let mut raws = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result?;

        let field = |col: usize| record.get(col).unwrap_or("").trim().to_string();
        let optional = |name: &str| columns.get(name).map(|&col| field(col));

        let id = match optional("id") {
            Some(id) if !id.is_empty() => id,
            _ => (row + 1).to_string(),
        };

        raws.push(RawTransaction {
            id,
            date: field(date_col),
            merchant: field(merchant_col),
            amount: field(amount_col),
            category: optional("category").filter(|c| !c.is_empty()),
            recurring: optional("recurring").and_then(|r| parse_flag(&r)),
        });
    }

    debug!(records = raws.len(), "Parsed CSV transaction upload");
    Ok(raws)
}

/// Parse a JSON array of transaction objects into raw records
///
/// Keys are matched case-insensitively; `amount` may be a JSON number or a
/// string. Anything other than an array of objects is an ingest error.
pub fn from_json(data: &str) -> Result<Vec<RawTransaction>> {
    let value: Value = serde_json::from_str(data)?;
    let items = value
        .as_array()
        .ok_or_else(|| Error::Ingest("Expected a JSON array of transactions".into()))?;

    let mut raws = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let object = item.as_object().ok_or_else(|| {
            Error::Ingest(format!("Expected a JSON object at index {}", index))
        })?;

        let fields: HashMap<String, &Value> = object
            .iter()
            .map(|(key, value)| (key.trim().to_lowercase(), value))
            .collect();

        let text = |name: &str| -> Result<String> {
            match fields.get(name) {
                Some(Value::String(s)) => Ok(s.trim().to_string()),
                Some(_) | None => Err(Error::Ingest(format!(
                    "Missing or non-string field `{}` at index {}",
                    name, index
                ))),
            }
        };

        let id = match fields.get("id") {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => (index + 1).to_string(),
        };

        let amount = match fields.get("amount") {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) => s.trim().to_string(),
            _ => {
                return Err(Error::Ingest(format!(
                    "Missing or non-numeric field `amount` at index {}",
                    index
                )))
            }
        };

        raws.push(RawTransaction {
            id,
            date: text("date")?,
            merchant: text("merchant")?,
            amount,
            category: match fields.get("category") {
                Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
                _ => None,
            },
            recurring: fields.get("recurring").and_then(|v| v.as_bool()),
        });
    }

    debug!(records = raws.len(), "Parsed JSON transaction payload");
    Ok(raws)
}

/// Validate a raw record into an engine-ready transaction
///
/// Malformed `date` or `amount` fails with the record id and field; the
/// caller decides whether to drop the record or abort. A missing
/// `recurring` flag defaults to false and a missing category to
/// [`DEFAULT_CATEGORY`].
pub fn validate(raw: RawTransaction) -> Result<Transaction> {
    let date = parse_date(&raw.date).ok_or_else(|| Error::Validation {
        id: raw.id.clone(),
        field: ValidationField::Date,
        reason: format!("unable to parse date: {}", raw.date),
    })?;

    let amount = parse_amount(&raw.amount).ok_or_else(|| Error::Validation {
        id: raw.id.clone(),
        field: ValidationField::Amount,
        reason: format!("unable to parse amount: {}", raw.amount),
    })?;

    Ok(Transaction {
        id: raw.id,
        date,
        merchant: raw.merchant,
        amount,
        category: raw.category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        recurring: raw.recurring.unwrap_or(false),
    })
}

/// Validate a whole batch, failing on the first malformed record
pub fn validate_all(raws: Vec<RawTransaction>) -> Result<Vec<Transaction>> {
    raws.into_iter().map(validate).collect()
}

/// Parse a date string in various common formats
///
/// A time component is accepted and truncated to the calendar date.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    let date_formats = [
        "%Y-%m-%d", // 2024-01-15
        "%m/%d/%Y", // 01/15/2024
        "%m/%d/%y", // 01/15/24
        "%Y/%m/%d", // 2024/01/15
    ];
    for fmt in date_formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    let datetime_formats = [
        "%Y-%m-%dT%H:%M:%S", // 2024-01-15T09:30:00
        "%Y-%m-%d %H:%M:%S", // 2024-01-15 09:30:00
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    None
}

/// Parse an amount string, handling currency symbols and commas
fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .trim()
        .replace(['$', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    cleaned.parse::<Decimal>().ok()
}

/// Parse a truthy/falsy CSV cell; unrecognized values count as unset
fn parse_flag(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
