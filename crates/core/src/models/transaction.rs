use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::month::YearMonth;

/// Kind of money movement. The sign of a transaction is implied by its type;
/// amounts are always stored as non-negative magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
    /// Money moved into the portfolio. Excluded from income/expense figures.
    Investment,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Income => write!(f, "income"),
            TransactionType::Expense => write!(f, "expense"),
            TransactionType::Investment => write!(f, "investment"),
        }
    }
}

/// Where a transaction's date came from.
///
/// Stored records carry their date as an RFC 3339 timestamp, a structured
/// `{seconds, nanoseconds}` timestamp or raw epoch seconds. Malformed ones
/// carry garbage or nothing at all, and still load.
/// [`DateSource::normalize`] is the only way the aggregations read a date.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateSource {
    Timestamp(DateTime<Utc>),
    Structured {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(default, alias = "_nanoseconds")]
        nanoseconds: u32,
    },
    EpochSeconds(i64),
    #[default]
    Missing,
    /// Any other value. Kept as-is so the record round-trips.
    Invalid(serde_json::Value),
}

impl DateSource {
    /// Midnight UTC of the given calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        DateSource::Timestamp(date.and_time(chrono::NaiveTime::MIN).and_utc())
    }

    /// Resolve to an instant, or `None` if the date is missing or unparseable.
    pub fn normalize(&self) -> Option<DateTime<Utc>> {
        match self {
            DateSource::Timestamp(ts) => Some(*ts),
            DateSource::Structured {
                seconds,
                nanoseconds,
            } => DateTime::from_timestamp(*seconds, *nanoseconds),
            DateSource::EpochSeconds(secs) => DateTime::from_timestamp(*secs, 0),
            DateSource::Invalid(_) | DateSource::Missing => None,
        }
    }
}

impl From<DateTime<Utc>> for DateSource {
    fn from(value: DateTime<Utc>) -> Self {
        DateSource::Timestamp(value)
    }
}

impl From<NaiveDate> for DateSource {
    fn from(value: NaiveDate) -> Self {
        DateSource::from_date(value)
    }
}

impl From<Option<DateTime<Utc>>> for DateSource {
    fn from(value: Option<DateTime<Utc>>) -> Self {
        value.map_or(DateSource::Missing, DateSource::Timestamp)
    }
}

/// A single income / expense / investment record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,

    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    /// Free-text label, e.g. "Groceries"
    pub category: String,

    /// Non-negative magnitude
    pub amount: f64,

    #[serde(default)]
    pub date: DateSource,

    #[serde(default)]
    pub notes: Option<String>,
}

impl Transaction {
    pub fn new(
        transaction_type: TransactionType,
        category: impl Into<String>,
        amount: f64,
        date: impl Into<DateSource>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            transaction_type,
            category: category.into(),
            amount,
            date: date.into(),
            notes: None,
        }
    }

    pub fn with_notes(
        transaction_type: TransactionType,
        category: impl Into<String>,
        amount: f64,
        date: impl Into<DateSource>,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            notes: Some(notes.into()),
            ..Self::new(transaction_type, category, amount, date)
        }
    }

    pub fn income(category: impl Into<String>, amount: f64, date: impl Into<DateSource>) -> Self {
        Self::new(TransactionType::Income, category, amount, date)
    }

    pub fn expense(category: impl Into<String>, amount: f64, date: impl Into<DateSource>) -> Self {
        Self::new(TransactionType::Expense, category, amount, date)
    }

    pub fn investment(category: impl Into<String>, amount: f64, date: impl Into<DateSource>) -> Self {
        Self::new(TransactionType::Investment, category, amount, date)
    }

    /// Normalized timestamp, if the record has a usable date.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.date.normalize()
    }

    /// The UTC calendar month this transaction falls in.
    pub fn month(&self) -> Option<YearMonth> {
        self.timestamp().map(|ts| YearMonth::of(&ts))
    }
}
