use crate::model::CategoryId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Whether a record is money going out or coming in. Serializes to the ledger's labels.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Balance {
    #[serde(rename = "支出")]
    Expense,
    #[serde(rename = "収入")]
    Income,
}

serde_plain::derive_display_from_serialize!(Balance);
serde_plain::derive_fromstr_from_deserialize!(Balance);

/// The fields that make two records the same fact, regardless of where they were read from.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct RecordKey {
    date: NaiveDate,
    category: CategoryId,
    remark: String,
    amount: i64,
}

/// One dated, categorized entry.
///
/// The sign of `amount` decides the direction: positive amounts are expenses, negative amounts
/// are income. An empty `remark` means the entry has no remark.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ExpenseRecord {
    date: NaiveDate,
    category: CategoryId,
    amount: i64,
    remark: String,
}

impl ExpenseRecord {
    pub fn new(date: NaiveDate, category: CategoryId, amount: i64, remark: impl Into<String>) -> Self {
        Self {
            date,
            category,
            amount,
            remark: remark.into(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn category(&self) -> CategoryId {
        self.category
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn remark(&self) -> &str {
        &self.remark
    }

    pub fn key(&self) -> RecordKey {
        RecordKey {
            date: self.date,
            category: self.category,
            remark: self.remark.clone(),
            amount: self.amount,
        }
    }

    /// Zero counts as an expense.
    pub fn balance(&self) -> Balance {
        if self.amount < 0 {
            Balance::Income
        } else {
            Balance::Expense
        }
    }

    /// The ledger's income column: the magnitude of a negative amount, otherwise zero.
    pub fn income_amount(&self) -> u64 {
        if self.amount < 0 {
            self.amount.unsigned_abs()
        } else {
            0
        }
    }

    /// The ledger's expense column: a positive amount, otherwise zero.
    pub fn spending_amount(&self) -> u64 {
        u64::try_from(self.amount).unwrap_or(0)
    }
}

/// Parses a compact `YYYYMMDD` date as used by the ledger.
pub fn parse_compact_date(s: &str) -> Option<NaiveDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = s[0..4].parse().ok()?;
    let month = s[4..6].parse().ok()?;
    let day = s[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Formats a date as `YYYYMMDD`.
pub fn compact_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}
