//! Classification of ChangeLog memo lines, and the data line format inside a shopping log.

use crate::model::{CategoryId, CategoryTable};
use chrono::NaiveDate;
use std::borrow::Cow;

/// The marker that makes a bullet heading a shopping log heading.
pub const SHOPPING_LOG_MARKER: &str = "買い物ログ";

/// The heading written for shopping log blocks that did not exist before.
pub const SHOPPING_LOG_HEADING: &str = "\t* 買い物ログ:";

/// What a data line shows in place of an empty remark.
pub const NO_REMARK: &str = "(記載なし)";

/// The structural role of one line of the memo.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum LineKind {
    /// A line starting with four digits. Carries the date if the line starts with `YYYY-MM-DD`.
    DateHeading(Option<NaiveDate>),
    /// An indented `*` bullet whose title starts with the shopping log marker.
    ShoppingLogHeading,
    /// Any other indented `*` bullet.
    OtherHeading,
    Blank,
    /// Everything else. Inside a shopping log this is a data line.
    Opaque,
}

/// Classifies `line`. Trailing whitespace and line terminators are ignored.
pub fn classify(line: &str) -> LineKind {
    let line = line.trim_end();
    if line.is_empty() {
        return LineKind::Blank;
    }
    if line.chars().take(4).filter(char::is_ascii_digit).count() == 4 {
        return LineKind::DateHeading(heading_date(line));
    }
    match bullet_title(line) {
        Some(title) if title.starts_with(SHOPPING_LOG_MARKER) => LineKind::ShoppingLogHeading,
        Some(_) => LineKind::OtherHeading,
        None => LineKind::Opaque,
    }
}

/// Parses the `YYYY-MM-DD` prefix of a date heading.
fn heading_date(line: &str) -> Option<NaiveDate> {
    let prefix = line.get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

/// For an indented line starting with `*`, returns the text after the bullet.
fn bullet_title(line: &str) -> Option<&str> {
    let rest = line.trim_start_matches(['\t', ' ']);
    if rest.len() == line.len() {
        return None;
    }
    rest.strip_prefix('*').map(|title| title.trim_start_matches(' '))
}

/// Formats the heading line of a date section, e.g. `2024-01-15 Taro <taro@example.com>`.
pub fn date_heading(date: NaiveDate, author_name: &str, contact_address: &str) -> String {
    format!("{} {author_name} <{contact_address}>", date.format("%Y-%m-%d"))
}

/// Formats one data line, without the line terminator, e.g. `\t食 lunch 1200`.
pub fn data_line(code: &str, remark: &str, amount: i64) -> String {
    let remark = if remark.is_empty() { NO_REMARK } else { remark };
    format!("\t{code} {remark} {amount}")
}

/// Returns `remark` as it reads back from a data line once written with `data_line`.
///
/// Spaces and line breaks would split the remark field, so each run of them becomes a single `_`.
/// The no-remark placeholder reads back as an empty remark.
pub fn normalize_remark(remark: &str) -> Cow<'_, str> {
    const BREAKS: [char; 3] = [' ', '\r', '\n'];
    if remark == NO_REMARK {
        return Cow::Borrowed("");
    }
    if !remark.contains(BREAKS) {
        return Cow::Borrowed(remark);
    }
    let mut out = String::with_capacity(remark.len());
    let mut in_run = false;
    for c in remark.chars() {
        if BREAKS.contains(&c) {
            if !in_run {
                out.push('_');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    Cow::Owned(out)
}

/// The outcome of reading a data line.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DataLine {
    Entry {
        category: CategoryId,
        remark: String,
        amount: i64,
    },
    /// The line does not have exactly three space separated fields.
    Malformed,
    /// The first field is not a known category code.
    UnknownCategory(String),
    /// The amount field is not an integer, or is too large to write as income.
    BadAmount(String),
}

/// Reads a data line of the form `<code> <remark> <amount>`, surrounded by optional indentation.
pub fn parse_data_line(line: &str, table: &CategoryTable) -> DataLine {
    let line = line.trim_end().trim_matches(['\t', ' ']);
    let fields: Vec<&str> = line.split(' ').collect();
    let [code, remark, amount] = fields.as_slice() else {
        return DataLine::Malformed;
    };
    let Some(category) = table.id_from_journal_code(code) else {
        return DataLine::UnknownCategory(code.to_string());
    };
    let remark = if *remark == NO_REMARK { "" } else { *remark };
    // i64::MIN has no positive counterpart for the ledger's income column.
    match amount.parse::<i64>() {
        Ok(amount) if amount != i64::MIN => DataLine::Entry {
            category,
            remark: remark.to_string(),
            amount,
        },
        _ => DataLine::BadAmount(amount.to_string()),
    }
}
