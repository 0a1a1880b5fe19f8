use crate::error::Error;
use crate::journal::line::{classify, parse_data_line, DataLine, LineKind};
use crate::model::{CategoryTable, ExpenseRecord, Warning};
use crate::{utils, Result};
use chrono::NaiveDate;
use std::path::Path;
use tracing::{debug, warn};

/// Where data lines are looked for.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Scope {
    /// Only inside shopping log blocks of a ChangeLog memo.
    ShoppingLog,
    /// Anywhere under a date heading, as in a quick memo file. A bullet heading other than the
    /// shopping log heading still closes the block.
    WholeDay,
}

/// The records found in a memo along with the lines that were skipped.
#[derive(Debug, Default, Clone)]
pub struct Extracted {
    pub records: Vec<ExpenseRecord>,
    pub warnings: Vec<Warning>,
}

impl Extracted {
    fn warn(&mut self, warning: Warning) {
        warn!("{warning}");
        self.warnings.push(warning);
    }
}

/// Extracts the shopping log records from the text of a ChangeLog memo.
///
/// Lines that cannot be understood are skipped with a warning, except for an amount that is not
/// an integer, which is a `Format` error.
pub fn extract(text: &str, table: &CategoryTable, scope: Scope) -> Result<Extracted> {
    let mut out = Extracted::default();
    let mut current_date: Option<NaiveDate> = None;
    let mut in_block = false;

    for (ix, line) in text.lines().enumerate() {
        let line_number = ix + 1;
        match classify(line) {
            LineKind::DateHeading(date) => {
                if date.is_none() {
                    debug!("Line {line_number}: date heading without a YYYY-MM-DD date");
                }
                current_date = date;
                in_block = scope == Scope::WholeDay;
                continue;
            }
            LineKind::ShoppingLogHeading => {
                in_block = true;
                continue;
            }
            _ if !in_block => continue,
            LineKind::OtherHeading => {
                in_block = false;
                continue;
            }
            LineKind::Blank => continue,
            LineKind::Opaque => {}
        }

        let content = line.trim().to_string();
        let Some(date) = current_date else {
            out.warn(Warning::Undated {
                line: line_number,
                content,
            });
            continue;
        };
        match parse_data_line(line, table) {
            DataLine::Entry {
                category,
                remark,
                amount,
            } => out
                .records
                .push(ExpenseRecord::new(date, category, amount, remark)),
            DataLine::Malformed => out.warn(Warning::MalformedLine {
                line: line_number,
                content,
            }),
            DataLine::UnknownCategory(category) => out.warn(Warning::UnresolvedCategory {
                line: line_number,
                category,
            }),
            DataLine::BadAmount(amount) => {
                return Err(Error::format(format!(
                    "Line {line_number}: the amount '{amount}' is not an integer -- {content}"
                )))
            }
        }
    }
    debug!(
        "Extracted {} records, skipped {} lines",
        out.records.len(),
        out.warnings.len()
    );
    Ok(out)
}

/// Reads the file at `path` and extracts its records. See `extract`.
pub fn extract_path(path: &Path, table: &CategoryTable, scope: Scope) -> Result<Extracted> {
    let text = utils::read(path)?;
    extract(&text, table, scope).map_err(|e| e.context(format!("Unable to read {}", path.display())))
}
