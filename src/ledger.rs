//! Reading and writing the household ledger CSV (`cashbook.csv`) and its digest
//! (`cashbook_all.csv`).

use crate::error::{Error, ErrorType, IntoResult};
use crate::journal::normalize_remark;
use crate::model::{
    compact_date, parse_compact_date, Balance, CategoryTable, ExpenseRecord, Warning,
};
use crate::{backup, utils, Result};
use anyhow::Context;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// The header row the ledger must start with, in order.
pub const HEADER: [&str; 12] = [
    "No",
    "日付",
    "収入",
    "支出",
    "費目名",
    "収支区分",
    "メモ",
    "帳簿コード",
    "支払コード",
    "請求日&支払回数",
    "請求No",
    "送金元orチャージ",
];

const DATE_IDX: usize = 1;
const INCOME_IDX: usize = 2;
const SPENDING_IDX: usize = 3;
const CATEGORY_IDX: usize = 4;
const BALANCE_IDX: usize = 5;
const REMARK_IDX: usize = 6;

/// Row number and date of the single row in the digest file.
const DIGEST_ROW_NUMBER: &str = "9999999";
const DIGEST_DATE: &str = "99991231";

/// The records read from a ledger along with the rows that were skipped.
#[derive(Debug, Default, Clone)]
pub struct LedgerRead {
    pub records: Vec<ExpenseRecord>,
    pub warnings: Vec<Warning>,
}

/// Reads ledger rows from `reader`.
///
/// The header must match `HEADER` exactly. Rows with a category name that is not in `table` are
/// skipped with a warning. A row that is too short or has an unreadable date or amount is a
/// `Format` error.
pub fn read(reader: impl Read, table: &CategoryTable) -> Result<LedgerRead> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut rows = rdr.records();

    let header = match rows.next() {
        Some(row) => row.context("Unable to read the ledger header").pub_result(ErrorType::Format)?,
        None => return Err(Error::format("The ledger is empty, expected a header row")),
    };
    check_header(&header)?;

    let mut out = LedgerRead::default();
    for (ix, row) in rows.enumerate() {
        let line = ix + 2;
        let row = row
            .with_context(|| format!("Unable to read ledger row {line}"))
            .pub_result(ErrorType::Format)?;
        if row.len() <= REMARK_IDX {
            return Err(Error::format(format!(
                "Ledger row {line} has {} columns, expected at least {}",
                row.len(),
                REMARK_IDX + 1
            )));
        }

        let category_name = &row[CATEGORY_IDX];
        let Some(category) = table.id_from_ledger_name(category_name) else {
            let warning = Warning::UnresolvedCategory {
                line,
                category: category_name.to_string(),
            };
            warn!("{warning}");
            out.warnings.push(warning);
            continue;
        };

        let date = parse_compact_date(&row[DATE_IDX]).ok_or_else(|| {
            Error::format(format!(
                "Ledger row {line} has an invalid date '{}'",
                &row[DATE_IDX]
            ))
        })?;

        let amount = if row[BALANCE_IDX] == Balance::Expense.to_string() {
            parse_amount(&row[SPENDING_IDX], line)?
        } else {
            parse_amount(&row[INCOME_IDX], line)?
                .checked_neg()
                .unwrap_or(i64::MIN)
        };
        // i64::MIN has no positive counterpart for the income column.
        if amount == i64::MIN {
            return Err(Error::format(format!(
                "Ledger row {line} has an amount out of range"
            )));
        }

        // The remark must read back the same from the ChangeLog memo, or the two would never agree.
        let original = &row[REMARK_IDX];
        let remark = normalize_remark(original);
        if remark != original {
            let warning = Warning::AdjustedRemark {
                line,
                original: original.to_string(),
                remark: remark.to_string(),
            };
            warn!("{warning}");
            out.warnings.push(warning);
        }

        out.records
            .push(ExpenseRecord::new(date, category, amount, remark));
    }
    debug!(
        "Read {} records from the ledger, skipped {}",
        out.records.len(),
        out.warnings.len()
    );
    Ok(out)
}

/// Opens and reads the ledger at `path`. See `read`.
pub fn read_path(path: &Path, table: &CategoryTable) -> Result<LedgerRead> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Unable to open ledger {}", path.display()))
        .pub_result(ErrorType::Io)?;
    read(file, table)
}

/// Backs up `path`, then replaces it with `records`, one row each, numbered from 1.
///
/// Records whose category id is not in the table are written as the fallback category, with a
/// warning for each.
pub fn write(records: &[ExpenseRecord], path: &Path, table: &CategoryTable) -> Result<Vec<Warning>> {
    let mut warnings = Vec::new();
    let mut rows = Vec::with_capacity(records.len());
    for (ix, record) in records.iter().enumerate() {
        let name = match table.ledger_name(record.category()) {
            Some(name) => name,
            None => {
                let warning = Warning::FallbackCategory {
                    date: compact_date(record.date()),
                    category: record.category(),
                };
                warn!("{warning}");
                warnings.push(warning);
                table.ledger_name(table.fallback()).unwrap_or_default()
            }
        };
        rows.push([
            (ix + 1).to_string(),
            compact_date(record.date()),
            record.income_amount().to_string(),
            record.spending_amount().to_string(),
            name.to_string(),
            record.balance().to_string(),
            record.remark().to_string(),
            "0".to_string(),
            "0".to_string(),
            String::new(),
            String::new(),
            String::new(),
        ]);
    }
    save(path, rows)?;
    debug!("Wrote {} records to {}", records.len(), path.display());
    Ok(warnings)
}

/// Backs up `path`, then replaces it with the header and a single summary row holding the number
/// of records. This row is a marker for the ledger app, not a data row.
pub fn write_digest(records: &[ExpenseRecord], path: &Path) -> Result<()> {
    let count = records.len();
    let row = [
        DIGEST_ROW_NUMBER.to_string(),
        DIGEST_DATE.to_string(),
        "0".to_string(),
        "0".to_string(),
        format!("件数={count}  count={count}"),
        Balance::Expense.to_string(),
        "メモ".to_string(),
        "0".to_string(),
        "0".to_string(),
        String::new(),
        String::new(),
        String::new(),
    ];
    save(path, [row])?;
    debug!("Wrote digest of {count} records to {}", path.display());
    Ok(())
}

fn check_header(header: &csv::StringRecord) -> Result<()> {
    if header.len() != HEADER.len() {
        return Err(Error::format(format!(
            "Unexpected ledger header, expected {} columns but found {}",
            HEADER.len(),
            header.len()
        )));
    }
    for (expected, actual) in HEADER.iter().zip(header.iter()) {
        if *expected != actual {
            return Err(Error::format(format!(
                "Unexpected ledger header, expected '{expected}' but found '{actual}'"
            )));
        }
    }
    Ok(())
}

fn parse_amount(s: &str, line: usize) -> Result<i64> {
    s.trim()
        .parse()
        .with_context(|| format!("Ledger row {line} has an invalid amount '{s}'"))
        .pub_result(ErrorType::Format)
}

/// Renders the header and `rows` into memory, backs up `path` and then writes the file.
fn save<R>(path: &Path, rows: impl IntoIterator<Item = R>) -> Result<()>
where
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());
    wtr.write_record(HEADER)
        .context("Unable to serialize the ledger header")
        .pub_result(ErrorType::Io)?;
    for row in rows {
        wtr.write_record(row)
            .context("Unable to serialize a ledger row")
            .pub_result(ErrorType::Io)?;
    }
    let data = wtr
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Unable to finish the ledger data: {}", e.error()))
        .pub_result(ErrorType::Io)?;

    backup::save(path)?;
    utils::write(path, data)
}
