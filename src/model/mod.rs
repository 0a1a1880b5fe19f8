//! Types that represent the core data model: categories, records and the merged record store.
pub(crate) mod category;
mod record;
mod store;

pub use category::{CategoryId, CategoryTable, DEFAULT_CATEGORIES};
pub use record::{compact_date, parse_compact_date, Balance, ExpenseRecord, RecordKey};
pub use store::RecordStore;

/// Something that was wrong with the input but did not stop processing. Each warning is also
/// logged where it is raised.
#[derive(Debug, Clone, Eq, PartialEq, serde::Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Warning {
    /// A category name or code that is not in the table. The record was skipped.
    UnresolvedCategory { line: usize, category: String },
    /// A data line that does not have the expected fields. The line was skipped.
    MalformedLine { line: usize, content: String },
    /// A data line with no date heading above it. The line was skipped.
    Undated { line: usize, content: String },
    /// A ledger remark that could not be written into a data line as it was. The record was kept
    /// with `remark`.
    AdjustedRemark {
        line: usize,
        original: String,
        remark: String,
    },
    /// A record whose category could not be written and was replaced by the fallback category.
    FallbackCategory { date: String, category: CategoryId },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::UnresolvedCategory { line, category } => {
                write!(f, "Line {line}: unknown category '{category}', skipping")
            }
            Warning::MalformedLine { line, content } => {
                write!(f, "Line {line}: unexpected shopping log format, skipping -- {content}")
            }
            Warning::Undated { line, content } => {
                write!(f, "Line {line}: no date heading above this entry, skipping -- {content}")
            }
            Warning::AdjustedRemark {
                line,
                original,
                remark,
            } => write!(f, "Line {line}: remark {original:?} is kept as {remark:?}"),
            Warning::FallbackCategory { date, category } => write!(
                f,
                "{date}: unknown category id {category}, writing it as the fallback category"
            ),
        }
    }
}
