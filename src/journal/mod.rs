//! The ChangeLog memo: a plain text diary, newest day first, where each day starts with a heading
//! like `2024-01-15 Taro <taro@example.com>` and holds indented `* title:` entries. Expenses are
//! kept in the `* 買い物ログ:` (shopping log) entry, one `<code> <remark> <amount>` per line.

mod line;
mod parse;
mod rewrite;

pub use line::{classify, normalize_remark, LineKind, NO_REMARK, SHOPPING_LOG_HEADING};
pub use parse::{extract, extract_path, Extracted, Scope};
pub use rewrite::{Rewriter, Rewritten};

/// Who signs the date headings of new sections.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Identity {
    pub author_name: String,
    pub contact_address: String,
}

impl Identity {
    pub fn new(author_name: impl Into<String>, contact_address: impl Into<String>) -> Self {
        Self {
            author_name: author_name.into(),
            contact_address: contact_address.into(),
        }
    }
}
