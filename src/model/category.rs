use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

/// The categories known to both the ChangeLog memo and the ledger, as pairs of
/// (journal code, ledger name). A category's id is its position in this list.
pub const DEFAULT_CATEGORIES: [(&str, &str); 19] = [
    ("食", "食費"),
    ("保", "保険"),
    ("貯", "貯蓄"),
    ("本", "書籍"),
    ("酒", "酒代"),
    ("外", "外食"),
    ("住", "住宅"),
    ("活", "生活費"),
    ("雑", "嗜好品"),
    ("交", "交通費"),
    ("娯", "趣味・娯楽費"),
    ("服", "衣服"),
    ("通", "通信費"),
    ("光", "光熱費"),
    ("医", "医療費"),
    ("育", "教育費"),
    ("車", "車維持費"),
    ("際", "交際費"),
    ("他", "その他"),
];

/// Ledger name of the category that unknown categories fall back to.
const FALLBACK_LEDGER_NAME: &str = "その他";

/// Identifies a category independently of either vocabulary.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(usize);

impl CategoryId {
    pub fn value(&self) -> usize {
        self.0
    }
}

impl Display for CategoryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
struct Entry {
    journal_code: String,
    ledger_name: String,
}

/// A bidirectional lookup between journal category codes (e.g. `食`) and ledger category names
/// (e.g. `食費`). Built once and then shared by reference.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CategoryTable {
    entries: Vec<Entry>,
    by_journal_code: HashMap<String, CategoryId>,
    by_ledger_name: HashMap<String, CategoryId>,
    fallback: CategoryId,
}

impl Default for CategoryTable {
    fn default() -> Self {
        // The built in list is unique and contains the fallback.
        Self::from_pairs(DEFAULT_CATEGORIES, FALLBACK_LEDGER_NAME)
            .expect("the default category list is a valid table")
    }
}

impl CategoryTable {
    /// Builds a table from (journal code, ledger name) pairs. Ids follow the order of `pairs`.
    ///
    /// Fails if a code or name appears twice, or if `fallback_ledger_name` is not in the list.
    pub fn from_pairs<S1, S2>(
        pairs: impl IntoIterator<Item = (S1, S2)>,
        fallback_ledger_name: &str,
    ) -> anyhow::Result<Self>
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        let mut entries = Vec::new();
        let mut by_journal_code = HashMap::new();
        let mut by_ledger_name = HashMap::new();
        for (ix, (code, name)) in pairs.into_iter().enumerate() {
            let entry = Entry {
                journal_code: code.into(),
                ledger_name: name.into(),
            };
            let id = CategoryId(ix);
            if by_journal_code
                .insert(entry.journal_code.clone(), id)
                .is_some()
            {
                anyhow::bail!("Duplicate journal category code '{}'", entry.journal_code);
            }
            if by_ledger_name.insert(entry.ledger_name.clone(), id).is_some() {
                anyhow::bail!("Duplicate ledger category name '{}'", entry.ledger_name);
            }
            entries.push(entry);
        }
        let fallback = by_ledger_name
            .get(fallback_ledger_name)
            .copied()
            .ok_or_else(|| {
                anyhow::anyhow!("The fallback category '{fallback_ledger_name}' is not in the table")
            })?;
        Ok(Self {
            entries,
            by_journal_code,
            by_ledger_name,
            fallback,
        })
    }

    pub fn id_from_journal_code(&self, code: &str) -> Option<CategoryId> {
        self.by_journal_code.get(code).copied()
    }

    pub fn id_from_ledger_name(&self, name: &str) -> Option<CategoryId> {
        self.by_ledger_name.get(name).copied()
    }

    pub fn journal_code(&self, id: CategoryId) -> Option<&str> {
        self.entries.get(id.0).map(|e| e.journal_code.as_str())
    }

    pub fn ledger_name(&self, id: CategoryId) -> Option<&str> {
        self.entries.get(id.0).map(|e| e.ledger_name.as_str())
    }

    /// The "other" category used when an id cannot be resolved during journal regeneration.
    pub fn fallback(&self) -> CategoryId {
        self.fallback
    }

    pub fn ids(&self) -> impl Iterator<Item = CategoryId> + '_ {
        (0..self.entries.len()).map(CategoryId)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn id(value: usize) -> CategoryId {
    CategoryId(value)
}
