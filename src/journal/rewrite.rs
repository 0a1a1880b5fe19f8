use crate::error::{ErrorType, IntoResult};
use crate::journal::line::{classify, data_line, date_heading, LineKind, SHOPPING_LOG_HEADING};
use crate::journal::Identity;
use crate::model::{compact_date, CategoryTable, RecordStore, Warning};
use crate::{backup, utils, Result};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, warn};

/// The regenerated memo text and the records that had to be written as the fallback category.
#[derive(Debug, Default, Clone)]
pub struct Rewritten {
    pub text: String,
    pub warnings: Vec<Warning>,
}

/// Regenerates the shopping logs of a ChangeLog memo from a `RecordStore`.
///
/// The memo is expected to be newest first. Every line outside a shopping log is copied
/// unchanged. Each shopping log is replaced by the stored records for its date. A date that has
/// records but no shopping log gets one at the end of its section, and a date that has records
/// but no section at all gets a new section in date order.
pub struct Rewriter<'a> {
    table: &'a CategoryTable,
    store: &'a RecordStore,
    identity: &'a Identity,
}

impl<'a> Rewriter<'a> {
    pub fn new(table: &'a CategoryTable, store: &'a RecordStore, identity: &'a Identity) -> Self {
        Self {
            table,
            store,
            identity,
        }
    }

    pub fn rewrite(&self, text: &str) -> Rewritten {
        let mut pass = Pass {
            rewriter: self,
            out: String::with_capacity(text.len()),
            written: HashSet::new(),
            warnings: Vec::new(),
        };
        let mut current: Option<NaiveDate> = None;
        let mut section_end = NaiveDate::MAX;
        let mut skipping = false;

        for line in text.split_inclusive('\n') {
            match classify(line) {
                LineKind::DateHeading(date) => {
                    pass.flush(current);
                    if let Some(date) = date {
                        pass.gap_fill(date, section_end);
                        section_end = date;
                    }
                    current = date;
                    skipping = false;
                    pass.out.push_str(line);
                }
                LineKind::ShoppingLogHeading => match current {
                    Some(date) => {
                        if !pass.written.contains(&date) {
                            pass.block(date, line);
                        }
                        skipping = true;
                    }
                    None => pass.out.push_str(line),
                },
                LineKind::OtherHeading => {
                    skipping = false;
                    pass.out.push_str(line);
                }
                _ if skipping => {}
                _ => pass.out.push_str(line),
            }
        }
        pass.flush(current);
        pass.gap_fill(NaiveDate::MIN, section_end);

        Rewritten {
            text: pass.out,
            warnings: pass.warnings,
        }
    }

    /// Backs up the memo at `path`, reads the backup and writes the regenerated memo to `path`.
    pub fn rewrite_path(&self, path: &Path) -> Result<Vec<Warning>> {
        let source = backup::save(path)?
            .ok_or_else(|| anyhow::anyhow!("The ChangeLog memo {} does not exist", path.display()))
            .pub_result(ErrorType::Io)?;
        let text = utils::read(&source)?;
        let rewritten = self.rewrite(&text);
        utils::write(path, rewritten.text)?;
        debug!("Rewrote {}", path.display());
        Ok(rewritten.warnings)
    }
}

struct Pass<'r, 'a> {
    rewriter: &'r Rewriter<'a>,
    out: String,
    /// Dates whose shopping log has been written in this pass.
    written: HashSet<NaiveDate>,
    warnings: Vec<Warning>,
}

impl Pass<'_, '_> {
    /// Writes the shopping log of the section that is ending, unless it was already written.
    fn flush(&mut self, current: Option<NaiveDate>) {
        if let Some(date) = current {
            if !self.written.contains(&date) && !self.rewriter.store.records_on(date).is_empty() {
                self.ensure_newline();
                self.block(date, SHOPPING_LOG_HEADING);
            }
            self.written.insert(date);
        }
    }

    /// Writes a whole new section for every unwritten date strictly between `start` and `end`,
    /// newest first.
    fn gap_fill(&mut self, start: NaiveDate, end: NaiveDate) {
        for date in self.rewriter.store.dates_between(start, end).into_iter().rev() {
            if self.written.contains(&date) {
                continue;
            }
            self.ensure_newline();
            let identity = self.rewriter.identity;
            let heading = date_heading(date, &identity.author_name, &identity.contact_address);
            self.out.push_str(&heading);
            self.out.push_str("\n\n");
            self.block(date, SHOPPING_LOG_HEADING);
        }
    }

    /// Writes `heading` followed by the records for `date` and a blank line.
    fn block(&mut self, date: NaiveDate, heading: &str) {
        self.out.push_str(heading.trim_end_matches(['\r', '\n']));
        self.out.push('\n');
        let table = self.rewriter.table;
        for record in self.rewriter.store.records_on(date) {
            let code = match table.journal_code(record.category()) {
                Some(code) => code,
                None => {
                    let warning = Warning::FallbackCategory {
                        date: compact_date(date),
                        category: record.category(),
                    };
                    warn!("{warning}");
                    self.warnings.push(warning);
                    table.journal_code(table.fallback()).unwrap_or_default()
                }
            };
            self.out
                .push_str(&data_line(code, record.remark(), record.amount()));
            self.out.push('\n');
        }
        self.out.push('\n');
        self.written.insert(date);
    }

    fn ensure_newline(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::{extract, Scope};
    use crate::model::ExpenseRecord;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn identity() -> Identity {
        Identity::new("Taro", "taro@example.com")
    }

    fn record(table: &CategoryTable, d: NaiveDate, code: &str, amount: i64, remark: &str) -> ExpenseRecord {
        ExpenseRecord::new(d, table.id_from_journal_code(code).unwrap(), amount, remark)
    }

    #[test]
    fn test_replaces_existing_block() {
        let table = CategoryTable::default();
        let journal = "\
2024-01-15 Taro <taro@example.com>

\t* 日記:
\tSunny day.

\t* 買い物ログ:
\t食 lunch 1200

\t* 読書:
\tStarted a novel.

";
        let mut store = RecordStore::new();
        store.merge([record(&table, date(2024, 1, 15), "食", 1200, "lunch")]);
        store.merge(extract(journal, &table, Scope::ShoppingLog).unwrap().records);
        store.merge([record(&table, date(2024, 1, 15), "本", 1500, "")]);
        assert_eq!(store.len(), 2);

        let id = identity();
        let out = Rewriter::new(&table, &store, &id).rewrite(journal);
        let expected = "\
2024-01-15 Taro <taro@example.com>

\t* 日記:
\tSunny day.

\t* 買い物ログ:
\t食 lunch 1200
\t本 (記載なし) 1500

\t* 読書:
\tStarted a novel.

";
        assert_eq!(out.text, expected);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_gap_fill() {
        let table = CategoryTable::default();
        let journal = "\
2024-01-20 Taro <taro@example.com>

\t* 日記:
\tLater.

2024-01-10 Taro <taro@example.com>

\t* 日記:
\tEarlier.
";
        let mut store = RecordStore::new();
        store.merge([record(&table, date(2024, 1, 15), "食", 1200, "lunch")]);

        let id = identity();
        let out = Rewriter::new(&table, &store, &id).rewrite(journal);
        let expected = "\
2024-01-20 Taro <taro@example.com>

\t* 日記:
\tLater.

2024-01-15 Taro <taro@example.com>

\t* 買い物ログ:
\t食 lunch 1200

2024-01-10 Taro <taro@example.com>

\t* 日記:
\tEarlier.
";
        assert_eq!(out.text, expected);
    }

    #[test]
    fn test_gap_fill_is_newest_first() {
        let table = CategoryTable::default();
        let journal = "2024-01-20 Taro <taro@example.com>\n\n2024-01-10 Taro <taro@example.com>\n";
        let mut store = RecordStore::new();
        store.merge([
            record(&table, date(2024, 1, 12), "食", 100, "a"),
            record(&table, date(2024, 1, 18), "食", 200, "b"),
            record(&table, date(2024, 1, 15), "食", 300, "c"),
        ]);

        let id = identity();
        let out = Rewriter::new(&table, &store, &id).rewrite(journal);
        let headings: Vec<&str> = out
            .text
            .lines()
            .filter(|l| matches!(classify(l), LineKind::DateHeading(_)))
            .map(|l| &l[..10])
            .collect();
        assert_eq!(
            headings,
            vec!["2024-01-20", "2024-01-18", "2024-01-15", "2024-01-12", "2024-01-10"]
        );
    }

    #[test]
    fn test_block_added_to_section_without_one() {
        let table = CategoryTable::default();
        let journal = "\
2024-01-20 Taro <taro@example.com>

\t* 日記:
\tNo shopping log yet.

2024-01-10 Taro <taro@example.com>
";
        let mut store = RecordStore::new();
        store.merge([record(&table, date(2024, 1, 20), "酒", 600, "sake")]);

        let id = identity();
        let out = Rewriter::new(&table, &store, &id).rewrite(journal);
        let expected = "\
2024-01-20 Taro <taro@example.com>

\t* 日記:
\tNo shopping log yet.

\t* 買い物ログ:
\t酒 sake 600

2024-01-10 Taro <taro@example.com>
";
        assert_eq!(out.text, expected);
    }

    #[test]
    fn test_second_shopping_log_in_a_section_is_merged_into_the_first() {
        let table = CategoryTable::default();
        let journal = "\
2024-01-15 Taro <taro@example.com>
\t* 買い物ログ:
\t食 a 1
\t* 日記:
\tx
\t* 買い物ログ:
\t食 b 2

\t* 他:
\ty
";
        let mut store = RecordStore::new();
        store.merge(extract(journal, &table, Scope::ShoppingLog).unwrap().records);
        assert_eq!(store.len(), 2);

        let id = identity();
        let out = Rewriter::new(&table, &store, &id).rewrite(journal);
        let expected = "\
2024-01-15 Taro <taro@example.com>
\t* 買い物ログ:
\t食 a 1
\t食 b 2

\t* 日記:
\tx
\t* 他:
\ty
";
        assert_eq!(out.text, expected);

        // Rewriting the result again changes nothing.
        let again = Rewriter::new(&table, &store, &id).rewrite(&out.text);
        assert_eq!(again.text, expected);
    }

    #[test]
    fn test_shopping_log_of_a_date_already_gap_filled_is_dropped() {
        let table = CategoryTable::default();
        // The 2024-01-15 section is out of order, below 2024-01-10.
        let journal = "\
2024-01-20 Taro <taro@example.com>
2024-01-10 Taro <taro@example.com>
2024-01-15 Taro <taro@example.com>
\t* 買い物ログ:
\t食 old 300
\t* 日記:
\tOut of order.
";
        let mut store = RecordStore::new();
        store.merge(extract(journal, &table, Scope::ShoppingLog).unwrap().records);
        store.merge([record(&table, date(2024, 1, 15), "食", 1200, "lunch")]);

        let id = identity();
        let out = Rewriter::new(&table, &store, &id).rewrite(journal);
        let expected = "\
2024-01-20 Taro <taro@example.com>
2024-01-15 Taro <taro@example.com>

\t* 買い物ログ:
\t食 old 300
\t食 lunch 1200

2024-01-10 Taro <taro@example.com>
2024-01-15 Taro <taro@example.com>
\t* 日記:
\tOut of order.
";
        assert_eq!(out.text, expected);
        assert_eq!(out.text.matches("食 old 300").count(), 1);
    }

    #[test]
    fn test_newer_and_older_dates_and_end_of_file() {
        let table = CategoryTable::default();
        let journal = "2024-01-15 Taro <taro@example.com>\n\n\t* 日記:\n\tMiddle.";
        let mut store = RecordStore::new();
        store.merge([
            record(&table, date(2024, 1, 20), "食", 100, "newer"),
            record(&table, date(2024, 1, 15), "食", 200, "same"),
            record(&table, date(2024, 1, 10), "食", 300, "older"),
        ]);

        let id = identity();
        let out = Rewriter::new(&table, &store, &id).rewrite(journal);
        let expected = "\
2024-01-20 Taro <taro@example.com>

\t* 買い物ログ:
\t食 newer 100

2024-01-15 Taro <taro@example.com>

\t* 日記:
\tMiddle.
\t* 買い物ログ:
\t食 same 200

2024-01-10 Taro <taro@example.com>

\t* 買い物ログ:
\t食 older 300

";
        assert_eq!(out.text, expected);
    }

    #[test]
    fn test_non_data_lines_preserved() {
        let table = CategoryTable::default();
        let journal = "\
Preface without a date.\r
2024-01-20 Taro <taro@example.com>\r
\r
\t* 日記:\r
\tLine with trailing space. \r
\t* 買い物ログ:\r
\t食 old 1\r
\t* TODO:\r
\t- buy milk\r
2024 is not a date heading with a date\r
\t* 買い物ログ: orphan\r
\t食 kept 5\r
";
        let store = RecordStore::new();
        let id = identity();
        let out = Rewriter::new(&table, &store, &id).rewrite(journal);

        let kept: Vec<&str> = journal
            .split_inclusive('\n')
            .filter(|l| !l.contains("食 old"))
            .collect();
        let actual: Vec<&str> = out.text.split_inclusive('\n').collect();
        // The existing heading stays even though the store has nothing for that date.
        let expected: Vec<&str> = kept
            .iter()
            .map(|l| if *l == "\t* 買い物ログ:\r\n" { "\t* 買い物ログ:\n" } else { *l })
            .take(6)
            .chain(["\n"])
            .chain(kept.iter().copied().skip(6))
            .collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_unknown_category_written_as_fallback() {
        let table = CategoryTable::default();
        let small = CategoryTable::from_pairs([("他", "その他")], "その他").unwrap();
        let mut store = RecordStore::new();
        // An id that exists in the default table but not in the small one.
        store.merge([record(&table, date(2024, 1, 15), "保", 5000, "insurance")]);

        let id = identity();
        let out = Rewriter::new(&small, &store, &id).rewrite("");
        assert_eq!(
            out.text,
            "2024-01-15 Taro <taro@example.com>\n\n\t* 買い物ログ:\n\t他 insurance 5000\n\n"
        );
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_rewrite_path_backs_up() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ChangeLog.txt");
        let original = "2024-01-15 Taro <taro@example.com>\n";
        std::fs::write(&path, original).unwrap();

        let table = CategoryTable::default();
        let mut store = RecordStore::new();
        store.merge([record(&table, date(2024, 1, 15), "食", 1200, "lunch")]);
        let id = identity();
        Rewriter::new(&table, &store, &id)
            .rewrite_path(&path)
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(backup::backup_path(&path)).unwrap(),
            original
        );
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "2024-01-15 Taro <taro@example.com>\n\t* 買い物ログ:\n\t食 lunch 1200\n\n"
        );
    }

    #[test]
    fn test_rewrite_path_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ChangeLog.txt");
        let table = CategoryTable::default();
        let store = RecordStore::new();
        let id = identity();
        let err = Rewriter::new(&table, &store, &id)
            .rewrite_path(&path)
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Io);
        assert!(!path.exists());
    }
}
