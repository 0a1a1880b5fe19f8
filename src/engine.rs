//! Reconciles the ledger with the ChangeLog memo.
//!
//! Both sources are read and validated before anything is written, so a `Format` error in either
//! one leaves every file as it was. After that the ChangeLog memo, the ledger and the digest are
//! rewritten in that order, each with a `.bak` copy of its previous content.

use crate::error::{Error, ErrorType};
use crate::journal::{self, Rewriter, Scope};
use crate::model::{CategoryTable, RecordStore, Warning};
use crate::{ledger, Config, Result};
use anyhow::anyhow;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// What happened during `Engine::sync`.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    /// Rows read from the ledger, not counting skipped rows.
    pub ledger_records: usize,
    /// Data lines read from the ChangeLog memo, not counting skipped lines.
    pub journal_records: usize,
    /// Records in the merged store, which is what both files now hold.
    pub merged_records: usize,
    /// Records that were in the ChangeLog memo but not yet in the ledger.
    pub added_to_ledger: usize,
    pub warnings: Vec<Warning>,
}

/// What happened during `Engine::import`.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub journal_records: usize,
    pub memo_records: usize,
    /// Records that were in the memo file but not yet in the ChangeLog memo.
    pub added_to_journal: usize,
    pub warnings: Vec<Warning>,
}

pub struct Engine<'a> {
    config: &'a Config,
    table: &'a CategoryTable,
}

impl<'a> Engine<'a> {
    pub fn new(config: &'a Config, table: &'a CategoryTable) -> Self {
        Self { config, table }
    }

    /// Merges the ledger and the ChangeLog memo and writes the merged records back to both, and
    /// the record count to the digest file.
    pub fn sync(&self) -> Result<SyncReport> {
        let journal_path = self.config.journal_path();
        let ledger_path = self.config.ledger_path();
        require_dir(&self.config.journal_dir(), "ChangeLog memo")?;
        require_dir(&self.config.ledger_dir(), "ledger")?;

        info!("Reading the ledger at {}", ledger_path.display());
        let ledger = ledger::read_path(&ledger_path, self.table)?;
        info!("Reading the ChangeLog memo at {}", journal_path.display());
        let journal = journal::extract_path(&journal_path, self.table, Scope::ShoppingLog)?;

        let ledger_records = ledger.records.len();
        let journal_records = journal.records.len();
        let mut warnings = ledger.warnings;
        warnings.extend(journal.warnings);

        // Ledger first, so that records keep their ledger order and new ones go at the end.
        let mut store = RecordStore::new();
        store.merge(ledger.records);
        let added_to_ledger = store.merge(journal.records);
        debug!(
            "Merged {} ledger and {} memo records into {}",
            ledger_records,
            journal_records,
            store.len()
        );

        let rewriter = Rewriter::new(self.table, &store, self.config.identity());
        warnings.extend(rewriter.rewrite_path(&journal_path)?);
        warnings.extend(ledger::write(store.records(), &ledger_path, self.table)?);
        ledger::write_digest(store.records(), &self.config.digest_path())?;

        Ok(SyncReport {
            ledger_records,
            journal_records,
            merged_records: store.len(),
            added_to_ledger,
            warnings,
        })
    }

    /// Adds the records of a memo file to the ChangeLog memo. In the memo file a date heading
    /// opens a block by itself. The memo file and the ledger are not modified.
    pub fn import(&self, memo: &Path) -> Result<ImportReport> {
        let journal_path = self.config.journal_path();
        require_dir(&self.config.journal_dir(), "ChangeLog memo")?;

        info!("Reading the ChangeLog memo at {}", journal_path.display());
        let journal = journal::extract_path(&journal_path, self.table, Scope::ShoppingLog)?;
        info!("Reading the memo file at {}", memo.display());
        let imported = journal::extract_path(memo, self.table, Scope::WholeDay)?;

        let journal_records = journal.records.len();
        let memo_records = imported.records.len();
        let mut warnings = journal.warnings;
        warnings.extend(imported.warnings);

        let mut store = RecordStore::new();
        store.merge(journal.records);
        let added_to_journal = store.merge(imported.records);

        let rewriter = Rewriter::new(self.table, &store, self.config.identity());
        warnings.extend(rewriter.rewrite_path(&journal_path)?);

        Ok(ImportReport {
            journal_records,
            memo_records,
            added_to_journal,
            warnings,
        })
    }
}

fn require_dir(dir: &Path, what: &str) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    Err(Error::new(
        ErrorType::Config,
        anyhow!("The {what} directory does not exist '{}'", dir.display()),
    ))
}
