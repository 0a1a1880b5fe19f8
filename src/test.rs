//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::ledger::HEADER;
use crate::Config;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test environment that sets up a kakeibo home directory with a Config, a ChangeLog memo and a
/// ledger directory. Holds TempDir to keep the directory alive for the duration of the test.
pub(crate) struct TestEnv {
    temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// Creates a test environment with Config and the memo and ledger directories, but no files.
    pub(crate) fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("kakeibo");
        let memo_dir = temp_dir.path().join("memo");
        let ledger_dir = temp_dir.path().join("ledger");
        std::fs::create_dir_all(&memo_dir).unwrap();
        std::fs::create_dir_all(&ledger_dir).unwrap();

        let config = Config::create(
            &root,
            memo_dir.join("ChangeLog.txt"),
            &ledger_dir,
            "Taro",
            "taro@example.com",
        )
        .unwrap();

        Self { temp_dir, config }
    }

    /// Creates a test environment and writes the ledger and the ChangeLog memo.
    pub(crate) fn with_files(ledger_rows: &[&str], journal: &str) -> Self {
        let env = Self::new();
        env.write_ledger(ledger_rows);
        std::fs::write(env.config.journal_path(), journal).unwrap();
        env
    }

    pub(crate) fn config(&self) -> &Config {
        &self.config
    }

    /// Writes the ledger header followed by `rows`.
    pub(crate) fn write_ledger(&self, rows: &[&str]) {
        std::fs::write(self.config.ledger_path(), ledger_text(rows)).unwrap();
    }

    /// Writes a file next to the ChangeLog memo and returns its path.
    pub(crate) fn write_memo(&self, name: &str, content: &str) -> PathBuf {
        let path = self.config.journal_dir().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    pub(crate) fn read_journal(&self) -> String {
        read(&self.config.journal_path())
    }

    pub(crate) fn read_ledger(&self) -> String {
        read(&self.config.ledger_path())
    }

    pub(crate) fn read_digest(&self) -> String {
        read(&self.config.digest_path())
    }

    pub(crate) fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }
}

/// The ledger header line followed by `rows`, each ending with `\n`.
pub(crate) fn ledger_text(rows: &[&str]) -> String {
    let mut text = HEADER.join(",");
    text.push('\n');
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    text
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}
