//! Configuration file handling.
//!
//! The configuration file is stored at `$KAKEIBO_HOME/config.json` and says where the ChangeLog
//! memo and the ledger directory are, and who signs new date headings in the memo.

use crate::error::{Error, ErrorType, IntoResult};
use crate::journal::Identity;
use crate::{utils, Result};
use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_JSON: &str = "config.json";
const LEDGER_CSV: &str = "cashbook.csv";
const DIGEST_CSV: &str = "cashbook_all.csv";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$KAKEIBO_HOME` and from there it loads `$KAKEIBO_HOME/config.json`. Relative paths
/// in the file are resolved against `$KAKEIBO_HOME`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    identity: Identity,
}

impl Config {
    /// Creates the home directory if needed and writes an initial `config.json` into it.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be `$KAKEIBO_HOME`, e.g. `$HOME/kakeibo`
    /// - `journal_path` - The ChangeLog memo file
    /// - `ledger_dir` - The directory holding `cashbook.csv` and `cashbook_all.csv`
    /// - `author_name`, `contact_address` - Used in the date headings of new memo sections
    ///
    /// # Errors
    /// - Returns an error if any file operations fail.
    pub fn create(
        dir: impl Into<PathBuf>,
        journal_path: impl Into<PathBuf>,
        ledger_dir: impl Into<PathBuf>,
        author_name: impl Into<String>,
        contact_address: impl Into<String>,
    ) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)?;
        let root = utils::canonicalize(&maybe_relative)?;
        let config_path = root.join(CONFIG_JSON);

        let config_file = ConfigFile {
            journal_path: journal_path.into(),
            ledger_dir: ledger_dir.into(),
            author_name: author_name.into(),
            contact_address: contact_address.into(),
        };
        config_file.save(&config_path)?;
        Ok(Self::from_parts(root, config_path, config_file))
    }

    /// This will
    /// - validate that `kakeibo_home` exists and that the config file exists
    /// - load the config file, failing if any setting is missing
    /// - return the loaded configuration object
    ///
    /// Every failure is a `Config` error.
    pub fn load(kakeibo_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = kakeibo_home.into();
        if !maybe_relative.is_dir() {
            return Err(Error::new(
                ErrorType::Config,
                anyhow!("The kakeibo home directory is missing '{}'", maybe_relative.display()),
            ));
        }
        let root = utils::canonicalize(&maybe_relative)?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            return Err(Error::new(
                ErrorType::Config,
                anyhow!("The config file is missing '{}'", config_path.display()),
            ));
        }
        let config_file = ConfigFile::load(&config_path)?;
        Ok(Self::from_parts(root, config_path, config_file))
    }

    fn from_parts(root: PathBuf, config_path: PathBuf, config_file: ConfigFile) -> Self {
        let identity = Identity::new(&config_file.author_name, &config_file.contact_address);
        Self {
            root,
            config_path,
            config_file,
            identity,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// The ChangeLog memo file.
    pub fn journal_path(&self) -> PathBuf {
        self.resolve(&self.config_file.journal_path)
    }

    /// The directory that must contain the ChangeLog memo.
    pub fn journal_dir(&self) -> PathBuf {
        let journal = self.journal_path();
        journal
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone())
    }

    pub fn ledger_dir(&self) -> PathBuf {
        self.resolve(&self.config_file.ledger_dir)
    }

    /// `cashbook.csv`, the full ledger.
    pub fn ledger_path(&self) -> PathBuf {
        self.ledger_dir().join(LEDGER_CSV)
    }

    /// `cashbook_all.csv`, the single row digest of the ledger.
    pub fn digest_path(&self) -> PathBuf {
        self.ledger_dir().join(DIGEST_CSV)
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Checks if `p` is relative, and if so, resolves it. Returns it unchanged if it is absolute.
    fn resolve(&self, p: &Path) -> PathBuf {
        if p.is_absolute() {
            return p.to_path_buf();
        }
        self.root.join(p)
    }
}

/// Represents the serialization and deserialization format of the configuration file. All keys
/// are required.
///
/// Example configuration:
/// ```json
/// {
///   "journal_path": "/home/taro/memo/ChangeLog.txt",
///   "ledger_dir": "/home/taro/Dropbox/kakeibo",
///   "author_name": "Taro Yamada",
///   "contact_address": "taro@example.com"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    /// Path to the ChangeLog memo (relative to config.json or absolute)
    journal_path: PathBuf,

    /// Directory with the ledger CSV files (relative to config.json or absolute)
    ledger_dir: PathBuf,

    /// Name used in new date headings
    author_name: String,

    /// Email address used in new date headings
    contact_address: String,
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns a `Config` error if the file cannot be read or parsed
    fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))
            .pub_result(ErrorType::Config)?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))
            .pub_result(ErrorType::Config)
    }

    /// Saves the ConfigFile to the specified path.
    fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self)
            .context("Unable to serialize config")
            .pub_result(ErrorType::Config)?;
        utils::write(p, data)
    }
}
