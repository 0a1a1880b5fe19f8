//! These structs provide the CLI interface for the kakeibo CLI.

use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// kakeibo: keeps a household expense ledger and a ChangeLog memo in agreement.
///
/// Expenses are jotted down in the `* 買い物ログ:` entries of a ChangeLog style text memo, and
/// also kept in a CSV ledger that a household account book app reads. `kakeibo sync` merges the
/// two, removes duplicates and writes the full set of records back to both. Every rewritten file
/// keeps its previous content in a `.bak` file next to it.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the kakeibo home directory and its configuration file.
    ///
    /// This is the first command you should run. Decide where the home directory should be and
    /// pass it as --kakeibo-home, otherwise it will be $HOME/kakeibo.
    Init(InitArgs),
    /// Merge the ledger and the ChangeLog memo and write the merged records to both.
    Sync(SyncArgs),
    /// Add the expenses of a memo file to the ChangeLog memo.
    ///
    /// In the memo file every line under a date heading is read as an expense, no `* 買い物ログ:`
    /// heading is needed. The ledger is not changed, run `kakeibo sync` afterwards.
    Import(ImportArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber EnvFilter documentation.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the kakeibo configuration is held. Defaults to ~/kakeibo
    #[arg(long, env = "KAKEIBO_HOME", default_value_t = default_kakeibo_home())]
    kakeibo_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, kakeibo_home: PathBuf) -> Self {
        Self {
            log_level,
            kakeibo_home: kakeibo_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn kakeibo_home(&self) -> &DisplayPath {
        &self.kakeibo_home
    }
}

/// (Not shown): Args for the `kakeibo init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The ChangeLog memo file. A relative path is resolved against the kakeibo home directory.
    #[arg(long)]
    journal_path: PathBuf,

    /// The directory holding cashbook.csv and cashbook_all.csv. A relative path is resolved
    /// against the kakeibo home directory.
    #[arg(long)]
    ledger_dir: PathBuf,

    /// Your name, as it should appear in new date headings of the ChangeLog memo.
    #[arg(long)]
    author_name: String,

    /// Your email address, as it should appear in new date headings of the ChangeLog memo.
    #[arg(long)]
    contact_address: String,
}

impl InitArgs {
    pub fn new(
        journal_path: impl Into<PathBuf>,
        ledger_dir: impl Into<PathBuf>,
        author_name: impl Into<String>,
        contact_address: impl Into<String>,
    ) -> Self {
        Self {
            journal_path: journal_path.into(),
            ledger_dir: ledger_dir.into(),
            author_name: author_name.into(),
            contact_address: contact_address.into(),
        }
    }

    pub fn journal_path(&self) -> &Path {
        &self.journal_path
    }

    pub fn ledger_dir(&self) -> &Path {
        &self.ledger_dir
    }

    pub fn author_name(&self) -> &str {
        &self.author_name
    }

    pub fn contact_address(&self) -> &str {
        &self.contact_address
    }
}

/// (Not shown): Args for the `kakeibo sync` command.
#[derive(Debug, Default, Parser, Clone)]
pub struct SyncArgs {}

/// (Not shown): Args for the `kakeibo import` command.
#[derive(Debug, Parser, Clone)]
pub struct ImportArgs {
    /// The memo file to read expenses from. It is not modified.
    #[arg(long)]
    memo: PathBuf,
}

impl ImportArgs {
    pub fn new(memo: impl Into<PathBuf>) -> Self {
        Self { memo: memo.into() }
    }

    pub fn memo(&self) -> &Path {
        &self.memo
    }
}

fn default_kakeibo_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("kakeibo"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --kakeibo-home or KAKEIBO_HOME instead of relying on the \
                default kakeibo home directory. If you continue using the program right now, you \
                may have problems!",
            );
            PathBuf::from("kakeibo")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sync() {
        let args = Args::try_parse_from([
            "kakeibo",
            "--log-level",
            "debug",
            "--kakeibo-home",
            "/tmp/kakeibo",
            "sync",
        ])
        .unwrap();
        assert_eq!(args.common().log_level(), LevelFilter::DEBUG);
        assert_eq!(args.common().kakeibo_home().path(), Path::new("/tmp/kakeibo"));
        assert!(matches!(args.command(), Command::Sync(_)));
    }

    #[test]
    fn test_parse_init() {
        let args = Args::try_parse_from([
            "kakeibo",
            "init",
            "--journal-path",
            "memo/ChangeLog.txt",
            "--ledger-dir",
            "ledger",
            "--author-name",
            "Taro Yamada",
            "--contact-address",
            "taro@example.com",
        ])
        .unwrap();
        let Command::Init(init) = args.command() else {
            panic!("expected init, got {:?}", args.command());
        };
        assert_eq!(init.journal_path(), Path::new("memo/ChangeLog.txt"));
        assert_eq!(init.ledger_dir(), Path::new("ledger"));
        assert_eq!(init.author_name(), "Taro Yamada");
        assert_eq!(init.contact_address(), "taro@example.com");
    }

    #[test]
    fn test_parse_import_requires_memo() {
        assert!(Args::try_parse_from(["kakeibo", "import"]).is_err());
        let args = Args::try_parse_from(["kakeibo", "import", "--memo", "memo.txt"]).unwrap();
        let Command::Import(import) = args.command() else {
            panic!("expected import, got {:?}", args.command());
        };
        assert_eq!(import.memo(), Path::new("memo.txt"));
    }
}
