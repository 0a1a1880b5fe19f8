use crate::args::InitArgs;
use crate::commands::Out;
use crate::{Config, Result};
use std::path::Path;

/// Creates the kakeibo home directory and writes an initial `config.json` from `args`.
///
/// The ChangeLog memo and the ledger directory are not created or checked here, `sync` checks
/// that they exist.
///
/// # Errors
/// - Returns an error if any file operations fail.
pub fn init(kakeibo_home: &Path, args: &InitArgs) -> Result<Out<()>> {
    let config = Config::create(
        kakeibo_home,
        args.journal_path(),
        args.ledger_dir(),
        args.author_name(),
        args.contact_address(),
    )
    .map_err(|e| e.context("Unable to create the kakeibo home directory and config"))?;
    Ok(format!(
        "Successfully created the kakeibo config at {}",
        config.config_path().display()
    )
    .into())
}
