use crate::commands::Out;
use crate::engine::{Engine, ImportReport};
use crate::model::CategoryTable;
use crate::{Config, Result};
use std::path::Path;

/// Adds the expenses in the `memo` file to the ChangeLog memo.
pub fn import(config: Config, memo: &Path) -> Result<Out<ImportReport>> {
    let table = CategoryTable::default();
    let report = Engine::new(&config, &table).import(memo)?;
    let message = format!(
        "Imported {} new records from {} with {} warnings",
        report.added_to_journal,
        memo.display(),
        report.warnings.len()
    );
    Ok(Out::new(message, report))
}
