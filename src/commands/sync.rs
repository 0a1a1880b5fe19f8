use crate::commands::Out;
use crate::engine::{Engine, SyncReport};
use crate::model::CategoryTable;
use crate::{Config, Result};

/// Merges the ledger and the ChangeLog memo and writes the result back to both.
pub fn sync(config: Config) -> Result<Out<SyncReport>> {
    let table = CategoryTable::default();
    let report = Engine::new(&config, &table).sync()?;
    let message = format!(
        "Synced {} records ({} from the ledger, {} new from the ChangeLog memo) with {} warnings",
        report.merged_records,
        report.ledger_records,
        report.added_to_ledger,
        report.warnings.len()
    );
    Ok(Out::new(message, report))
}
