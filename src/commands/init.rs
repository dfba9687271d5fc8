use crate::commands::Out;
use crate::{store, Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory and an initial `config.json` pointing at the ledger
/// export.
///
/// # Arguments
/// - `lens_home` - The directory that will be the root of the data directory, e.g.
///   `$HOME/lens`
/// - `ledger` - The ledger export file to read. Validated here by parsing it once so
///   a bad path or malformed export fails at init time rather than on first query.
/// - `uid` - The account to keep when the export mixes accounts.
///
/// # Errors
/// - Returns an error if the export is missing or malformed, or if any file
///   operation fails.
pub async fn init(lens_home: &Path, ledger: &Path, uid: Option<u64>) -> Result<Out<()>> {
    let config = Config::create(lens_home, ledger, uid)
        .await
        .context("Unable to create the data directory and config")?;
    let records = store::load_records(config.ledger_path(), config.uid())
        .await
        .context("The ledger export failed to parse")?;
    Ok(format!(
        "Successfully created the lens directory and config; the ledger export holds {} records",
        records.len()
    )
    .into())
}
