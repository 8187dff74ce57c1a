use std::{fs, path::Path};

use crate::{
    errors::BarsError,
    ledger::{AccountSource, Ledger},
};

/// Writes a ledger snapshot to disk atomically by staging to a temporary file.
pub fn save_snapshot(ledger: &Ledger, path: &Path) -> Result<(), BarsError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(ledger)?;
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    tracing::debug!(path = %path.display(), "ledger snapshot saved");
    Ok(())
}

/// Loads a ledger snapshot, rebuilding the lookup indexes the JSON form omits.
pub fn load_snapshot(path: &Path) -> Result<Ledger, BarsError> {
    let data = fs::read_to_string(path)?;
    let mut ledger: Ledger = serde_json::from_str(&data)?;
    ledger.reindex();
    tracing::debug!(
        path = %path.display(),
        accounts = ledger.accounts().len(),
        "ledger snapshot loaded"
    );
    Ok(ledger)
}
