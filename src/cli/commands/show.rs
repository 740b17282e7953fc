//! `lockbox show`: print one entry, password included.

use crate::cli::output;
use crate::cli::{unlock_vault, Cli};
use crate::errors::{LockboxError, Result};

/// Execute the `show` command.
pub fn execute(cli: &Cli, id: i64) -> Result<()> {
    let (vault, session) = unlock_vault(cli)?;

    let record = vault.get_entry(id)?.ok_or(LockboxError::EntryNotFound(id))?;
    let entry = vault.decrypt_record(&session, &record)?;
    vault.close()?;

    if entry.is_corrupted() {
        output::warning(&format!("Entry {id} could not be decrypted."));
    }
    output::print_entry(&entry);

    Ok(())
}
