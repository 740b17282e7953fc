//! `lockbox list`: display all entries in a table.

use crate::cli::output;
use crate::cli::{unlock_vault, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (vault, session) = unlock_vault(cli)?;

    let entries = vault.decrypted_entries(&session)?;
    let corrupted = entries.iter().filter(|e| e.is_corrupted()).count();
    vault.close()?;

    let noun = if entries.len() == 1 { "entry" } else { "entries" };
    output::info(&format!("{} {noun}", entries.len()));
    output::print_entries_table(&entries);

    if corrupted > 0 {
        output::warning(&format!("{corrupted} entry(ies) could not be decrypted."));
    }

    Ok(())
}
