//! `lockbox delete`: remove an entry from the vault.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{unlock_vault, Cli};
use crate::errors::{LockboxError, Result};

/// Execute the `delete` command.
///
/// Deleting an id that does not exist succeeds with a notice.
pub fn execute(cli: &Cli, id: i64, force: bool) -> Result<()> {
    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete entry {id}?"))
            .default(false)
            .interact()
            .map_err(|e| LockboxError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    // Unlock first so only the owner of the master password can delete.
    let (mut vault, _session) = unlock_vault(cli)?;
    let removed = vault.delete_entry(id)?;
    vault.close()?;

    if removed {
        output::success(&format!("Deleted entry {id}"));
    } else {
        output::info(&format!("No entry {id}; nothing to delete."));
    }

    Ok(())
}
