//! `lockbox add`: encrypt and store a new entry.

use crate::cli::output;
use crate::cli::{read_entry_password, unlock_vault, Cli};
use crate::errors::Result;

/// Execute the `add` command.
pub fn execute(cli: &Cli, title: &str, username: &str, password: Option<&str>) -> Result<()> {
    let (mut vault, session) = unlock_vault(cli)?;

    let entry_password = read_entry_password(password, title)?;
    let id = vault.add_entry(&session, title, username, &entry_password)?;
    vault.close()?;

    output::success(&format!("Added entry {id} '{title}'"));
    Ok(())
}
