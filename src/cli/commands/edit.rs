//! `lockbox edit`: replace some or all fields of an entry.

use crate::cli::output;
use crate::cli::{read_entry_password, unlock_vault, Cli};
use crate::errors::{LockboxError, Result};

/// Execute the `edit` command.
///
/// Fields not given on the command line keep their current value. A
/// corrupted entry can only be edited by supplying all three fields.
pub fn execute(
    cli: &Cli,
    id: i64,
    title: Option<&str>,
    username: Option<&str>,
    password: Option<&str>,
    password_prompt: bool,
) -> Result<()> {
    let wants_password = password.is_some() || password_prompt;
    if title.is_none() && username.is_none() && !wants_password {
        return Err(LockboxError::CommandFailed(
            "nothing to change; pass --title, --username, --password or --password-prompt".into(),
        ));
    }

    let (mut vault, session) = unlock_vault(cli)?;

    let record = vault.get_entry(id)?.ok_or(LockboxError::EntryNotFound(id))?;
    let current = vault.decrypt_record(&session, &record)?;
    let complete = title.is_some() && username.is_some() && wants_password;
    if current.is_corrupted() && !complete {
        return Err(LockboxError::CommandFailed(format!(
            "entry {id} could not be decrypted; supply --title, --username and a new password to overwrite it"
        )));
    }

    let new_password = if wants_password {
        Some(read_entry_password(password, title.unwrap_or(&current.title))?)
    } else {
        None
    };

    vault.edit_entry(
        &session,
        id,
        title.unwrap_or(&current.title),
        username.unwrap_or(&current.username),
        new_password.as_ref().map_or(current.password.as_str(), |p| p.as_str()),
    )?;
    vault.close()?;

    output::success(&format!("Updated entry {id}"));
    Ok(())
}
