//! `lockbox init`: create a vault file and set its master password.

use crate::cli::output;
use crate::cli::{prompt_new_password, vault_path, Cli};
use crate::config::Settings;
use crate::crypto::CipherKind;
use crate::errors::{LockboxError, Result};
use crate::vault::Vault;

/// Execute the `init` command.
pub fn execute(cli: &Cli, cipher: Option<&str>) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let path = vault_path(cli)?;

    // 1. Resolve the cipher: flag first, then config file.
    let kind = match cipher {
        Some(tag) => CipherKind::from_tag(tag).ok_or_else(|| {
            LockboxError::CommandFailed(format!(
                "unknown cipher '{tag}'; expected 'aes-256-gcm' or 'xchacha20-poly1305'"
            ))
        })?,
        None => Settings::load(&cwd)?.cipher_kind()?,
    };

    // 2. Create the parent directory if needed.
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
            output::info(&format!("Created directory: {}", parent.display()));
        }
    }

    // 3. Refuse to touch an initialized vault before asking for a password.
    let mut vault = Vault::open(&path)?;
    if vault.is_initialized() {
        output::tip("Use `lockbox add` to add entries to the existing vault.");
        return Err(LockboxError::AlreadyInitialized(path));
    }

    // 4. Prompt for a new password and derive the key.
    let password = prompt_new_password()?;
    output::info("Deriving key (this takes a moment)...");
    let session = vault.initialize_with(password.as_bytes(), kind)?;
    drop(session);
    vault.close()?;

    output::success(&format!(
        "Vault created at {} ({kind})",
        path.display()
    ));
    output::tip("Run `lockbox add <TITLE>` to add an entry.");
    output::tip("Run `lockbox list` to see all entries.");

    Ok(())
}
