//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;

use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{LockboxError, Result};
use crate::vault::{Session, Vault};

/// Minimum password length to prevent trivially weak passwords.
const MIN_PASSWORD_LEN: usize = 8;

/// Environment variable consulted before prompting for the master password.
pub const PASSWORD_ENV: &str = "LOCKBOX_PASSWORD";

/// Lockbox CLI: local encrypted password vault.
#[derive(Parser)]
#[command(name = "lockbox", about = "Local encrypted password vault", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault file (default: `vault_path` from .lockbox.toml, else vault.db)
    #[arg(long, global = true)]
    pub vault: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create and initialize a new vault
    Init {
        /// AEAD scheme: aes-256-gcm or xchacha20-poly1305
        #[arg(long)]
        cipher: Option<String>,
    },

    /// Add an entry
    Add {
        /// Entry title (e.g. "Email")
        title: String,
        /// Username for the entry
        #[arg(short, long, default_value = "")]
        username: String,
        /// Entry password (omit for interactive prompt or piped stdin)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// List all entries
    List,

    /// Show one entry including its password
    Show {
        /// Entry id
        id: i64,
    },

    /// Change fields of an entry (unspecified fields are kept)
    Edit {
        /// Entry id
        id: i64,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New username
        #[arg(short, long)]
        username: Option<String>,
        /// New password (visible in shell history; prefer --password-prompt)
        #[arg(short, long)]
        password: Option<String>,
        /// Read the new password from piped stdin or a hidden prompt
        #[arg(long, conflicts_with = "password")]
        password_prompt: bool,
    },

    /// Delete an entry
    Delete {
        /// Entry id
        id: i64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Get the master password, trying in order:
/// 1. `LOCKBOX_PASSWORD` env var (scripted use)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter master password")
        .interact()
        .map_err(|e| LockboxError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master password with confirmation (used during `init`).
///
/// Also respects `LOCKBOX_PASSWORD`. Enforces a minimum password length.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            if pw.len() < MIN_PASSWORD_LEN {
                return Err(LockboxError::CommandFailed(format!(
                    "password must be at least {MIN_PASSWORD_LEN} characters"
                )));
            }
            return Ok(Zeroizing::new(pw));
        }
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt("Choose master password")
            .with_confirmation(
                "Confirm master password",
                "Passwords do not match, try again",
            )
            .interact()
            .map_err(|e| LockboxError::CommandFailed(format!("password prompt: {e}")))?;

        if password.len() < MIN_PASSWORD_LEN {
            output::warning(&format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(Zeroizing::new(password));
    }
}

/// Read an entry password from, in order: the command line, piped
/// stdin, or a hidden interactive prompt.
pub fn read_entry_password(inline: Option<&str>, title: &str) -> Result<Zeroizing<String>> {
    if let Some(v) = inline {
        output::warning("Password provided on command line; it may appear in shell history.");
        return Ok(Zeroizing::new(v.to_string()));
    }

    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        let trimmed = buf.trim_end_matches(|c: char| c == '\r' || c == '\n').to_string();
        return Ok(Zeroizing::new(trimmed));
    }

    let pw = dialoguer::Password::new()
        .with_prompt(format!("Password for {title}"))
        .allow_empty_password(true)
        .interact()
        .map_err(|e| LockboxError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Resolve the vault file from `--vault` or `.lockbox.toml` in the
/// current directory.
pub fn vault_path(cli: &Cli) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    match &cli.vault {
        Some(path) => Ok(cwd.join(path)),
        None => Ok(Settings::load(&cwd)?.resolved_vault_path(&cwd)),
    }
}

/// Open an existing vault and unlock it with the master password.
///
/// A wrong password closes the vault and yields `WrongPassword`.
pub fn unlock_vault(cli: &Cli) -> Result<(Vault, Session)> {
    let path = vault_path(cli)?;
    if !path.exists() {
        return Err(LockboxError::NotInitialized(path));
    }

    let vault = Vault::open(&path)?;
    if !vault.is_initialized() {
        return Err(LockboxError::NotInitialized(path));
    }

    let password = prompt_password()?;
    match vault.unlock(password.as_bytes())? {
        Some(session) => Ok((vault, session)),
        None => {
            vault.close()?;
            Err(LockboxError::WrongPassword)
        }
    }
}
