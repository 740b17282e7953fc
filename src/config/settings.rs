use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::CipherKind;
use crate::errors::{LockboxError, Result};

/// User-level configuration, loaded from `.lockbox.toml`.
///
/// Every field has a sensible default so Lockbox works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Vault file used when `--vault` is not given.
    #[serde(default = "default_vault_path")]
    pub vault_path: String,

    /// AEAD scheme for newly initialized vaults.
    #[serde(default = "default_cipher")]
    pub cipher: String,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_path() -> String {
    "vault.db".to_string()
}

fn default_cipher() -> String {
    CipherKind::default().tag().to_string()
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_path: default_vault_path(),
            cipher: default_cipher(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for.
    const FILE_NAME: &'static str = ".lockbox.toml";

    /// Load settings from `<dir>/.lockbox.toml`.
    ///
    /// If the file does not exist, defaults are returned. If it exists
    /// but cannot be parsed, or names an unknown cipher, an error is
    /// returned.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            LockboxError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;
        settings.cipher_kind()?;

        Ok(settings)
    }

    /// Resolve the vault file path relative to `dir`.
    pub fn resolved_vault_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.vault_path)
    }

    /// The configured cipher as a crypto-layer value.
    pub fn cipher_kind(&self) -> Result<CipherKind> {
        CipherKind::from_tag(&self.cipher).ok_or_else(|| {
            LockboxError::ConfigError(format!(
                "unknown cipher '{}'; expected 'aes-256-gcm' or 'xchacha20-poly1305'",
                self.cipher
            ))
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────────
