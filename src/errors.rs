use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in Lockbox.
#[derive(Debug, Error)]
pub enum LockboxError {
    // --- Crypto errors ---
    #[error("Malformed ciphertext: {0}")]
    Format(String),

    #[error("Integrity check failed; ciphertext was tampered with or the key is wrong")]
    Integrity,

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Random generation failed: {0}")]
    RandomFailed(String),

    #[error("Precondition violated: {0}")]
    Precondition(String),

    // --- Vault errors ---
    #[error("Vault at {0} is already initialized")]
    AlreadyInitialized(PathBuf),

    #[error("Vault at {0} has not been initialized; run `lockbox init` first")]
    NotInitialized(PathBuf),

    #[error("Entry {0} not found")]
    EntryNotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Incorrect password")]
    WrongPassword,
}

impl LockboxError {
    /// Returns `true` for failures that mean a single stored record is
    /// unreadable (bad layout or failed authentication).
    ///
    /// Bulk listing replaces such records with a placeholder instead of
    /// aborting. Everything else is a real error and must propagate.
    pub fn is_corrupt_record(&self) -> bool {
        matches!(self, Self::Format(_) | Self::Integrity)
    }
}

/// Convenience type alias for Lockbox results.
pub type Result<T> = std::result::Result<T, LockboxError>;
