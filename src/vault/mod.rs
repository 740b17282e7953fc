//! Vault module: encrypted entry storage.
//!
//! This module provides:
//! - The SQLite layout of a vault file (`schema`)
//! - `EncryptedEntry` and `Entry` record types (`entry`)
//! - `Session`, the proof of a verified master password (`session`)
//! - `Vault`, which opens, initializes, unlocks and edits a vault (`store`)

pub mod entry;
pub mod schema;
pub mod session;
pub mod store;

// Re-export the most commonly used items.
pub use entry::{EncryptedEntry, Entry, DECRYPTION_FAILED};
pub use session::Session;
pub use store::Vault;
