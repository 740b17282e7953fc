//! Entry record types.
//!
//! `EncryptedEntry` is a row exactly as stored: three AEAD blobs.
//! `Entry` is its decrypted form and wipes its strings on drop.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Title shown for a record that could not be decrypted.
pub const DECRYPTION_FAILED: &str = "<decryption failed>";

/// A stored entry row. Every field is ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedEntry {
    pub id: i64,
    pub title: Vec<u8>,
    pub username: Vec<u8>,
    pub password: Vec<u8>,
}

/// A decrypted entry.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Entry {
    pub id: i64,
    pub title: String,
    pub username: String,
    pub password: String,
    #[zeroize(skip)]
    corrupted: bool,
}

impl Entry {
    pub fn new(id: i64, title: String, username: String, password: String) -> Self {
        Self {
            id,
            title,
            username,
            password,
            corrupted: false,
        }
    }

    /// Placeholder for a row whose ciphertext failed to decrypt.
    pub fn corrupted(id: i64) -> Self {
        let mut entry = Self::new(id, DECRYPTION_FAILED.to_string(), String::new(), String::new());
        entry.corrupted = true;
        entry
    }

    /// `true` only for placeholders built by [`Entry::corrupted`], never
    /// for a real entry that happens to carry the placeholder text.
    pub fn is_corrupted(&self) -> bool {
        self.corrupted
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
