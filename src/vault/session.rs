//! The unlocked state of a vault.
//!
//! A `Session` is only handed out by `Vault::initialize` or a successful
//! `Vault::unlock`, so holding one proves the password was verified.
//! Operations that encrypt or decrypt take it as an argument.

use std::fmt;

use zeroize::Zeroize;

use crate::crypto::{Cipher, CipherKind, DIGEST_LEN};
use crate::errors::{LockboxError, Result};

/// A live cipher over the vault key plus the keycheck it was verified
/// against. The raw key bytes are not kept; the cipher's key schedule is
/// wiped when the session is dropped.
pub struct Session {
    cipher: Cipher,
    keycheck: [u8; DIGEST_LEN],
}

impl Session {
    pub(crate) fn new(cipher: Cipher, keycheck: [u8; DIGEST_LEN]) -> Self {
        Self { cipher, keycheck }
    }

    /// AEAD scheme of this session.
    pub fn cipher_kind(&self) -> CipherKind {
        self.cipher.kind()
    }

    pub(crate) fn keycheck(&self) -> &[u8; DIGEST_LEN] {
        &self.keycheck
    }

    pub(crate) fn encrypt_field(&self, plaintext: &str) -> Result<Vec<u8>> {
        self.cipher.encrypt(plaintext.as_bytes(), None)
    }

    /// Decrypt one field back into a string.
    ///
    /// Authenticated bytes that are not UTF-8 are reported as `Format`
    /// and wiped before returning.
    pub(crate) fn decrypt_field(&self, ciphertext: &[u8]) -> Result<String> {
        let bytes = self.cipher.decrypt(ciphertext, None)?;
        String::from_utf8(bytes).map_err(|e| {
            let mut bad_bytes = e.into_bytes();
            bad_bytes.zeroize();
            LockboxError::Format("entry field is not valid UTF-8".into())
        })
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("cipher", &self.cipher.kind())
            .finish_non_exhaustive()
    }
}
