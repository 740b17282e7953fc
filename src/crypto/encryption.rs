//! Authenticated encryption: AES-GCM and XChaCha20-Poly1305.
//!
//! Each call to `encrypt` draws a fresh random nonce and prepends it to
//! the output. There is no way to pass a nonce in from outside, so a
//! nonce can never be reused under the same key by a caller mistake.
//!
//! Layout of the returned byte buffer:
//!   AES-GCM:            [ 12-byte nonce | ciphertext | 16-byte tag ]
//!   XChaCha20-Poly1305: [ 24-byte nonce | ciphertext | 16-byte tag ]

use std::fmt;

use aes_gcm::aead::consts::U12;
use aes_gcm::aead::generic_array::typenum::Unsigned;
use aes_gcm::aead::{Aead, KeyInit, Nonce, OsRng, Payload};
use aes_gcm::aes::Aes192;
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm};
use chacha20poly1305::XChaCha20Poly1305;

use crate::errors::{LockboxError, Result};

type Aes192Gcm = AesGcm<Aes192, U12>;

/// Size of the authentication tag in bytes, for both schemes.
pub const TAG_LEN: usize = 16;

/// Which AEAD scheme a vault encrypts its records with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CipherKind {
    /// AES in Galois/Counter mode with a 96-bit nonce.
    #[default]
    AesGcm,
    /// XChaCha20-Poly1305 with a 192-bit nonce.
    XChaCha20Poly1305,
}

impl CipherKind {
    /// Nonce length in bytes.
    pub const fn nonce_len(self) -> usize {
        match self {
            Self::AesGcm => 12,
            Self::XChaCha20Poly1305 => 24,
        }
    }

    /// Stable name recorded in the vault's meta table.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::AesGcm => "aes-256-gcm",
            Self::XChaCha20Poly1305 => "xchacha20-poly1305",
        }
    }

    /// Parse a name written by [`CipherKind::tag`].
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "aes-256-gcm" => Some(Self::AesGcm),
            "xchacha20-poly1305" => Some(Self::XChaCha20Poly1305),
            _ => None,
        }
    }
}

impl fmt::Display for CipherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

enum Engine {
    Aes128(Aes128Gcm),
    Aes192(Aes192Gcm),
    Aes256(Aes256Gcm),
    XChaCha(XChaCha20Poly1305),
}

/// An AEAD instance bound to exactly one key.
///
/// The key schedule lives inside the underlying cipher and is zeroized
/// when the `Cipher` is dropped. Calls are stateless: every `encrypt`
/// draws its own nonce.
pub struct Cipher {
    engine: Engine,
}

impl Cipher {
    /// Build a cipher of the given kind.
    ///
    /// AES-GCM accepts 16, 24 or 32-byte keys; XChaCha20-Poly1305 needs 32.
    pub fn new(kind: CipherKind, key: &[u8]) -> Result<Self> {
        match kind {
            CipherKind::AesGcm => Self::aes_gcm(key),
            CipherKind::XChaCha20Poly1305 => Self::xchacha20_poly1305(key),
        }
    }

    /// AES-GCM with the key size picked from the key length.
    pub fn aes_gcm(key: &[u8]) -> Result<Self> {
        let engine = match key.len() {
            16 => Engine::Aes128(Aes128Gcm::new_from_slice(key).map_err(invalid_key)?),
            24 => Engine::Aes192(Aes192Gcm::new_from_slice(key).map_err(invalid_key)?),
            32 => Engine::Aes256(Aes256Gcm::new_from_slice(key).map_err(invalid_key)?),
            n => {
                return Err(LockboxError::Precondition(format!(
                    "AES-GCM key must be 128, 192 or 256 bits (got {} bits)",
                    n * 8
                )))
            }
        };
        Ok(Self { engine })
    }

    /// XChaCha20-Poly1305 over a 256-bit key.
    pub fn xchacha20_poly1305(key: &[u8]) -> Result<Self> {
        let cipher = XChaCha20Poly1305::new_from_slice(key).map_err(invalid_key)?;
        Ok(Self {
            engine: Engine::XChaCha(cipher),
        })
    }

    /// The scheme this instance encrypts with.
    pub fn kind(&self) -> CipherKind {
        match self.engine {
            Engine::XChaCha(_) => CipherKind::XChaCha20Poly1305,
            _ => CipherKind::AesGcm,
        }
    }

    /// Encrypt `plaintext`, optionally binding `associated_data`.
    ///
    /// Returns nonce || ciphertext || tag.
    pub fn encrypt(&self, plaintext: &[u8], associated_data: Option<&[u8]>) -> Result<Vec<u8>> {
        let aad = associated_data.unwrap_or_default();
        match &self.engine {
            Engine::Aes128(c) => seal(c, plaintext, aad),
            Engine::Aes192(c) => seal(c, plaintext, aad),
            Engine::Aes256(c) => seal(c, plaintext, aad),
            Engine::XChaCha(c) => seal(c, plaintext, aad),
        }
    }

    /// Decrypt a blob produced by [`Cipher::encrypt`].
    ///
    /// Fails with `Format` if the blob cannot even hold a nonce and tag,
    /// and with `Integrity` if the tag does not verify. The associated
    /// data must match what was passed to `encrypt` exactly.
    pub fn decrypt(&self, blob: &[u8], associated_data: Option<&[u8]>) -> Result<Vec<u8>> {
        let aad = associated_data.unwrap_or_default();
        match &self.engine {
            Engine::Aes128(c) => open(c, blob, aad),
            Engine::Aes192(c) => open(c, blob, aad),
            Engine::Aes256(c) => open(c, blob, aad),
            Engine::XChaCha(c) => open(c, blob, aad),
        }
    }
}

impl fmt::Debug for Cipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cipher")
            .field("kind", &self.kind())
            .finish_non_exhaustive()
    }
}

fn invalid_key(e: impl fmt::Display) -> LockboxError {
    LockboxError::Precondition(format!("invalid key length: {e}"))
}

fn seal<A: Aead>(cipher: &A, plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
    let nonce = A::generate_nonce(&mut OsRng);

    let sealed = cipher
        .encrypt(
            &nonce,
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|e| LockboxError::EncryptionFailed(format!("encryption error: {e}")))?;

    // Prepend the nonce so the caller only needs to store one blob.
    let mut output = Vec::with_capacity(nonce.len() + sealed.len());
    output.extend_from_slice(&nonce);
    output.extend_from_slice(&sealed);
    Ok(output)
}

fn open<A: Aead>(cipher: &A, blob: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
    let nonce_len = A::NonceSize::USIZE;
    let tag_len = A::TagSize::USIZE;
    if blob.len() < nonce_len + tag_len {
        return Err(LockboxError::Format(format!(
            "blob is {} bytes, shorter than nonce + tag ({})",
            blob.len(),
            nonce_len + tag_len
        )));
    }

    let (nonce_bytes, ciphertext) = blob.split_at(nonce_len);
    let nonce = Nonce::<A>::from_slice(nonce_bytes);

    cipher
        .decrypt(
            nonce,
            Payload {
                msg: ciphertext,
                aad,
            },
        )
        .map_err(|_| LockboxError::Integrity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tags_roundtrip() {
        for kind in [CipherKind::AesGcm, CipherKind::XChaCha20Poly1305] {
            assert_eq!(CipherKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(CipherKind::from_tag("rot13"), None);
    }

    #[test]
    fn aes_accepts_all_three_key_sizes() {
        for len in [16, 24, 32] {
            let cipher = Cipher::aes_gcm(&vec![7u8; len]).unwrap();
            let ct = cipher.encrypt(b"hello", None).unwrap();
            assert_eq!(ct.len(), 12 + 5 + TAG_LEN);
            assert_eq!(cipher.decrypt(&ct, None).unwrap(), b"hello");
        }
    }

    #[test]
    fn rejects_bad_key_lengths() {
        assert!(Cipher::aes_gcm(&[0u8; 20]).is_err());
        assert!(Cipher::xchacha20_poly1305(&[0u8; 16]).is_err());
    }

    #[test]
    fn xchacha_layout() {
        let cipher = Cipher::xchacha20_poly1305(&[1u8; 32]).unwrap();
        let ct = cipher.encrypt(b"abc", None).unwrap();
        assert_eq!(ct.len(), 24 + 3 + TAG_LEN);
        assert_eq!(cipher.kind(), CipherKind::XChaCha20Poly1305);
    }

    #[test]
    fn debug_does_not_leak_key() {
        let cipher = Cipher::aes_gcm(&[0x42u8; 32]).unwrap();
        let dbg = format!("{cipher:?}");
        assert!(dbg.contains("AesGcm"));
        assert!(!dbg.contains("66"));
    }

    #[test]
    fn exact_minimum_length_is_integrity_not_format() {
        let cipher = Cipher::aes_gcm(&[3u8; 32]).unwrap();
        let blob = [0u8; 12 + TAG_LEN];
        assert!(matches!(
            cipher.decrypt(&blob, None),
            Err(LockboxError::Integrity)
        ));
        assert!(matches!(
            cipher.decrypt(&blob[..27], None),
            Err(LockboxError::Format(_))
        ));
    }
}
