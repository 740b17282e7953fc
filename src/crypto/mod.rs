//! Cryptographic primitives for Lockbox.
//!
//! This module provides:
//! - OS-backed random generation (`random`)
//! - SHA3-512 digest and constant-time comparison (`hash`)
//! - Argon2id password-based key derivation (`kdf`)
//! - AES-GCM and XChaCha20-Poly1305 authenticated encryption (`encryption`)

pub mod encryption;
pub mod hash;
pub mod kdf;
pub mod random;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{Cipher, derive_key, digest, ...};
pub use encryption::{Cipher, CipherKind, TAG_LEN};
pub use hash::{constant_time_eq, digest, DIGEST_LEN};
pub use kdf::{derive_key, derive_key_with_params, generate_salt, Argon2Params, KEY_LEN};
pub use random::random_bytes;
