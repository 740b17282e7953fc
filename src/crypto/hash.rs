//! SHA3-512 digest and constant-time comparison.
//!
//! The digest is only used to build the vault keycheck. Ciphertext
//! integrity is covered by the AEAD tags, not by this hash.

use sha3::{Digest, Sha3_512};
use subtle::ConstantTimeEq;

/// Output length of [`digest`] in bytes (512 bits).
pub const DIGEST_LEN: usize = 64;

/// Hash `data` with SHA3-512.
pub fn digest(data: &[u8]) -> [u8; DIGEST_LEN] {
    let hash = Sha3_512::digest(data);
    let mut out = [0u8; DIGEST_LEN];
    out.copy_from_slice(&hash);
    out
}

/// Compare two byte strings without short-circuiting on the first
/// mismatching byte.
///
/// Slices of different length compare unequal.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
