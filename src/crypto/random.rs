//! Cryptographically secure random material (salts, keys).
//!
//! Reads straight from the operating system RNG rather than a
//! userspace generator.

use rand::rngs::OsRng;
use rand::TryRngCore;

use crate::errors::{LockboxError, Result};

/// Return `bits / 8` bytes from the OS RNG.
///
/// `bits` must be a multiple of 8.
pub fn random_bytes(bits: usize) -> Result<Vec<u8>> {
    if bits % 8 != 0 {
        return Err(LockboxError::Precondition(format!(
            "random length must be a multiple of 8 bits (got {bits})"
        )));
    }

    let mut buf = vec![0u8; bits / 8];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| LockboxError::RandomFailed(e.to_string()))?;
    Ok(buf)
}
