//! Password-based key derivation using Argon2id.
//!
//! Argon2id is a memory-hard KDF that protects against brute-force and
//! GPU-based attacks. Vaults always use the fixed costs in
//! `Argon2Params::VAULT` (64 MiB, 3 iterations, 4 lanes); explicit
//! parameters are only accepted between a floor and a ceiling.

use argon2::{Algorithm, Argon2, Params, Version};
use zeroize::Zeroizing;

use crate::errors::{LockboxError, Result};

use super::random::random_bytes;

/// Salt size in bits.
pub const SALT_BITS: usize = 128;

/// Length of the vault key in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// Minimum safe memory cost in KiB (8 MB).
const MIN_MEMORY_KIB: u32 = 8_192;

/// Maximum memory cost in KiB (4 GiB).
const MAX_MEMORY_KIB: u32 = 4 * 1024 * 1024;

/// Maximum number of passes.
const MAX_ITERATIONS: u32 = 64;

/// Maximum number of lanes.
const MAX_PARALLELISM: u32 = 64;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Params {
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    /// Number of iterations (default: 3).
    pub iterations: u32,
    /// Parallelism lanes (default: 4).
    pub parallelism: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self::VAULT
    }
}

impl Argon2Params {
    /// The costs every vault key is derived with.
    pub const VAULT: Self = Self {
        memory_kib: 65_536,
        iterations: 3,
        parallelism: 4,
    };

    /// Reject parameters weak enough to make offline guessing cheap, or
    /// large enough to exhaust memory or never finish.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_MEMORY_KIB..=MAX_MEMORY_KIB).contains(&self.memory_kib) {
            return Err(LockboxError::KeyDerivationFailed(format!(
                "Argon2 memory_kib must be between {MIN_MEMORY_KIB} and {MAX_MEMORY_KIB} (got {})",
                self.memory_kib
            )));
        }
        if !(1..=MAX_ITERATIONS).contains(&self.iterations) {
            return Err(LockboxError::KeyDerivationFailed(format!(
                "Argon2 iterations must be between 1 and {MAX_ITERATIONS} (got {})",
                self.iterations
            )));
        }
        if !(1..=MAX_PARALLELISM).contains(&self.parallelism) {
            return Err(LockboxError::KeyDerivationFailed(format!(
                "Argon2 parallelism must be between 1 and {MAX_PARALLELISM} (got {})",
                self.parallelism
            )));
        }
        Ok(())
    }
}

/// Derive `output_len` bytes from a password and salt using the default
/// Argon2id parameters.
///
/// The result is wiped from memory when dropped.
pub fn derive_key(password: &[u8], salt: &[u8], output_len: usize) -> Result<Zeroizing<Vec<u8>>> {
    derive_key_with_params(password, salt, output_len, &Argon2Params::default())
}

/// Derive `output_len` bytes with explicit Argon2id parameters.
///
/// The same password + salt + params always produce the same output.
pub fn derive_key_with_params(
    password: &[u8],
    salt: &[u8],
    output_len: usize,
    argon2_params: &Argon2Params,
) -> Result<Zeroizing<Vec<u8>>> {
    if salt.is_empty() {
        return Err(LockboxError::KeyDerivationFailed(
            "a salt is required".into(),
        ));
    }
    argon2_params.validate()?;

    let params = Params::new(
        argon2_params.memory_kib,
        argon2_params.iterations,
        argon2_params.parallelism,
        Some(output_len),
    )
    .map_err(|e| LockboxError::KeyDerivationFailed(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new(vec![0u8; output_len]);
    argon2
        .hash_password_into(password, salt, key.as_mut_slice())
        .map_err(|e| LockboxError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}")))?;

    Ok(key)
}

/// Generate a fresh random 128-bit salt.
pub fn generate_salt() -> Result<Vec<u8>> {
    random_bytes(SALT_BITS)
}
