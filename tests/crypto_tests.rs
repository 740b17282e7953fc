//! Integration tests for the Lockbox crypto module.

use std::collections::HashSet;

use lockbox::crypto::{
    constant_time_eq, derive_key, derive_key_with_params, digest, generate_salt, random_bytes,
    Argon2Params, Cipher, CipherKind, KEY_LEN, TAG_LEN,
};
use lockbox::errors::LockboxError;
use proptest::prelude::*;

const KINDS: [CipherKind; 2] = [CipherKind::AesGcm, CipherKind::XChaCha20Poly1305];

fn cipher(kind: CipherKind) -> Cipher {
    Cipher::new(kind, &[0xABu8; 32]).expect("valid key")
}

fn fast() -> Argon2Params {
    Argon2Params {
        memory_kib: 8_192,
        iterations: 1,
        parallelism: 1,
    }
}

// ---------------------------------------------------------------------------
// Encryption round-trip
// ---------------------------------------------------------------------------

#[test]
fn encrypt_decrypt_roundtrip_for_all_sizes() {
    let big = vec![0x5Au8; 8 * 1024];
    for kind in KINDS {
        let c = cipher(kind);
        for plaintext in [&b""[..], &b"x"[..], &big[..]] {
            let ct = c.encrypt(plaintext, None).expect("encrypt");
            assert_eq!(ct.len(), kind.nonce_len() + plaintext.len() + TAG_LEN);
            assert_eq!(c.decrypt(&ct, None).expect("decrypt"), plaintext);
        }
    }
}

#[test]
fn associated_data_must_match() {
    for kind in KINDS {
        let c = cipher(kind);
        let ct = c.encrypt(b"secret", Some(&b"header"[..])).unwrap();

        assert_eq!(c.decrypt(&ct, Some(&b"header"[..])).unwrap(), b"secret");
        assert!(matches!(
            c.decrypt(&ct, Some(&b"Header"[..])),
            Err(LockboxError::Integrity)
        ));
        assert!(matches!(c.decrypt(&ct, None), Err(LockboxError::Integrity)));
    }
}

#[test]
fn decrypt_with_wrong_key_fails() {
    for kind in KINDS {
        let ct = cipher(kind).encrypt(b"TOP_SECRET", None).unwrap();
        let other = Cipher::new(kind, &[0x22u8; 32]).unwrap();
        assert!(matches!(other.decrypt(&ct, None), Err(LockboxError::Integrity)));
    }
}

#[test]
fn decrypt_with_truncated_data_is_format_error() {
    for kind in KINDS {
        let c = cipher(kind);
        let short = vec![0u8; kind.nonce_len() + TAG_LEN - 1];
        assert!(matches!(c.decrypt(&short, None), Err(LockboxError::Format(_))));
        assert!(matches!(c.decrypt(&[], None), Err(LockboxError::Format(_))));
    }
}

#[test]
fn every_single_bit_flip_is_detected() {
    for kind in KINDS {
        let c = cipher(kind);
        let ct = c.encrypt(b"hunter2", None).unwrap();
        for i in 0..ct.len() * 8 {
            let mut tampered = ct.clone();
            tampered[i / 8] ^= 1 << (i % 8);
            assert!(
                matches!(c.decrypt(&tampered, None), Err(LockboxError::Integrity)),
                "{kind}: flipping bit {i} went undetected"
            );
        }
    }
}

#[test]
fn ten_thousand_nonces_are_distinct() {
    for kind in KINDS {
        let c = cipher(kind);
        let n = kind.nonce_len();
        let nonces: HashSet<Vec<u8>> = (0..10_000)
            .map(|_| c.encrypt(b"same", None).unwrap()[..n].to_vec())
            .collect();
        assert_eq!(nonces.len(), 10_000);
    }
}

proptest! {
    #[test]
    fn prop_roundtrip(plaintext in proptest::collection::vec(any::<u8>(), 0..2048), xchacha in any::<bool>()) {
        let kind = if xchacha { CipherKind::XChaCha20Poly1305 } else { CipherKind::AesGcm };
        let c = cipher(kind);
        let ct = c.encrypt(&plaintext, None).unwrap();
        prop_assert_eq!(c.decrypt(&ct, None).unwrap(), plaintext);
    }

    #[test]
    fn prop_tamper_detected(plaintext in proptest::collection::vec(any::<u8>(), 0..256), bit in any::<usize>()) {
        let c = cipher(CipherKind::XChaCha20Poly1305);
        let mut ct = c.encrypt(&plaintext, None).unwrap();
        let bit = bit % (ct.len() * 8);
        ct[bit / 8] ^= 1 << (bit % 8);
        prop_assert!(matches!(c.decrypt(&ct, None), Err(LockboxError::Integrity)));
    }
}

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

#[test]
fn random_bytes_requires_whole_bytes() {
    assert_eq!(random_bytes(128).unwrap().len(), 16);
    assert!(random_bytes(100).is_err());
}

#[test]
fn digest_is_64_bytes_and_deterministic() {
    let a = digest(b"key material");
    assert_eq!(a.len(), 64);
    assert_eq!(a, digest(b"key material"));
    assert_ne!(a, digest(b"key materiaL"));
}

#[test]
fn constant_time_eq_handles_lengths() {
    assert!(constant_time_eq(&[1, 2, 3], &[1, 2, 3]));
    assert!(!constant_time_eq(&[1, 2, 3], &[1, 2]));
}

// ---------------------------------------------------------------------------
// Key derivation (Argon2id)
// ---------------------------------------------------------------------------

#[test]
fn derive_key_default_params_deterministic() {
    let salt = generate_salt().unwrap();
    let key1 = derive_key(b"correct-horse", &salt, KEY_LEN).expect("derive 1");
    let key2 = derive_key(b"correct-horse", &salt, KEY_LEN).expect("derive 2");
    assert_eq!(key1.len(), 32);
    assert_eq!(*key1, *key2, "same password + salt must produce the same key");
}

#[test]
fn one_byte_salt_change_changes_whole_key() {
    let salt = generate_salt().unwrap();
    let mut other = salt.clone();
    other[0] ^= 0x01;

    let a = derive_key_with_params(b"pw", &salt, KEY_LEN, &fast()).unwrap();
    let b = derive_key_with_params(b"pw", &other, KEY_LEN, &fast()).unwrap();

    let same_bytes = a.iter().zip(b.iter()).filter(|(x, y)| x == y).count();
    assert_ne!(*a, *b);
    assert!(same_bytes < 8, "{same_bytes} of 32 bytes matched");
}

#[test]
fn different_passwords_different_keys() {
    let salt = generate_salt().unwrap();
    let a = derive_key_with_params(b"password-one", &salt, KEY_LEN, &fast()).unwrap();
    let b = derive_key_with_params(b"password-two", &salt, KEY_LEN, &fast()).unwrap();
    assert_ne!(*a, *b);
}
